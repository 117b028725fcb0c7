//! File domain handler.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use deskpilot_protocols::{CapabilityKind, Domain, TaskError, TaskResult};

use super::DomainHandler;
use crate::registry::CapabilityRegistry;
use crate::rules::extraction::{extract, extract_content, ParamKind};
use crate::rules::{contains_any, normalize};

const CREATE_TRIGGERS: &[&str] = &["создать файл", "создать", "записать", "написать"];
const READ_TRIGGERS: &[&str] = &["прочитать", "читать"];
const DELETE_TRIGGERS: &[&str] = &["удалить файл", "удалить", "стереть"];

static CREATE_VERB_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:create|write)\b").expect("create verb regex must compile"));
static READ_VERB_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bread\b").expect("read verb regex must compile"));
static DELETE_VERB_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:delete|remove)\b").expect("delete verb regex must compile"));
static QUOTED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"'[^']*'|"[^"]*""#).expect("quoted text regex must compile"));

/// File sub-operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileOperation {
    Create,
    Read,
    Delete,
}

impl FileOperation {
    /// Detect the operation in normalized text that no longer contains
    /// the filename or quoted content.
    fn detect(text: &str) -> Option<Self> {
        if contains_any(text, CREATE_TRIGGERS) || CREATE_VERB_RE.is_match(text) {
            Some(FileOperation::Create)
        } else if contains_any(text, READ_TRIGGERS) || READ_VERB_RE.is_match(text) {
            Some(FileOperation::Read)
        } else if contains_any(text, DELETE_TRIGGERS) || DELETE_VERB_RE.is_match(text) {
            Some(FileOperation::Delete)
        } else {
            None
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            FileOperation::Create => "create",
            FileOperation::Read => "read",
            FileOperation::Delete => "delete",
        }
    }
}

/// Description without quoted spans and without the filename token, so
/// neither can be mistaken for an operation verb.
fn operation_text(description: &str, filename: Option<&str>) -> String {
    let text = normalize(description);
    let text = QUOTED_RE.replace_all(&text, " ");
    let Some(filename) = filename.map(normalize) else {
        return text.into_owned();
    };
    text.split_whitespace()
        .filter(|token| {
            let token = token.trim_matches(|c: char| !c.is_alphanumeric() && c != '_');
            token != filename && !token.ends_with(&format!("/{}", filename))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Creates, reads and deletes files through the filesystem capability.
#[derive(Debug, Default)]
pub struct FileHandler;

impl FileHandler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DomainHandler for FileHandler {
    fn domain(&self) -> Domain {
        Domain::File
    }

    fn required_capabilities(&self) -> &'static [CapabilityKind] {
        &[CapabilityKind::FileSystem]
    }

    async fn execute(
        &self,
        description: &str,
        capabilities: &CapabilityRegistry,
    ) -> Result<TaskResult, TaskError> {
        let filesystem = capabilities.get_filesystem()?;

        let filename = extract(description, ParamKind::Filename);
        let text = operation_text(description, filename.as_deref());
        let Some(operation) = FileOperation::detect(&text) else {
            return Ok(TaskResult::failure(format!(
                "Unknown file operation: {}",
                description
            )));
        };
        let Some(filename) = filename else {
            return Ok(TaskResult::failure("Could not determine filename"));
        };
        debug!(operation = operation.verb(), %filename, "File operation");

        let outcome = match operation {
            FileOperation::Create => {
                let content = extract_content(description);
                filesystem
                    .create_file(&filename, &content)
                    .await
                    .map(|()| format!("File {} created with content: {}", filename, content))
            }
            FileOperation::Read => filesystem.read_file(&filename).await,
            FileOperation::Delete => filesystem
                .delete_file(&filename)
                .await
                .map(|()| format!("File {} deleted", filename)),
        };

        Ok(match outcome {
            Ok(details) => TaskResult::success(details),
            Err(e) => TaskResult::failure(format!(
                "Could not {} file {}: {}",
                operation.verb(),
                filename,
                e
            )),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_operation() {
        assert_eq!(
            FileOperation::detect("создать файл a.txt"),
            Some(FileOperation::Create)
        );
        assert_eq!(
            FileOperation::detect("прочитать файл a.txt"),
            Some(FileOperation::Read)
        );
        assert_eq!(
            FileOperation::detect("удалить файл a.txt"),
            Some(FileOperation::Delete)
        );
        assert_eq!(FileOperation::detect("remove old.log"), Some(FileOperation::Delete));
        assert_eq!(FileOperation::detect("a.txt"), None);
    }

    #[test]
    fn test_english_verbs_need_word_boundaries() {
        assert_eq!(FileOperation::detect("overwrite"), None);
        assert_eq!(FileOperation::detect("already"), None);
        assert_eq!(FileOperation::detect("please read it"), Some(FileOperation::Read));
    }

    #[test]
    fn test_operation_text_drops_filename_and_quotes() {
        assert_eq!(
            operation_text("Прочитать файл report_created.txt", Some("report_created.txt")),
            "прочитать файл"
        );
        assert_eq!(
            operation_text("Удалить файл readme.txt.", Some("readme.txt")),
            "удалить файл"
        );
        assert_eq!(
            operation_text("write file a.txt with text 'please delete'", Some("a.txt")),
            "write file with text"
        );
        assert_eq!(operation_text("read file a", Some("a")), "read file");
    }

    #[test]
    fn test_filename_words_do_not_pick_operation() {
        let detect = |description: &str| {
            let filename = extract(description, ParamKind::Filename);
            FileOperation::detect(&operation_text(description, filename.as_deref()))
        };
        assert_eq!(detect("Прочитать файл report_created.txt"), Some(FileOperation::Read));
        assert_eq!(detect("Удалить файл readme.txt"), Some(FileOperation::Delete));
        assert_eq!(detect("delete file write_log.txt"), Some(FileOperation::Delete));
    }

    #[test]
    fn test_create_takes_precedence() {
        assert_eq!(
            FileOperation::detect("create file a.txt then read it"),
            Some(FileOperation::Create)
        );
    }

    #[tokio::test]
    async fn test_missing_filesystem_is_capability_error() {
        let handler = FileHandler::new();
        let err = handler
            .execute("Создать файл a.txt", &CapabilityRegistry::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Capability not available: filesystem");
    }
}
