//! Parameter extraction rules.
//!
//! Each [`ParamKind`] has an ordered list of patterns. The first pattern
//! whose capture is non-empty after trimming (and not a rejected word) wins.
//! A miss yields `None`; extraction never fails.

use once_cell::sync::Lazy;
use regex::Regex;

use super::BROWSER_TRIGGERS;

/// Parameter kinds that can be pulled from a description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Filename,
    Content,
    SearchQuery,
    ApplicationName,
    RegisterUsername,
    LoginUsername,
    Password,
    ElementTarget,
}

impl ParamKind {
    /// Human-readable parameter name.
    pub fn label(&self) -> &'static str {
        match self {
            ParamKind::Filename => "filename",
            ParamKind::Content => "content",
            ParamKind::SearchQuery => "search query",
            ParamKind::ApplicationName => "application name",
            ParamKind::RegisterUsername | ParamKind::LoginUsername => "username",
            ParamKind::Password => "password",
            ParamKind::ElementTarget => "element",
        }
    }
}

/// One ordered extraction candidate.
#[derive(Debug)]
pub struct ExtractionRule {
    pub pattern: Regex,
    pub group: usize,
    pub kind: ParamKind,
    /// Captures equal to one of these (case-insensitively) are skipped.
    pub rejected: &'static [&'static str],
}

impl ExtractionRule {
    fn new(kind: ParamKind, pattern: &str) -> Self {
        Self::rejecting(kind, pattern, &[])
    }

    fn rejecting(kind: ParamKind, pattern: &str, rejected: &'static [&'static str]) -> Self {
        Self {
            pattern: Regex::new(&format!("(?i){}", pattern))
                .expect("extraction pattern must compile"),
            group: 1,
            kind,
            rejected,
        }
    }

    /// First acceptable capture in `description`.
    pub fn apply(&self, description: &str) -> Option<String> {
        self.pattern.captures_iter(description).find_map(|caps| {
            let value = caps.get(self.group)?.as_str().trim();
            if value.is_empty() {
                return None;
            }
            let lowered = value.to_lowercase();
            if self.rejected.contains(&lowered.as_str()) {
                return None;
            }
            Some(value.to_string())
        })
    }
}

const ELEMENT_FILLER_WORDS: &[&str] = &["on", "in", "at", "the", "на", "в"];

static FILENAME_RULES: Lazy<Vec<ExtractionRule>> = Lazy::new(|| {
    vec![
        ExtractionRule::new(ParamKind::Filename, r"(\w+\.\w+)"),
        ExtractionRule::new(ParamKind::Filename, r"файл\s+(\S+)"),
        ExtractionRule::new(ParamKind::Filename, r"файла\s+(\S+)"),
        ExtractionRule::new(ParamKind::Filename, r"file\s+(\S+)"),
    ]
});

static CONTENT_RULES: Lazy<Vec<ExtractionRule>> = Lazy::new(|| {
    vec![
        ExtractionRule::new(ParamKind::Content, r"'([^']*)'"),
        ExtractionRule::new(ParamKind::Content, r#""([^"]*)""#),
        ExtractionRule::new(ParamKind::Content, r#"текстом\s+["']?([^"']*)["']?"#),
        ExtractionRule::new(ParamKind::Content, r#"text\s+["']?([^"']*)["']?"#),
    ]
});

static SEARCH_QUERY_RULES: Lazy<Vec<ExtractionRule>> = Lazy::new(|| {
    vec![
        ExtractionRule::new(ParamKind::SearchQuery, r"'([^']*)'"),
        ExtractionRule::new(ParamKind::SearchQuery, r#""([^"]*)""#),
        ExtractionRule::new(ParamKind::SearchQuery, r#"поисковике\s+["']?([^"']*)["']?"#),
        ExtractionRule::new(ParamKind::SearchQuery, r#"найти\s+["']?([^"']*)["']?"#),
        ExtractionRule::new(
            ParamKind::SearchQuery,
            r#"search(?:\s+for)?\s+["']?([^"']*)["']?"#,
        ),
    ]
});

static APPLICATION_NAME_RULES: Lazy<Vec<ExtractionRule>> = Lazy::new(|| {
    vec![
        ExtractionRule::rejecting(ParamKind::ApplicationName, r"открыть\s+(\w+)", BROWSER_TRIGGERS),
        ExtractionRule::rejecting(
            ParamKind::ApplicationName,
            r"запустить\s+(\w+)",
            BROWSER_TRIGGERS,
        ),
        ExtractionRule::rejecting(ParamKind::ApplicationName, r"запуск\s+(\w+)", BROWSER_TRIGGERS),
        ExtractionRule::rejecting(
            ParamKind::ApplicationName,
            r"приложение\s+(\w+)",
            BROWSER_TRIGGERS,
        ),
        ExtractionRule::rejecting(
            ParamKind::ApplicationName,
            r"(?:open|launch|run)\s+(?:the\s+)?(\w+)",
            BROWSER_TRIGGERS,
        ),
        ExtractionRule::rejecting(
            ParamKind::ApplicationName,
            r"application\s+(\w+)",
            BROWSER_TRIGGERS,
        ),
    ]
});

static REGISTER_USERNAME_RULES: Lazy<Vec<ExtractionRule>> = Lazy::new(|| {
    vec![
        ExtractionRule::new(ParamKind::RegisterUsername, r"пользователя\s+(\w+)"),
        ExtractionRule::new(ParamKind::RegisterUsername, r"user\s+(\w+)"),
    ]
});

static LOGIN_USERNAME_RULES: Lazy<Vec<ExtractionRule>> = Lazy::new(|| {
    vec![
        ExtractionRule::new(ParamKind::LoginUsername, r"пользователь\s+(\w+)"),
        ExtractionRule::new(ParamKind::LoginUsername, r"user\s+(\w+)"),
        ExtractionRule::new(ParamKind::LoginUsername, r"\bas\s+(\w+)"),
    ]
});

static PASSWORD_RULES: Lazy<Vec<ExtractionRule>> = Lazy::new(|| {
    vec![
        ExtractionRule::new(ParamKind::Password, r"паролем\s+(\w+)"),
        ExtractionRule::new(ParamKind::Password, r"password\s+(\w+)"),
    ]
});

static ELEMENT_TARGET_RULES: Lazy<Vec<ExtractionRule>> = Lazy::new(|| {
    vec![
        ExtractionRule::new(ParamKind::ElementTarget, r"'([^']*)'"),
        ExtractionRule::new(ParamKind::ElementTarget, r#""([^"]*)""#),
        ExtractionRule::rejecting(
            ParamKind::ElementTarget,
            r"иконку\s+(\w+)",
            ELEMENT_FILLER_WORDS,
        ),
        ExtractionRule::rejecting(
            ParamKind::ElementTarget,
            r"элемент\s+(\w+)",
            ELEMENT_FILLER_WORDS,
        ),
        ExtractionRule::rejecting(
            ParamKind::ElementTarget,
            r"(?:icon|element)\s+(\w+)",
            ELEMENT_FILLER_WORDS,
        ),
        ExtractionRule::new(ParamKind::ElementTarget, r"(проводник)"),
    ]
});

/// Ordered rules for a parameter kind.
pub fn rules_for(kind: ParamKind) -> &'static [ExtractionRule] {
    match kind {
        ParamKind::Filename => &FILENAME_RULES,
        ParamKind::Content => &CONTENT_RULES,
        ParamKind::SearchQuery => &SEARCH_QUERY_RULES,
        ParamKind::ApplicationName => &APPLICATION_NAME_RULES,
        ParamKind::RegisterUsername => &REGISTER_USERNAME_RULES,
        ParamKind::LoginUsername => &LOGIN_USERNAME_RULES,
        ParamKind::Password => &PASSWORD_RULES,
        ParamKind::ElementTarget => &ELEMENT_TARGET_RULES,
    }
}

/// Extract a parameter from a description.
pub fn extract(description: &str, kind: ParamKind) -> Option<String> {
    rules_for(kind).iter().find_map(|rule| rule.apply(description))
}

/// File content, or an empty string when none is given.
pub fn extract_content(description: &str) -> String {
    extract(description, ParamKind::Content).unwrap_or_default()
}

#[cfg(test)]
#[path = "extraction_tests.rs"]
mod tests;
