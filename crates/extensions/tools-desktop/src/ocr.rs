//! Element localization through Tesseract OCR.
//!
//! The screenshot is written to a temporary PNG and recognised with
//! `tesseract <png> stdout tsv`. Word boxes from the TSV output are
//! searched for the target text, which may span several words on one line.

use std::io::Write;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

use deskpilot_protocols::{CapabilityError, ElementBounds, ElementLocalization, Screenshot};

/// TSV `level` value for a single word.
const WORD_LEVEL: u32 = 5;

/// Errors related to OCR operations.
#[derive(Debug, Error)]
pub enum OcrError {
    /// OCR engine not available.
    #[error("OCR engine not available: {0}")]
    EngineNotAvailable(String),

    /// Failed to perform OCR.
    #[error("OCR failed: {0}")]
    RecognitionFailed(String),

    /// Invalid image data.
    #[error("Invalid image data: {0}")]
    InvalidImage(String),
}

impl From<OcrError> for CapabilityError {
    fn from(err: OcrError) -> Self {
        CapabilityError::OperationFailed(err.to_string())
    }
}

/// A recognised word with its position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub text: String,
    /// `(block, paragraph, line)` the word belongs to.
    pub line: (u32, u32, u32),
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub confidence: f32,
}

impl TextBlock {
    fn bounds(&self) -> ElementBounds {
        ElementBounds {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

/// Parse Tesseract TSV output into word boxes.
///
/// Non-word rows, blank words and malformed rows are skipped.
pub fn parse_tsv(tsv: &str) -> Vec<TextBlock> {
    tsv.lines()
        .skip_while(|line| line.starts_with("level"))
        .filter_map(parse_row)
        .collect()
}

fn parse_row(row: &str) -> Option<TextBlock> {
    let cols: Vec<&str> = row.split('\t').collect();
    if cols.len() < 12 {
        return None;
    }
    let level: u32 = cols[0].parse().ok()?;
    let text = cols[11].trim();
    if level != WORD_LEVEL || text.is_empty() {
        return None;
    }

    Some(TextBlock {
        text: text.to_string(),
        line: (cols[2].parse().ok()?, cols[3].parse().ok()?, cols[4].parse().ok()?),
        x: cols[6].parse().ok()?,
        y: cols[7].parse().ok()?,
        width: cols[8].parse().ok()?,
        height: cols[9].parse().ok()?,
        confidence: cols[10].parse().unwrap_or(-1.0),
    })
}

fn union(a: ElementBounds, b: ElementBounds) -> ElementBounds {
    let left = a.x.min(b.x);
    let top = a.y.min(b.y);
    let right = (a.x + a.width as i32).max(b.x + b.width as i32);
    let bottom = (a.y + a.height as i32).max(b.y + b.height as i32);
    ElementBounds {
        x: left,
        y: top,
        width: (right - left) as u32,
        height: (bottom - top) as u32,
    }
}

/// Bounds of the first run of words on one line containing `target`.
///
/// Matching is case-insensitive. The shortest run starting at each word is
/// preferred, so a single-word target yields that word's box.
pub fn find_target(blocks: &[TextBlock], target: &str) -> Option<ElementBounds> {
    let needle = target.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    for start in 0..blocks.len() {
        let mut text = String::new();
        let mut bounds = blocks[start].bounds();
        for (offset, block) in blocks[start..].iter().enumerate() {
            if block.line != blocks[start].line {
                break;
            }
            if offset > 0 {
                text.push(' ');
                bounds = union(bounds, block.bounds());
            }
            text.push_str(&block.text.to_lowercase());
            if text.contains(&needle) {
                return Some(bounds);
            }
        }
    }
    None
}

/// [`ElementLocalization`] that shells out to the `tesseract` CLI.
#[derive(Debug, Clone)]
pub struct OcrElementLocator {
    program: String,
    language: Option<String>,
}

impl OcrElementLocator {
    pub fn new() -> Self {
        Self {
            program: "tesseract".to_string(),
            language: None,
        }
    }

    /// Tesseract language spec, e.g. `eng+rus`.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Override the tesseract executable.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    async fn recognize(&self, png: &[u8]) -> Result<Vec<TextBlock>, OcrError> {
        let mut image = tempfile::Builder::new()
            .prefix("deskpilot_ocr_")
            .suffix(".png")
            .tempfile()
            .map_err(|e| OcrError::InvalidImage(e.to_string()))?;
        image
            .write_all(png)
            .and_then(|()| image.flush())
            .map_err(|e| OcrError::InvalidImage(e.to_string()))?;

        let mut command = Command::new(&self.program);
        command.arg(image.path()).arg("stdout");
        if let Some(language) = &self.language {
            command.arg("-l").arg(language);
        }
        command.arg("tsv");

        let output = command.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                OcrError::EngineNotAvailable(format!("{} is not installed", self.program))
            } else {
                OcrError::RecognitionFailed(e.to_string())
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::RecognitionFailed(stderr.trim().to_string()));
        }

        Ok(parse_tsv(&String::from_utf8_lossy(&output.stdout)))
    }
}

impl Default for OcrElementLocator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ElementLocalization for OcrElementLocator {
    async fn locate(
        &self,
        screenshot: &Screenshot,
        target: &str,
    ) -> Result<Option<ElementBounds>, CapabilityError> {
        let blocks = self.recognize(&screenshot.png).await?;
        let found = find_target(&blocks, target);
        debug!(element = target, words = blocks.len(), found = found.is_some(), "OCR pass");
        Ok(found)
    }
}

#[cfg(test)]
#[path = "ocr_tests.rs"]
mod tests;
