//! Screen capture.

use std::io::Cursor;

use async_trait::async_trait;
use screenshots::image::ImageOutputFormat;
use screenshots::Screen;
use thiserror::Error;
use tracing::debug;

use deskpilot_protocols::{CapabilityError, ScreenCapture, Screenshot};

/// Screenshot errors.
#[derive(Debug, Error)]
pub enum ScreenshotError {
    #[error("Capture failed: {0}")]
    CaptureFailed(String),

    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    #[error("No monitor found")]
    NoMonitor,
}

impl From<ScreenshotError> for CapabilityError {
    fn from(err: ScreenshotError) -> Self {
        CapabilityError::OperationFailed(err.to_string())
    }
}

/// Capture the primary monitor (or the first one) as PNG.
pub fn capture_primary() -> Result<Screenshot, ScreenshotError> {
    let screens = Screen::all().map_err(|e| ScreenshotError::CaptureFailed(e.to_string()))?;

    let mut primary = None;
    let mut first = None;
    for screen in screens {
        if screen.display_info.is_primary {
            primary = Some(screen);
            break;
        }
        if first.is_none() {
            first = Some(screen);
        }
    }
    let screen = primary.or(first).ok_or(ScreenshotError::NoMonitor)?;

    let image = screen
        .capture()
        .map_err(|e| ScreenshotError::CaptureFailed(e.to_string()))?;

    let width = image.width();
    let height = image.height();

    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageOutputFormat::Png)
        .map_err(|e| ScreenshotError::EncodingFailed(e.to_string()))?;

    Ok(Screenshot {
        png: buffer.into_inner(),
        width,
        height,
    })
}

/// [`ScreenCapture`] backed by the `screenshots` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopScreenCapture;

impl DesktopScreenCapture {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ScreenCapture for DesktopScreenCapture {
    async fn capture_screen(&self) -> Result<Screenshot, CapabilityError> {
        let screenshot = tokio::task::spawn_blocking(capture_primary)
            .await
            .map_err(|e| CapabilityError::OperationFailed(format!("Capture task failed: {}", e)))??;

        debug!(
            width = screenshot.width,
            height = screenshot.height,
            bytes = screenshot.png.len(),
            "Screen captured"
        );
        Ok(screenshot)
    }
}
