//! Screen capture and element localization capabilities.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CapabilityError;

/// A captured screen image.
#[derive(Debug, Clone)]
pub struct Screenshot {
    /// PNG image data.
    pub png: Vec<u8>,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

/// Bounding box of a located element, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementBounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Captures the screen.
#[async_trait]
pub trait ScreenCapture: Send + Sync {
    /// Capture the primary monitor.
    async fn capture_screen(&self) -> Result<Screenshot, CapabilityError>;
}

/// Locates a named element within a screenshot.
#[async_trait]
pub trait ElementLocalization: Send + Sync {
    /// Find `target` in `screenshot`. `Ok(None)` means it is not visible.
    async fn locate(
        &self,
        screenshot: &Screenshot,
        target: &str,
    ) -> Result<Option<ElementBounds>, CapabilityError>;
}
