//! Desktop capabilities for DeskPilot.
//!
//! ## Screen Capture
//! - [`DesktopScreenCapture`] - primary monitor capture as PNG
//!
//! ## Element Localization
//! - [`OcrElementLocator`] - finds on-screen text with Tesseract
//!
//! ## Process Launching
//! - [`SystemProcessLauncher`] - spawns desktop applications

mod ocr;
mod process;
mod screenshot;

pub use ocr::{find_target, parse_tsv, OcrElementLocator, OcrError, TextBlock};
pub use process::{split_command, SystemProcess, SystemProcessLauncher};
pub use screenshot::{capture_primary, DesktopScreenCapture, ScreenshotError};
