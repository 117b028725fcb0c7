//! Wiring of the concrete capability adapters.

use std::path::PathBuf;
use std::sync::Arc;

use deskpilot_config::Config;
use deskpilot_core::CapabilityRegistry;
use deskpilot_tools_browser::CdpBrowserController;
use deskpilot_tools_desktop::{DesktopScreenCapture, OcrElementLocator, SystemProcessLauncher};
use deskpilot_tools_filesystem::LocalFileSystem;

/// Get the .deskpilot directory path.
pub(crate) fn deskpilot_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".deskpilot"))
        .unwrap_or_else(|| PathBuf::from(".deskpilot"))
}

/// Registry with every built-in adapter.
///
/// Relative file paths resolve against `work_dir`, then `[filesystem] root`,
/// then the current directory.
pub(crate) fn capabilities(config: &Config, work_dir: Option<PathBuf>) -> CapabilityRegistry {
    let root = work_dir
        .or_else(|| config.filesystem.root.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    CapabilityRegistry::new()
        .with_filesystem(Arc::new(LocalFileSystem::new(root)))
        .with_browser_controller(Arc::new(CdpBrowserController::new(config.browser.clone())))
        .with_screen_capture(Arc::new(DesktopScreenCapture::new()))
        .with_element_localization(Arc::new(OcrElementLocator::new()))
        .with_process_launcher(Arc::new(SystemProcessLauncher::new()))
}
