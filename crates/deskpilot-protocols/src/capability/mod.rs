//! Capability traits for external collaborators.
//!
//! The engine never talks to the operating system, a browser or a vision
//! backend directly. Each collaborator is reached through one of these
//! narrow traits and looked up by [`CapabilityKind`].

mod browser;
mod filesystem;
mod process;
mod vision;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use browser::{BrowserController, BrowserSession, ElementHandle, ElementLocator};
pub use filesystem::FileSystem;
pub use process::{LaunchedProcess, ProcessLauncher};
pub use vision::{ElementBounds, ElementLocalization, ScreenCapture, Screenshot};

/// Named capability kinds a handler may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityKind {
    FileSystem,
    BrowserController,
    ScreenCapture,
    ElementLocalization,
    ProcessLauncher,
}

impl CapabilityKind {
    /// All capability kinds.
    pub const ALL: [CapabilityKind; 5] = [
        CapabilityKind::FileSystem,
        CapabilityKind::BrowserController,
        CapabilityKind::ScreenCapture,
        CapabilityKind::ElementLocalization,
        CapabilityKind::ProcessLauncher,
    ];

    /// Registry name of the capability.
    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityKind::FileSystem => "filesystem",
            CapabilityKind::BrowserController => "browser_controller",
            CapabilityKind::ScreenCapture => "screen_capture",
            CapabilityKind::ElementLocalization => "element_localization",
            CapabilityKind::ProcessLauncher => "process_launcher",
        }
    }

    /// Look up a kind by its registry name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(CapabilityKind::FileSystem.as_str(), "filesystem");
        assert_eq!(CapabilityKind::BrowserController.as_str(), "browser_controller");
        assert_eq!(CapabilityKind::ScreenCapture.as_str(), "screen_capture");
        assert_eq!(CapabilityKind::ElementLocalization.as_str(), "element_localization");
        assert_eq!(CapabilityKind::ProcessLauncher.as_str(), "process_launcher");
    }

    #[test]
    fn test_from_name_roundtrip() {
        for kind in CapabilityKind::ALL {
            assert_eq!(CapabilityKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(CapabilityKind::from_name("keyboard"), None);
    }

    #[test]
    fn test_serde_matches_registry_name() {
        let json = serde_json::to_string(&CapabilityKind::ElementLocalization).unwrap();
        assert_eq!(json, "\"element_localization\"");
    }
}
