//! Automation domains.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Automation domain a task description is classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// Screen capture and element localization.
    Vision,
    /// Browser-driven web search and navigation.
    Web,
    /// Desktop application / process launch.
    Windows,
    /// File create/read/delete.
    File,
    /// User registration, login and access rights.
    Auth,
    /// Simulated multi-model pipelines.
    ModelOrchestration,
    /// Fallback for descriptions no other domain claims.
    Echo,
}

impl Domain {
    /// Domains that can claim a description, highest priority first.
    ///
    /// `Echo` is not listed: it is the fallback when none of these claim.
    pub const PRIORITY: [Domain; 6] = [
        Domain::Vision,
        Domain::Web,
        Domain::Windows,
        Domain::File,
        Domain::Auth,
        Domain::ModelOrchestration,
    ];

    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Vision => "vision",
            Domain::Web => "web",
            Domain::Windows => "windows",
            Domain::File => "file",
            Domain::Auth => "auth",
            Domain::ModelOrchestration => "model_orchestration",
            Domain::Echo => "echo",
        }
    }

    /// Position in the priority order (`Echo` sorts last).
    pub fn rank(&self) -> usize {
        Self::PRIORITY
            .iter()
            .position(|d| d == self)
            .unwrap_or(Self::PRIORITY.len())
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        assert_eq!(Domain::PRIORITY[0], Domain::Vision);
        assert_eq!(Domain::PRIORITY[1], Domain::Web);
        assert_eq!(Domain::PRIORITY[2], Domain::Windows);
        assert_eq!(Domain::PRIORITY[3], Domain::File);
        assert_eq!(Domain::PRIORITY[4], Domain::Auth);
        assert_eq!(Domain::PRIORITY[5], Domain::ModelOrchestration);
    }

    #[test]
    fn test_rank() {
        assert_eq!(Domain::Vision.rank(), 0);
        assert_eq!(Domain::ModelOrchestration.rank(), 5);
        assert_eq!(Domain::Echo.rank(), 6);
        assert!(Domain::Web.rank() < Domain::Windows.rank());
    }

    #[test]
    fn test_display() {
        assert_eq!(Domain::Web.to_string(), "web");
        assert_eq!(Domain::ModelOrchestration.to_string(), "model_orchestration");
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&Domain::ModelOrchestration).unwrap();
        assert_eq!(json, "\"model_orchestration\"");
        let parsed: Domain = serde_json::from_str("\"windows\"").unwrap();
        assert_eq!(parsed, Domain::Windows);
    }
}
