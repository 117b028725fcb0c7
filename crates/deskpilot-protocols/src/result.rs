//! Task execution result type.

use serde::{Deserialize, Serialize};

/// Result of a task execution.
///
/// Every execution path of the engine produces exactly one `TaskResult`;
/// there is no separate error channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResult {
    /// Whether the execution was successful.
    pub success: bool,

    /// Human-readable details (output on success, cause on failure).
    pub details: String,
}

impl TaskResult {
    /// Create a successful result.
    pub fn success(details: impl Into<String>) -> Self {
        Self {
            success: true,
            details: details.into(),
        }
    }

    /// Create a failed result.
    pub fn failure(details: impl Into<String>) -> Self {
        Self {
            success: false,
            details: details.into(),
        }
    }

    /// Append text to the details.
    pub fn append_details(mut self, suffix: &str) -> Self {
        self.details.push_str(suffix);
        self
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
