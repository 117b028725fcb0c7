//! Task execution errors.

use thiserror::Error;

use super::CapabilityError;

/// Errors raised inside a domain handler.
///
/// These never cross the engine boundary: the dispatcher converts them
/// into a failed `TaskResult`.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Capability(#[from] CapabilityError),

    #[error("Execution failed: {0}")]
    Execution(String),
}
