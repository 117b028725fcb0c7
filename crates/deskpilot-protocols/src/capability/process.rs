//! Process launch capability.

use async_trait::async_trait;

use crate::error::CapabilityError;

/// Launches desktop applications.
#[async_trait]
pub trait ProcessLauncher: Send + Sync {
    /// Spawn `program` detached from the engine's stdio.
    async fn spawn(&self, program: &str) -> Result<Box<dyn LaunchedProcess>, CapabilityError>;
}

/// Handle to a spawned process.
pub trait LaunchedProcess: Send {
    /// OS process id, if known.
    fn id(&self) -> Option<u32>;

    /// Exit code if the process has already terminated, `None` while running.
    ///
    /// A process killed by a signal reports `-1`.
    fn try_exit_code(&mut self) -> Result<Option<i32>, CapabilityError>;
}
