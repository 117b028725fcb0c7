//! Application launching.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::{Child, Command};
use tracing::debug;

use deskpilot_protocols::{CapabilityError, LaunchedProcess, ProcessLauncher};

/// Split a program spec such as `open -a Calculator` into program and args.
pub fn split_command(spec: &str) -> Option<(&str, Vec<&str>)> {
    let mut parts = spec.split_whitespace();
    let program = parts.next()?;
    Some((program, parts.collect()))
}

/// [`ProcessLauncher`] spawning real OS processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessLauncher;

impl SystemProcessLauncher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessLauncher for SystemProcessLauncher {
    async fn spawn(&self, program: &str) -> Result<Box<dyn LaunchedProcess>, CapabilityError> {
        let (name, args) = split_command(program).ok_or_else(|| {
            CapabilityError::OperationFailed("Empty program name".to_string())
        })?;

        let child = Command::new(name)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    CapabilityError::NotFound(name.to_string())
                } else {
                    CapabilityError::Io(e)
                }
            })?;

        debug!(program = name, pid = ?child.id(), "Process spawned");
        Ok(Box::new(SystemProcess { child }))
    }
}

/// A spawned child process. Dropping it does not kill the process.
#[derive(Debug)]
pub struct SystemProcess {
    child: Child,
}

impl LaunchedProcess for SystemProcess {
    fn id(&self) -> Option<u32> {
        self.child.id()
    }

    fn try_exit_code(&mut self) -> Result<Option<i32>, CapabilityError> {
        Ok(self
            .child
            .try_wait()?
            .map(|status| status.code().unwrap_or(-1)))
    }
}
