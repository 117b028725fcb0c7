//! Fallback handler.

use async_trait::async_trait;

use deskpilot_protocols::{Domain, TaskError, TaskResult};

use super::DomainHandler;
use crate::registry::CapabilityRegistry;

/// Acknowledges descriptions no other handler claims.
#[derive(Debug, Default)]
pub struct EchoHandler;

impl EchoHandler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DomainHandler for EchoHandler {
    fn domain(&self) -> Domain {
        Domain::Echo
    }

    fn claims(&self, _description: &str) -> bool {
        true
    }

    async fn execute(
        &self,
        description: &str,
        _capabilities: &CapabilityRegistry,
    ) -> Result<TaskResult, TaskError> {
        Ok(TaskResult::success(format!("Task completed: {}", description)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echo_always_succeeds() {
        let handler = EchoHandler::new();
        assert!(handler.claims("anything at all"));
        let result = handler
            .execute("say hi", &CapabilityRegistry::new())
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.details, "Task completed: say hi");
    }
}
