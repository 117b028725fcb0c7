//! Task dispatcher.
//!
//! The dispatcher is the single error boundary of the engine: whatever a
//! handler does, `execute` returns a [`TaskResult`].

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use tracing::{debug, info, warn};

use deskpilot_protocols::{Domain, TaskResult};

use crate::handlers::{DomainHandler, EchoHandler};
use crate::registry::CapabilityRegistry;

/// Routes descriptions to domain handlers.
pub struct Dispatcher {
    handlers: Vec<Box<dyn DomainHandler>>,
    fallback: Box<dyn DomainHandler>,
    capabilities: Arc<CapabilityRegistry>,
}

impl Dispatcher {
    /// Create a dispatcher. Handlers are ordered by domain priority.
    pub fn new(
        mut handlers: Vec<Box<dyn DomainHandler>>,
        capabilities: Arc<CapabilityRegistry>,
    ) -> Self {
        handlers.sort_by_key(|handler| handler.domain().rank());
        Self {
            handlers,
            fallback: Box::new(EchoHandler::new()),
            capabilities,
        }
    }

    /// The capability registry handlers run against.
    pub fn capabilities(&self) -> &CapabilityRegistry {
        &self.capabilities
    }

    /// First handler claiming the description, or the fallback.
    pub fn handler_for(&self, description: &str) -> &dyn DomainHandler {
        self.handlers
            .iter()
            .find(|handler| handler.claims(description))
            .map(|handler| handler.as_ref())
            .unwrap_or(self.fallback.as_ref())
    }

    /// Domain the description will be dispatched to.
    pub fn domain_for(&self, description: &str) -> Domain {
        self.handler_for(description).domain()
    }

    /// Execute a description. Never fails and never panics.
    pub async fn execute(&self, description: &str) -> TaskResult {
        let started = Instant::now();
        let handler = self.handler_for(description);
        let domain = handler.domain();
        debug!(%domain, "Handler selected");

        let result = self.run(handler, description).await;

        info!(
            %domain,
            success = result.success,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Task executed"
        );
        result
    }

    async fn run(&self, handler: &dyn DomainHandler, description: &str) -> TaskResult {
        if let Some(missing) = self.capabilities.first_missing(handler.required_capabilities()) {
            warn!(domain = %handler.domain(), capability = %missing, "Required capability missing");
            return TaskResult::failure(format!("Capability not available: {}", missing));
        }

        let outcome = AssertUnwindSafe(handler.execute(description, &self.capabilities))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                warn!(domain = %handler.domain(), error = %e, "Task execution failed");
                TaskResult::failure(format!("Task execution failed: {}", e))
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(domain = %handler.domain(), panic = %message, "Task execution panicked");
                TaskResult::failure(format!("Task execution panicked: {}", message))
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
