//! Engine and task entry points.

use std::sync::Arc;

use deskpilot_config::Config;
use deskpilot_protocols::{Domain, TaskResult};

use crate::auth::AuthService;
use crate::dispatcher::Dispatcher;
use crate::handlers::{default_handlers, DomainHandler};
use crate::registry::CapabilityRegistry;

/// Builder for [`Engine`].
#[derive(Default)]
pub struct EngineBuilder {
    config: Config,
    capabilities: CapabilityRegistry,
    auth: Option<Arc<AuthService>>,
    extra_handlers: Vec<Box<dyn DomainHandler>>,
}

impl EngineBuilder {
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn capabilities(mut self, capabilities: CapabilityRegistry) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Share an existing auth service instead of creating a fresh one.
    pub fn auth_service(mut self, auth: Arc<AuthService>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Replace the built-in handler for the same domain.
    pub fn handler(mut self, handler: Box<dyn DomainHandler>) -> Self {
        self.extra_handlers.push(handler);
        self
    }

    pub fn build(self) -> Engine {
        let auth = self.auth.unwrap_or_default();
        let mut handlers = default_handlers(&self.config, auth.clone());
        for handler in self.extra_handlers {
            handlers.retain(|existing| existing.domain() != handler.domain());
            handlers.push(handler);
        }
        let dispatcher = Dispatcher::new(handlers, Arc::new(self.capabilities));
        Engine {
            dispatcher: Arc::new(dispatcher),
            auth,
            config: self.config,
        }
    }
}

/// Entry point: turns descriptions into executable tasks.
pub struct Engine {
    dispatcher: Arc<Dispatcher>,
    auth: Arc<AuthService>,
    config: Config,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Create a task for a description.
    pub fn create_task(&self, description: impl Into<String>) -> Task {
        Task {
            description: description.into(),
            dispatcher: self.dispatcher.clone(),
        }
    }

    /// Domain a description would be dispatched to.
    pub fn classify(&self, description: &str) -> Domain {
        self.dispatcher.domain_for(description)
    }

    pub fn auth(&self) -> &Arc<AuthService> {
        &self.auth
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// A single request. Immutable after creation.
#[derive(Clone)]
pub struct Task {
    description: String,
    dispatcher: Arc<Dispatcher>,
}

impl Task {
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Domain this task will be dispatched to.
    pub fn domain(&self) -> Domain {
        self.dispatcher.domain_for(&self.description)
    }

    /// Run the task to completion.
    pub async fn execute(&self) -> TaskResult {
        self.dispatcher.execute(&self.description).await
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("description", &self.description)
            .finish()
    }
}
