//! Domain handlers.
//!
//! One handler per [`Domain`]. The dispatcher asks each handler, in
//! priority order, whether it claims a description and runs the first
//! claimant.

mod auth;
mod echo;
mod file;
mod orchestration;
mod vision;
mod web;
mod windows;

use std::sync::Arc;

use async_trait::async_trait;

use deskpilot_config::Config;
use deskpilot_protocols::{CapabilityKind, Domain, TaskError, TaskResult};

use crate::auth::AuthService;
use crate::registry::CapabilityRegistry;
use crate::rules::classification::rule_for;

pub use self::auth::AuthHandler;
pub use echo::EchoHandler;
pub use file::FileHandler;
pub use orchestration::{OrchestrationHandler, Pipeline};
pub use vision::VisionHandler;
pub use web::{SearchEngine, WebHandler, WebState};
pub use windows::WindowsHandler;

/// Claim test and workflow for one automation domain.
#[async_trait]
pub trait DomainHandler: Send + Sync {
    /// Domain served by this handler.
    fn domain(&self) -> Domain;

    /// Capabilities that must be registered before `execute` runs.
    fn required_capabilities(&self) -> &'static [CapabilityKind] {
        &[]
    }

    /// Whether this handler claims the description.
    fn claims(&self, description: &str) -> bool {
        rule_for(self.domain())
            .map(|rule| rule.claims(description))
            .unwrap_or(false)
    }

    /// Run the domain workflow.
    ///
    /// Expected failures (missing parameters, refused operations) are
    /// `Ok` results with `success == false`; `Err` is for unexpected ones.
    async fn execute(
        &self,
        description: &str,
        capabilities: &CapabilityRegistry,
    ) -> Result<TaskResult, TaskError>;
}

/// The claiming handlers for every domain except `Echo`, in priority order.
pub fn default_handlers(config: &Config, auth: Arc<AuthService>) -> Vec<Box<dyn DomainHandler>> {
    vec![
        Box::new(VisionHandler::new(config.vision.clone())),
        Box::new(WebHandler::new(config.web.clone())),
        Box::new(WindowsHandler::new(config.process.clone())),
        Box::new(FileHandler::new()),
        Box::new(AuthHandler::new(auth)),
        Box::new(OrchestrationHandler::new()),
    ]
}
