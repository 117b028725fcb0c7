//! # DeskPilot Core
//!
//! Task classification and multi-domain dispatch engine.
//!
//! ## Components
//!
//! - [`rules`] - Declarative classification and parameter extraction tables
//! - [`handlers`] - One [`DomainHandler`] per automation domain
//! - [`Dispatcher`] - Picks the first claiming handler and converts every
//!   error or panic into a [`TaskResult`]
//! - [`AuthService`] - Users, tokens and the current session
//! - [`CapabilityRegistry`] - Typed lookup of external capabilities
//! - [`Engine`] / [`Task`] - Public entry point

pub mod auth;
pub mod dispatcher;
pub mod engine;
pub mod handlers;
pub mod registry;
pub mod rules;

pub use auth::{AuthError, AuthService, Role};
pub use dispatcher::Dispatcher;
pub use engine::{Engine, EngineBuilder, Task};
pub use handlers::DomainHandler;
pub use registry::CapabilityRegistry;
pub use rules::classification::Classifier;
pub use rules::extraction::ParamKind;

pub use deskpilot_protocols::{Domain, TaskResult};
