//! # DeskPilot Protocols
//!
//! Shared definitions for the DeskPilot automation engine.
//! Contains only types and interface definitions - no implementations.
//!
//! ## Core Types
//!
//! - [`TaskResult`] - Uniform outcome returned by every task execution
//! - [`Domain`] - Automation domain a task description belongs to
//!
//! ## Capability Traits
//!
//! - [`FileSystem`] - File create/read/delete
//! - [`BrowserController`] / [`BrowserSession`] - Browser automation
//! - [`ScreenCapture`] - Screen capture
//! - [`ElementLocalization`] - Locating an element on a captured screen
//! - [`ProcessLauncher`] - Launching desktop applications

pub mod capability;
pub mod domain;
pub mod error;
pub mod result;

pub use capability::{
    BrowserController, BrowserSession, CapabilityKind, ElementBounds, ElementHandle,
    ElementLocalization, ElementLocator, FileSystem, LaunchedProcess, ProcessLauncher,
    ScreenCapture, Screenshot,
};
pub use domain::Domain;
pub use error::{CapabilityError, TaskError};
pub use result::TaskResult;
