//! Error types for the DeskPilot protocol layer.

mod capability;
mod task;

pub use capability::*;
pub use task::*;
