//! Local filesystem capability for DeskPilot.
//!
//! Backs the file domain with `tokio::fs`, resolving relative paths
//! against a working directory.

mod local;

pub use local::LocalFileSystem;
