//! Filesystem capability.

use async_trait::async_trait;

use crate::error::CapabilityError;

/// File operations used by the file domain.
///
/// Paths are passed through as written in the task description;
/// implementations decide how relative paths are resolved.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Create (or overwrite) a file with the given content.
    async fn create_file(&self, path: &str, content: &str) -> Result<(), CapabilityError>;

    /// Read a file as UTF-8 text.
    async fn read_file(&self, path: &str) -> Result<String, CapabilityError>;

    /// Delete a file. Fails with [`CapabilityError::NotFound`] if absent.
    async fn delete_file(&self, path: &str) -> Result<(), CapabilityError>;
}
