//! `FileSystem` over the local disk.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use deskpilot_protocols::{CapabilityError, FileSystem};

/// Filesystem rooted at a working directory.
#[derive(Debug, Clone)]
pub struct LocalFileSystem {
    root: PathBuf,
}

impl LocalFileSystem {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Rooted at the process working directory.
    pub fn current_dir() -> Result<Self, CapabilityError> {
        Ok(Self::new(std::env::current_dir()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute paths pass through; relative ones join the root.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let p = PathBuf::from(path);
        if p.is_absolute() {
            p
        } else {
            self.root.join(p)
        }
    }
}

fn not_found_or_io(path: &Path, err: std::io::Error) -> CapabilityError {
    if err.kind() == ErrorKind::NotFound {
        CapabilityError::NotFound(path.display().to_string())
    } else {
        CapabilityError::Io(err)
    }
}

#[async_trait]
impl FileSystem for LocalFileSystem {
    async fn create_file(&self, path: &str, content: &str) -> Result<(), CapabilityError> {
        let path = self.resolve(path);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, content).await?;

        debug!(path = %path.display(), bytes = content.len(), "File written");
        Ok(())
    }

    async fn read_file(&self, path: &str) -> Result<String, CapabilityError> {
        let path = self.resolve(path);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| not_found_or_io(&path, e))
    }

    async fn delete_file(&self, path: &str) -> Result<(), CapabilityError> {
        let path = self.resolve(path);

        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| not_found_or_io(&path, e))?;
        if metadata.is_dir() {
            return Err(CapabilityError::OperationFailed(format!(
                "{} is a directory",
                path.display()
            )));
        }

        tokio::fs::remove_file(&path)
            .await
            .map_err(|e| not_found_or_io(&path, e))?;
        debug!(path = %path.display(), "File deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
