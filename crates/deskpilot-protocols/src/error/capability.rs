//! Capability errors.

use thiserror::Error;

use crate::capability::CapabilityKind;

/// Errors returned by external capabilities.
#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("Capability not available: {0}")]
    Unavailable(CapabilityKind),

    #[error("Operation failed: {0}")]
    OperationFailed(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Operation timed out: {0}")]
    Timeout(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_names_capability() {
        let err = CapabilityError::Unavailable(CapabilityKind::BrowserController);
        assert_eq!(err.to_string(), "Capability not available: browser_controller");
    }

    #[test]
    fn test_operation_failed() {
        let err = CapabilityError::OperationFailed("navigation refused".to_string());
        assert!(err.to_string().contains("navigation refused"));
    }

    #[test]
    fn test_not_found() {
        let err = CapabilityError::NotFound("/tmp/missing.txt".to_string());
        assert!(err.to_string().contains("not found"));
        assert!(err.to_string().contains("missing.txt"));
    }

    #[test]
    fn test_timeout() {
        let err = CapabilityError::Timeout("page load".to_string());
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: CapabilityError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
        assert!(err.to_string().contains("denied"));
    }
}
