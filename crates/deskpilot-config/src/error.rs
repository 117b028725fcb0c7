//! Configuration errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let err = ConfigError::NotFound("deskpilot.toml".to_string());
        assert!(err.to_string().contains("deskpilot.toml"));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_invalid_value_error() {
        let err = ConfigError::InvalidValue {
            field: "web.typing_delay_min_ms".to_string(),
            message: "must not exceed typing_delay_max_ms".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("typing_delay_min_ms"));
        assert!(display.contains("must not exceed"));
    }

    #[test]
    fn test_env_var_not_set_error() {
        let err = ConfigError::EnvVarNotSet("CHROME_ENDPOINT".to_string());
        assert!(err.to_string().contains("CHROME_ENDPOINT"));
        assert!(err.to_string().contains("not set"));
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = ConfigError::from(io_err);
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_toml_error_from() {
        let toml_err = toml::from_str::<toml::Table>("invalid = [unclosed").unwrap_err();
        let err = ConfigError::from(toml_err);
        assert!(err.to_string().contains("TOML parse error"));
    }
}
