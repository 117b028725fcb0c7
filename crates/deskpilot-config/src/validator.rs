//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// First error as a `ConfigError`, if any.
    pub fn into_error(self) -> Option<ConfigError> {
        self.errors.into_iter().next().map(|e| ConfigError::InvalidValue {
            field: e.path,
            message: e.message,
        })
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_web(config, &mut result);
        Self::validate_vision(config, &mut result);
        Self::validate_browser(config, &mut result);
        Self::validate_logging(config, &mut result);

        Ok(result)
    }

    fn validate_web(config: &Config, result: &mut ValidationResult) {
        let web = &config.web;

        if web.typing_delay_min_ms > web.typing_delay_max_ms {
            result.add_error(ValidationError::new(
                "web.typing_delay_min_ms",
                "typing_delay_min_ms must not exceed typing_delay_max_ms",
            ));
        }

        if web.max_results == 0 {
            result.add_error(ValidationError::new(
                "web.max_results",
                "max_results must be at least 1",
            ));
        }

        if web.element_timeout_ms > 60_000 {
            result.add_warning(ValidationWarning::new(
                "web.element_timeout_ms",
                "element_timeout_ms is very high (>60s), a missing search box will stall the task",
            ));
        }
    }

    fn validate_vision(config: &Config, result: &mut ValidationResult) {
        let vision = &config.vision;

        if vision.poll_interval_ms == 0 {
            result.add_error(ValidationError::new(
                "vision.poll_interval_ms",
                "poll_interval_ms must be greater than 0",
            ));
        } else if vision.poll_interval_ms > vision.locate_timeout_ms {
            result.add_warning(ValidationWarning::new(
                "vision.poll_interval_ms",
                "poll_interval_ms exceeds locate_timeout_ms, only one attempt will be made",
            ));
        }
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        let browser = &config.browser;

        if browser.debug_port == 0 {
            result.add_error(ValidationError::new(
                "browser.debug_port",
                "debug_port cannot be 0",
            ));
        }

        if let Some(endpoint) = &browser.endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                result.add_error(ValidationError::new(
                    "browser.endpoint",
                    "endpoint must start with http:// or https://",
                ));
            }
        }
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        let level = config.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            result.add_warning(ValidationWarning::new(
                "logging.level",
                format!("Unknown log level '{}', falling back to info", config.logging.level),
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
