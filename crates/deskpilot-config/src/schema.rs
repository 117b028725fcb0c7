//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,

    #[serde(default)]
    pub process: ProcessConfig,

    #[serde(default)]
    pub vision: VisionConfig,

    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub filesystem: FilesystemConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Configuration with every wait set to zero, for tests and dry runs.
    pub fn without_delays() -> Self {
        let mut config = Self::default();
        config.web.navigation_settle_ms = 0;
        config.web.navigation_jitter_ms = 0;
        config.web.results_settle_ms = 0;
        config.web.element_timeout_ms = 0;
        config.web.results_timeout_ms = 0;
        config.web.typing_delay_min_ms = 0;
        config.web.typing_delay_max_ms = 0;
        config.process.launch_settle_ms = 0;
        config.vision.locate_timeout_ms = 0;
        config
    }
}

/// Web search workflow timings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// Fixed wait after navigation.
    #[serde(default = "default_navigation_settle_ms")]
    pub navigation_settle_ms: u64,

    /// Upper bound of the random wait added after navigation.
    #[serde(default = "default_navigation_jitter_ms")]
    pub navigation_jitter_ms: u64,

    /// Wait after submitting the query.
    #[serde(default = "default_results_settle_ms")]
    pub results_settle_ms: u64,

    /// Per-strategy timeout when locating the search box.
    #[serde(default = "default_element_timeout_ms")]
    pub element_timeout_ms: u64,

    /// Per-selector timeout when collecting result titles.
    #[serde(default = "default_results_timeout_ms")]
    pub results_timeout_ms: u64,

    #[serde(default = "default_typing_delay_min_ms")]
    pub typing_delay_min_ms: u64,

    #[serde(default = "default_typing_delay_max_ms")]
    pub typing_delay_max_ms: u64,

    /// Number of result titles reported.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            navigation_settle_ms: default_navigation_settle_ms(),
            navigation_jitter_ms: default_navigation_jitter_ms(),
            results_settle_ms: default_results_settle_ms(),
            element_timeout_ms: default_element_timeout_ms(),
            results_timeout_ms: default_results_timeout_ms(),
            typing_delay_min_ms: default_typing_delay_min_ms(),
            typing_delay_max_ms: default_typing_delay_max_ms(),
            max_results: default_max_results(),
        }
    }
}

impl WebConfig {
    pub fn navigation_settle(&self) -> Duration {
        Duration::from_millis(self.navigation_settle_ms)
    }

    pub fn results_settle(&self) -> Duration {
        Duration::from_millis(self.results_settle_ms)
    }

    pub fn element_timeout(&self) -> Duration {
        Duration::from_millis(self.element_timeout_ms)
    }

    pub fn results_timeout(&self) -> Duration {
        Duration::from_millis(self.results_timeout_ms)
    }
}

fn default_navigation_settle_ms() -> u64 {
    2000
}

fn default_navigation_jitter_ms() -> u64 {
    2000
}

fn default_results_settle_ms() -> u64 {
    3000
}

fn default_element_timeout_ms() -> u64 {
    5000
}

fn default_results_timeout_ms() -> u64 {
    3000
}

fn default_typing_delay_min_ms() -> u64 {
    50
}

fn default_typing_delay_max_ms() -> u64 {
    150
}

fn default_max_results() -> usize {
    3
}

/// Desktop application launch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessConfig {
    /// Wait between spawning and probing the process.
    #[serde(default = "default_launch_settle_ms")]
    pub launch_settle_ms: u64,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            launch_settle_ms: default_launch_settle_ms(),
        }
    }
}

impl ProcessConfig {
    pub fn launch_settle(&self) -> Duration {
        Duration::from_millis(self.launch_settle_ms)
    }
}

fn default_launch_settle_ms() -> u64 {
    1000
}

/// Element localization polling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    #[serde(default = "default_locate_timeout_ms")]
    pub locate_timeout_ms: u64,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            locate_timeout_ms: default_locate_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl VisionConfig {
    pub fn locate_timeout(&self) -> Duration {
        Duration::from_millis(self.locate_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

fn default_locate_timeout_ms() -> u64 {
    3000
}

fn default_poll_interval_ms() -> u64 {
    250
}

/// Browser (Chrome DevTools) connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// DevTools HTTP endpoint of an already running browser.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default = "default_debug_port")]
    pub debug_port: u16,

    #[serde(default)]
    pub headless: bool,

    /// Profile directory for a launched browser.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_dir: Option<PathBuf>,

    /// User agent applied in stealth mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            debug_port: default_debug_port(),
            headless: false,
            profile_dir: None,
            user_agent: None,
        }
    }
}

impl BrowserConfig {
    /// Explicit endpoint, or localhost on the debug port.
    pub fn endpoint_url(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| format!("http://127.0.0.1:{}", self.debug_port))
    }
}

fn default_debug_port() -> u16 {
    9222
}

/// File operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilesystemConfig {
    /// Base directory for relative paths (working directory when unset).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Write a daily-rolling log file under `~/.deskpilot/logs`.
    #[serde(default = "default_true")]
    pub file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: true,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
