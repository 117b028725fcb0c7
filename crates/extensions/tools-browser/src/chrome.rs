//! Locating and launching Chrome with remote debugging.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::{Child, Command};
use tracing::{info, warn};

use deskpilot_config::BrowserConfig;

use crate::cdp::{CdpClient, CdpError};

const STARTUP_POLL: Duration = Duration::from_millis(200);
const STARTUP_ATTEMPTS: u32 = 30;

/// Find a Chrome-compatible executable.
pub fn find_chrome() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    let paths: &[&str] = &[
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
        "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
    ];

    #[cfg(target_os = "linux")]
    let paths: &[&str] = &[
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/snap/bin/chromium",
    ];

    #[cfg(target_os = "windows")]
    let paths: &[&str] = &[
        r"C:\Program Files\Google\Chrome\Application\chrome.exe",
        r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
    ];

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    let paths: &[&str] = &[];

    paths.iter().map(PathBuf::from).find(|p| p.exists())
}

/// Starts Chrome on the configured debug port when nothing is listening.
#[derive(Debug, Clone)]
pub struct ChromeLauncher {
    config: BrowserConfig,
}

impl ChromeLauncher {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }

    pub fn endpoint(&self) -> String {
        self.config.endpoint_url()
    }

    /// Profile directory, `~/.deskpilot/browser-profile` by default.
    pub fn profile_dir(&self) -> PathBuf {
        self.config.profile_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".deskpilot")
                .join("browser-profile")
        })
    }

    /// Command-line arguments for a launched browser.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            format!("--remote-debugging-port={}", self.config.debug_port),
            format!("--user-data-dir={}", self.profile_dir().display()),
            "--no-first-run".to_string(),
            "--no-default-browser-check".to_string(),
            "--disable-background-networking".to_string(),
            "--disable-sync".to_string(),
            "--disable-translate".to_string(),
            "--metrics-recording-only".to_string(),
            "--disable-blink-features=AutomationControlled".to_string(),
        ];
        if self.config.headless {
            args.push("--headless=new".to_string());
        }
        args
    }

    pub async fn is_running(&self) -> bool {
        CdpClient::probe(&self.endpoint()).await.is_ok()
    }

    /// Make sure a browser is listening.
    ///
    /// Returns the child process when this call launched it. An explicit
    /// `endpoint` is never launched, only probed.
    pub async fn ensure_running(&self) -> Result<Option<Child>, CdpError> {
        if self.is_running().await {
            info!("Chrome already running at {}", self.endpoint());
            return Ok(None);
        }
        if self.config.endpoint.is_some() {
            return Err(CdpError::ChromeNotAvailable(self.endpoint()));
        }

        info!("Chrome not running on port {}, launching...", self.config.debug_port);
        let mut child = self.launch()?;

        for _ in 0..STARTUP_ATTEMPTS {
            tokio::time::sleep(STARTUP_POLL).await;
            if self.is_running().await {
                return Ok(Some(child));
            }
        }

        let _ = child.kill().await;
        Err(CdpError::LaunchFailed(
            "Chrome failed to start within timeout".to_string(),
        ))
    }

    fn launch(&self) -> Result<Child, CdpError> {
        let chrome_path = find_chrome().ok_or(CdpError::ChromeNotFound)?;
        let profile_dir = self.profile_dir();

        if let Err(e) = std::fs::create_dir_all(&profile_dir) {
            warn!("Failed to create profile directory: {}", e);
        }

        info!("Launching Chrome with profile at: {}", profile_dir.display());

        let child = Command::new(&chrome_path)
            .args(self.args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| CdpError::LaunchFailed(e.to_string()))?;

        info!("Chrome launched with PID: {:?}", child.id());
        Ok(child)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_include_debug_port_and_profile() {
        let launcher = ChromeLauncher::new(BrowserConfig {
            debug_port: 9333,
            profile_dir: Some(PathBuf::from("/tmp/deskpilot-profile")),
            ..Default::default()
        });

        let args = launcher.args();
        assert!(args.contains(&"--remote-debugging-port=9333".to_string()));
        assert!(args.contains(&"--user-data-dir=/tmp/deskpilot-profile".to_string()));
        assert!(!args.iter().any(|a| a.starts_with("--headless")));
    }

    #[test]
    fn test_headless_flag() {
        let launcher = ChromeLauncher::new(BrowserConfig {
            headless: true,
            ..Default::default()
        });
        assert!(launcher.args().contains(&"--headless=new".to_string()));
    }

    #[test]
    fn test_default_profile_dir() {
        let launcher = ChromeLauncher::new(BrowserConfig::default());
        assert!(launcher.profile_dir().ends_with(".deskpilot/browser-profile"));
    }

    #[test]
    fn test_endpoint_from_port() {
        let launcher = ChromeLauncher::new(BrowserConfig::default());
        assert_eq!(launcher.endpoint(), "http://127.0.0.1:9222");
    }

    #[tokio::test]
    async fn test_explicit_endpoint_is_not_launched() {
        let launcher = ChromeLauncher::new(BrowserConfig {
            endpoint: Some("http://127.0.0.1:1".to_string()),
            ..Default::default()
        });
        assert!(matches!(
            launcher.ensure_running().await,
            Err(CdpError::ChromeNotAvailable(_))
        ));
    }
}
