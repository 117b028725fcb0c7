//! [`BrowserController`] and [`BrowserSession`] over CDP.

use std::future::Future;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::process::Child;
use tracing::{debug, info, warn};

use deskpilot_config::BrowserConfig;
use deskpilot_protocols::{
    BrowserController, BrowserSession, CapabilityError, ElementHandle, ElementLocator,
};

use crate::cdp::{CdpClient, CdpError, PageSession};
use crate::chrome::ChromeLauncher;
use crate::scripts;

/// Selector poll interval.
const FIND_POLL: Duration = Duration::from_millis(100);

/// Opens one tab per session in a local Chrome.
pub struct CdpBrowserController {
    config: BrowserConfig,
    launcher: ChromeLauncher,
}

impl CdpBrowserController {
    pub fn new(config: BrowserConfig) -> Self {
        let launcher = ChromeLauncher::new(config.clone());
        Self { config, launcher }
    }

    async fn open(&self, stealth: bool) -> Result<CdpBrowserSession, CdpError> {
        let mut chrome = self.launcher.ensure_running().await?;

        match self.attach(stealth).await {
            Ok((client, page)) => {
                info!(stealth, target = %page.target_id(), "Browser session opened");
                Ok(CdpBrowserSession {
                    client,
                    page,
                    chrome: Mutex::new(chrome),
                    closed: false,
                })
            }
            Err(e) => {
                if let Some(child) = chrome.as_mut() {
                    let _ = child.kill().await;
                }
                Err(e)
            }
        }
    }

    async fn attach(&self, stealth: bool) -> Result<(CdpClient, PageSession), CdpError> {
        let client = CdpClient::connect(&self.launcher.endpoint()).await?;
        let page = client.new_page().await?;

        if stealth {
            let applied = self.apply_stealth(&client, &page).await;
            close_on_error(applied, client.close_page(page.target_id())).await?;
        }

        Ok((client, page))
    }

    async fn apply_stealth(&self, client: &CdpClient, page: &PageSession) -> Result<(), CdpError> {
        page.add_init_script(scripts::STEALTH_SCRIPT).await?;
        let user_agent = match &self.config.user_agent {
            Some(ua) => ua.clone(),
            None => scripts::stealth_user_agent(&client.version().user_agent),
        };
        page.set_user_agent(&user_agent).await
    }
}

/// Await `close` only when `setup` failed. The setup error is returned
/// either way.
async fn close_on_error<F>(setup: Result<(), CdpError>, close: F) -> Result<(), CdpError>
where
    F: Future<Output = Result<(), CdpError>>,
{
    if setup.is_err() {
        if let Err(e) = close.await {
            warn!("Failed to close tab after setup error: {}", e);
        }
    }
    setup
}

#[async_trait]
impl BrowserController for CdpBrowserController {
    async fn initialize_stealth(&self) -> Result<Box<dyn BrowserSession>, CapabilityError> {
        Ok(Box::new(self.open(true).await?))
    }

    async fn initialize(&self) -> Result<Box<dyn BrowserSession>, CapabilityError> {
        Ok(Box::new(self.open(false).await?))
    }
}

/// A single tab plus the browser process it started, if any.
pub struct CdpBrowserSession {
    client: CdpClient,
    page: PageSession,
    chrome: Mutex<Option<Child>>,
    closed: bool,
}

impl CdpBrowserSession {
    async fn match_count(&self, css: &str) -> Result<usize, CdpError> {
        let value = self.page.evaluate(&scripts::count(css)).await?;
        Ok(value.as_u64().unwrap_or(0) as usize)
    }

    /// Poll until `css` matches something or `timeout` passes.
    ///
    /// Always checks at least once.
    async fn wait_for_matches(&self, css: &str, timeout: Duration) -> Result<usize, CdpError> {
        let start = Instant::now();
        loop {
            let count = self.match_count(css).await?;
            if count > 0 || start.elapsed() >= timeout {
                return Ok(count);
            }
            tokio::time::sleep(FIND_POLL).await;
        }
    }

    fn ensure_open(&self) -> Result<(), CdpError> {
        if self.closed {
            return Err(CdpError::SessionClosed);
        }
        Ok(())
    }
}

#[async_trait]
impl BrowserSession for CdpBrowserSession {
    async fn navigate(&mut self, url: &str) -> Result<(), CapabilityError> {
        self.ensure_open()?;
        self.page.navigate(url).await?;
        Ok(())
    }

    async fn page_source(&self) -> Result<String, CapabilityError> {
        self.ensure_open()?;
        Ok(self.page.content().await?)
    }

    async fn find_element(
        &self,
        locator: &ElementLocator,
        timeout: Duration,
    ) -> Result<Option<ElementHandle>, CapabilityError> {
        self.ensure_open()?;
        let css = locator.to_css();
        let count = self.wait_for_matches(&css, timeout).await?;
        debug!(selector = %css, count, "find_element");
        Ok((count > 0).then(|| ElementHandle::new(css, 0)))
    }

    async fn find_elements(
        &self,
        css: &str,
        timeout: Duration,
    ) -> Result<Vec<ElementHandle>, CapabilityError> {
        self.ensure_open()?;
        let count = self.wait_for_matches(css, timeout).await?;
        debug!(selector = %css, count, "find_elements");
        Ok(element_handles(css, count))
    }

    async fn element_text(&self, element: &ElementHandle) -> Result<String, CapabilityError> {
        self.ensure_open()?;
        let value = self
            .page
            .evaluate(&scripts::text(&element.selector, element.index))
            .await?;
        match value {
            Value::String(text) => Ok(text),
            _ => Err(missing(element).into()),
        }
    }

    async fn clear(&self, element: &ElementHandle) -> Result<(), CapabilityError> {
        self.ensure_open()?;
        let cleared = self
            .page
            .evaluate(&scripts::clear(&element.selector, element.index))
            .await?;
        if cleared.as_bool() != Some(true) {
            return Err(missing(element).into());
        }
        Ok(())
    }

    async fn send_keys(&self, element: &ElementHandle, keys: &str) -> Result<(), CapabilityError> {
        self.ensure_open()?;
        let focused = self
            .page
            .evaluate(&scripts::focus(&element.selector, element.index))
            .await?;
        if focused.as_bool() != Some(true) {
            return Err(missing(element).into());
        }

        for (i, chunk) in keys.split('\n').enumerate() {
            if i > 0 {
                self.page.press_enter().await?;
            }
            if !chunk.is_empty() {
                self.page.insert_text(chunk).await?;
            }
        }
        Ok(())
    }

    async fn execute_script(&self, script: &str) -> Result<Value, CapabilityError> {
        self.ensure_open()?;
        Ok(self.page.evaluate(script).await?)
    }

    async fn quit(&mut self) -> Result<(), CapabilityError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let closed = self.client.close_page(self.page.target_id()).await;

        let chrome = self.chrome.get_mut().take();
        if let Some(mut child) = chrome {
            if let Err(e) = child.kill().await {
                warn!("Failed to stop launched Chrome: {}", e);
            }
        }

        closed?;
        info!("Browser session closed");
        Ok(())
    }
}

fn element_handles(css: &str, count: usize) -> Vec<ElementHandle> {
    (0..count).map(|i| ElementHandle::new(css, i)).collect()
}

fn missing(element: &ElementHandle) -> CdpError {
    CdpError::ElementNotFound(format!("{}[{}]", element.selector, element.index))
}
