//! CDP page session for interacting with a single tab.

use std::time::{Duration, Instant};

use serde_json::{json, Value};
use tracing::debug;

use super::connection::Connection;
use super::error::CdpError;
use super::protocol::KeyEventType;

/// Page load timeout.
const LOAD_TIMEOUT: Duration = Duration::from_secs(30);
const LOAD_POLL: Duration = Duration::from_millis(100);

/// Property set on a document that is about to be replaced.
const NAVIGATION_MARKER: &str = "__deskpilotPendingNavigation";

/// A session attached to a single page/target.
pub struct PageSession {
    target_id: String,
    session_id: String,
    connection: Connection,
}

impl PageSession {
    pub(crate) fn new(target_id: String, session_id: String, connection: Connection) -> Self {
        Self {
            target_id,
            session_id,
            connection,
        }
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Send a CDP command to this page.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.connection
            .call(method, params, Some(&self.session_id))
            .await
    }

    pub(crate) async fn enable_domains(&self) -> Result<(), CdpError> {
        self.call("Page.enable", None).await?;
        self.call("Runtime.enable", None).await?;
        self.call("Network.enable", None).await?;

        debug!("Enabled CDP domains for session {}", self.session_id);
        Ok(())
    }

    /// Run `source` in every document before its own scripts.
    pub async fn add_init_script(&self, source: &str) -> Result<(), CdpError> {
        self.call(
            "Page.addScriptToEvaluateOnNewDocument",
            Some(json!({"source": source})),
        )
        .await?;
        Ok(())
    }

    /// Override the user agent for this page.
    pub async fn set_user_agent(&self, user_agent: &str) -> Result<(), CdpError> {
        self.call(
            "Network.setUserAgentOverride",
            Some(json!({"userAgent": user_agent})),
        )
        .await?;
        Ok(())
    }

    /// Navigate and wait for the new document to become ready.
    ///
    /// The current document is tagged before navigating. When Chrome
    /// reports a new loader, readiness is only accepted once the tag is
    /// gone, so the old document's `complete` state never counts.
    pub async fn navigate(&self, url: &str) -> Result<(), CdpError> {
        self.evaluate(&format!("window.{} = true", NAVIGATION_MARKER))
            .await?;

        let result = self
            .call("Page.navigate", Some(json!({"url": url})))
            .await?;

        if let Some(error) = result.get("errorText") {
            return Err(CdpError::NavigationFailed(
                error.as_str().unwrap_or("Unknown error").to_string(),
            ));
        }

        let new_document = result.get("loaderId").is_some();
        self.wait_until_ready(new_document).await?;
        debug!("Navigated to {}", url);
        Ok(())
    }

    /// Wait until `document.readyState` is interactive or complete.
    pub async fn wait_for_load(&self) -> Result<(), CdpError> {
        self.wait_until_ready(false).await
    }

    async fn wait_until_ready(&self, new_document: bool) -> Result<(), CdpError> {
        let start = Instant::now();
        let script = ready_state_script(new_document);

        loop {
            // The context is torn down while the next document loads.
            match self.evaluate(&script).await {
                Ok(state) if is_ready(&state) => return Ok(()),
                Ok(_) | Err(CdpError::Protocol { .. }) => {}
                Err(e) => return Err(e),
            }

            if start.elapsed() > LOAD_TIMEOUT {
                return Err(CdpError::Timeout("Page load timeout".to_string()));
            }

            tokio::time::sleep(LOAD_POLL).await;
        }
    }

    /// Evaluate a JavaScript expression and return its JSON value.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let result = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true,
                })),
            )
            .await?;

        if let Some(exception) = result.get("exceptionDetails") {
            let text = exception["text"].as_str().unwrap_or("Unknown error");
            return Err(CdpError::JavaScript(text.to_string()));
        }

        Ok(result["result"]["value"].clone())
    }

    /// Rendered HTML of the page.
    pub async fn content(&self) -> Result<String, CdpError> {
        let result = self.evaluate("document.documentElement.outerHTML").await?;
        Ok(result.as_str().unwrap_or("").to_string())
    }

    /// Insert text at the focused element.
    pub async fn insert_text(&self, text: &str) -> Result<(), CdpError> {
        self.call("Input.insertText", Some(json!({"text": text})))
            .await?;
        Ok(())
    }

    /// Press and release Enter on the focused element.
    pub async fn press_enter(&self) -> Result<(), CdpError> {
        self.call(
            "Input.dispatchKeyEvent",
            Some(json!({
                "type": KeyEventType::KeyDown,
                "key": "Enter",
                "code": "Enter",
                "text": "\r",
                "windowsVirtualKeyCode": 13,
            })),
        )
        .await?;

        self.call(
            "Input.dispatchKeyEvent",
            Some(json!({
                "type": KeyEventType::KeyUp,
                "key": "Enter",
                "code": "Enter",
                "windowsVirtualKeyCode": 13,
            })),
        )
        .await?;

        Ok(())
    }
}

/// Readiness check. Reports `"stale"` while the tagged document is still
/// current and a new one is expected.
fn ready_state_script(new_document: bool) -> String {
    if new_document {
        format!(
            "window.{} ? 'stale' : document.readyState",
            NAVIGATION_MARKER
        )
    } else {
        "document.readyState".to_string()
    }
}

fn is_ready(state: &Value) -> bool {
    matches!(state.as_str(), Some("complete") | Some("interactive"))
}
