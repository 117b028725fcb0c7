//! CDP browser client.

use serde_json::json;
use tokio::task::JoinHandle;
use tracing::debug;

use super::connection::Connection;
use super::error::CdpError;
use super::protocol::{BrowserVersion, PageInfo};
use super::session::PageSession;

/// Connection to a browser's DevTools endpoint.
pub struct CdpClient {
    /// HTTP endpoint for target discovery.
    http_endpoint: String,
    version: BrowserVersion,
    connection: Connection,
    recv_task: JoinHandle<()>,
}

impl CdpClient {
    /// Connect to Chrome at `endpoint` (e.g. `http://127.0.0.1:9222`).
    pub async fn connect(endpoint: &str) -> Result<Self, CdpError> {
        let http_endpoint = endpoint.trim_end_matches('/').to_string();
        let version = Self::probe(&http_endpoint).await?;
        debug!(browser = %version.browser, "Connected to browser");

        let (connection, recv_task) = Connection::open(&version.web_socket_debugger_url).await?;
        debug!("CDP client connected to {}", version.web_socket_debugger_url);

        Ok(Self {
            http_endpoint,
            version,
            connection,
            recv_task,
        })
    }

    /// Fetch `/json/version`; fails when nothing is listening.
    pub async fn probe(endpoint: &str) -> Result<BrowserVersion, CdpError> {
        let version_url = format!("{}/json/version", endpoint.trim_end_matches('/'));
        let version: BrowserVersion = reqwest::get(&version_url)
            .await
            .map_err(|e| CdpError::ChromeNotAvailable(format!("{}: {}", endpoint, e)))?
            .json()
            .await
            .map_err(|e| CdpError::ChromeNotAvailable(format!("{}: {}", endpoint, e)))?;
        Ok(version)
    }

    pub fn version(&self) -> &BrowserVersion {
        &self.version
    }

    /// Send a browser-level CDP command.
    pub async fn call(
        &self,
        method: &str,
        params: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, CdpError> {
        self.connection.call(method, params, None).await
    }

    /// Open a blank tab and attach a session to it.
    pub async fn new_page(&self) -> Result<PageSession, CdpError> {
        // Chrome requires PUT for /json/new
        let create_url = format!("{}/json/new", self.http_endpoint);
        let page_info: PageInfo = reqwest::Client::new()
            .put(&create_url)
            .send()
            .await?
            .json()
            .await?;
        debug!("Created new page: {} - {}", page_info.id, page_info.url);

        let result = self
            .call(
                "Target.attachToTarget",
                Some(json!({
                    "targetId": page_info.id,
                    "flatten": true
                })),
            )
            .await?;

        let session_id = result["sessionId"]
            .as_str()
            .ok_or_else(|| CdpError::InvalidResponse("Missing sessionId".to_string()))?
            .to_string();

        let session = PageSession::new(page_info.id, session_id, self.connection.clone());
        session.enable_domains().await?;
        Ok(session)
    }

    /// Close a tab.
    pub async fn close_page(&self, target_id: &str) -> Result<(), CdpError> {
        self.call("Target.closeTarget", Some(json!({"targetId": target_id})))
            .await?;
        Ok(())
    }
}

impl Drop for CdpClient {
    fn drop(&mut self) {
        self.recv_task.abort();
    }
}
