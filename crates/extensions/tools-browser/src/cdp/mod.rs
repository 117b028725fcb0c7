//! Chrome DevTools Protocol (CDP) client implementation.
//!
//! Connects to Chrome via WebSocket and speaks the CDP JSON-RPC protocol.
//! One [`CdpClient`] owns the browser connection; each tab is a
//! [`PageSession`] multiplexed over it with flattened session ids.
//!
//! ```rust,ignore
//! let client = CdpClient::connect("http://localhost:9222").await?;
//! let page = client.new_page().await?;
//! page.navigate("https://example.com").await?;
//! ```

mod client;
mod connection;
mod error;
mod protocol;
mod session;

pub use client::CdpClient;
pub use error::CdpError;
pub use protocol::*;
pub use session::PageSession;
