//! Browser capability for DeskPilot.
//!
//! Drives Chrome/Chromium through the Chrome DevTools Protocol (CDP).
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐    WebSocket     ┌──────────────────┐
//! │  Rust Backend   │ ◄──────────────► │   Chrome/Edge    │
//! │  (this crate)   │       CDP        │  (user's browser)│
//! └─────────────────┘                  └──────────────────┘
//! ```
//!
//! ## Setup
//!
//! If nothing answers on the configured debug port, Chrome is launched with
//! remote debugging and a dedicated profile, and killed again when the
//! session quits. To reuse a running browser instead:
//!
//! ```bash
//! google-chrome --remote-debugging-port=9222
//! ```
//!
//! ## Sessions
//!
//! Every [`CdpBrowserController::initialize`] call opens a fresh tab.
//! Elements are addressed by CSS selector plus index in document order, so
//! handles are only meaningful until the page changes.

pub mod cdp;
mod chrome;
mod controller;
mod scripts;

pub use cdp::{CdpClient, CdpError, PageSession};
pub use chrome::{find_chrome, ChromeLauncher};
pub use controller::{CdpBrowserController, CdpBrowserSession};
