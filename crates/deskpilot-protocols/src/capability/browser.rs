//! Browser automation capability.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::CapabilityError;

/// Strategy for locating a single element on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementLocator {
    /// Match the `name` attribute.
    Name(String),
    /// Match the element id.
    Id(String),
    /// Arbitrary CSS selector.
    Css(String),
}

impl ElementLocator {
    /// Equivalent CSS selector.
    pub fn to_css(&self) -> String {
        match self {
            ElementLocator::Name(name) => format!("[name=\"{}\"]", escape_attr(name)),
            ElementLocator::Id(id) => format!("[id=\"{}\"]", escape_attr(id)),
            ElementLocator::Css(css) => css.clone(),
        }
    }
}

fn escape_attr(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Reference to an element found on the current page.
///
/// Elements are addressed by the selector that found them and their
/// position in document order, so a handle stays valid only until the
/// page changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementHandle {
    pub selector: String,
    pub index: usize,
}

impl ElementHandle {
    pub fn new(selector: impl Into<String>, index: usize) -> Self {
        Self {
            selector: selector.into(),
            index,
        }
    }
}

/// Creates browser sessions.
#[async_trait]
pub trait BrowserController: Send + Sync {
    /// Start a session with automation fingerprints masked.
    async fn initialize_stealth(&self) -> Result<Box<dyn BrowserSession>, CapabilityError>;

    /// Start a plain session.
    async fn initialize(&self) -> Result<Box<dyn BrowserSession>, CapabilityError>;
}

/// A live browser session. Must be released with [`BrowserSession::quit`].
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Navigate to `url` and wait for the page to load.
    async fn navigate(&mut self, url: &str) -> Result<(), CapabilityError>;

    /// Rendered HTML of the current page.
    async fn page_source(&self) -> Result<String, CapabilityError>;

    /// Wait up to `timeout` for an element matching `locator`.
    async fn find_element(
        &self,
        locator: &ElementLocator,
        timeout: Duration,
    ) -> Result<Option<ElementHandle>, CapabilityError>;

    /// Wait up to `timeout` for elements matching a CSS selector.
    ///
    /// Returns an empty list when nothing appears in time.
    async fn find_elements(
        &self,
        css: &str,
        timeout: Duration,
    ) -> Result<Vec<ElementHandle>, CapabilityError>;

    /// Visible text of an element.
    async fn element_text(&self, element: &ElementHandle) -> Result<String, CapabilityError>;

    /// Clear an input element.
    async fn clear(&self, element: &ElementHandle) -> Result<(), CapabilityError>;

    /// Type into an element. `"\n"` submits.
    async fn send_keys(&self, element: &ElementHandle, keys: &str) -> Result<(), CapabilityError>;

    /// Evaluate a script in the page and return its JSON value.
    async fn execute_script(&self, script: &str) -> Result<serde_json::Value, CapabilityError>;

    /// Release the session.
    async fn quit(&mut self) -> Result<(), CapabilityError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_locator_css() {
        let locator = ElementLocator::Name("q".to_string());
        assert_eq!(locator.to_css(), "[name=\"q\"]");
    }

    #[test]
    fn test_id_locator_css() {
        let locator = ElementLocator::Id("search_form_input_homepage".to_string());
        assert_eq!(locator.to_css(), "[id=\"search_form_input_homepage\"]");
    }

    #[test]
    fn test_css_locator_passthrough() {
        let locator = ElementLocator::Css("input[type=\"text\"]".to_string());
        assert_eq!(locator.to_css(), "input[type=\"text\"]");
    }

    #[test]
    fn test_attr_escaping() {
        let locator = ElementLocator::Name("a\"b".to_string());
        assert_eq!(locator.to_css(), "[name=\"a\\\"b\"]");
    }

    #[test]
    fn test_element_handle() {
        let handle = ElementHandle::new("h3", 2);
        assert_eq!(handle.selector, "h3");
        assert_eq!(handle.index, 2);
    }
}
