//! JavaScript snippets evaluated in the page.
//!
//! Elements are addressed as `document.querySelectorAll(selector)[index]`.
//! Selectors are embedded as JSON string literals.

use serde_json::Value;

/// Masks the usual automation fingerprints.
pub(crate) const STEALTH_SCRIPT: &str = r#"
Object.defineProperty(navigator, 'webdriver', { get: () => undefined });
Object.defineProperty(navigator, 'languages', { get: () => ['ru-RU', 'ru', 'en-US', 'en'] });
Object.defineProperty(navigator, 'plugins', { get: () => [1, 2, 3, 4, 5] });
window.chrome = window.chrome || { runtime: {} };
"#;

fn element(css: &str, index: usize) -> String {
    format!(
        "document.querySelectorAll({})[{}]",
        Value::from(css),
        index
    )
}

/// Number of elements matching `css`.
pub(crate) fn count(css: &str) -> String {
    format!("document.querySelectorAll({}).length", Value::from(css))
}

/// Visible text of an element, or `null` if it is gone.
pub(crate) fn text(css: &str, index: usize) -> String {
    format!(
        "(() => {{ const el = {}; return el ? (el.innerText || el.textContent || '') : null; }})()",
        element(css, index)
    )
}

/// Empty an input and notify listeners. Evaluates to `false` if missing.
pub(crate) fn clear(css: &str, index: usize) -> String {
    format!(
        "(() => {{ const el = {}; if (!el) return false; el.focus(); el.value = ''; \
         el.dispatchEvent(new Event('input', {{ bubbles: true }})); return true; }})()",
        element(css, index)
    )
}

/// Focus an element. Evaluates to `false` if missing.
pub(crate) fn focus(css: &str, index: usize) -> String {
    format!(
        "(() => {{ const el = {}; if (!el) return false; el.focus(); return true; }})()",
        element(css, index)
    )
}

/// Browser user agent with the headless marker removed.
pub(crate) fn stealth_user_agent(browser_user_agent: &str) -> String {
    browser_user_agent.replace("HeadlessChrome", "Chrome")
}
