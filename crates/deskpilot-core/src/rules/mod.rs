//! Declarative rule tables.
//!
//! Both tables are ordered: earlier entries win. Descriptions are matched
//! after Unicode lowercasing, so every pattern and keyword is lowercase.

pub mod classification;
pub mod extraction;

/// Lowercase a description for matching.
pub fn normalize(description: &str) -> String {
    description.to_lowercase()
}

/// Whether `text` contains any of `needles`.
pub fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}

/// Words that mark a request as browser-related.
pub const BROWSER_TRIGGERS: &[&str] = &["браузер", "browser"];

/// Words that mark a request as web-related.
pub const WEB_TRIGGERS: &[&str] = &[
    "браузер",
    "поисковик",
    "поиск",
    "google",
    "yandex",
    "сайт",
    "интернет",
    "browser",
    "search",
    "website",
    "internet",
];
