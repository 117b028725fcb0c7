//! Domain classification rules.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use deskpilot_protocols::Domain;

use super::{contains_any, normalize, BROWSER_TRIGGERS, WEB_TRIGGERS};

/// A regex whose match alone claims a description for a domain.
///
/// When `rejected` is non-empty the pattern must have a capture group, and a
/// match whose first capture is one of the rejected words does not count.
#[derive(Debug)]
pub struct OverridePattern {
    pattern: Regex,
    rejected: &'static [&'static str],
}

impl OverridePattern {
    fn new(pattern: &str) -> Self {
        Self::rejecting(pattern, &[])
    }

    fn rejecting(pattern: &str, rejected: &'static [&'static str]) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("override pattern must compile"),
            rejected,
        }
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }

    /// Match against an already lowercased description.
    pub fn is_match(&self, text: &str) -> bool {
        if self.rejected.is_empty() {
            return self.pattern.is_match(text);
        }
        self.pattern.captures_iter(text).any(|caps| {
            caps.get(1)
                .map(|word| !self.rejected.contains(&word.as_str()))
                .unwrap_or(true)
        })
    }
}

/// What made a rule claim a description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleMatch {
    Override(String),
    Keyword(&'static str),
}

/// Claim test for one domain.
#[derive(Debug)]
pub struct ClassificationRule {
    pub domain: Domain,
    pub keywords: &'static [&'static str],
    pub override_patterns: Vec<OverridePattern>,
    /// Vetoes a keyword match. Never applied to override matches.
    pub exclusion: Option<fn(&str) -> bool>,
}

impl ClassificationRule {
    /// Test an already lowercased description.
    pub fn match_normalized(&self, text: &str) -> Option<RuleMatch> {
        if let Some(pattern) = self.override_patterns.iter().find(|p| p.is_match(text)) {
            return Some(RuleMatch::Override(pattern.as_str().to_string()));
        }

        let keyword = self.keywords.iter().find(|k| text.contains(*k))?;
        if let Some(excluded) = self.exclusion {
            if excluded(text) {
                debug!(
                    domain = %self.domain,
                    keyword = *keyword,
                    "Keyword match vetoed by exclusion"
                );
                return None;
            }
        }
        Some(RuleMatch::Keyword(keyword))
    }

    /// Whether this rule claims `description`.
    pub fn claims(&self, description: &str) -> bool {
        self.match_normalized(&normalize(description)).is_some()
    }
}

fn mentions_web(text: &str) -> bool {
    contains_any(text, WEB_TRIGGERS)
}

fn mentions_browser(text: &str) -> bool {
    contains_any(text, BROWSER_TRIGGERS)
}

const COMPLEX_PROCESSING_PHRASES: &[&str] = &[
    "проанализировать",
    "сохранить результат",
    "обработать данные",
    "создать отчет",
    "выполнить анализ",
    "обработать и сохранить",
];

/// Vetoes orchestration keywords for plain "find on a site" requests.
///
/// Every text this accepts also contains a Web keyword, so through
/// [`Classifier::classify`] Web always claims it first and the veto never
/// decides the outcome. It only matters when the orchestration rule is
/// tested on its own, and keeps that rule's claim test self-contained.
fn is_simple_web_search(text: &str) -> bool {
    let wants_find = contains_any(text, &["найти", "find"]);
    let analyze_and_save =
        contains_any(text, &["llm", "анализ"]) && text.contains("сохранить");
    let complex = contains_any(text, COMPLEX_PROCESSING_PHRASES);
    let web_target = contains_any(
        text,
        &["интернет", "сайт", "браузер", "internet", "website", "browser"],
    );
    wants_find && !analyze_and_save && !complex && web_target
}

const VISION_KEYWORDS: &[&str] = &[
    "снимок экрана",
    "скриншот",
    "захват экрана",
    "найти иконку",
    "найти элемент",
    "найти на экране",
    "координаты",
    "элемент на экране",
    "проводник",
    "иконка",
    "сделать снимок",
    "снимок",
    "screenshot",
    "screen capture",
    "coordinates",
];

const WEB_KEYWORDS: &[&str] = &[
    "браузер",
    "поисковик",
    "поиск",
    "найти",
    "google",
    "yandex",
    "duckduckgo",
    "сайт",
    "страница",
    "веб",
    "интернет",
    "ссылка",
    "url",
    "browser",
    "search",
    "website",
    "internet",
];

const WINDOWS_KEYWORDS: &[&str] = &[
    "запустить",
    "запуск",
    "калькулятор",
    "блокнот",
    "calc",
    "notepad",
    "приложение",
    "программу",
    "exe",
    "windows",
    "launch",
    "calculator",
    "application",
];

const FILE_KEYWORDS: &[&str] = &[
    "создать файл",
    "создать",
    "записать",
    "написать",
    "прочитать",
    "читать",
    "удалить файл",
    "удалить",
    "стереть",
    "файл",
    "create file",
    "read file",
    "delete file",
    ".txt",
    ".json",
    ".csv",
];

const AUTH_KEYWORDS: &[&str] = &[
    "зарегистрировать пользователя",
    "регистрация",
    "создать пользователя",
    "войти как пользователь",
    "вход",
    "авторизация",
    "логин",
    "проверить права доступа",
    "права доступа",
    "токен",
    "register user",
    "log in as",
    "login",
    "access rights",
    "token",
];

const ORCHESTRATION_KEYWORDS: &[&str] = &[
    "модел",
    "model",
    "llm",
    "обработ",
    "анализ",
    "генерац",
    "оркестр",
    "координац",
    "последовательн",
    "цепочк",
    "pipeline",
    "проанализировать",
    "сохранить результат",
    "обработать данные",
    "создать отчет",
    "выполнить анализ",
    "обработать и сохранить",
    "orchestrat",
    "coordinat",
    "sequential",
];

/// Classification rules in priority order.
pub static RULES: Lazy<Vec<ClassificationRule>> = Lazy::new(|| {
    vec![
        ClassificationRule {
            domain: Domain::Vision,
            keywords: VISION_KEYWORDS,
            override_patterns: vec![
                OverridePattern::new(r"найти\s+иконку"),
                OverridePattern::new(r"найти\s+элемент"),
                OverridePattern::new(r"найти\s+на\s+экране"),
                OverridePattern::new(r"сделать\s+снимок"),
                OverridePattern::new(r"захват\s+экрана"),
                OverridePattern::new(r"снимок\s+экрана"),
                OverridePattern::new(r"take\s+a\s+screenshot"),
                OverridePattern::new(r"find\s+(?:the\s+)?icon"),
                OverridePattern::new(r"find\s+(?:the\s+)?element"),
                OverridePattern::new(r"\bon\s+(?:the\s+)?screen"),
            ],
            exclusion: Some(mentions_web),
        },
        ClassificationRule {
            domain: Domain::Web,
            keywords: WEB_KEYWORDS,
            override_patterns: vec![
                OverridePattern::new(r"открыть\s+браузер"),
                OverridePattern::new(r"найти\s+в\s+поисковике"),
                OverridePattern::new(r"поиск\s+в\s+интернете"),
                OverridePattern::new(r"открыть\s+сайт"),
                OverridePattern::new(r"перейти\s+на\s+сайт"),
                OverridePattern::new(r"open\s+(?:the\s+)?browser"),
                OverridePattern::new(r"search\s+the\s+web"),
            ],
            exclusion: None,
        },
        ClassificationRule {
            domain: Domain::Windows,
            keywords: WINDOWS_KEYWORDS,
            override_patterns: vec![
                OverridePattern::new(r"открыть\s+калькулятор"),
                OverridePattern::new(r"открыть\s+блокнот"),
                OverridePattern::new(r"открыть\s+calc"),
                OverridePattern::new(r"открыть\s+notepad"),
                OverridePattern::rejecting(r"запустить\s+(\w+)", BROWSER_TRIGGERS),
                OverridePattern::new(r"open\s+(?:the\s+)?(?:calculator|notepad)"),
                OverridePattern::rejecting(r"launch\s+(\w+)", BROWSER_TRIGGERS),
            ],
            exclusion: Some(mentions_browser),
        },
        ClassificationRule {
            domain: Domain::File,
            keywords: FILE_KEYWORDS,
            override_patterns: Vec::new(),
            exclusion: None,
        },
        ClassificationRule {
            domain: Domain::Auth,
            keywords: AUTH_KEYWORDS,
            override_patterns: Vec::new(),
            exclusion: None,
        },
        ClassificationRule {
            domain: Domain::ModelOrchestration,
            keywords: ORCHESTRATION_KEYWORDS,
            override_patterns: vec![
                OverridePattern::new(r"(?:llm|анализ).*сохранить"),
                OverridePattern::new(r"сохранить.*(?:llm|анализ)"),
            ],
            exclusion: Some(is_simple_web_search),
        },
    ]
});

/// Rule for a domain. `None` for `Echo`, which has no claim test.
pub fn rule_for(domain: Domain) -> Option<&'static ClassificationRule> {
    RULES.iter().find(|rule| rule.domain == domain)
}

/// Maps a free-text description to a domain.
#[derive(Debug, Clone, Copy, Default)]
pub struct Classifier;

impl Classifier {
    /// First claiming domain in priority order, or `Echo`.
    pub fn classify(description: &str) -> Domain {
        let text = normalize(description);
        for rule in RULES.iter() {
            if let Some(matched) = rule.match_normalized(&text) {
                debug!(domain = %rule.domain, trigger = ?matched, "Description classified");
                return rule.domain;
            }
        }
        debug!("No domain claimed description, falling back to echo");
        Domain::Echo
    }
}

#[cfg(test)]
#[path = "classification_tests.rs"]
mod tests;
