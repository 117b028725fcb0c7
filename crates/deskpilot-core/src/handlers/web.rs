//! Web search handler.
//!
//! Drives a browser session through
//! `Idle → Initialized → Navigated → (BotProtectionDetected | SearchBoxLocated)
//! → Typed → Submitted → ResultsExtracted → Closed`.
//!
//! The session is released exactly once after the workflow finishes,
//! whether it returned, failed or panicked.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::FutureExt;
use rand::Rng;
use tracing::{debug, warn};

use deskpilot_config::WebConfig;
use deskpilot_protocols::{
    BrowserController, BrowserSession, CapabilityKind, Domain, ElementHandle, ElementLocator,
    TaskError, TaskResult,
};

use super::DomainHandler;
use crate::registry::CapabilityRegistry;
use crate::rules::extraction::{extract, ParamKind};
use crate::rules::{contains_any, normalize, BROWSER_TRIGGERS};

const SEARCH_TRIGGERS: &[&str] = &["найти", "поиск", "поисковик", "search", "find"];
const BOT_CHECK_TRIGGERS: &[&str] = &["защита от ботов", "проверить", "bot protection", "check"];

const BOT_PROTECTION_INDICATORS: &[&str] = &[
    "captcha",
    "recaptcha",
    "подозрительный трафик",
    "suspicious traffic",
    "робот",
    "robot",
    "автоматические системы",
    "automated systems",
    "проверка по слову",
    "verification",
];

const BOT_PROTECTION_NOTICE: &str =
    "Bot protection (CAPTCHA) detected. Manual intervention required.";

/// Elements taken per result selector.
const RESULTS_PER_SELECTOR: usize = 5;

const SCRIPT_RESULTS: &str = r#"(() => {
    const results = [];
    const elements = document.querySelectorAll('h3');
    for (let i = 0; i < Math.min(3, elements.length); i++) {
        const text = elements[i].textContent.trim();
        if (text) {
            results.push((i + 1) + '. ' + text);
        }
    }
    return results;
})()"#;

/// Search engines the handler can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchEngine {
    Google,
    DuckDuckGo,
}

impl SearchEngine {
    pub fn name(&self) -> &'static str {
        match self {
            SearchEngine::Google => "Google",
            SearchEngine::DuckDuckGo => "DuckDuckGo",
        }
    }

    pub fn home_url(&self) -> &'static str {
        match self {
            SearchEngine::Google => "https://www.google.com",
            SearchEngine::DuckDuckGo => "https://duckduckgo.com",
        }
    }

    /// Search box strategies, tried in order.
    pub fn search_box_locators(&self) -> Vec<ElementLocator> {
        match self {
            SearchEngine::Google => vec![
                ElementLocator::Name("q".to_string()),
                ElementLocator::Css("input[title=\"Поиск\"]".to_string()),
                ElementLocator::Css("input[type=\"text\"]".to_string()),
            ],
            SearchEngine::DuckDuckGo => vec![
                ElementLocator::Name("q".to_string()),
                ElementLocator::Id("search_form_input_homepage".to_string()),
            ],
        }
    }

    /// Result title selectors, tried in order.
    pub fn result_selectors(&self) -> &'static [&'static str] {
        match self {
            SearchEngine::Google => &["h3", ".LC20lb", "[data-header-feature] h3", ".g h3"],
            SearchEngine::DuckDuckGo => {
                &["[data-result] h2 a", ".result__title a", ".result__a", "h3 a"]
            }
        }
    }

    fn scans_for_bot_protection(&self) -> bool {
        matches!(self, SearchEngine::Google)
    }

    fn uses_navigation_jitter(&self) -> bool {
        matches!(self, SearchEngine::Google)
    }

    /// Fall back to a page script when no selector yields results.
    fn uses_script_fallback(&self) -> bool {
        matches!(self, SearchEngine::Google)
    }
}

/// Web workflow states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebState {
    Idle,
    Initialized,
    Navigated,
    BotProtectionDetected,
    SearchBoxLocated,
    Typed,
    Submitted,
    ResultsExtracted,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WebOperation {
    Search(SearchEngine),
    CheckBotProtection,
    OpenBrowser,
}

impl WebOperation {
    fn detect(text: &str) -> Option<Self> {
        if text.contains("duckduckgo") {
            Some(WebOperation::Search(SearchEngine::DuckDuckGo))
        } else if contains_any(text, SEARCH_TRIGGERS) {
            Some(WebOperation::Search(SearchEngine::Google))
        } else if contains_any(text, BOT_CHECK_TRIGGERS) {
            Some(WebOperation::CheckBotProtection)
        } else if contains_any(text, BROWSER_TRIGGERS) {
            Some(WebOperation::OpenBrowser)
        } else {
            None
        }
    }
}

/// Whether a page looks like a bot-protection interstitial.
pub fn detect_bot_protection(page_source: &str) -> bool {
    contains_any(&page_source.to_lowercase(), BOT_PROTECTION_INDICATORS)
}

fn navigation_jitter(max_ms: u64) -> Duration {
    if max_ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::thread_rng().gen_range(0..=max_ms))
}

fn typing_delays(count: usize, min_ms: u64, max_ms: u64) -> Vec<Duration> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            let ms = if min_ms >= max_ms {
                min_ms
            } else {
                rng.gen_range(min_ms..=max_ms)
            };
            Duration::from_millis(ms)
        })
        .collect()
}

async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

/// One workflow run over a borrowed session.
struct WebRun<'a> {
    session: &'a mut dyn BrowserSession,
    config: &'a WebConfig,
    state: WebState,
}

impl<'a> WebRun<'a> {
    fn new(session: &'a mut dyn BrowserSession, config: &'a WebConfig) -> Self {
        Self {
            session,
            config,
            state: WebState::Initialized,
        }
    }

    fn transition(&mut self, next: WebState) {
        debug!(from = ?self.state, to = ?next, "Web workflow transition");
        self.state = next;
    }

    async fn navigate(&mut self, engine: SearchEngine) -> Option<TaskResult> {
        if let Err(e) = self.session.navigate(engine.home_url()).await {
            debug!(engine = engine.name(), error = %e, "Navigation failed");
            return Some(TaskResult::failure(format!("Could not open {}", engine.name())));
        }
        self.transition(WebState::Navigated);
        None
    }

    async fn bot_protection_present(&self) -> bool {
        match self.session.page_source().await {
            Ok(source) => detect_bot_protection(&source),
            Err(e) => {
                debug!(error = %e, "Could not read page source");
                false
            }
        }
    }

    async fn search(&mut self, engine: SearchEngine, query: &str) -> Result<TaskResult, TaskError> {
        if let Some(failure) = self.navigate(engine).await {
            return Ok(failure);
        }

        let jitter = if engine.uses_navigation_jitter() {
            navigation_jitter(self.config.navigation_jitter_ms)
        } else {
            Duration::ZERO
        };
        pause(self.config.navigation_settle() + jitter).await;

        if engine.scans_for_bot_protection() && self.bot_protection_present().await {
            self.transition(WebState::BotProtectionDetected);
            return Ok(TaskResult::success(BOT_PROTECTION_NOTICE));
        }

        let Some(search_box) = self.locate_search_box(engine).await? else {
            return Ok(TaskResult::failure(format!(
                "Search field not found on {}",
                engine.name()
            )));
        };
        self.transition(WebState::SearchBoxLocated);

        self.type_like_human(&search_box, query).await?;
        self.transition(WebState::Typed);

        self.session.send_keys(&search_box, "\n").await?;
        self.transition(WebState::Submitted);
        pause(self.config.results_settle()).await;

        let results = self.extract_results(engine).await?;
        if results.is_empty() {
            return Ok(TaskResult::failure("Could not extract search results"));
        }
        self.transition(WebState::ResultsExtracted);

        let shown: Vec<String> = results.into_iter().take(self.config.max_results).collect();
        Ok(TaskResult::success(shown.join("\n")))
    }

    async fn locate_search_box(
        &self,
        engine: SearchEngine,
    ) -> Result<Option<ElementHandle>, TaskError> {
        for locator in engine.search_box_locators() {
            if let Some(element) = self
                .session
                .find_element(&locator, self.config.element_timeout())
                .await?
            {
                debug!(?locator, "Search box located");
                return Ok(Some(element));
            }
        }
        Ok(None)
    }

    async fn type_like_human(&self, element: &ElementHandle, text: &str) -> Result<(), TaskError> {
        self.session.clear(element).await?;
        let delays = typing_delays(
            text.chars().count(),
            self.config.typing_delay_min_ms,
            self.config.typing_delay_max_ms,
        );
        for (ch, delay) in text.chars().zip(delays) {
            self.session.send_keys(element, &ch.to_string()).await?;
            pause(delay).await;
        }
        Ok(())
    }

    async fn extract_results(&self, engine: SearchEngine) -> Result<Vec<String>, TaskError> {
        for selector in engine.result_selectors() {
            let elements = self
                .session
                .find_elements(selector, self.config.results_timeout())
                .await?;

            let mut results = Vec::new();
            for (i, element) in elements.iter().take(RESULTS_PER_SELECTOR).enumerate() {
                match self.session.element_text(element).await {
                    Ok(text) if !text.trim().is_empty() => {
                        results.push(format!("{}. {}", i + 1, text.trim()));
                    }
                    Ok(_) => {}
                    Err(e) => debug!(selector, index = i, error = %e, "Skipping result element"),
                }
            }
            if !results.is_empty() {
                debug!(selector, count = results.len(), "Results extracted");
                return Ok(results);
            }
        }

        if !engine.uses_script_fallback() {
            return Ok(Vec::new());
        }
        match self.session.execute_script(SCRIPT_RESULTS).await {
            Ok(value) => Ok(script_results(&value)),
            Err(e) => {
                debug!(error = %e, "Result script failed");
                Ok(Vec::new())
            }
        }
    }

    async fn check_bot_protection(&mut self) -> Result<TaskResult, TaskError> {
        if let Some(failure) = self.navigate(SearchEngine::Google).await {
            return Ok(failure);
        }
        pause(self.config.navigation_settle()).await;

        if self.bot_protection_present().await {
            self.transition(WebState::BotProtectionDetected);
            Ok(TaskResult::success("Bot protection (CAPTCHA) detected"))
        } else {
            Ok(TaskResult::success("No bot protection detected"))
        }
    }

    async fn open_browser(&mut self) -> Result<TaskResult, TaskError> {
        if let Some(failure) = self.navigate(SearchEngine::Google).await {
            return Ok(failure);
        }
        Ok(TaskResult::success("Browser opened and navigated to Google"))
    }
}

fn script_results(value: &serde_json::Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str())
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Performs web searches and browser checks.
#[derive(Debug)]
pub struct WebHandler {
    config: WebConfig,
}

impl WebHandler {
    pub fn new(config: WebConfig) -> Self {
        Self { config }
    }

    async fn initialize(
        &self,
        controller: &Arc<dyn BrowserController>,
    ) -> Option<Box<dyn BrowserSession>> {
        match controller.initialize_stealth().await {
            Ok(session) => return Some(session),
            Err(e) => debug!(error = %e, "Stealth initialization failed, retrying plain"),
        }
        match controller.initialize().await {
            Ok(session) => Some(session),
            Err(e) => {
                debug!(error = %e, "Browser initialization failed");
                None
            }
        }
    }

    async fn run(
        &self,
        description: &str,
        session: &mut dyn BrowserSession,
    ) -> Result<TaskResult, TaskError> {
        let mut run = WebRun::new(session, &self.config);

        let Some(operation) = WebOperation::detect(&normalize(description)) else {
            return Ok(TaskResult::failure(format!(
                "Unknown web operation: {}",
                description
            )));
        };
        debug!(?operation, "Web operation");

        match operation {
            WebOperation::Search(engine) => {
                let Some(query) = extract(description, ParamKind::SearchQuery) else {
                    return Ok(TaskResult::failure("Could not determine search query"));
                };
                run.search(engine, &query).await
            }
            WebOperation::CheckBotProtection => run.check_bot_protection().await,
            WebOperation::OpenBrowser => run.open_browser().await,
        }
    }

    async fn release(&self, session: &mut dyn BrowserSession) {
        match session.quit().await {
            Ok(()) => debug!(state = ?WebState::Closed, "Browser session released"),
            Err(e) => warn!(error = %e, "Failed to release browser session"),
        }
    }
}

#[async_trait]
impl DomainHandler for WebHandler {
    fn domain(&self) -> Domain {
        Domain::Web
    }

    fn required_capabilities(&self) -> &'static [CapabilityKind] {
        &[CapabilityKind::BrowserController]
    }

    async fn execute(
        &self,
        description: &str,
        capabilities: &CapabilityRegistry,
    ) -> Result<TaskResult, TaskError> {
        let controller = capabilities.get_browser_controller()?;
        debug!(state = ?WebState::Idle, "Initializing browser");

        let Some(mut session) = self.initialize(&controller).await else {
            return Ok(TaskResult::failure("Could not initialize browser"));
        };

        let outcome = AssertUnwindSafe(self.run(description, session.as_mut()))
            .catch_unwind()
            .await;
        self.release(session.as_mut()).await;

        match outcome {
            Ok(result) => result,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }
}
