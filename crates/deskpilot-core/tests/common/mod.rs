//! Hand-written capability fakes shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use deskpilot_config::Config;
use deskpilot_core::{CapabilityRegistry, Engine};
use deskpilot_protocols::{
    BrowserController, BrowserSession, CapabilityError, ElementBounds, ElementHandle,
    ElementLocalization, ElementLocator, FileSystem, LaunchedProcess, ProcessLauncher,
    ScreenCapture, Screenshot,
};

// ---------------------------------------------------------------------------
// Filesystem
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryFileSystem {
    files: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl FileSystem for MemoryFileSystem {
    async fn create_file(&self, path: &str, content: &str) -> Result<(), CapabilityError> {
        self.files.lock().insert(path.to_string(), content.to_string());
        Ok(())
    }

    async fn read_file(&self, path: &str) -> Result<String, CapabilityError> {
        self.files
            .lock()
            .get(path)
            .cloned()
            .ok_or_else(|| CapabilityError::NotFound(path.to_string()))
    }

    async fn delete_file(&self, path: &str) -> Result<(), CapabilityError> {
        self.files
            .lock()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| CapabilityError::NotFound(path.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Processes
// ---------------------------------------------------------------------------

pub struct FakeProcess {
    exit_code: Option<i32>,
}

impl LaunchedProcess for FakeProcess {
    fn id(&self) -> Option<u32> {
        Some(4242)
    }

    fn try_exit_code(&mut self) -> Result<Option<i32>, CapabilityError> {
        Ok(self.exit_code)
    }
}

#[derive(Default)]
pub struct FakeLauncher {
    pub spawned: Mutex<Vec<String>>,
    pub exits_immediately: bool,
    pub refuse: bool,
}

impl FakeLauncher {
    pub fn exiting() -> Self {
        Self {
            exits_immediately: true,
            ..Default::default()
        }
    }

    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl ProcessLauncher for FakeLauncher {
    async fn spawn(&self, program: &str) -> Result<Box<dyn LaunchedProcess>, CapabilityError> {
        if self.refuse {
            return Err(CapabilityError::OperationFailed(format!(
                "{} is not installed",
                program
            )));
        }
        self.spawned.lock().push(program.to_string());
        Ok(Box::new(FakeProcess {
            exit_code: self.exits_immediately.then_some(0),
        }))
    }
}

// ---------------------------------------------------------------------------
// Browser
// ---------------------------------------------------------------------------

/// Step at which the fake session misbehaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserFault {
    None,
    NavigateFails,
    FindElementErrors,
    FindElementPanics,
    QuitFails,
}

#[derive(Clone)]
pub struct BrowserScript {
    pub page_source: String,
    pub has_search_box: bool,
    /// selector -> element texts
    pub elements: HashMap<String, Vec<String>>,
    pub script_results: serde_json::Value,
    pub fault: BrowserFault,
    pub stealth_fails: bool,
    pub plain_fails: bool,
}

impl Default for BrowserScript {
    fn default() -> Self {
        Self {
            page_source: "<html><input name=\"q\"></html>".to_string(),
            has_search_box: true,
            elements: HashMap::new(),
            script_results: serde_json::Value::Null,
            fault: BrowserFault::None,
            stealth_fails: false,
            plain_fails: false,
        }
    }
}

impl BrowserScript {
    pub fn with_results(mut self, selector: &str, texts: &[&str]) -> Self {
        self.elements.insert(
            selector.to_string(),
            texts.iter().map(|t| t.to_string()).collect(),
        );
        self
    }

    pub fn with_fault(mut self, fault: BrowserFault) -> Self {
        self.fault = fault;
        self
    }
}

/// Shared observations across the sessions a controller hands out.
#[derive(Default)]
pub struct BrowserLog {
    pub quit_calls: AtomicUsize,
    pub sessions: AtomicUsize,
    pub stealth_sessions: AtomicUsize,
    pub navigations: Mutex<Vec<String>>,
    pub typed: Mutex<String>,
    pub cleared: AtomicUsize,
}

impl BrowserLog {
    pub fn quit_count(&self) -> usize {
        self.quit_calls.load(Ordering::SeqCst)
    }

    pub fn typed_text(&self) -> String {
        self.typed.lock().clone()
    }
}

pub struct FakeBrowserController {
    pub script: BrowserScript,
    pub log: Arc<BrowserLog>,
}

impl FakeBrowserController {
    pub fn new(script: BrowserScript) -> Self {
        Self {
            script,
            log: Arc::new(BrowserLog::default()),
        }
    }

    fn session(&self) -> Box<dyn BrowserSession> {
        self.log.sessions.fetch_add(1, Ordering::SeqCst);
        Box::new(FakeBrowserSession {
            script: self.script.clone(),
            log: self.log.clone(),
        })
    }
}

#[async_trait]
impl BrowserController for FakeBrowserController {
    async fn initialize_stealth(&self) -> Result<Box<dyn BrowserSession>, CapabilityError> {
        if self.script.stealth_fails {
            return Err(CapabilityError::OperationFailed("stealth refused".to_string()));
        }
        self.log.stealth_sessions.fetch_add(1, Ordering::SeqCst);
        Ok(self.session())
    }

    async fn initialize(&self) -> Result<Box<dyn BrowserSession>, CapabilityError> {
        if self.script.plain_fails {
            return Err(CapabilityError::OperationFailed("no browser".to_string()));
        }
        Ok(self.session())
    }
}

pub struct FakeBrowserSession {
    script: BrowserScript,
    log: Arc<BrowserLog>,
}

#[async_trait]
impl BrowserSession for FakeBrowserSession {
    async fn navigate(&mut self, url: &str) -> Result<(), CapabilityError> {
        if self.script.fault == BrowserFault::NavigateFails {
            return Err(CapabilityError::Timeout(format!("loading {}", url)));
        }
        self.log.navigations.lock().push(url.to_string());
        Ok(())
    }

    async fn page_source(&self) -> Result<String, CapabilityError> {
        Ok(self.script.page_source.clone())
    }

    async fn find_element(
        &self,
        locator: &ElementLocator,
        _timeout: Duration,
    ) -> Result<Option<ElementHandle>, CapabilityError> {
        match self.script.fault {
            BrowserFault::FindElementErrors => {
                return Err(CapabilityError::OperationFailed(
                    "DOM detached while locating search box".to_string(),
                ));
            }
            BrowserFault::FindElementPanics => panic!("driver crashed"),
            _ => {}
        }
        Ok(self
            .script
            .has_search_box
            .then(|| ElementHandle::new(locator.to_css(), 0)))
    }

    async fn find_elements(
        &self,
        css: &str,
        _timeout: Duration,
    ) -> Result<Vec<ElementHandle>, CapabilityError> {
        let count = self.script.elements.get(css).map(Vec::len).unwrap_or(0);
        Ok((0..count).map(|i| ElementHandle::new(css, i)).collect())
    }

    async fn element_text(&self, element: &ElementHandle) -> Result<String, CapabilityError> {
        self.script
            .elements
            .get(&element.selector)
            .and_then(|texts| texts.get(element.index))
            .cloned()
            .ok_or_else(|| CapabilityError::NotFound(element.selector.clone()))
    }

    async fn clear(&self, _element: &ElementHandle) -> Result<(), CapabilityError> {
        self.log.cleared.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn send_keys(&self, _element: &ElementHandle, keys: &str) -> Result<(), CapabilityError> {
        self.log.typed.lock().push_str(keys);
        Ok(())
    }

    async fn execute_script(&self, _script: &str) -> Result<serde_json::Value, CapabilityError> {
        Ok(self.script.script_results.clone())
    }

    async fn quit(&mut self) -> Result<(), CapabilityError> {
        self.log.quit_calls.fetch_add(1, Ordering::SeqCst);
        if self.script.fault == BrowserFault::QuitFails {
            return Err(CapabilityError::OperationFailed("browser already gone".to_string()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Vision
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeScreenCapture {
    pub captures: AtomicUsize,
    pub fail: bool,
}

#[async_trait]
impl ScreenCapture for FakeScreenCapture {
    async fn capture_screen(&self) -> Result<Screenshot, CapabilityError> {
        if self.fail {
            return Err(CapabilityError::OperationFailed("no display".to_string()));
        }
        self.captures.fetch_add(1, Ordering::SeqCst);
        Ok(Screenshot {
            png: vec![0x89, b'P', b'N', b'G'],
            width: 1920,
            height: 1080,
        })
    }
}

/// Finds `target` on the `found_on_attempt`-th call, never when `None`.
pub struct FakeLocator {
    pub target: String,
    pub found_on_attempt: Option<usize>,
    pub calls: AtomicUsize,
}

impl FakeLocator {
    pub fn finding(target: &str, attempt: usize) -> Self {
        Self {
            target: target.to_string(),
            found_on_attempt: Some(attempt),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn never() -> Self {
        Self {
            target: String::new(),
            found_on_attempt: None,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ElementLocalization for FakeLocator {
    async fn locate(
        &self,
        _screenshot: &Screenshot,
        target: &str,
    ) -> Result<Option<ElementBounds>, CapabilityError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let found = target.eq_ignore_ascii_case(&self.target)
            && self.found_on_attempt.is_some_and(|n| call >= n);
        Ok(found.then_some(ElementBounds {
            x: 100,
            y: 200,
            width: 50,
            height: 50,
        }))
    }
}

// ---------------------------------------------------------------------------
// Engine helpers
// ---------------------------------------------------------------------------

/// Test config: no waits, short vision polling.
pub fn fast_config() -> Config {
    let mut config = Config::without_delays();
    config.vision.locate_timeout_ms = 200;
    config.vision.poll_interval_ms = 10;
    config
}

pub fn engine_with(capabilities: CapabilityRegistry) -> Engine {
    Engine::builder()
        .config(fast_config())
        .capabilities(capabilities)
        .build()
}
