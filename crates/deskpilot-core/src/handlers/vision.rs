//! Screen capture and element localization handler.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::debug;

use deskpilot_config::VisionConfig;
use deskpilot_protocols::{
    CapabilityKind, Domain, ElementBounds, ElementLocalization, ScreenCapture, TaskError,
    TaskResult,
};

use super::DomainHandler;
use crate::registry::CapabilityRegistry;
use crate::rules::extraction::{extract, ParamKind};
use crate::rules::{contains_any, normalize};

const LOCATE_TRIGGERS: &[&str] = &[
    "найти иконку",
    "найти элемент",
    "проводник",
    "иконка",
    "find icon",
    "find element",
    "icon",
    "element",
];

/// Captures the screen and optionally locates an element on it.
#[derive(Debug)]
pub struct VisionHandler {
    config: VisionConfig,
}

impl VisionHandler {
    pub fn new(config: VisionConfig) -> Self {
        Self { config }
    }

    /// Poll until the element is found or the deadline passes.
    ///
    /// Always makes at least one attempt, re-capturing between rounds.
    async fn locate(
        &self,
        capture: &Arc<dyn ScreenCapture>,
        localization: &Arc<dyn ElementLocalization>,
        target: &str,
    ) -> Result<Option<ElementBounds>, TaskError> {
        let deadline = Instant::now() + self.config.locate_timeout();
        let mut attempt = 1u32;
        loop {
            let screenshot = capture.capture_screen().await?;
            if let Some(bounds) = localization.locate(&screenshot, target).await? {
                debug!(element = target, attempt, "Element located");
                return Ok(Some(bounds));
            }
            if Instant::now() + self.config.poll_interval() > deadline {
                debug!(element = target, attempt, "Element not located before deadline");
                return Ok(None);
            }
            tokio::time::sleep(self.config.poll_interval()).await;
            attempt += 1;
        }
    }
}

#[async_trait]
impl DomainHandler for VisionHandler {
    fn domain(&self) -> Domain {
        Domain::Vision
    }

    fn required_capabilities(&self) -> &'static [CapabilityKind] {
        &[CapabilityKind::ScreenCapture, CapabilityKind::ElementLocalization]
    }

    async fn execute(
        &self,
        description: &str,
        capabilities: &CapabilityRegistry,
    ) -> Result<TaskResult, TaskError> {
        let capture = capabilities.get_screen_capture()?;
        let localization = capabilities.get_element_localization()?;

        let screenshot = match capture.capture_screen().await {
            Ok(screenshot) => screenshot,
            Err(e) => {
                return Ok(TaskResult::failure(format!(
                    "Could not capture the screen: {}",
                    e
                )));
            }
        };

        if !contains_any(&normalize(description), LOCATE_TRIGGERS) {
            return Ok(TaskResult::success(format!(
                "Screenshot captured ({}x{})",
                screenshot.width, screenshot.height
            )));
        }

        let Some(target) = extract(description, ParamKind::ElementTarget) else {
            return Ok(TaskResult::failure(
                "Could not determine which element to locate",
            ));
        };

        match self.locate(&capture, &localization, &target).await? {
            Some(bounds) => Ok(TaskResult::success(format!(
                "Screenshot captured. Element found at x={}, y={}, width={}, height={}",
                bounds.x, bounds.y, bounds.width, bounds.height
            ))),
            None => Ok(TaskResult::failure(format!(
                "Element '{}' not found on screen",
                target
            ))),
        }
    }
}
