//! Capability registry.
//!
//! Holds the external collaborators a handler may need, one slot per
//! [`CapabilityKind`]. Lookups are typed: a missing capability is a
//! `CapabilityError::Unavailable` naming the kind, never a runtime cast.

use std::sync::Arc;

use deskpilot_protocols::{
    BrowserController, CapabilityError, CapabilityKind, ElementLocalization, FileSystem,
    ProcessLauncher, ScreenCapture,
};

/// Typed lookup of capability trait objects.
#[derive(Clone, Default)]
pub struct CapabilityRegistry {
    filesystem: Option<Arc<dyn FileSystem>>,
    browser_controller: Option<Arc<dyn BrowserController>>,
    screen_capture: Option<Arc<dyn ScreenCapture>>,
    element_localization: Option<Arc<dyn ElementLocalization>>,
    process_launcher: Option<Arc<dyn ProcessLauncher>>,
}

impl CapabilityRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filesystem(mut self, filesystem: Arc<dyn FileSystem>) -> Self {
        self.filesystem = Some(filesystem);
        self
    }

    pub fn with_browser_controller(mut self, controller: Arc<dyn BrowserController>) -> Self {
        self.browser_controller = Some(controller);
        self
    }

    pub fn with_screen_capture(mut self, capture: Arc<dyn ScreenCapture>) -> Self {
        self.screen_capture = Some(capture);
        self
    }

    pub fn with_element_localization(mut self, locator: Arc<dyn ElementLocalization>) -> Self {
        self.element_localization = Some(locator);
        self
    }

    pub fn with_process_launcher(mut self, launcher: Arc<dyn ProcessLauncher>) -> Self {
        self.process_launcher = Some(launcher);
        self
    }

    pub fn get_filesystem(&self) -> Result<Arc<dyn FileSystem>, CapabilityError> {
        self.filesystem
            .clone()
            .ok_or(CapabilityError::Unavailable(CapabilityKind::FileSystem))
    }

    pub fn get_browser_controller(&self) -> Result<Arc<dyn BrowserController>, CapabilityError> {
        self.browser_controller
            .clone()
            .ok_or(CapabilityError::Unavailable(CapabilityKind::BrowserController))
    }

    pub fn get_screen_capture(&self) -> Result<Arc<dyn ScreenCapture>, CapabilityError> {
        self.screen_capture
            .clone()
            .ok_or(CapabilityError::Unavailable(CapabilityKind::ScreenCapture))
    }

    pub fn get_element_localization(
        &self,
    ) -> Result<Arc<dyn ElementLocalization>, CapabilityError> {
        self.element_localization
            .clone()
            .ok_or(CapabilityError::Unavailable(CapabilityKind::ElementLocalization))
    }

    pub fn get_process_launcher(&self) -> Result<Arc<dyn ProcessLauncher>, CapabilityError> {
        self.process_launcher
            .clone()
            .ok_or(CapabilityError::Unavailable(CapabilityKind::ProcessLauncher))
    }

    /// Check if a capability of the given kind is registered.
    pub fn contains(&self, kind: CapabilityKind) -> bool {
        match kind {
            CapabilityKind::FileSystem => self.filesystem.is_some(),
            CapabilityKind::BrowserController => self.browser_controller.is_some(),
            CapabilityKind::ScreenCapture => self.screen_capture.is_some(),
            CapabilityKind::ElementLocalization => self.element_localization.is_some(),
            CapabilityKind::ProcessLauncher => self.process_launcher.is_some(),
        }
    }

    /// Registered kinds, in declaration order.
    pub fn kinds(&self) -> Vec<CapabilityKind> {
        CapabilityKind::ALL
            .into_iter()
            .filter(|kind| self.contains(*kind))
            .collect()
    }

    /// First kind in `required` that is not registered.
    pub fn first_missing(&self, required: &[CapabilityKind]) -> Option<CapabilityKind> {
        required.iter().copied().find(|kind| !self.contains(*kind))
    }

    /// Number of registered capabilities.
    pub fn len(&self) -> usize {
        self.kinds().len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for CapabilityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}
