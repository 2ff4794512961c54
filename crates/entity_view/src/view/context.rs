//! Construction context for views

use super::debug_overlay::{debug_bounding_box, DebugOverlayConfig};
use crate::config::ViewConfig;

/// Settings read when a view is constructed
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewContext {
    /// Debug bounding-box overlay
    pub debug_overlay: DebugOverlayConfig,
}

impl ViewContext {
    /// Snapshot of the process-wide settings
    pub fn global() -> Self {
        Self {
            debug_overlay: debug_bounding_box(),
        }
    }

    /// Context described by a loaded configuration
    pub fn from_config(config: &ViewConfig) -> Self {
        Self {
            debug_overlay: config.debug_overlay,
        }
    }

    /// Builder pattern: set the overlay settings
    pub fn with_debug_overlay(mut self, debug_overlay: DebugOverlayConfig) -> Self {
        self.debug_overlay = debug_overlay;
        self
    }
}
