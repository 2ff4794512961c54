//! Debug bounding-box overlay
//!
//! When enabled, every graphic-attached view gets an unfilled rectangle the
//! size of its entity, drawn in a fixed color. The enable flag and color are
//! process-wide: set them once with [`enable_debug_bounding_box`] before the
//! first view is constructed. Views built earlier are not affected. Setting
//! the flag from several threads at once is the caller's problem; views
//! themselves never write it.
//!
//! The rectangle is resized on every hit box edit, even though it only reads
//! the entity's width and height. Size changes that don't come with a hit box
//! edit are picked up at the next edit.

use crate::entity::{EntityProperties, HitBox};
use crate::foundation::color::Color;
use crate::foundation::observable::{ListEdit, ListenerKey};
use crate::scene::NodeHandle;
use serde::{Deserialize, Serialize};
use std::rc::Weak;
use std::sync::RwLock;

/// Debug overlay settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugOverlayConfig {
    /// Whether graphic-attached views get a bounding box
    pub enabled: bool,
    /// Outline color of the bounding box
    pub color: Color,
}

impl DebugOverlayConfig {
    /// Overlay turned off
    pub const DISABLED: Self = Self {
        enabled: false,
        color: Color::BLACK,
    };

    /// Overlay turned on with the given outline color
    pub const fn enabled(color: Color) -> Self {
        Self {
            enabled: true,
            color,
        }
    }
}

impl Default for DebugOverlayConfig {
    fn default() -> Self {
        Self::DISABLED
    }
}

static DEBUG_BOUNDING_BOX: RwLock<DebugOverlayConfig> = RwLock::new(DebugOverlayConfig::DISABLED);

/// Turn on the bounding-box overlay for every view constructed from now on
pub fn enable_debug_bounding_box(color: Color) {
    let mut setting = DEBUG_BOUNDING_BOX
        .write()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    *setting = DebugOverlayConfig::enabled(color);
    log::info!("Debug bounding boxes enabled");
}

/// Current process-wide overlay setting
pub fn debug_bounding_box() -> DebugOverlayConfig {
    *DEBUG_BOUNDING_BOX
        .read()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Build the overlay rectangle for `entity`, sized to its current dimensions
pub(crate) fn overlay_node(entity: &dyn EntityProperties, color: Color) -> NodeHandle {
    NodeHandle::rectangle(entity.width(), entity.height())
        .with_fill(None)
        .with_stroke(Some(color))
}

/// Keep `overlay` sized to the entity on every hit box edit
///
/// `entity` is reached through a weak handle so the listener, which the
/// entity itself stores, doesn't keep the entity alive.
pub(crate) fn track_hit_boxes(
    entity: &dyn EntityProperties,
    source: Weak<dyn EntityProperties>,
    overlay: NodeHandle,
) -> ListenerKey {
    entity.hit_boxes().subscribe(move |edits: &[ListEdit<HitBox>]| {
        let Some(entity) = source.upgrade() else {
            return;
        };
        for _ in edits {
            overlay.set_size(entity.width(), entity.height());
        }
    })
}
