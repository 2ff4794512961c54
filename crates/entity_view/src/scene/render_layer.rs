//! Render layers ordering views within a scene container
//!
//! A layer with a higher index is drawn on top of a layer with a lower index.
//! Layers compare by index only; the name is a label for logs and tools.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Ordering key controlling draw order among sibling views
#[derive(Debug, Clone, Copy)]
pub struct RenderLayer {
    name: &'static str,
    index: i32,
}

impl RenderLayer {
    /// The very top layer, default for every view
    pub const TOP: Self = Self::new("TOP", i32::MAX);

    /// Bottom-most layer for backdrops
    pub const BACKGROUND: Self = Self::new("BACKGROUND", 0);

    /// Create a named layer
    pub const fn new(name: &'static str, index: i32) -> Self {
        Self { name, index }
    }

    /// Layer label
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Ordering index, higher is drawn later
    pub const fn index(&self) -> i32 {
        self.index
    }
}

impl Default for RenderLayer {
    fn default() -> Self {
        Self::TOP
    }
}

impl PartialEq for RenderLayer {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for RenderLayer {}

impl PartialOrd for RenderLayer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RenderLayer {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index.cmp(&other.index)
    }
}

impl Hash for RenderLayer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl fmt::Display for RenderLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.index)
    }
}
