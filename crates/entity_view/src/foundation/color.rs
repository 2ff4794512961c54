//! RGBA colors for fills, strokes and debug overlays

use serde::{Deserialize, Serialize};

/// Linear RGBA color with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl Color {
    /// Opaque black
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Opaque white
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Opaque red
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    /// Opaque green
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    /// Opaque blue
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);
    /// Fully transparent
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);

    /// Create a color from all four components
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}
