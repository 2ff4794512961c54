//! Hit box records

use crate::foundation::math::Bounds;

/// Named axis-aligned collision box in entity-local coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct HitBox {
    name: String,
    bounds: Bounds,
}

impl HitBox {
    /// Create a hit box from its top-left corner and size
    pub fn new(name: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            bounds: Bounds::from_origin_size(x, y, width, height),
        }
    }

    /// Hit box label
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Local bounds
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}
