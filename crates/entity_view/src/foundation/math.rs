//! Math utilities and types
//!
//! Provides the 2D math types used by views and scene nodes. Coordinates are
//! `f64` screen units with the Y axis pointing down, rotations are degrees
//! clockwise as seen on screen.

pub use nalgebra::{Matrix3, Vector2};

/// 2D vector type
pub type Vec2 = Vector2<f64>;

/// 3x3 homogeneous matrix for 2D affine transforms
pub type Mat3 = Matrix3<f64>;

/// 2D point type
pub type Point2 = nalgebra::Point2<f64>;

/// A single entry of a node's transform list
///
/// Entries are applied in list order after the node's own translation and
/// rotation, i.e. the first entry is the outermost of the list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform2D {
    /// Non-uniform scale about a pivot point
    Scale {
        /// Horizontal factor
        x: f64,
        /// Vertical factor
        y: f64,
        /// Fixed point of the scale
        pivot: Point2,
    },
    /// Rotation in degrees about a pivot point
    Rotate {
        /// Angle in degrees
        angle: f64,
        /// Fixed point of the rotation
        pivot: Point2,
    },
    /// Plain translation
    Translate {
        /// Horizontal offset
        x: f64,
        /// Vertical offset
        y: f64,
    },
}

impl Transform2D {
    /// Horizontal mirror about the vertical line `x = line_x`
    pub fn mirror_x(line_x: f64) -> Self {
        Self::Scale {
            x: -1.0,
            y: 1.0,
            pivot: Point2::new(line_x, 0.0),
        }
    }

    /// Convert to a homogeneous matrix
    pub fn to_matrix(&self) -> Mat3 {
        match *self {
            Self::Scale { x, y, pivot } => {
                Mat3::new_nonuniform_scaling_wrt_point(&Vec2::new(x, y), &pivot)
            }
            Self::Rotate { angle, pivot } => rotation_about(angle, pivot),
            Self::Translate { x, y } => Mat3::new_translation(&Vec2::new(x, y)),
        }
    }
}

/// Rotation by `degrees` about `pivot`
pub fn rotation_about(degrees: f64, pivot: Point2) -> Mat3 {
    let to_origin = Mat3::new_translation(&-pivot.coords);
    let back = Mat3::new_translation(&pivot.coords);
    back * Mat3::new_rotation(degrees.to_radians()) * to_origin
}

/// Axis-aligned rectangle in local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Left edge
    pub min_x: f64,
    /// Top edge
    pub min_y: f64,
    /// Right edge
    pub max_x: f64,
    /// Bottom edge
    pub max_y: f64,
}

impl Bounds {
    /// Create bounds from a top-left corner and a size
    pub fn from_origin_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x + width,
            max_y: y + height,
        }
    }

    /// Width of the bounds
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounds
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Center point
    pub fn center(&self) -> Point2 {
        Point2::new(
            (self.min_x + self.max_x) * 0.5,
            (self.min_y + self.max_y) * 0.5,
        )
    }

    /// Smallest bounds containing both `self` and `other`
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mirror_about_line() {
        let m = Transform2D::mirror_x(10.0).to_matrix();
        let p = m.transform_point(&Point2::new(4.0, 7.0));
        assert_relative_eq!(p.x, 16.0, epsilon = 1e-9);
        assert_relative_eq!(p.y, 7.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rotation_about_pivot() {
        let m = rotation_about(90.0, Point2::new(1.0, 1.0));
        let p = m.transform_point(&Point2::new(2.0, 1.0));
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-9);
        assert_relative_eq!(p.y, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bounds_union() {
        let a = Bounds::from_origin_size(0.0, 0.0, 10.0, 5.0);
        let b = Bounds::from_origin_size(-2.0, 3.0, 4.0, 4.0);
        let u = a.union(&b);
        assert_eq!(u.min_x, -2.0);
        assert_eq!(u.max_y, 7.0);
        assert_eq!(u.width(), 12.0);
        assert_eq!(u.center(), Point2::new(4.0, 3.5));
    }
}
