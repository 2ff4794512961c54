//! Drawable scene nodes
//!
//! Nodes are shared handles: the same [`NodeHandle`] can be held by a view and
//! by the code that created it, and edits through either are visible to both.
//! Identity (not structural equality) decides whether two handles are the same
//! node.

use crate::foundation::color::Color;
use crate::foundation::math::{Bounds, Point2};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Geometry of a drawable node in the node's local coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Axis-aligned rectangle anchored at its top-left corner
    Rectangle {
        /// Left edge
        x: f64,
        /// Top edge
        y: f64,
        /// Width
        width: f64,
        /// Height
        height: f64,
    },
    /// Circle anchored at its center
    Circle {
        /// Center point
        center: Point2,
        /// Radius
        radius: f64,
    },
    /// Textured quad anchored at its top-left corner
    Sprite {
        /// Texture name, resolved by the renderer
        texture: String,
        /// Left edge
        x: f64,
        /// Top edge
        y: f64,
        /// Width
        width: f64,
        /// Height
        height: f64,
    },
}

impl Shape {
    /// Local bounds of the geometry, stroke excluded
    pub fn bounds(&self) -> Bounds {
        match self {
            Self::Rectangle { x, y, width, height } | Self::Sprite { x, y, width, height, .. } => {
                Bounds::from_origin_size(*x, *y, *width, *height)
            }
            Self::Circle { center, radius } => Bounds {
                min_x: center.x - radius,
                min_y: center.y - radius,
                max_x: center.x + radius,
                max_y: center.y + radius,
            },
        }
    }
}

/// A drawable leaf of the scene graph
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Geometry
    pub shape: Shape,
    /// Interior paint, `None` for an outline-only shape
    pub fill: Option<Color>,
    /// Outline paint, `None` for no outline
    pub stroke: Option<Color>,
    /// Outline width in screen units
    pub stroke_width: f64,
    /// Whether the renderer should draw this node
    pub visible: bool,
}

impl Node {
    fn new(shape: Shape) -> Self {
        Self {
            shape,
            fill: Some(Color::BLACK),
            stroke: None,
            stroke_width: 1.0,
            visible: true,
        }
    }
}

/// Shared handle to a [`Node`]
#[derive(Clone)]
pub struct NodeHandle(Rc<RefCell<Node>>);

impl NodeHandle {
    /// Wrap an existing node
    pub fn from_node(node: Node) -> Self {
        Self(Rc::new(RefCell::new(node)))
    }

    /// Filled rectangle at the origin
    pub fn rectangle(width: f64, height: f64) -> Self {
        Self::from_node(Node::new(Shape::Rectangle {
            x: 0.0,
            y: 0.0,
            width,
            height,
        }))
    }

    /// Filled circle centered at the origin
    pub fn circle(radius: f64) -> Self {
        Self::from_node(Node::new(Shape::Circle {
            center: Point2::origin(),
            radius,
        }))
    }

    /// Sprite of the given size at the origin
    pub fn sprite(texture: impl Into<String>, width: f64, height: f64) -> Self {
        Self::from_node(Node::new(Shape::Sprite {
            texture: texture.into(),
            x: 0.0,
            y: 0.0,
            width,
            height,
        }))
    }

    /// Builder pattern: set the fill paint
    pub fn with_fill(self, fill: Option<Color>) -> Self {
        self.0.borrow_mut().fill = fill;
        self
    }

    /// Builder pattern: set the outline paint
    pub fn with_stroke(self, stroke: Option<Color>) -> Self {
        self.0.borrow_mut().stroke = stroke;
        self
    }

    /// Copy of the node's current state
    pub fn snapshot(&self) -> Node {
        self.0.borrow().clone()
    }

    /// Copy of the node's geometry
    pub fn shape(&self) -> Shape {
        self.0.borrow().shape.clone()
    }

    /// Local bounds of the node
    pub fn bounds(&self) -> Bounds {
        self.0.borrow().shape.bounds()
    }

    /// Radius if this node is a circle
    pub fn circle_radius(&self) -> Option<f64> {
        match self.0.borrow().shape {
            Shape::Circle { radius, .. } => Some(radius),
            _ => None,
        }
    }

    /// Move a circle's center, ignored for other shapes
    pub fn set_center(&self, point: Point2) {
        if let Shape::Circle { center, .. } = &mut self.0.borrow_mut().shape {
            *center = point;
        }
    }

    /// Resize a rectangle or sprite, ignored for circles
    pub fn set_size(&self, new_width: f64, new_height: f64) {
        match &mut self.0.borrow_mut().shape {
            Shape::Rectangle { width, height, .. } | Shape::Sprite { width, height, .. } => {
                *width = new_width;
                *height = new_height;
            }
            Shape::Circle { .. } => {}
        }
    }

    /// Apply an arbitrary edit to the node
    pub fn update(&self, f: impl FnOnce(&mut Node)) {
        f(&mut self.0.borrow_mut());
    }

    /// Whether both handles refer to the same node
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for NodeHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for NodeHandle {}

impl fmt::Debug for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeHandle").field(&*self.0.borrow()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_compare_by_identity() {
        let a = NodeHandle::rectangle(10.0, 10.0);
        let b = NodeHandle::rectangle(10.0, 10.0);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_circle_bounds_follow_center() {
        let c = NodeHandle::circle(5.0);
        assert_eq!(c.bounds().min_x, -5.0);
        c.set_center(Point2::new(5.0, 5.0));
        let b = c.bounds();
        assert_eq!((b.min_x, b.min_y, b.max_x, b.max_y), (0.0, 0.0, 10.0, 10.0));
        assert_eq!(c.circle_radius(), Some(5.0));
    }

    #[test]
    fn test_set_size_ignores_circles() {
        let r = NodeHandle::sprite("ship", 4.0, 2.0);
        r.set_size(8.0, 6.0);
        assert_eq!(r.bounds().width(), 8.0);
        assert_eq!(r.circle_radius(), None);

        let c = NodeHandle::circle(3.0);
        c.set_size(100.0, 100.0);
        assert_eq!(c.bounds().width(), 6.0);
    }
}
