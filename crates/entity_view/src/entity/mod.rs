//! Entity state consumed by views
//!
//! Views never own or mutate an entity; they read its properties and
//! subscribe to its change notifications. [`EntityProperties`] is the
//! capability a view needs, [`Entity`] is the stock implementation.
//!
//! Listeners registered on an entity must not hold a strong reference back to
//! that entity, otherwise the entity can never be dropped.

mod hitbox;

pub use hitbox::HitBox;

use crate::foundation::observable::{ObservableList, Property};
use std::cell::Cell;
use std::fmt;

/// Observable entity state a view binds to
pub trait EntityProperties {
    /// Horizontal position
    fn x_property(&self) -> &Property<f64>;

    /// Vertical position
    fn y_property(&self) -> &Property<f64>;

    /// Rotation in degrees
    fn rotation_property(&self) -> &Property<f64>;

    /// Whether the entity is live in the game world
    fn active_property(&self) -> &Property<bool>;

    /// Whether the entity is mirrored horizontally
    fn x_flipped_property(&self) -> &Property<bool>;

    /// Local x coordinate of the vertical line the entity is mirrored about
    fn x_flip_line(&self) -> f64;

    /// Current width
    fn width(&self) -> f64;

    /// Current height
    fn height(&self) -> f64;

    /// Collision shapes of the entity
    fn hit_boxes(&self) -> &ObservableList<HitBox>;

    /// Current horizontal position
    fn x(&self) -> f64 {
        self.x_property().get()
    }

    /// Current vertical position
    fn y(&self) -> f64 {
        self.y_property().get()
    }

    /// Current rotation in degrees
    fn rotation(&self) -> f64 {
        self.rotation_property().get()
    }

    /// Whether the entity is currently active
    fn is_active(&self) -> bool {
        self.active_property().get()
    }

    /// Whether the entity is currently mirrored
    fn is_x_flipped(&self) -> bool {
        self.x_flipped_property().get()
    }
}

/// Plain game entity with observable transform and lifecycle state
pub struct Entity {
    type_name: String,
    x: Property<f64>,
    y: Property<f64>,
    rotation: Property<f64>,
    active: Property<bool>,
    x_flipped: Property<bool>,
    x_flip_line: Cell<f64>,
    width: Cell<f64>,
    height: Cell<f64>,
    hit_boxes: ObservableList<HitBox>,
}

impl Entity {
    /// Create an inactive entity of the given type at the origin
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            x: Property::new(0.0),
            y: Property::new(0.0),
            rotation: Property::new(0.0),
            active: Property::new(false),
            x_flipped: Property::new(false),
            x_flip_line: Cell::new(0.0),
            width: Cell::new(0.0),
            height: Cell::new(0.0),
            hit_boxes: ObservableList::new(),
        }
    }

    /// Entity type label
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Set the horizontal position
    pub fn set_x(&self, x: f64) {
        self.x.set(x);
    }

    /// Set the vertical position
    pub fn set_y(&self, y: f64) {
        self.y.set(y);
    }

    /// Set both coordinates
    pub fn set_position(&self, x: f64, y: f64) {
        self.x.set(x);
        self.y.set(y);
    }

    /// Move by an offset
    pub fn translate(&self, dx: f64, dy: f64) {
        self.set_position(self.x.get() + dx, self.y.get() + dy);
    }

    /// Set the rotation in degrees
    pub fn set_rotation(&self, degrees: f64) {
        self.rotation.set(degrees);
    }

    /// Rotate by an offset in degrees
    pub fn rotate_by(&self, degrees: f64) {
        self.rotation.set(self.rotation.get() + degrees);
    }

    /// Activate or deactivate the entity
    pub fn set_active(&self, active: bool) {
        self.active.set(active);
    }

    /// Mirror or un-mirror the entity
    pub fn set_x_flipped(&self, flipped: bool) {
        self.x_flipped.set(flipped);
    }

    /// Set the mirror line, read when the entity is next flipped
    pub fn set_x_flip_line(&self, line_x: f64) {
        self.x_flip_line.set(line_x);
    }

    /// Set the entity size without touching its hit boxes
    pub fn set_size(&self, width: f64, height: f64) {
        self.width.set(width);
        self.height.set(height);
    }

    /// Add a hit box, growing the entity so it covers the box
    pub fn add_hit_box(&self, hit_box: HitBox) {
        let bounds = hit_box.bounds();
        self.width.set(self.width.get().max(bounds.max_x));
        self.height.set(self.height.get().max(bounds.max_y));
        self.hit_boxes.push(hit_box);
    }

    /// Remove the first hit box with the given name
    pub fn remove_hit_box(&self, name: &str) -> Option<HitBox> {
        let index = self
            .hit_boxes
            .with_items(|boxes| boxes.iter().position(|b| b.name() == name))?;
        self.hit_boxes.remove(index)
    }

    /// Remove every hit box, the size is left unchanged
    pub fn clear_hit_boxes(&self) {
        self.hit_boxes.clear();
    }
}

impl EntityProperties for Entity {
    fn x_property(&self) -> &Property<f64> {
        &self.x
    }

    fn y_property(&self) -> &Property<f64> {
        &self.y
    }

    fn rotation_property(&self) -> &Property<f64> {
        &self.rotation
    }

    fn active_property(&self) -> &Property<bool> {
        &self.active
    }

    fn x_flipped_property(&self) -> &Property<bool> {
        &self.x_flipped
    }

    fn x_flip_line(&self) -> f64 {
        self.x_flip_line.get()
    }

    fn width(&self) -> f64 {
        self.width.get()
    }

    fn height(&self) -> f64 {
        self.height.get()
    }

    fn hit_boxes(&self) -> &ObservableList<HitBox> {
        &self.hit_boxes
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("type_name", &self.type_name)
            .field("x", &self.x.get())
            .field("y", &self.y.get())
            .field("rotation", &self.rotation.get())
            .field("active", &self.active.get())
            .field("x_flipped", &self.x_flipped.get())
            .field("size", &(self.width.get(), self.height.get()))
            .finish_non_exhaustive()
    }
}
