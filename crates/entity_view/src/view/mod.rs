//! Entity views
//!
//! A [`View`] is the drawable proxy of an entity. It owns an ordered list of
//! child nodes, mirrors the entity's position, rotation and flip into its own
//! transform, and takes itself out of the scene when the entity deactivates.
//!
//! ## Binding
//!
//! ```text
//! Entity property change
//!      ↓ (synchronous listener)
//! View transform state
//!      ↓ (read by the renderer)
//! Scene container
//! ```
//!
//! The binding is one-way: views read entity state and never write it.
//!
//! ## Lifecycle
//!
//! `Unattached` → `Active` → `Detached`. Entity activation moves a view to
//! `Active`, deactivation detaches it. `Detached` is terminal.

mod context;
mod debug_overlay;
mod error;

pub use context::ViewContext;
pub use debug_overlay::{debug_bounding_box, enable_debug_bounding_box, DebugOverlayConfig};
pub use error::{ViewError, ViewResult};

use crate::entity::EntityProperties;
use crate::foundation::color::Color;
use crate::foundation::math::{rotation_about, Bounds, Mat3, Point2, Transform2D, Vec2};
use crate::foundation::observable::ListenerKey;
use crate::scene::{NodeHandle, RenderLayer, SceneParent};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Where a view is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// Constructed, entity not yet activated
    Unattached,
    /// Entity is active
    Active,
    /// Children cleared and unlinked from the parent; terminal
    Detached,
}

/// What [`View::detach`] did with the parent link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetachOutcome {
    /// The parent container removed the view
    Removed,
    /// The view had no live parent container
    NoParent,
    /// The parent can't remove children; the view is still listed there
    IncompatibleParent,
    /// The view was already detached
    AlreadyDetached,
}

/// Entity listeners owned by a view, removed when the view is dropped
#[derive(Debug, Clone, Copy)]
enum Subscription {
    X(ListenerKey),
    Y(ListenerKey),
    Rotation(ListenerKey),
    Flipped(ListenerKey),
    Active(ListenerKey),
    HitBoxes(ListenerKey),
}

struct ViewInner {
    entity: Rc<dyn EntityProperties>,
    children: Vec<NodeHandle>,
    translate: Vec2,
    rotation: f64,
    transforms: Vec<Transform2D>,
    render_layer: RenderLayer,
    parent: Option<Weak<dyn SceneParent>>,
    state: ViewState,
    transform_bound: bool,
    debug_overlay: Option<NodeHandle>,
    subscriptions: Vec<Subscription>,
}

impl Drop for ViewInner {
    fn drop(&mut self) {
        let entity = &self.entity;
        for subscription in self.subscriptions.drain(..) {
            match subscription {
                Subscription::X(key) => entity.x_property().unsubscribe(key),
                Subscription::Y(key) => entity.y_property().unsubscribe(key),
                Subscription::Rotation(key) => entity.rotation_property().unsubscribe(key),
                Subscription::Flipped(key) => entity.x_flipped_property().unsubscribe(key),
                Subscription::Active(key) => entity.active_property().unsubscribe(key),
                Subscription::HitBoxes(key) => entity.hit_boxes().unsubscribe(key),
            };
        }
    }
}

/// Drawable proxy for an entity
///
/// `View` is a cheap shared handle; clones refer to the same view.
#[derive(Clone)]
pub struct View {
    inner: Rc<RefCell<ViewInner>>,
}

impl View {
    /// Deferred construction: no children and no transform binding
    ///
    /// Graphics can be added later with [`View::add_node`], but the view will
    /// not follow the entity's position, rotation or flip. Only the
    /// deactivation listener is installed.
    pub fn new(entity: Rc<dyn EntityProperties>) -> Self {
        let view = Self::unbound(entity);
        view.watch_active();
        view
    }

    /// Graphic-attached construction using the process-wide debug setting
    pub fn with_graphic(entity: Rc<dyn EntityProperties>, graphic: NodeHandle) -> Self {
        Self::with_graphic_in(&ViewContext::global(), entity, graphic)
    }

    /// Graphic-attached construction with explicit settings
    ///
    /// Adds `graphic`, adds the debug bounding box if the context enables it,
    /// binds the view's transform to the entity and installs the deactivation
    /// listener.
    pub fn with_graphic_in(
        context: &ViewContext,
        entity: Rc<dyn EntityProperties>,
        graphic: NodeHandle,
    ) -> Self {
        let view = Self::unbound(entity);
        view.add_node(graphic);

        if context.debug_overlay.enabled {
            view.install_debug_overlay(context.debug_overlay.color);
        }

        view.bind_transform();
        view.watch_active();
        view
    }

    fn unbound(entity: Rc<dyn EntityProperties>) -> Self {
        let state = if entity.is_active() {
            ViewState::Active
        } else {
            ViewState::Unattached
        };

        Self {
            inner: Rc::new(RefCell::new(ViewInner {
                entity,
                children: Vec::new(),
                translate: Vec2::zeros(),
                rotation: 0.0,
                transforms: Vec::new(),
                render_layer: RenderLayer::TOP,
                parent: None,
                state,
                transform_bound: false,
                debug_overlay: None,
                subscriptions: Vec::new(),
            })),
        }
    }

    fn downgrade(&self) -> Weak<RefCell<ViewInner>> {
        Rc::downgrade(&self.inner)
    }

    fn upgrade(weak: &Weak<RefCell<ViewInner>>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    fn install_debug_overlay(&self, color: Color) {
        let entity = self.entity();
        let overlay = debug_overlay::overlay_node(entity.as_ref(), color);
        self.add_node(overlay.clone());

        let key = debug_overlay::track_hit_boxes(
            entity.as_ref(),
            Rc::downgrade(&entity),
            overlay.clone(),
        );

        let mut inner = self.inner.borrow_mut();
        inner.debug_overlay = Some(overlay);
        inner.subscriptions.push(Subscription::HitBoxes(key));
    }

    /// Mirror translation, rotation and flip from the entity
    fn bind_transform(&self) {
        let entity = self.entity();
        let weak = self.downgrade();

        let x_key = entity.x_property().subscribe({
            let weak = weak.clone();
            move |_: &f64, &x: &f64| {
                if let Some(inner) = weak.upgrade() {
                    inner.borrow_mut().translate.x = x;
                }
            }
        });
        let y_key = entity.y_property().subscribe({
            let weak = weak.clone();
            move |_: &f64, &y: &f64| {
                if let Some(inner) = weak.upgrade() {
                    inner.borrow_mut().translate.y = y;
                }
            }
        });
        let rotation_key = entity.rotation_property().subscribe({
            let weak = weak.clone();
            move |_: &f64, &degrees: &f64| {
                if let Some(inner) = weak.upgrade() {
                    inner.borrow_mut().rotation = degrees;
                }
            }
        });
        let flipped_key = entity.x_flipped_property().subscribe(move |_, &flipped| {
            if let Some(view) = Self::upgrade(&weak) {
                view.apply_flip(flipped);
            }
        });

        {
            let mut inner = self.inner.borrow_mut();
            inner.translate = Vec2::new(entity.x(), entity.y());
            inner.rotation = entity.rotation();
            inner.transform_bound = true;
            inner.subscriptions.extend([
                Subscription::X(x_key),
                Subscription::Y(y_key),
                Subscription::Rotation(rotation_key),
                Subscription::Flipped(flipped_key),
            ]);
        }

        log::debug!(
            "Bound view transform to entity at ({}, {})",
            entity.x(),
            entity.y()
        );
    }

    /// Flipping replaces every transform with the mirror; un-flipping clears them all
    fn apply_flip(&self, flipped: bool) {
        let mut inner = self.inner.borrow_mut();
        if flipped {
            let line = inner.entity.x_flip_line();
            inner.transforms = vec![Transform2D::mirror_x(line)];
        } else {
            inner.transforms.clear();
        }
    }

    fn watch_active(&self) {
        let weak = self.downgrade();
        let key = self.entity().active_property().subscribe(move |_, &active| {
            let Some(view) = Self::upgrade(&weak) else {
                return;
            };
            if active {
                view.mark_active();
            } else {
                view.detach();
            }
        });
        self.inner
            .borrow_mut()
            .subscriptions
            .push(Subscription::Active(key));
    }

    fn mark_active(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.state == ViewState::Unattached {
            inner.state = ViewState::Active;
        }
    }

    /// Source entity of this view
    pub fn entity(&self) -> Rc<dyn EntityProperties> {
        Rc::clone(&self.inner.borrow().entity)
    }

    /// Append a child node
    ///
    /// Circles are recentered at `(radius, radius)` first so that, like
    /// rectangles, their top-left bounding corner sits at the view origin.
    pub fn add_node(&self, node: NodeHandle) {
        if let Some(radius) = node.circle_radius() {
            node.set_center(Point2::new(radius, radius));
        }
        self.inner.borrow_mut().children.push(node);
    }

    /// Remove a child node, returns false if it wasn't a child
    pub fn remove_node(&self, node: &NodeHandle) -> bool {
        let mut inner = self.inner.borrow_mut();
        let Some(index) = inner.children.iter().position(|child| child.ptr_eq(node)) else {
            return false;
        };
        inner.children.remove(index);
        true
    }

    /// Clear all children and remove this view from its parent container
    ///
    /// Never fails: a missing parent or one that can't remove children is
    /// logged as a warning and reported through the returned outcome. A parent
    /// that can't remove children stays linked since it still lists the view.
    /// Calling this on a detached view only clears children again.
    pub fn detach(&self) -> DetachOutcome {
        let (parent, was_detached) = {
            let mut inner = self.inner.borrow_mut();
            inner.children.clear();
            let was_detached = inner.state == ViewState::Detached;
            inner.state = ViewState::Detached;
            (inner.parent.take(), was_detached)
        };

        if was_detached {
            return DetachOutcome::AlreadyDetached;
        }

        let Some(parent) = parent.and_then(|weak| weak.upgrade()) else {
            log::warn!("View wasn't removed from scene because it has no parent");
            return DetachOutcome::NoParent;
        };

        match parent.as_child_removal() {
            Some(removal) => {
                removal.remove_child(self);
                log::debug!("View removed from {}", parent.kind());
                DetachOutcome::Removed
            }
            None => {
                log::warn!(
                    "View wasn't removed from scene because parent {} can't remove children",
                    parent.kind()
                );
                self.inner.borrow_mut().parent = Some(Rc::downgrade(&parent));
                DetachOutcome::IncompatibleParent
            }
        }
    }

    /// Set the render layer
    ///
    /// The layer decides how this view is drawn relative to others: higher
    /// indices are drawn on top. It can only change while the entity is
    /// inactive.
    ///
    /// # Errors
    /// [`ViewError::InvalidState`] if the entity is active.
    pub fn set_render_layer(&self, layer: RenderLayer) -> ViewResult<()> {
        let mut inner = self.inner.borrow_mut();
        if inner.entity.is_active() {
            return Err(ViewError::InvalidState(
                "Can't set render layer to active view".to_string(),
            ));
        }
        inner.render_layer = layer;
        Ok(())
    }

    /// Current render layer, [`RenderLayer::TOP`] unless set
    pub fn render_layer(&self) -> RenderLayer {
        self.inner.borrow().render_layer
    }

    /// Lifecycle state
    pub fn state(&self) -> ViewState {
        self.inner.borrow().state
    }

    /// Whether translation, rotation and flip follow the entity
    pub fn is_transform_bound(&self) -> bool {
        self.inner.borrow().transform_bound
    }

    /// Child nodes in draw order
    pub fn children(&self) -> Vec<NodeHandle> {
        self.inner.borrow().children.clone()
    }

    /// Number of child nodes
    pub fn child_count(&self) -> usize {
        self.inner.borrow().children.len()
    }

    /// The debug bounding box, if this view was built with one
    pub fn debug_overlay(&self) -> Option<NodeHandle> {
        self.inner.borrow().debug_overlay.clone()
    }

    /// Translation in parent coordinates
    pub fn translate(&self) -> Vec2 {
        self.inner.borrow().translate
    }

    /// Rotation in degrees about the center of the children's bounds
    pub fn rotation(&self) -> f64 {
        self.inner.borrow().rotation
    }

    /// Transform list applied after translation and rotation
    pub fn transforms(&self) -> Vec<Transform2D> {
        self.inner.borrow().transforms.clone()
    }

    /// Append to the transform list
    ///
    /// Un-flipping the entity clears the whole list, including entries added
    /// here.
    pub fn push_transform(&self, transform: Transform2D) {
        self.inner.borrow_mut().transforms.push(transform);
    }

    /// Union of the children's local bounds, `None` without children
    pub fn bounds(&self) -> Option<Bounds> {
        let inner = self.inner.borrow();
        inner
            .children
            .iter()
            .map(NodeHandle::bounds)
            .reduce(|acc, b| acc.union(&b))
    }

    /// Local-to-parent matrix
    ///
    /// `translate · rotate(about bounds center) · transforms[0] · transforms[1] · …`
    pub fn local_matrix(&self) -> Mat3 {
        let pivot = self.bounds().map_or_else(Point2::origin, |b| b.center());
        let inner = self.inner.borrow();
        let list = inner
            .transforms
            .iter()
            .fold(Mat3::identity(), |acc, t| acc * t.to_matrix());
        Mat3::new_translation(&inner.translate) * rotation_about(inner.rotation, pivot) * list
    }

    /// Parent container, if attached and still alive
    pub fn parent(&self) -> Option<Rc<dyn SceneParent>> {
        self.inner.borrow().parent.as_ref().and_then(Weak::upgrade)
    }

    /// Set or clear the parent link
    ///
    /// Called by containers when they adopt or release the view; it does not
    /// add the view to or remove it from any container.
    pub fn set_parent(&self, parent: Option<Weak<dyn SceneParent>>) {
        self.inner.borrow_mut().parent = parent;
    }

    /// Whether both handles refer to the same view
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for View {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for View {}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("View")
            .field("state", &inner.state)
            .field("children", &inner.children.len())
            .field("translate", &(inner.translate.x, inner.translate.y))
            .field("rotation", &inner.rotation)
            .field("render_layer", &inner.render_layer)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
