//! Scene containers holding views
//!
//! A container is anything a view can name as its parent. Removal is a
//! separate capability queried with [`SceneParent::as_child_removal`]; a
//! container without it can still hold views but can't let them detach.

use super::render_layer::RenderLayer;
use crate::view::{View, ViewError, ViewResult, ViewState};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Something a view can be attached to
pub trait SceneParent {
    /// Short label for logs
    fn kind(&self) -> &str;

    /// The child-removal capability, if this container has it
    fn as_child_removal(&self) -> Option<&dyn ChildRemoval> {
        None
    }
}

/// Capability to drop a child view
pub trait ChildRemoval {
    /// Remove `child`, returns false if it wasn't a child
    fn remove_child(&self, child: &View) -> bool;
}

/// Generic ordered group of views
///
/// Views keep insertion order; [`Group::draw_order`] sorts them by render
/// layer, ties keeping insertion order.
pub struct Group {
    name: String,
    children: RefCell<Vec<View>>,
}

impl Group {
    /// Create an empty group
    pub fn new(name: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            children: RefCell::new(Vec::new()),
        })
    }

    /// Group label
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adopt a view, taking it away from its previous parent if that parent
    /// supports removal
    ///
    /// A previous parent without removal keeps listing the view; this is
    /// logged as a warning.
    ///
    /// # Errors
    /// [`ViewError::Detached`] if the view has been detached.
    pub fn add_view(self: &Rc<Self>, view: &View) -> ViewResult<()> {
        if view.state() == ViewState::Detached {
            return Err(ViewError::Detached(self.name.clone()));
        }
        if self.contains(view) {
            return Ok(());
        }

        if let Some(previous) = view.parent() {
            match previous.as_child_removal() {
                Some(removal) => {
                    removal.remove_child(view);
                }
                None => log::warn!(
                    "Group {} adopted a view still listed by {}, which can't remove children",
                    self.name,
                    previous.kind()
                ),
            }
        }

        self.children.borrow_mut().push(view.clone());
        let parent: Rc<dyn SceneParent> = self.clone();
        view.set_parent(Some(Rc::downgrade(&parent)));
        log::debug!("Added view to group {}", self.name);
        Ok(())
    }

    /// Whether `view` is a child of this group
    pub fn contains(&self, view: &View) -> bool {
        self.children.borrow().iter().any(|child| child.ptr_eq(view))
    }

    /// Children in insertion order
    pub fn views(&self) -> Vec<View> {
        self.children.borrow().clone()
    }

    /// Children back to front: ascending render layer, stable for ties
    pub fn draw_order(&self) -> Vec<View> {
        let mut views = self.views();
        views.sort_by_key(View::render_layer);
        views
    }

    /// Children grouped by layer, back to front
    pub fn layers(&self) -> Vec<(RenderLayer, Vec<View>)> {
        let mut buckets: Vec<(RenderLayer, Vec<View>)> = Vec::new();
        for view in self.draw_order() {
            let layer = view.render_layer();
            match buckets.last_mut() {
                Some((last, views)) if *last == layer => views.push(view),
                _ => buckets.push((layer, vec![view])),
            }
        }
        buckets
    }

    /// Number of children
    pub fn len(&self) -> usize {
        self.children.borrow().len()
    }

    /// Whether the group has no children
    pub fn is_empty(&self) -> bool {
        self.children.borrow().is_empty()
    }
}

impl SceneParent for Group {
    fn kind(&self) -> &str {
        "Group"
    }

    fn as_child_removal(&self) -> Option<&dyn ChildRemoval> {
        Some(self)
    }
}

impl ChildRemoval for Group {
    fn remove_child(&self, child: &View) -> bool {
        let removed = {
            let mut children = self.children.borrow_mut();
            let Some(index) = children.iter().position(|v| v.ptr_eq(child)) else {
                return false;
            };
            children.remove(index)
        };
        removed.set_parent(None);
        true
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("children", &self.children.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;
    use crate::scene::NodeHandle;

    fn view() -> View {
        View::new(Rc::new(Entity::new("test")))
    }

    #[test]
    fn test_add_sets_parent() {
        let group = Group::new("world");
        let v = view();
        group.add_view(&v).unwrap();
        group.add_view(&v).unwrap();

        assert_eq!(group.len(), 1);
        assert_eq!(v.parent().map(|p| p.kind().to_string()), Some("Group".to_string()));
    }

    #[test]
    fn test_reparenting_moves_view() {
        let a = Group::new("a");
        let b = Group::new("b");
        let v = view();
        a.add_view(&v).unwrap();
        b.add_view(&v).unwrap();

        assert!(a.is_empty());
        assert!(b.contains(&v));
    }

    #[test]
    fn test_remove_child_clears_parent() {
        let group = Group::new("world");
        let v = view();
        group.add_view(&v).unwrap();

        assert!(group.remove_child(&v));
        assert!(!group.remove_child(&v));
        assert!(v.parent().is_none());
    }

    #[test]
    fn test_detached_view_is_rejected() {
        let group = Group::new("world");
        let v = View::with_graphic_in(
            &crate::view::ViewContext::default(),
            Rc::new(Entity::new("test")),
            NodeHandle::rectangle(1.0, 1.0),
        );
        v.detach();
        assert_eq!(group.add_view(&v), Err(ViewError::Detached("world".to_string())));
    }

    #[test]
    fn test_draw_order_by_layer_then_insertion() {
        let group = Group::new("world");
        let background = view();
        let first_unit = view();
        let top = view();
        let second_unit = view();
        let units = RenderLayer::new("UNITS", 5);

        background.set_render_layer(RenderLayer::BACKGROUND).unwrap();
        first_unit.set_render_layer(units).unwrap();
        second_unit.set_render_layer(units).unwrap();

        for v in [&top, &first_unit, &second_unit, &background] {
            group.add_view(v).unwrap();
        }

        let order = group.draw_order();
        assert_eq!(order, vec![background, first_unit.clone(), second_unit.clone(), top]);

        let layers = group.layers();
        assert_eq!(layers.len(), 3);
        assert_eq!(layers[1].0, units);
        assert_eq!(layers[1].1, vec![first_unit, second_unit]);
    }
}
