//! View binding and lifecycle tests

use super::*;
use crate::entity::{Entity, HitBox};
use crate::foundation::color::Color;
use crate::scene::{ChildRemoval, Group, Shape};
use approx::assert_relative_eq;
use std::cell::Cell;

fn entity() -> Rc<Entity> {
    Rc::new(Entity::new("test"))
}

fn plain() -> ViewContext {
    ViewContext::default()
}

fn with_overlay(color: Color) -> ViewContext {
    ViewContext::default().with_debug_overlay(DebugOverlayConfig::enabled(color))
}

/// Parent that can hold views but can't remove them
struct FrozenLayer;

impl SceneParent for FrozenLayer {
    fn kind(&self) -> &str {
        "FrozenLayer"
    }
}

/// Parent counting removal requests
#[derive(Default)]
struct CountingParent {
    removals: Cell<usize>,
}

impl SceneParent for CountingParent {
    fn kind(&self) -> &str {
        "CountingParent"
    }

    fn as_child_removal(&self) -> Option<&dyn ChildRemoval> {
        Some(self)
    }
}

impl ChildRemoval for CountingParent {
    fn remove_child(&self, _child: &View) -> bool {
        self.removals.set(self.removals.get() + 1);
        true
    }
}

fn attach<P: SceneParent + 'static>(view: &View, parent: &Rc<P>) {
    let parent: Rc<dyn SceneParent> = parent.clone();
    view.set_parent(Some(Rc::downgrade(&parent)));
}

#[test]
fn test_transform_follows_entity() {
    let e = entity();
    e.set_position(3.0, 4.0);
    e.set_rotation(15.0);
    let view = View::with_graphic_in(&plain(), e.clone(), NodeHandle::rectangle(10.0, 10.0));

    assert!(view.is_transform_bound());
    assert_eq!(view.translate(), Vec2::new(3.0, 4.0));
    assert_eq!(view.rotation(), 15.0);

    for (x, y, r) in [(10.0, -2.0, 90.0), (0.5, 0.25, -45.0), (-100.0, 7.0, 720.0)] {
        e.set_position(x, y);
        e.set_rotation(r);
        assert_eq!(view.translate(), Vec2::new(x, y));
        assert_eq!(view.rotation(), r);
    }

    e.translate(1.0, 1.0);
    assert_eq!(view.translate(), Vec2::new(-99.0, 8.0));
}

#[test]
fn test_binding_never_writes_back() {
    let e = entity();
    let view = View::with_graphic_in(&plain(), e.clone(), NodeHandle::rectangle(1.0, 1.0));
    view.push_transform(Transform2D::Translate { x: 5.0, y: 5.0 });

    assert_eq!((e.x(), e.y()), (0.0, 0.0));
    assert_eq!(e.x_property().listener_count(), 1);
}

#[test]
fn test_flip_mirrors_about_flip_line() {
    let e = entity();
    e.set_x_flip_line(20.0);
    let view = View::with_graphic_in(&plain(), e.clone(), NodeHandle::rectangle(40.0, 10.0));

    e.set_x_flipped(true);
    assert_eq!(view.transforms(), vec![Transform2D::mirror_x(20.0)]);

    let p = view.local_matrix().transform_point(&Point2::new(0.0, 3.0));
    assert_relative_eq!(p.x, 40.0, epsilon = 1e-9);
    assert_relative_eq!(p.y, 3.0, epsilon = 1e-9);
}

#[test]
fn test_flip_replaces_existing_transforms() {
    let e = entity();
    let view = View::with_graphic_in(&plain(), e.clone(), NodeHandle::rectangle(4.0, 4.0));
    view.push_transform(Transform2D::Translate { x: 1.0, y: 2.0 });

    e.set_x_flipped(true);
    assert_eq!(view.transforms(), vec![Transform2D::mirror_x(0.0)]);
}

#[test]
fn test_unflip_clears_all_transforms() {
    let e = entity();
    let view = View::with_graphic_in(&plain(), e.clone(), NodeHandle::rectangle(4.0, 4.0));

    e.set_x_flipped(true);
    view.push_transform(Transform2D::Rotate {
        angle: 30.0,
        pivot: Point2::origin(),
    });
    assert_eq!(view.transforms().len(), 2);

    e.set_x_flipped(false);
    assert!(view.transforms().is_empty());
}

#[test]
fn test_flipped_before_binding_waits_for_notification() {
    let e = entity();
    e.set_x_flip_line(8.0);
    e.set_x_flipped(true);
    let view = View::with_graphic_in(&plain(), e.clone(), NodeHandle::rectangle(16.0, 16.0));
    assert!(view.transforms().is_empty());

    e.set_x_flipped(false);
    assert!(view.transforms().is_empty());
    e.set_x_flipped(true);
    assert_eq!(view.transforms(), vec![Transform2D::mirror_x(8.0)]);
}

#[test]
fn test_add_node_recenters_circles_only() {
    let view = View::new(entity());
    let circle = NodeHandle::circle(6.0);
    let rect = NodeHandle::rectangle(5.0, 5.0);
    rect.update(|node| {
        node.shape = Shape::Rectangle {
            x: 2.0,
            y: 3.0,
            width: 5.0,
            height: 5.0,
        };
    });

    view.add_node(circle.clone());
    view.add_node(rect.clone());

    assert_eq!(
        circle.shape(),
        Shape::Circle {
            center: Point2::new(6.0, 6.0),
            radius: 6.0
        }
    );
    assert_eq!(rect.bounds().min_x, 2.0);
    assert_eq!(rect.bounds().min_y, 3.0);
    assert_eq!(view.children(), vec![circle, rect]);
}

#[test]
fn test_remove_node() {
    let view = View::new(entity());
    let a = NodeHandle::rectangle(1.0, 1.0);
    let b = NodeHandle::rectangle(1.0, 1.0);
    view.add_node(a.clone());

    assert!(!view.remove_node(&b));
    assert_eq!(view.child_count(), 1);
    assert!(view.remove_node(&a));
    assert!(!view.remove_node(&a));
    assert_eq!(view.child_count(), 0);
}

#[test]
fn test_detach_is_idempotent() {
    let group = Group::new("world");
    let view = View::with_graphic_in(&plain(), entity(), NodeHandle::rectangle(2.0, 2.0));
    group.add_view(&view).unwrap();

    assert_eq!(view.detach(), DetachOutcome::Removed);
    assert_eq!(view.child_count(), 0);
    assert!(view.parent().is_none());
    assert!(group.is_empty());

    assert_eq!(view.detach(), DetachOutcome::AlreadyDetached);
    assert_eq!(view.child_count(), 0);
    assert!(view.parent().is_none());
    assert_eq!(view.state(), ViewState::Detached);
}

#[test]
fn test_detach_with_incompatible_parent() {
    let frozen = Rc::new(FrozenLayer);
    let view = View::with_graphic_in(&plain(), entity(), NodeHandle::circle(3.0));
    attach(&view, &frozen);

    assert_eq!(view.detach(), DetachOutcome::IncompatibleParent);
    assert_eq!(view.child_count(), 0);
    assert_eq!(view.parent().map(|p| p.kind().to_string()), Some("FrozenLayer".to_string()));
    assert_eq!(view.detach(), DetachOutcome::AlreadyDetached);
    assert!(view.parent().is_some());
}

#[test]
fn test_detach_without_parent() {
    let view = View::with_graphic_in(&plain(), entity(), NodeHandle::rectangle(2.0, 2.0));
    assert_eq!(view.detach(), DetachOutcome::NoParent);
    assert_eq!(view.child_count(), 0);
}

#[test]
fn test_detach_with_dropped_parent() {
    let group = Group::new("short-lived");
    let view = View::with_graphic_in(&plain(), entity(), NodeHandle::rectangle(2.0, 2.0));
    group.add_view(&view).unwrap();
    drop(group);

    assert_eq!(view.detach(), DetachOutcome::NoParent);
}

#[test]
fn test_render_layer_only_changes_while_inactive() {
    let e = entity();
    let view = View::with_graphic_in(&plain(), e.clone(), NodeHandle::rectangle(1.0, 1.0));
    assert_eq!(view.render_layer(), RenderLayer::TOP);

    let ground = RenderLayer::new("GROUND", 1);
    view.set_render_layer(ground).unwrap();
    assert_eq!(view.render_layer(), ground);

    e.set_active(true);
    let result = view.set_render_layer(RenderLayer::BACKGROUND);
    assert!(matches!(result, Err(ViewError::InvalidState(_))));
    assert_eq!(view.render_layer(), ground);
}

#[test]
fn test_debug_overlay_sized_to_entity() {
    let e = entity();
    e.set_size(24.0, 12.0);
    let graphic = NodeHandle::sprite("ship", 24.0, 12.0);
    let view = View::with_graphic_in(&with_overlay(Color::RED), e.clone(), graphic.clone());

    let children = view.children();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0], graphic);

    let outline = children[1].snapshot();
    assert_eq!(outline.fill, None);
    assert_eq!(outline.stroke, Some(Color::RED));
    assert_eq!(outline.shape.bounds().width(), 24.0);
    assert_eq!(outline.shape.bounds().height(), 12.0);
    assert_eq!(view.debug_overlay(), Some(children[1].clone()));
}

#[test]
fn test_debug_overlay_follows_hit_box_edits() {
    let e = entity();
    let view = View::with_graphic_in(
        &with_overlay(Color::GREEN),
        e.clone(),
        NodeHandle::rectangle(1.0, 1.0),
    );
    let outline = view.debug_overlay().unwrap();

    e.add_hit_box(HitBox::new("body", 0.0, 0.0, 30.0, 10.0));
    assert_eq!(outline.bounds().width(), 30.0);
    assert_eq!(outline.bounds().height(), 10.0);

    // size changed without a hit box edit is not seen until the next edit
    e.set_size(64.0, 48.0);
    assert_eq!(outline.bounds().width(), 30.0);

    e.remove_hit_box("body");
    assert_eq!(outline.bounds().width(), 64.0);
    assert_eq!(outline.bounds().height(), 48.0);
}

#[test]
fn test_no_overlay_when_disabled() {
    let e = entity();
    e.set_size(10.0, 10.0);
    let view = View::with_graphic_in(&plain(), e.clone(), NodeHandle::rectangle(10.0, 10.0));

    assert_eq!(view.child_count(), 1);
    assert!(view.debug_overlay().is_none());
    assert_eq!(e.hit_boxes().listener_count(), 0);
}

#[test]
fn test_deactivation_detaches_exactly_once() {
    let e = entity();
    let parent = Rc::new(CountingParent::default());
    let view = View::with_graphic_in(&plain(), e.clone(), NodeHandle::rectangle(1.0, 1.0));
    attach(&view, &parent);
    assert_eq!(view.state(), ViewState::Unattached);

    e.set_active(true);
    assert_eq!(view.state(), ViewState::Active);
    assert_eq!(parent.removals.get(), 0);

    e.set_active(false);
    assert_eq!(view.state(), ViewState::Detached);
    assert_eq!(parent.removals.get(), 1);
    assert_eq!(view.child_count(), 0);

    e.set_active(true);
    e.set_active(false);
    assert_eq!(view.state(), ViewState::Detached);
    assert_eq!(parent.removals.get(), 1);
}

#[test]
fn test_view_of_active_entity_starts_active() {
    let e = entity();
    e.set_active(true);
    let view = View::new(e);
    assert_eq!(view.state(), ViewState::Active);
}

#[test]
fn test_deferred_view_is_not_bound() {
    let e = entity();
    let group = Group::new("world");
    let view = View::new(e.clone());
    group.add_view(&view).unwrap();
    view.add_node(NodeHandle::rectangle(3.0, 3.0));

    e.set_position(50.0, 60.0);
    e.set_x_flipped(true);
    assert!(!view.is_transform_bound());
    assert_eq!(view.translate(), Vec2::zeros());
    assert!(view.transforms().is_empty());

    e.set_active(true);
    e.set_active(false);
    assert!(group.is_empty());
    assert_eq!(view.child_count(), 0);
}

#[test]
fn test_deferred_view_ignores_overlay_setting() {
    let e = entity();
    let _bound =
        View::with_graphic_in(&with_overlay(Color::BLUE), e.clone(), NodeHandle::circle(1.0));
    let deferred = View::new(e.clone());

    assert_eq!(deferred.child_count(), 0);
    assert_eq!(e.hit_boxes().listener_count(), 1);
}

#[test]
fn test_local_matrix_rotates_about_bounds_center() {
    let e = entity();
    e.set_position(100.0, 0.0);
    e.set_rotation(180.0);
    let view = View::with_graphic_in(&plain(), e, NodeHandle::rectangle(10.0, 4.0));

    let m = view.local_matrix();
    let top_left = m.transform_point(&Point2::new(0.0, 0.0));
    assert_relative_eq!(top_left.x, 110.0, epsilon = 1e-9);
    assert_relative_eq!(top_left.y, 4.0, epsilon = 1e-9);
}

#[test]
fn test_dropping_view_removes_listeners() {
    let e = entity();
    let view = View::with_graphic_in(
        &with_overlay(Color::RED),
        e.clone(),
        NodeHandle::rectangle(1.0, 1.0),
    );
    assert_eq!(e.active_property().listener_count(), 1);
    assert_eq!(e.x_flipped_property().listener_count(), 1);

    drop(view);
    assert_eq!(e.x_property().listener_count(), 0);
    assert_eq!(e.y_property().listener_count(), 0);
    assert_eq!(e.rotation_property().listener_count(), 0);
    assert_eq!(e.x_flipped_property().listener_count(), 0);
    assert_eq!(e.active_property().listener_count(), 0);
    assert_eq!(e.hit_boxes().listener_count(), 0);
}

#[test]
fn test_group_owned_view_survives_until_detached() {
    let e = entity();
    let group = Group::new("world");
    {
        let view = View::with_graphic_in(&plain(), e.clone(), NodeHandle::rectangle(1.0, 1.0));
        group.add_view(&view).unwrap();
    }
    e.set_active(true);
    e.set_x(9.0);
    assert_eq!(group.views()[0].translate().x, 9.0);

    e.set_active(false);
    assert!(group.is_empty());
    assert_eq!(e.active_property().listener_count(), 0);
}
