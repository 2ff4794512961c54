//! # Entity View
//!
//! Scene-graph views bound to game entity state.
//!
//! ## Features
//!
//! - **Transform binding**: position, rotation and horizontal flip follow the entity
//! - **Lifecycle**: views take themselves out of the scene when their entity deactivates
//! - **Render layers**: draw order hint read by scene containers
//! - **Debug overlay**: optional bounding box per view
//!
//! ## Quick Start
//!
//! ```rust
//! use entity_view::prelude::*;
//! use std::rc::Rc;
//!
//! let world = Group::new("world");
//! let ship = Rc::new(Entity::new("ship"));
//! let view = View::with_graphic(ship.clone(), NodeHandle::rectangle(40.0, 20.0));
//! world.add_view(&view).unwrap();
//!
//! ship.set_active(true);
//! ship.set_position(100.0, 50.0);
//! assert_eq!(view.translate().x, 100.0);
//!
//! ship.set_active(false);
//! assert!(world.is_empty());
//! ```
//!
//! Everything here is single-threaded (`Rc`/`RefCell`); entity changes are
//! delivered to views synchronously.

pub mod config;
pub mod entity;
pub mod foundation;
pub mod scene;
pub mod view;

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, ViewConfig},
        entity::{Entity, EntityProperties, HitBox},
        foundation::{
            color::Color,
            math::{Point2, Transform2D, Vec2},
        },
        scene::{ChildRemoval, Group, NodeHandle, RenderLayer, SceneParent, Shape},
        view::{
            debug_bounding_box, enable_debug_bounding_box, DetachOutcome, View, ViewContext,
            ViewError, ViewState,
        },
    };
}
