//! Scene graph building blocks
//!
//! Drawable leaf nodes, render layers, and the containers views are attached
//! to.

mod container;
mod node;
mod render_layer;

pub use container::{ChildRemoval, Group, SceneParent};
pub use node::{Node, NodeHandle, Shape};
pub use render_layer::RenderLayer;
