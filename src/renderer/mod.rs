//! Renderer-facing contract.
//!
//! This crate does not talk to a GPU API. A renderer consumes a [`Model`]
//! through three narrow surfaces:
//! - [`ResourceRegistry`]: textures and materials, once at construction
//! - [`Model::vertex_bytes`] / [`Model::index_bytes`]: buffer contents
//! - [`collect_draw_items`] plus per-tick world matrices from an
//!   [`Animator`](crate::animation::Animator)
//!
//! [`Model`]: crate::assets::Model
//! [`Model::vertex_bytes`]: crate::assets::Model::vertex_bytes
//! [`Model::index_bytes`]: crate::assets::Model::index_bytes

pub mod draw_list;
pub mod registry;

pub use draw_list::{DrawItem, collect_draw_items};
pub use registry::{RecordingRegistry, ResourceRegistry};
