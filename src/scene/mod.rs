//! Node hierarchy and transform composition.
//!
//! - Transform: per-node translation / rotation / scale
//! - Hierarchy: validated parent links and evaluation order
//! - TransformSystem: local and world matrix computation

pub mod hierarchy;
pub mod transform;
pub mod transform_system;

pub use hierarchy::Hierarchy;
pub use transform::Transform;
pub use transform_system::compute_world_matrices;
