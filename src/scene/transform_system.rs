//! Transform System
//!
//! Turns per-node TRS into world matrices. Composition borrows only the data
//! it needs (the node table or a [`Hierarchy`] plus a slice of local
//! matrices), so callers can keep their own pose buffers and reuse the output
//! storage every frame.

use glam::{Affine3A, Mat4};

use crate::assets::format::NodeInfo;
use crate::scene::hierarchy::Hierarchy;
use crate::scene::transform::Transform;

/// World matrices of a node table in its bind pose.
///
/// Single pass in index order: requires every parent to be stored before
/// its children. A node whose parent has not been composed yet is treated
/// as a root; use [`Hierarchy::compose`] for tables in arbitrary order.
///
/// `out` is cleared and refilled, so its allocation is reused across calls.
pub fn compute_world_matrices(nodes: &[NodeInfo], out: &mut Vec<Affine3A>) {
    out.clear();
    out.reserve(nodes.len());

    for node in nodes {
        let local = Transform::from_node(node).local_matrix();
        let world = match node.parent().and_then(|p| out.get(p)) {
            Some(parent_world) => *parent_world * local,
            None => local,
        };
        out.push(world);
    }
}

/// Fills `locals` with the local matrix of each transform.
pub fn build_local_matrices(transforms: &[Transform], locals: &mut [Affine3A]) {
    debug_assert_eq!(transforms.len(), locals.len());
    for (local, transform) in locals.iter_mut().zip(transforms) {
        *local = transform.local_matrix();
    }
}

/// Bind-pose world matrices for any node order, via the resolved hierarchy.
pub fn compute_world_matrices_with(
    nodes: &[NodeInfo],
    hierarchy: &Hierarchy,
    locals: &mut Vec<Affine3A>,
    out: &mut Vec<Affine3A>,
) {
    locals.clear();
    locals.extend(nodes.iter().map(|n| Transform::from_node(n).local_matrix()));
    out.clear();
    out.resize(nodes.len(), Affine3A::IDENTITY);
    hierarchy.compose(locals, out);
}

/// World matrices as `Mat4`, for GPU upload.
pub fn to_mat4(world: &[Affine3A]) -> impl ExactSizeIterator<Item = Mat4> + '_ {
    world.iter().map(|m| Mat4::from(*m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_hierarchy_update() {
        let parent = NodeInfo {
            default_translation: Vec3::new(1.0, 0.0, 0.0),
            ..NodeInfo::default()
        };
        let child = NodeInfo {
            parent_index: 0,
            default_translation: Vec3::new(0.0, 1.0, 0.0),
            ..NodeInfo::default()
        };

        let mut world = Vec::new();
        compute_world_matrices(&[parent, child], &mut world);

        let child_world_pos = world[1].translation;
        assert!((child_world_pos.x - 1.0).abs() < 1e-5);
        assert!((child_world_pos.y - 1.0).abs() < 1e-5);
    }
}
