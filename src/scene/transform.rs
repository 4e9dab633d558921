use glam::{Affine3A, Quat, Vec3};

use crate::assets::format::NodeInfo;

/// Transform component
///
/// Translation, rotation and scale (TRS) of one node relative to its parent.
/// Poses are arrays of these; matrices are derived on demand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[must_use]
    pub fn new() -> Self {
        Self::IDENTITY
    }

    /// The node's bind pose.
    #[must_use]
    pub fn from_node(node: &NodeInfo) -> Self {
        Self {
            position: node.default_translation,
            rotation: node.default_rotation,
            scale: node.default_scale,
        }
    }

    /// Local matrix: scale, then rotate, then translate.
    #[inline]
    #[must_use]
    pub fn local_matrix(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Builds a transform by decomposing an affine matrix.
    ///
    /// Shear, if present, is lost.
    #[must_use]
    pub fn from_matrix(mat: Affine3A) -> Self {
        let (scale, rotation, position) = mat.to_scale_rotation_translation();
        Self {
            position,
            rotation,
            scale,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
