use crate::animation::clip::AnimationClip;
use crate::assets::format::NodeInfo;
use crate::scene::transform::Transform;

/// One local transform per node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pose {
    pub transforms: Vec<Transform>,
}

impl Pose {
    /// A pose of `node_count` identity transforms.
    #[must_use]
    pub fn new(node_count: usize) -> Self {
        Self {
            transforms: vec![Transform::IDENTITY; node_count],
        }
    }

    /// The bind pose of a node table.
    #[must_use]
    pub fn from_nodes(nodes: &[NodeInfo]) -> Self {
        Self {
            transforms: nodes.iter().map(Transform::from_node).collect(),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Overwrites every transform with its node's bind pose.
    pub fn reset_to_bind(&mut self, nodes: &[NodeInfo]) {
        self.transforms.clear();
        self.transforms.extend(nodes.iter().map(Transform::from_node));
    }

    /// Overwrites the components `clip` animates with their values at `time`.
    ///
    /// Components without a channel are left untouched, so callers reset to
    /// the bind pose first. Channels targeting nodes outside the pose are
    /// ignored.
    pub fn apply_clip(&mut self, clip: &AnimationClip, time: f32) {
        for channel in &clip.translations {
            if let Some(t) = self.transforms.get_mut(channel.node_index as usize) {
                t.position = channel.sample(time);
            }
        }
        for channel in &clip.rotations {
            if let Some(t) = self.transforms.get_mut(channel.node_index as usize) {
                t.rotation = channel.sample(time);
            }
        }
        for channel in &clip.scales {
            if let Some(t) = self.transforms.get_mut(channel.node_index as usize) {
                t.scale = channel.sample(time);
            }
        }
    }
}

/// Blends two poses node by node into `out`.
///
/// Translation and scale are lerped. Rotations take the shorter arc: `b` is
/// negated when it lies in the opposite hemisphere of `a`, then slerped.
/// `weight` 0 yields `a`, 1 yields `b`.
pub fn blend_pose(a: &Pose, b: &Pose, weight: f32, out: &mut Pose) {
    debug_assert_eq!(a.len(), b.len());
    out.transforms.clear();
    out.transforms
        .extend(a.transforms.iter().zip(&b.transforms).map(|(ta, tb)| {
            let rb = if ta.rotation.dot(tb.rotation) < 0.0 {
                -tb.rotation
            } else {
                tb.rotation
            };
            Transform {
                position: ta.position.lerp(tb.position, weight),
                rotation: ta.rotation.slerp(rb, weight),
                scale: ta.scale.lerp(tb.scale, weight),
            }
        }));
}
