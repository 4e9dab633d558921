use glam::{Quat, Vec3};

use crate::animation::tracks::KeyframeTrack;
use crate::animation::values::Interpolatable;

/// A keyframe track bound to one node.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationChannel<T: Interpolatable> {
    pub node_index: u32,
    pub track: KeyframeTrack<T>,
}

impl<T: Interpolatable> AnimationChannel<T> {
    #[must_use]
    pub fn new(node_index: u32, times: Vec<f32>, values: Vec<T>) -> Self {
        Self {
            node_index,
            track: KeyframeTrack::new(times, values),
        }
    }

    #[inline]
    #[must_use]
    pub fn sample(&self, time: f32) -> T {
        self.track.sample(time)
    }
}

/// A named animation made of translation, rotation and scale channels.
///
/// Channels reference nodes sparsely: a node with no channel keeps its
/// bind pose while this clip plays.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    pub translations: Vec<AnimationChannel<Vec3>>,
    pub rotations: Vec<AnimationChannel<Quat>>,
    pub scales: Vec<AnimationChannel<Vec3>>,
}

impl AnimationClip {
    /// Builds a clip whose duration is the latest key time of any channel.
    #[must_use]
    pub fn from_channels(
        name: impl Into<String>,
        translations: Vec<AnimationChannel<Vec3>>,
        rotations: Vec<AnimationChannel<Quat>>,
        scales: Vec<AnimationChannel<Vec3>>,
    ) -> Self {
        let duration = translations
            .iter()
            .map(|c| c.track.end_time())
            .chain(rotations.iter().map(|c| c.track.end_time()))
            .chain(scales.iter().map(|c| c.track.end_time()))
            .fold(0.0_f32, f32::max);

        Self {
            name: name.into(),
            duration,
            translations,
            rotations,
            scales,
        }
    }

    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.translations.len() + self.rotations.len() + self.scales.len()
    }

    /// Target node of every channel, in translation / rotation / scale order.
    pub fn target_nodes(&self) -> impl Iterator<Item = u32> + '_ {
        self.translations
            .iter()
            .map(|c| c.node_index)
            .chain(self.rotations.iter().map(|c| c.node_index))
            .chain(self.scales.iter().map(|c| c.node_index))
    }
}
