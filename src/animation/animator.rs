//! Per-instance animation playback.
//!
//! An [`Animator`] plays the clips of one shared [`Model`] and produces a
//! world matrix per node every tick. All buffers are sized at construction
//! and reused, so [`Animator::update`] does not allocate.

use std::sync::Arc;

use glam::{Affine3A, Mat4};

use crate::animation::action::{LoopMode, PlayMode, PlaybackState};
use crate::animation::clip::AnimationClip;
use crate::animation::pose::{Pose, blend_pose};
use crate::assets::format::NodeInfo;
use crate::assets::model::Model;
use crate::scene::transform_system;

#[derive(Debug, Clone)]
pub struct Animator {
    model: Arc<Model>,
    state: PlaybackState,

    current_pose: Pose,
    pose_a: Pose,
    pose_b: Pose,

    local_matrices: Vec<Affine3A>,
    world_matrices: Vec<Affine3A>,
}

impl Animator {
    /// Creates an idle animator showing the model's bind pose.
    #[must_use]
    pub fn new(model: Arc<Model>) -> Self {
        let node_count = model.nodes().len();
        let current_pose = Pose::from_nodes(model.nodes());

        let mut animator = Self {
            state: PlaybackState::default(),
            pose_a: current_pose.clone(),
            pose_b: current_pose.clone(),
            current_pose,
            local_matrices: vec![Affine3A::IDENTITY; node_count],
            world_matrices: vec![Affine3A::IDENTITY; node_count],
            model,
        };
        animator.build_matrices();
        animator
    }

    #[must_use]
    pub fn model(&self) -> &Arc<Model> {
        &self.model
    }

    /// Plays clip `clip` from the start.
    ///
    /// An index without a clip is accepted; the animator then shows the
    /// bind pose.
    pub fn play(&mut self, clip: usize, loop_mode: LoopMode) {
        if self.model.animation(clip).is_none() {
            log::warn!(
                "play: clip index {clip} out of range ({} clips); showing bind pose",
                self.model.animations().len()
            );
        }
        self.state.play(clip, loop_mode);
    }

    /// Plays the first clip named `name`. Returns `false` if there is none.
    pub fn play_by_name(&mut self, name: &str, loop_mode: LoopMode) -> bool {
        match self.find_clip(name) {
            Some(clip) => {
                self.play(clip, loop_mode);
                true
            }
            None => {
                log::warn!("play: no clip named '{name}'");
                false
            }
        }
    }

    /// Fades from the current clip to `clip` over `duration` seconds.
    ///
    /// A non-positive duration switches on the next update.
    pub fn cross_fade(&mut self, clip: usize, duration: f32) {
        if self.model.animation(clip).is_none() {
            log::warn!(
                "cross_fade: clip index {clip} out of range ({} clips); fade ignored",
                self.model.animations().len()
            );
        }
        self.state.cross_fade(clip, duration);
    }

    #[must_use]
    pub fn find_clip(&self, name: &str) -> Option<usize> {
        self.model.find_animation(name)
    }

    /// Advances time by `dt` seconds and recomputes every world matrix.
    pub fn update(&mut self, dt: f32) {
        let clips = self.model.animations();
        self.state.advance(dt, clips);

        let nodes = self.model.nodes();
        let clip_a = self.state.clip_a.and_then(|i| clips.get(i));

        match self.state.mode {
            PlayMode::Single => {
                sample_into(&mut self.current_pose, nodes, clip_a, self.state.time_a);
            }
            PlayMode::Blend => {
                let clip_b = self.state.clip_b.and_then(|i| clips.get(i));
                sample_into(&mut self.pose_a, nodes, clip_a, self.state.time_a);
                sample_into(&mut self.pose_b, nodes, clip_b, self.state.time_b);
                blend_pose(
                    &self.pose_a,
                    &self.pose_b,
                    self.state.blend_weight,
                    &mut self.current_pose,
                );
            }
        }

        self.build_matrices();
    }

    fn build_matrices(&mut self) {
        transform_system::build_local_matrices(
            &self.current_pose.transforms,
            &mut self.local_matrices,
        );
        self.model
            .hierarchy()
            .compose(&self.local_matrices, &mut self.world_matrices);
    }

    #[must_use]
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    #[must_use]
    pub fn mode(&self) -> PlayMode {
        self.state.mode
    }

    /// Index of the clip currently playing (the outgoing one while fading).
    #[must_use]
    pub fn current_clip(&self) -> Option<usize> {
        self.state.clip_a
    }

    /// Playback time of the current clip, in seconds.
    #[must_use]
    pub fn time(&self) -> f32 {
        self.state.time_a
    }

    /// Weight of the incoming clip while fading, 0 otherwise.
    #[must_use]
    pub fn blend_weight(&self) -> f32 {
        self.state.blend_weight
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state.is_finished(self.model.animations())
    }

    #[must_use]
    pub fn pose(&self) -> &Pose {
        &self.current_pose
    }

    /// One world matrix per node, in node-table order.
    #[must_use]
    pub fn world_matrices(&self) -> &[Affine3A] {
        &self.world_matrices
    }

    /// World matrices widened to `Mat4` for upload.
    pub fn world_matrices_mat4(&self) -> impl ExactSizeIterator<Item = Mat4> + '_ {
        transform_system::to_mat4(&self.world_matrices)
    }
}

/// Bind pose with `clip` applied on top, if there is one.
fn sample_into(pose: &mut Pose, nodes: &[NodeInfo], clip: Option<&AnimationClip>, time: f32) {
    pose.reset_to_bind(nodes);
    if let Some(clip) = clip {
        pose.apply_clip(clip, time);
    }
}
