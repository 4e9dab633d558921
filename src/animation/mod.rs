pub mod values;
pub mod tracks;
pub mod clip;
pub mod pose;
pub mod action;
pub mod animator;

pub use values::Interpolatable;
pub use tracks::{KeyframeTrack, sample_quat, sample_vec3};
pub use clip::{AnimationChannel, AnimationClip};
pub use pose::{Pose, blend_pose};
pub use action::{LoopMode, PlayMode, PlaybackState};
pub use animator::Animator;
