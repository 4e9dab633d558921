use glam::{Quat, Vec3};

/// A keyframe value type that can be sampled from a track.
pub trait Interpolatable: Copy + Sized {
    /// Value produced by a track that has no keys.
    const EMPTY: Self;

    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self;
}

impl Interpolatable for f32 {
    const EMPTY: Self = 0.0;

    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start + (end - start) * t
    }
}

/// Translation and scale channels. An empty channel yields the zero vector;
/// callers that need a unit scale start from the bind pose instead.
impl Interpolatable for Vec3 {
    const EMPTY: Self = Vec3::ZERO;

    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.lerp(end, t)
    }
}

/// Rotation channels use spherical interpolation.
impl Interpolatable for Quat {
    const EMPTY: Self = Quat::IDENTITY;

    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.slerp(end, t)
    }
}
