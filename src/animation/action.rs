use crate::animation::clip::AnimationClip;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopMode {
    /// Play once and hold the last frame.
    Once,
    #[default]
    Loop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayMode {
    #[default]
    Single,
    /// Cross-fading from `clip_a` to `clip_b`.
    Blend,
}

/// Clip selection and time of one animator.
///
/// Clip indices are stored unchecked: an index with no clip behind it is
/// treated as "no contribution" wherever it is used.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub mode: PlayMode,
    pub loop_mode: LoopMode,

    pub clip_a: Option<usize>,
    pub time_a: f32,

    pub clip_b: Option<usize>,
    pub time_b: f32,

    pub blend_duration: f32,
    pub blend_timer: f32,
    pub blend_weight: f32,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            mode: PlayMode::Single,
            loop_mode: LoopMode::Loop,
            clip_a: None,
            time_a: 0.0,
            clip_b: None,
            time_b: 0.0,
            blend_duration: 0.0,
            blend_timer: 0.0,
            blend_weight: 0.0,
        }
    }
}

impl PlaybackState {
    /// Starts `clip` from time 0, cancelling any cross-fade.
    pub fn play(&mut self, clip: usize, loop_mode: LoopMode) {
        self.mode = PlayMode::Single;
        self.loop_mode = loop_mode;
        self.clip_a = Some(clip);
        self.time_a = 0.0;
        self.clip_b = None;
        self.time_b = 0.0;
        self.blend_timer = 0.0;
        self.blend_weight = 0.0;
    }

    /// Starts fading towards `clip` over `duration` seconds.
    ///
    /// The current clip keeps playing from its current time.
    pub fn cross_fade(&mut self, clip: usize, duration: f32) {
        self.mode = PlayMode::Blend;
        self.clip_b = Some(clip);
        self.time_b = 0.0;
        self.blend_duration = duration;
        self.blend_timer = 0.0;
        self.blend_weight = 0.0;
    }

    /// Advances playback by `dt` seconds.
    ///
    /// A non-finite `dt` counts as a zero step.
    pub fn advance(&mut self, dt: f32, clips: &[AnimationClip]) {
        let dt = if dt.is_finite() { dt } else { 0.0 };

        let Some(clip_a) = self.clip_a.and_then(|i| clips.get(i)) else {
            self.time_a = 0.0;
            return;
        };
        self.time_a = wrap_time(self.time_a + dt, clip_a.duration, self.loop_mode);

        if self.mode != PlayMode::Blend {
            return;
        }

        let Some(clip_b) = self.clip_b.and_then(|i| clips.get(i)) else {
            self.mode = PlayMode::Single;
            self.clip_b = None;
            return;
        };

        // The incoming clip follows the same loop policy as the outgoing one.
        self.time_b = wrap_time(self.time_b + dt, clip_b.duration, self.loop_mode);

        self.blend_timer += dt;
        self.blend_weight = if self.blend_duration.is_nan() || self.blend_duration <= 0.0 {
            1.0
        } else {
            (self.blend_timer / self.blend_duration).clamp(0.0, 1.0)
        };

        if self.blend_weight >= 1.0 {
            self.clip_a = self.clip_b.take();
            self.time_a = self.time_b;
            self.time_b = 0.0;
            self.mode = PlayMode::Single;
            self.blend_timer = 0.0;
            self.blend_weight = 0.0;
        }
    }

    /// Whether a non-looping clip has reached its end.
    #[must_use]
    pub fn is_finished(&self, clips: &[AnimationClip]) -> bool {
        self.mode == PlayMode::Single
            && self.loop_mode == LoopMode::Once
            && self
                .clip_a
                .and_then(|i| clips.get(i))
                .is_some_and(|clip| self.time_a >= clip.duration)
    }
}

/// Maps an accumulated time into `[0, duration]`.
///
/// Looping wraps into `[0, duration)` (negative times wrap from the end),
/// `Once` clamps.
/// Clips without a positive duration always sit at time 0.
#[must_use]
pub fn wrap_time(time: f32, duration: f32, loop_mode: LoopMode) -> f32 {
    if duration.is_nan() || duration <= 0.0 || !time.is_finite() {
        return 0.0;
    }
    match loop_mode {
        LoopMode::Loop => {
            let t = time % duration;
            let t = if t < 0.0 { t + duration } else { t };
            // A tiny negative remainder can round up to `duration`.
            if t >= duration { 0.0 } else { t }
        }
        LoopMode::Once => time.clamp(0.0, duration),
    }
}
