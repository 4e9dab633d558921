use glam::{Quat, Vec3};

use crate::animation::values::Interpolatable;

/// Segments shorter than this are treated as a step to avoid dividing by ~0.
const MIN_SEGMENT: f32 = 1e-6;

/// Parallel key times and values.
///
/// `times` must be non-decreasing and as long as `values`; the loader
/// validates both. Sampling stays panic-free when they are violated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KeyframeTrack<T: Interpolatable> {
    pub times: Vec<f32>,
    pub values: Vec<T>,
}

impl<T: Interpolatable> KeyframeTrack<T> {
    #[must_use]
    pub fn new(times: Vec<f32>, values: Vec<T>) -> Self {
        Self { times, values }
    }

    /// Number of usable keys.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len().min(self.values.len())
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Time of the last key, or 0 for an empty track.
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn is_sorted(&self) -> bool {
        self.times.windows(2).all(|w| w[0] <= w[1])
    }

    /// Samples the track at `time`.
    ///
    /// Picks the first key pair `[times[i], times[i + 1]]` that contains
    /// `time` and interpolates between them. Times before the first key or
    /// after the last clamp to the end values; an empty track yields
    /// [`Interpolatable::EMPTY`].
    #[must_use]
    pub fn sample(&self, time: f32) -> T {
        let len = self.len();
        if len == 0 {
            return T::EMPTY;
        }
        if len == 1 || time <= self.times[0] {
            return self.values[0];
        }
        if time >= self.times[len - 1] {
            return self.values[len - 1];
        }

        // First key at or after `time` closes the bracketing segment.
        let next = self.times[..len]
            .partition_point(|&t| t < time)
            .clamp(1, len - 1);
        let index = next - 1;

        let t0 = self.times[index];
        let t1 = self.times[next];
        let dt = t1 - t0;

        let t = if dt > MIN_SEGMENT { (time - t0) / dt } else { 0.0 };
        let t = t.clamp(0.0, 1.0);

        T::interpolate_linear(self.values[index], self.values[next], t)
    }
}

/// Samples a translation or scale track.
#[inline]
#[must_use]
pub fn sample_vec3(track: &KeyframeTrack<Vec3>, time: f32) -> Vec3 {
    track.sample(time)
}

/// Samples a rotation track.
#[inline]
#[must_use]
pub fn sample_quat(track: &KeyframeTrack<Quat>, time: f32) -> Quat {
    track.sample(time)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_key_time_takes_left_segment() {
        // A discontinuity at t = 1: the first segment containing 1.0 wins.
        let track = KeyframeTrack::new(vec![0.0, 1.0, 1.0, 2.0], vec![0.0_f32, 10.0, 50.0, 60.0]);
        assert!((track.sample(1.0) - 10.0).abs() < 1e-6);
        assert!((track.sample(1.5) - 55.0).abs() < 1e-5);
    }

    #[test]
    fn mismatched_lengths_do_not_panic() {
        let track = KeyframeTrack::new(vec![0.0, 1.0, 2.0], vec![0.0_f32, 10.0]);
        assert!((track.sample(0.5) - 5.0).abs() < 1e-6);
        assert!((track.sample(5.0) - 10.0).abs() < 1e-6);
    }

    #[test]
    fn nan_time_does_not_panic() {
        let track = KeyframeTrack::new(vec![0.0, 1.0], vec![0.0_f32, 10.0]);
        let _ = track.sample(f32::NAN);
    }
}
