//! Fingertip spread metric and its asymmetric smoothing.
//!
//! Fingers close together drive the target toward 1, fingers spread apart
//! toward 0. The smoothed factor rises slowly and falls quickly so brief
//! finger contact does not flicker the effect.

use crate::constants::*;
use crate::instance::RingInstance;
use glam::Vec3;

#[derive(Clone, Debug, PartialEq)]
pub struct GestureConfig {
    /// Spread (metres) at or below which the target is 1.
    pub low_bound: f32,
    /// Spread (metres) at or above which the target is 0.
    pub high_bound: f32,
    /// Per-frame step fraction while the target is above the factor.
    pub rise_rate: f32,
    /// Per-frame step fraction while the target is at or below the factor.
    pub fall_rate: f32,
    pub speed_gain: f32,
    pub brightness_gain: f32,
    pub shrink_gain: f32,
    pub bob_amplitude: f32,
    pub bob_frequency: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            low_bound: SPREAD_LOW_M,
            high_bound: SPREAD_HIGH_M,
            rise_rate: GESTURE_RISE_RATE,
            fall_rate: GESTURE_FALL_RATE,
            speed_gain: SPEED_GAIN,
            brightness_gain: BRIGHTNESS_GAIN,
            shrink_gain: SHRINK_GAIN,
            bob_amplitude: BOB_AMPLITUDE,
            bob_frequency: BOB_FREQUENCY,
        }
    }
}

impl GestureConfig {
    /// Narrower spread window: a smaller pinch already reads as "apart".
    pub fn tight() -> Self {
        Self {
            high_bound: SPREAD_HIGH_TIGHT_M,
            ..Self::default()
        }
    }
}

/// Largest distance between any two points, or `None` with fewer than two
/// points or any non-finite coordinate.
pub fn max_pairwise_distance(points: &[Vec3]) -> Option<f32> {
    if points.len() < 2 || !points.iter().all(|p| p.is_finite()) {
        return None;
    }
    let mut best = 0.0f32;
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            best = best.max(a.distance(*b));
        }
    }
    best.is_finite().then_some(best)
}

/// Maps a spread distance onto a target in `[0, 1]`, 1 meaning "closed".
pub fn spread_target(max_dist: f32, low: f32, high: f32) -> f32 {
    let range = high - low;
    if range <= 0.0 {
        return if max_dist <= low { 1.0 } else { 0.0 };
    }
    1.0 - ((max_dist - low) / range).clamp(0.0, 1.0)
}

/// Holds the smoothed gesture factor between frames.
#[derive(Clone, Debug)]
pub struct GestureSmoother {
    factor: f32,
    rise_rate: f32,
    fall_rate: f32,
    low_bound: f32,
    high_bound: f32,
}

impl GestureSmoother {
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            factor: 0.0,
            rise_rate: config.rise_rate,
            fall_rate: config.fall_rate,
            low_bound: config.low_bound,
            high_bound: config.high_bound,
        }
    }

    #[inline]
    pub fn factor(&self) -> f32 {
        self.factor
    }

    /// One exponential step toward `target`, slow upward and fast downward.
    pub fn step(&mut self, target: f32) -> f32 {
        if !target.is_finite() {
            return self.factor;
        }
        let target = target.clamp(0.0, 1.0);
        let rate = if target > self.factor {
            self.rise_rate
        } else {
            self.fall_rate
        };
        self.factor = (self.factor + (target - self.factor) * rate).clamp(0.0, 1.0);
        self.factor
    }

    /// Feeds one frame of fingertip positions. With fewer than two points
    /// the factor is returned unchanged.
    pub fn observe(&mut self, points: &[Vec3]) -> f32 {
        match max_pairwise_distance(points) {
            Some(d) => self.step(spread_target(d, self.low_bound, self.high_bound)),
            None => self.factor,
        }
    }
}

/// Advances one instance by `dt_sec` and recomputes its derived values.
///
/// Only the phase accumulates; scale, brightness and vertical offset are
/// recomputed from the seed values and `factor` every frame. `time_sec`
/// drives the gesture-independent bobbing.
pub fn animate_instance(
    ring: &mut RingInstance,
    factor: f32,
    dt_sec: f32,
    time_sec: f32,
    config: &GestureConfig,
) {
    ring.gesture_factor = factor;
    ring.time_phase += ring.speed * (1.0 + factor * config.speed_gain) * dt_sec;
    ring.brightness =
        (ring.base_brightness * (1.0 + factor * config.brightness_gain)).clamp(0.0, 1.0);
    let shrink = 1.0 - factor * config.shrink_gain;
    ring.scale = ring.base_scale * shrink;
    let bob = config.bob_amplitude * (config.bob_frequency * time_sec + ring.bob_phase).cos();
    ring.vertical_offset = (ring.base_vertical_offset + bob) * shrink;
}
