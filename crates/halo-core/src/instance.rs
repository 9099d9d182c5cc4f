//! Ring instances and the seeded spawner that lays out a cluster.

use crate::constants::*;
use crate::draw_order::{assign_draw_order, sort_by_depth_key, DepthKey, DrawOrder, SortGroup};
use crate::params::{GlowProfile, RingMaterial};
use crate::sampling::sample_quarter_disc;
use glam::Vec3;
use rand::prelude::*;
use std::f32::consts::TAU;

#[derive(Clone, Debug)]
pub struct ClusterConfig {
    pub count: usize,
    pub scale_min: f32,
    pub scale_jitter: f32,
    pub vertical_jitter: f32,
    pub time_offset_max: f32,
    pub speed_range: (f32, f32),
    pub brightness_range: (f32, f32),
    pub depth_key: DepthKey,
    pub group: SortGroup,
    /// Band width blend shared by every instance.
    pub mode: f32,
    pub hue_primary: Vec3,
    pub hue_secondary: Vec3,
    pub profile: GlowProfile,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            count: RING_COUNT,
            scale_min: SCALE_MIN,
            scale_jitter: SCALE_JITTER,
            vertical_jitter: VERTICAL_JITTER,
            time_offset_max: TIME_OFFSET_MAX,
            speed_range: SPEED_RANGE,
            brightness_range: BRIGHTNESS_RANGE,
            depth_key: DepthKey::Scale,
            group: SortGroup(0),
            mode: 0.0,
            hue_primary: Vec3::from(HUE_WARM),
            hue_secondary: Vec3::from(HUE_COOL),
            profile: GlowProfile::Band,
        }
    }
}

/// One ring of the cluster: static seed values plus live animation state.
#[derive(Clone, Debug)]
pub struct RingInstance {
    pub base_scale: f32,
    pub base_vertical_offset: f32,
    pub base_brightness: f32,
    pub time_offset: f32,
    pub speed: f32,
    pub bob_phase: f32,

    pub scale: f32,
    pub vertical_offset: f32,
    pub time_phase: f32,
    pub brightness: f32,
    /// Last factor applied to this instance by the gesture pipeline.
    pub gesture_factor: f32,

    pub order: DrawOrder,
}

impl RingInstance {
    fn from_seed(base_scale: f32, base_vertical_offset: f32, base_brightness: f32) -> Self {
        Self {
            base_scale,
            base_vertical_offset,
            base_brightness,
            time_offset: 0.0,
            speed: 1.0,
            bob_phase: 0.0,
            scale: base_scale,
            vertical_offset: base_vertical_offset,
            time_phase: 0.0,
            brightness: base_brightness,
            gesture_factor: 0.0,
            order: DrawOrder {
                group: SortGroup(0),
                inner: 0,
                outer: 0,
            },
        }
    }

    fn depth(&self, key: DepthKey) -> f32 {
        match key {
            DepthKey::Scale => self.base_scale,
            DepthKey::VerticalJitter => self.base_vertical_offset,
        }
    }

    /// The designed parameter set this instance is created with.
    pub fn material(&self, config: &ClusterConfig) -> RingMaterial {
        RingMaterial {
            time_offset: self.time_offset,
            brightness: self.base_brightness,
            speed: self.speed,
            mode: config.mode,
            hue_primary: config.hue_primary,
            hue_secondary: config.hue_secondary,
            profile: config.profile,
        }
    }
}

/// Lays out `config.count` instances, sorted back-to-front with draw
/// orders assigned.
pub fn spawn_cluster<R: Rng + ?Sized>(config: &ClusterConfig, rng: &mut R) -> Vec<RingInstance> {
    let mut rings: Vec<RingInstance> = (0..config.count)
        .map(|_| {
            let (x, y) = sample_quarter_disc(rng);
            let brightness = rng.gen_range(config.brightness_range.0..=config.brightness_range.1);
            let mut ring = RingInstance::from_seed(
                config.scale_min + x * config.scale_jitter,
                y * config.vertical_jitter,
                brightness.clamp(0.0, 1.0),
            );
            ring.time_offset = rng.gen_range(0.0..=config.time_offset_max);
            ring.speed = rng.gen_range(config.speed_range.0..=config.speed_range.1);
            ring.bob_phase = rng.gen_range(0.0..TAU);
            ring
        })
        .collect();

    sort_by_depth_key(&mut rings, |r| r.depth(config.depth_key));
    for (ring, order) in rings
        .iter_mut()
        .zip(assign_draw_order(config.count, config.group))
    {
        ring.order = order;
    }
    rings
}

/// [`spawn_cluster`] with a reproducible generator.
pub fn spawn_cluster_seeded(config: &ClusterConfig, seed: u64) -> Vec<RingInstance> {
    let mut rng = StdRng::seed_from_u64(seed);
    spawn_cluster(config, &mut rng)
}
