// Host-side tests for tuning constants and their relationships.
// The viewer constants live in the binary, so that module is included directly.

#![allow(dead_code)]
mod viewer_constants {
    include!("../src/constants.rs");
}

use halo_core::*;
use viewer_constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn smoothing_falls_faster_than_it_rises() {
    assert!(GESTURE_RISE_RATE > 0.0 && GESTURE_RISE_RATE < 1.0);
    assert!(GESTURE_FALL_RATE > 0.0 && GESTURE_FALL_RATE < 1.0);
    assert!(GESTURE_FALL_RATE > GESTURE_RISE_RATE);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn spread_bounds_are_ordered() {
    assert!(SPREAD_LOW_M > 0.0);
    assert!(SPREAD_LOW_M < SPREAD_HIGH_TIGHT_M);
    assert!(SPREAD_HIGH_TIGHT_M < SPREAD_HIGH_M);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn geometry_limits_fit_sixteen_bit_indices() {
    assert!(MIN_SEGMENTS >= 3);
    assert!(DEFAULT_SEGMENTS >= MIN_SEGMENTS);
    assert_eq!(RESTART_INDEX, u16::MAX);
    assert!(MAX_RING_VERTICES <= RESTART_INDEX as usize);
    assert!(MAX_BATCH_VERTICES <= RESTART_INDEX as usize);
    assert!(BASE_RING_RADIUS > 0.0 && BASE_RING_WIDTH > 0.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn cluster_ranges_are_well_formed() {
    assert!(RING_COUNT > 0);
    assert!(SCALE_MIN > 0.0 && SCALE_JITTER >= 0.0);
    assert!(SPEED_RANGE.0 <= SPEED_RANGE.1);
    assert!(BRIGHTNESS_RANGE.0 >= 0.0 && BRIGHTNESS_RANGE.1 <= 1.0);
    assert!(BRIGHTNESS_RANGE.0 <= BRIGHTNESS_RANGE.1);
    assert!(TIME_OFFSET_MAX > 0.0);
    // a fully closed hand must not collapse rings to nothing
    assert!(SHRINK_GAIN < 1.0);
}

#[test]
fn default_configs_pick_up_constants() {
    let g = GestureConfig::default();
    assert_eq!(g.rise_rate, GESTURE_RISE_RATE);
    assert_eq!(g.fall_rate, GESTURE_FALL_RATE);
    assert_eq!((g.low_bound, g.high_bound), (SPREAD_LOW_M, SPREAD_HIGH_M));
    let c = ClusterConfig::default();
    assert_eq!(c.count, RING_COUNT);
    assert_eq!(c.depth_key, DepthKey::Scale);
    let r = RingDescriptor::default();
    assert_eq!(r.segments, DEFAULT_SEGMENTS);
    assert_eq!(fallback_anchor_vec3(), glam::Vec3::from(FALLBACK_ANCHOR));
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn viewer_camera_and_guides_are_sane() {
    assert!(CAMERA_ZNEAR > 0.0 && CAMERA_ZNEAR < CAMERA_ZFAR);
    assert!(CAMERA_BACK_M > CAMERA_ZNEAR);
    for pair in GUIDE_RADII.windows(2) {
        assert!(pair[0] < pair[1]);
    }
    // guides sit outside the largest ring of the cluster
    assert!(GUIDE_RADII[0] > SCALE_MIN + SCALE_JITTER);
    assert!(GUIDE_SEGMENTS >= MIN_SEGMENTS);
    assert!(GUIDE_BRIGHTNESS >= 0.0 && GUIDE_BRIGHTNESS <= 1.0);
}

#[test]
fn guide_batch_fits_in_one_buffer() {
    let descs: Vec<RingDescriptor> = GUIDE_RADII
        .iter()
        .map(|&r| RingDescriptor::new(r, GUIDE_WIDTH, GUIDE_SEGMENTS))
        .collect();
    let batch = build_batch(&descs, BatchFaces::DoubleSided).unwrap();
    assert!(batch.rejected.is_empty());
    assert_eq!(batch.mesh.vertex_count(), GUIDE_RADII.len() * GUIDE_SEGMENTS as usize * 4);
}
