// Host-side tests for the per-frame gesture pipeline and the parameter table.

use glam::Vec3;
use halo_core::*;
use std::time::Duration;

const FRAME: Duration = Duration::from_micros(16_667);
const ANCHOR: Vec3 = Vec3::new(0.0, 1.2, -0.7);

/// Scripted tracker: fixed answer to the request, fixed fingertip set.
struct MockTracker {
    grant: bool,
    points: Vec<Vec3>,
    hand_at: Option<Vec3>,
    polls: usize,
    requests: usize,
    released: bool,
}

impl MockTracker {
    fn new(grant: bool, points: Vec<Vec3>) -> Self {
        Self {
            grant,
            points,
            hand_at: None,
            polls: 0,
            requests: 0,
            released: false,
        }
    }
}

impl HandTracker for MockTracker {
    fn request(&mut self) -> TrackingAvailability {
        self.requests += 1;
        if self.grant {
            TrackingAvailability::Granted
        } else {
            TrackingAvailability::Unavailable
        }
    }

    fn poll(&mut self, out: &mut TrackedJoints) -> bool {
        self.polls += 1;
        out.clear();
        out.extend(self.points.iter().copied());
        true
    }

    fn anchor_position(&mut self, _hand: Hand, _joint: Fingertip) -> Option<Vec3> {
        self.hand_at
    }

    fn release(&mut self) {
        self.released = true;
    }
}

/// Sink that refuses one parameter name and records what reached it.
#[derive(Default)]
struct PickySink {
    refused: usize,
    brightness_writes: usize,
    transforms: usize,
}

impl ParameterSink for PickySink {
    fn set_float(&mut self, _: InstanceId, name: &str, _: f32) -> Result<(), ParameterError> {
        if name == PARAM_SPEED {
            self.refused += 1;
            return Err(ParameterError::Unknown(name.to_string()));
        }
        if name == PARAM_BRIGHTNESS {
            self.brightness_writes += 1;
        }
        Ok(())
    }

    fn set_color(&mut self, _: InstanceId, _: &str, _: Vec3) -> Result<(), ParameterError> {
        Ok(())
    }

    fn set_transform(&mut self, _: InstanceId, _: Vec3, _: Vec3) {
        self.transforms += 1;
    }
}

fn closed_hand() -> Vec<Vec3> {
    vec![ANCHOR, ANCHOR + Vec3::new(0.01, 0.0, 0.0), ANCHOR + Vec3::new(0.0, 0.01, 0.0)]
}

fn open_hand() -> Vec<Vec3> {
    vec![ANCHOR, ANCHOR + Vec3::new(0.25, 0.0, 0.0)]
}

fn make_pipeline(count: usize, table: &mut ParameterTable) -> GesturePipeline {
    let cluster = ClusterConfig {
        count,
        ..ClusterConfig::default()
    };
    let rings = spawn_cluster_seeded(&cluster, 42);
    GesturePipeline::new(rings, &cluster, GestureConfig::default(), ANCHOR, |m| {
        table.push_instance(m)
    })
}

#[test]
fn every_instance_is_registered_from_its_own_material() {
    let mut table = ParameterTable::new();
    let pipeline = make_pipeline(12, &mut table);
    assert_eq!(table.len(), 12);
    assert_eq!(pipeline.instance_ids().len(), 12);
    for (ring, &id) in pipeline.rings().iter().zip(pipeline.instance_ids()) {
        let row = table.get(id).unwrap();
        assert_eq!(row.time_offset, ring.time_offset);
        assert_eq!(row.brightness, ring.base_brightness);
    }
}

#[test]
fn unavailable_tracking_falls_back_to_fixed_anchor() {
    let mut table = ParameterTable::new();
    let mut pipeline = make_pipeline(8, &mut table);
    let mut tracker = MockTracker::new(false, closed_hand());
    assert_eq!(pipeline.mode(), TrackingMode::Pending);
    assert_eq!(
        pipeline.start(&mut tracker, Hand::Right, Fingertip::Index),
        TrackingMode::Fallback
    );
    assert_eq!(pipeline.anchor(), Anchor::Fixed(ANCHOR));

    for _ in 0..300 {
        assert_eq!(pipeline.frame(FRAME, &mut tracker, &mut table), 0.0);
    }
    assert_eq!(tracker.polls, 0, "fallback mode must not poll");
    for (ring, &id) in pipeline.rings().iter().zip(pipeline.instance_ids()) {
        let row = table.get(id).unwrap();
        assert_eq!(row.scale, [ring.base_scale, 1.0, ring.base_scale]);
        let expected = ANCHOR + Vec3::Y * ring.vertical_offset;
        assert!((Vec3::from(row.translation) - expected).length() < 1e-6);
    }
}

#[test]
fn tracking_is_requested_only_once() {
    let mut table = ParameterTable::new();
    let mut pipeline = make_pipeline(2, &mut table);
    let mut tracker = MockTracker::new(false, Vec::new());
    pipeline.start(&mut tracker, Hand::Left, Fingertip::Thumb);
    tracker.grant = true;
    assert_eq!(
        pipeline.start(&mut tracker, Hand::Left, Fingertip::Thumb),
        TrackingMode::Fallback
    );
    assert_eq!(tracker.requests, 1);
}

#[test]
fn closed_hand_raises_factor_and_shrinks_rings() {
    let mut table = ParameterTable::new();
    let mut pipeline = make_pipeline(10, &mut table);
    let mut tracker = MockTracker::new(true, closed_hand());
    assert_eq!(
        pipeline.start(&mut tracker, Hand::Right, Fingertip::Index),
        TrackingMode::Live
    );

    let mut prev = 0.0;
    for _ in 0..300 {
        let f = pipeline.frame(FRAME, &mut tracker, &mut table);
        assert!(f >= prev);
        prev = f;
    }
    assert!(prev > 0.5, "factor only reached {prev}");
    for (ring, &id) in pipeline.rings().iter().zip(pipeline.instance_ids()) {
        let row = table.get(id).unwrap();
        assert!(row.scale[0] < ring.base_scale);
        assert_eq!(row.scale[1], 1.0);
        assert!(row.brightness >= ring.base_brightness);
        assert!(row.speed > ring.speed);
    }
}

#[test]
fn open_hand_leaves_factor_at_zero() {
    let mut table = ParameterTable::new();
    let mut pipeline = make_pipeline(4, &mut table);
    let mut tracker = MockTracker::new(true, open_hand());
    pipeline.start(&mut tracker, Hand::Right, Fingertip::Index);
    for _ in 0..120 {
        assert_eq!(pipeline.frame(FRAME, &mut tracker, &mut table), 0.0);
    }
    assert_eq!(tracker.polls, 120);
}

#[test]
fn single_tracked_point_holds_factor() {
    let mut table = ParameterTable::new();
    let mut pipeline = make_pipeline(3, &mut table);
    let mut tracker = MockTracker::new(true, closed_hand());
    pipeline.start(&mut tracker, Hand::Right, Fingertip::Index);
    for _ in 0..60 {
        pipeline.frame(FRAME, &mut tracker, &mut table);
    }
    let held = pipeline.factor();
    tracker.points.truncate(1);
    for _ in 0..60 {
        assert_eq!(pipeline.frame(FRAME, &mut tracker, &mut table), held);
    }
}

#[test]
fn live_anchor_follows_the_tracked_joint() {
    let mut table = ParameterTable::new();
    let mut pipeline = make_pipeline(5, &mut table);
    let mut tracker = MockTracker::new(true, open_hand());
    pipeline.start(&mut tracker, Hand::Right, Fingertip::Middle);
    assert_eq!(
        pipeline.anchor(),
        Anchor::TrackedHand {
            hand: Hand::Right,
            joint: Fingertip::Middle
        }
    );

    let hand = Vec3::new(0.3, 1.0, -0.4);
    tracker.hand_at = Some(hand);
    pipeline.frame(FRAME, &mut tracker, &mut table);
    assert_eq!(pipeline.anchor_position(), hand);

    // a lost joint keeps the last known position
    tracker.hand_at = None;
    pipeline.frame(FRAME, &mut tracker, &mut table);
    assert_eq!(pipeline.anchor_position(), hand);
    for (ring, &id) in pipeline.rings().iter().zip(pipeline.instance_ids()) {
        let row = table.get(id).unwrap();
        let expected = hand + Vec3::Y * ring.vertical_offset;
        assert!((Vec3::from(row.translation) - expected).length() < 1e-6);
    }
}

#[test]
fn time_offset_accumulates_phase() {
    let mut table = ParameterTable::new();
    let mut pipeline = make_pipeline(6, &mut table);
    let mut tracker = MockTracker::new(false, Vec::new());
    pipeline.start(&mut tracker, Hand::Right, Fingertip::Index);
    for _ in 0..60 {
        pipeline.frame(FRAME, &mut tracker, &mut table);
    }
    for (ring, &id) in pipeline.rings().iter().zip(pipeline.instance_ids()) {
        let row = table.get(id).unwrap();
        let expected = ring.time_offset + ring.speed * 60.0 * FRAME.as_secs_f32();
        assert!(
            (row.time_offset - expected).abs() < 1e-3,
            "time offset {} vs {expected}",
            row.time_offset
        );
    }
}

#[test]
fn refused_parameters_do_not_stop_the_frame() {
    let mut table = ParameterTable::new();
    let mut pipeline = make_pipeline(7, &mut table);
    let mut tracker = MockTracker::new(false, Vec::new());
    pipeline.start(&mut tracker, Hand::Right, Fingertip::Index);
    let mut sink = PickySink::default();
    pipeline.frame(FRAME, &mut tracker, &mut sink);
    assert_eq!(sink.refused, 7);
    assert_eq!(sink.brightness_writes, 7);
    assert_eq!(sink.transforms, 7);
}

#[test]
fn shutdown_releases_tracking_and_stops_updates() {
    let mut table = ParameterTable::new();
    let mut pipeline = make_pipeline(4, &mut table);
    let mut tracker = MockTracker::new(true, closed_hand());
    pipeline.start(&mut tracker, Hand::Right, Fingertip::Index);
    for _ in 0..30 {
        pipeline.frame(FRAME, &mut tracker, &mut table);
    }
    let factor = pipeline.factor();
    let polls = tracker.polls;
    let snapshot = table.rows().to_vec();

    pipeline.shutdown(&mut tracker);
    assert!(tracker.released);
    assert_eq!(pipeline.mode(), TrackingMode::Stopped);
    for _ in 0..10 {
        assert_eq!(pipeline.frame(FRAME, &mut tracker, &mut table), factor);
    }
    assert_eq!(tracker.polls, polls);
    assert_eq!(table.rows(), &snapshot[..]);
}

#[test]
fn fallback_shutdown_has_nothing_to_release() {
    let mut table = ParameterTable::new();
    let mut pipeline = make_pipeline(1, &mut table);
    let mut tracker = MockTracker::new(false, Vec::new());
    pipeline.start(&mut tracker, Hand::Right, Fingertip::Index);
    pipeline.shutdown(&mut tracker);
    assert!(!tracker.released);
    assert_eq!(pipeline.mode(), TrackingMode::Stopped);
}

#[test]
fn parameter_table_rejects_unknown_names_and_ids() {
    let mut table = ParameterTable::new();
    let id = table.push_instance(&RingMaterial::default());
    assert!(table.set_float(id, PARAM_BRIGHTNESS, 0.4).is_ok());
    assert_eq!(table.get(id).unwrap().brightness, 0.4);
    assert!(table.set_color(id, PARAM_HUE_SECONDARY, Vec3::ONE).is_ok());
    assert_eq!(table.get(id).unwrap().hue_secondary, [1.0, 1.0, 1.0]);

    assert!(matches!(
        table.set_float(id, "Glow", 1.0),
        Err(ParameterError::Unknown(_))
    ));
    assert!(matches!(
        table.set_color(id, PARAM_BRIGHTNESS, Vec3::ZERO),
        Err(ParameterError::Unknown(_))
    ));
    assert!(matches!(
        table.set_float(id, PARAM_HUE_PRIMARY, 1.0),
        Err(ParameterError::Unknown(_))
    ));
    assert!(matches!(
        table.set_float(id + 5, PARAM_MODE, 1.0),
        Err(ParameterError::NoSuchInstance(_))
    ));
}

#[test]
fn material_apply_writes_every_named_parameter() {
    let mut table = ParameterTable::new();
    let id = table.push_instance(&RingMaterial::default());
    let material = RingMaterial {
        time_offset: 3.0,
        brightness: 0.5,
        speed: 1.1,
        mode: 1.0,
        hue_primary: Vec3::new(0.1, 0.2, 0.3),
        hue_secondary: Vec3::new(0.4, 0.5, 0.6),
        profile: GlowProfile::Sine,
    };
    material.apply(id, &mut table);
    assert_eq!(*table.get(id).unwrap(), InstanceParams::from_material(&material));
}

#[test]
fn registration_goes_through_named_parameters() {
    let material = RingMaterial {
        time_offset: 0.25,
        brightness: 0.7,
        speed: 0.9,
        mode: 1.0,
        hue_primary: Vec3::new(2.0, 0.5, 0.1),
        hue_secondary: Vec3::new(0.3, 0.3, 0.9),
        profile: GlowProfile::Sine,
    };
    let mut table = ParameterTable::new();
    let id = table.push_instance(&material);
    let row = *table.get(id).unwrap();
    assert_eq!(row, InstanceParams::from_material(&material));
    assert_eq!(row.scale, [1.0; 3]);
    assert_eq!(row.mode, 1.0);
    assert_eq!(row.profile, 1.0);
    assert_eq!(row.hue_primary, [2.0, 0.5, 0.1]);

    assert!(table.set_float(id, PARAM_PROFILE, 0.0).is_ok());
    assert_eq!(table.get(id).unwrap().profile, GlowProfile::Band.as_f32());
}

#[test]
fn instance_params_are_five_vec4s() {
    assert_eq!(std::mem::size_of::<InstanceParams>(), 80);
    assert_eq!(std::mem::size_of::<InstanceParams>() % 16, 0);
}
