//! Per-frame gesture pipeline over an owned list of ring instances.
//!
//! Single-threaded: `frame` runs once per rendered frame on the render
//! thread and is the only writer of instance state.

use crate::gesture::{animate_instance, GestureConfig, GestureSmoother};
use crate::instance::{ClusterConfig, RingInstance};
use crate::params::{
    push_float, InstanceId, ParameterSink, RingMaterial, PARAM_BRIGHTNESS, PARAM_SPEED,
    PARAM_TIME_OFFSET,
};
use crate::tracking::{Anchor, Fingertip, Hand, HandTracker, TrackedJoints, TrackingAvailability};
use glam::Vec3;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackingMode {
    /// Tracking has not been requested yet.
    Pending,
    Live,
    /// Tracking was refused; the cluster sits at a fixed anchor.
    Fallback,
    Stopped,
}

pub struct GesturePipeline {
    config: GestureConfig,
    smoother: GestureSmoother,
    rings: Vec<RingInstance>,
    ids: Vec<InstanceId>,
    anchor: Anchor,
    anchor_position: Vec3,
    mode: TrackingMode,
    joints: TrackedJoints,
    elapsed_sec: f32,
}

impl GesturePipeline {
    /// Takes ownership of `rings` and registers one sink instance per ring,
    /// each created from its own material record.
    pub fn new<F>(
        rings: Vec<RingInstance>,
        cluster: &ClusterConfig,
        config: GestureConfig,
        fallback_anchor: Vec3,
        mut register: F,
    ) -> Self
    where
        F: FnMut(&RingMaterial) -> InstanceId,
    {
        let ids = rings
            .iter()
            .map(|ring| register(&ring.material(cluster)))
            .collect();
        Self {
            smoother: GestureSmoother::new(&config),
            config,
            rings,
            ids,
            anchor: Anchor::Fixed(fallback_anchor),
            anchor_position: fallback_anchor,
            mode: TrackingMode::Pending,
            joints: TrackedJoints::new(),
            elapsed_sec: 0.0,
        }
    }

    /// Requests tracking once and picks the anchor accordingly. There is no
    /// retry: a refusal keeps the cluster on the fixed anchor for the session.
    pub fn start<T: HandTracker + ?Sized>(
        &mut self,
        tracker: &mut T,
        hand: Hand,
        joint: Fingertip,
    ) -> TrackingMode {
        if self.mode != TrackingMode::Pending {
            return self.mode;
        }
        self.mode = match tracker.request() {
            TrackingAvailability::Granted => {
                log::info!("[gesture] hand tracking granted, anchoring to {hand:?} {joint:?}");
                self.anchor = Anchor::TrackedHand { hand, joint };
                TrackingMode::Live
            }
            TrackingAvailability::Unavailable => {
                log::warn!(
                    "[gesture] hand tracking unavailable, using fixed anchor ({:.2},{:.2},{:.2})",
                    self.anchor_position.x,
                    self.anchor_position.y,
                    self.anchor_position.z
                );
                TrackingMode::Fallback
            }
        };
        self.mode
    }

    /// Runs one frame and pushes every instance's parameters into `sink`.
    /// Returns the gesture factor used for this frame.
    pub fn frame<T, S>(&mut self, dt: Duration, tracker: &mut T, sink: &mut S) -> f32
    where
        T: HandTracker + ?Sized,
        S: ParameterSink + ?Sized,
    {
        if self.mode == TrackingMode::Stopped {
            return self.smoother.factor();
        }
        let dt_sec = dt.as_secs_f32();
        self.elapsed_sec += dt_sec;

        if self.mode == TrackingMode::Live {
            if tracker.poll(&mut self.joints) {
                self.smoother.observe(&self.joints);
            }
            if let Anchor::TrackedHand { hand, joint } = self.anchor {
                if let Some(p) = tracker.anchor_position(hand, joint) {
                    self.anchor_position = p;
                }
            }
        }

        let factor = self.smoother.factor();
        for (ring, &id) in self.rings.iter_mut().zip(&self.ids) {
            animate_instance(ring, factor, dt_sec, self.elapsed_sec, &self.config);
            push_float(sink, id, PARAM_TIME_OFFSET, ring.time_offset + ring.time_phase);
            push_float(sink, id, PARAM_BRIGHTNESS, ring.brightness);
            push_float(
                sink,
                id,
                PARAM_SPEED,
                ring.speed * (1.0 + factor * self.config.speed_gain),
            );
            sink.set_transform(
                id,
                Vec3::new(ring.scale, 1.0, ring.scale),
                self.anchor_position + Vec3::Y * ring.vertical_offset,
            );
        }
        factor
    }

    /// Releases the tracking subscription; later frames do nothing.
    pub fn shutdown<T: HandTracker + ?Sized>(&mut self, tracker: &mut T) {
        if self.mode == TrackingMode::Live {
            tracker.release();
        }
        self.mode = TrackingMode::Stopped;
        log::info!("[gesture] pipeline stopped");
    }

    pub fn factor(&self) -> f32 {
        self.smoother.factor()
    }

    pub fn mode(&self) -> TrackingMode {
        self.mode
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn anchor_position(&self) -> Vec3 {
        self.anchor_position
    }

    pub fn rings(&self) -> &[RingInstance] {
        &self.rings
    }

    pub fn instance_ids(&self) -> &[InstanceId] {
        &self.ids
    }
}
