//! Interface to the hand-tracking capability.

use glam::Vec3;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Hand {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Fingertip {
    Thumb,
    Index,
    Middle,
    Ring,
    Little,
}

impl Fingertip {
    pub const ALL: [Fingertip; 5] = [
        Fingertip::Thumb,
        Fingertip::Index,
        Fingertip::Middle,
        Fingertip::Ring,
        Fingertip::Little,
    ];
}

/// One frame's fingertip positions; fits both hands without allocating.
pub type TrackedJoints = SmallVec<[Vec3; 10]>;

/// Outcome of the one-time tracking request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackingAvailability {
    Granted,
    Unavailable,
}

/// Where the ring cluster is parented.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Anchor {
    /// Follows a tracked joint.
    TrackedHand { hand: Hand, joint: Fingertip },
    /// Fixed point in world space, used when tracking is unavailable.
    Fixed(Vec3),
}

/// Live source of fingertip positions.
///
/// `poll` must return immediately: it reports the latest known sample or
/// that none is available, and never waits.
pub trait HandTracker {
    /// Asks once for access to tracking data.
    fn request(&mut self) -> TrackingAvailability;

    /// Replaces `out` with the latest tracked fingertip positions. Returns
    /// `false` when no sample is available this frame.
    fn poll(&mut self, out: &mut TrackedJoints) -> bool;

    /// World position of the anchor joint, if currently tracked.
    fn anchor_position(&mut self, hand: Hand, joint: Fingertip) -> Option<Vec3>;

    /// Ends the subscription. Called once on teardown.
    fn release(&mut self);
}
