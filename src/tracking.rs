//! Desktop stand-in for hand tracking.
//!
//! The pointer's distance from the window centre sets how far five
//! fingertips fan out around a fixed hand position: cursor in the middle
//! means a closed pinch, cursor at a corner means fingers spread wide.

use crate::constants::{HAND_POSITION, POINTER_FINGER_COUNT, POINTER_SPREAD_MAX_M};
use glam::{Vec2, Vec3};
use halo_core::{Fingertip, Hand, HandTracker, TrackedJoints, TrackingAvailability};
use std::f32::consts::TAU;

pub struct PointerHand {
    enabled: bool,
    released: bool,
    /// Simulated tracking loss, toggled from the keyboard.
    lost: bool,
    uv: Option<Vec2>,
}

impl PointerHand {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            released: false,
            lost: false,
            uv: None,
        }
    }

    /// Pointer position normalised to the window, `[0,1]` on both axes.
    pub fn set_pointer_uv(&mut self, uv: Vec2) {
        self.uv = Some(uv.clamp(Vec2::ZERO, Vec2::ONE));
    }

    pub fn pointer_left(&mut self) {
        self.uv = None;
    }

    pub fn toggle_lost(&mut self) -> bool {
        self.lost = !self.lost;
        self.lost
    }

    fn live(&self) -> bool {
        self.enabled && !self.released && !self.lost
    }
}

/// Fingertip spread for a pointer position: 0 at the centre, max at a corner.
pub fn spread_for_uv(uv: Vec2) -> f32 {
    let off = (uv - Vec2::splat(0.5)).length() / std::f32::consts::FRAC_1_SQRT_2;
    off.clamp(0.0, 1.0) * POINTER_SPREAD_MAX_M
}

/// Fingertips evenly placed on a circle of diameter `spread`. With an odd
/// count the farthest pair sits slightly closer than `spread`.
fn fan_fingertips(spread: f32, out: &mut TrackedJoints) {
    out.clear();
    let r = spread * 0.5;
    for i in 0..POINTER_FINGER_COUNT {
        let a = TAU * i as f32 / POINTER_FINGER_COUNT as f32;
        out.push(HAND_POSITION + Vec3::new(r * a.cos(), r * a.sin(), 0.0));
    }
}

impl HandTracker for PointerHand {
    fn request(&mut self) -> TrackingAvailability {
        if self.enabled {
            TrackingAvailability::Granted
        } else {
            TrackingAvailability::Unavailable
        }
    }

    fn poll(&mut self, out: &mut TrackedJoints) -> bool {
        if !self.live() {
            return false;
        }
        match self.uv {
            Some(uv) => {
                fan_fingertips(spread_for_uv(uv), out);
                true
            }
            None => false,
        }
    }

    fn anchor_position(&mut self, _hand: Hand, _joint: Fingertip) -> Option<Vec3> {
        self.live().then_some(HAND_POSITION)
    }

    fn release(&mut self) {
        self.released = true;
    }
}
