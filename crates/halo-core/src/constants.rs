use glam::Vec3;

// Shared tuning constants for the ring cluster and the gesture pipeline.

// Geometry
pub const DEFAULT_SEGMENTS: u32 = 120; // angular tessellation of one ring
pub const MIN_SEGMENTS: u32 = 3;
pub const BASE_RING_RADIUS: f32 = 1.0; // unit ring, instances scale it down
pub const BASE_RING_WIDTH: f32 = 0.01; // strip extent along Y
pub const RESTART_INDEX: u16 = 0xFFFF; // primitive-restart sentinel
// Indices stay below the sentinel, so a ring or batch tops out at 0xFFFF vertices.
pub const MAX_RING_VERTICES: usize = RESTART_INDEX as usize;
pub const MAX_BATCH_VERTICES: usize = RESTART_INDEX as usize;

// Cluster layout
pub const RING_COUNT: usize = 100;
pub const SCALE_MIN: f32 = 0.05; // smallest ring scale
pub const SCALE_JITTER: f32 = 0.01; // disc-x mapped onto scale
pub const VERTICAL_JITTER: f32 = 0.01; // disc-y mapped onto vertical offset
pub const TIME_OFFSET_MAX: f32 = 10.0;
pub const SPEED_RANGE: (f32, f32) = (0.8, 1.2);
pub const BRIGHTNESS_RANGE: (f32, f32) = (0.35, 0.6);
pub const FALLBACK_ANCHOR: [f32; 3] = [0.0, 1.2, -0.7]; // fixed parent when no hand is tracked

// Gesture spread bounds (metres between the farthest fingertips)
pub const SPREAD_LOW_M: f32 = 0.05;
pub const SPREAD_HIGH_M: f32 = 0.15;
pub const SPREAD_HIGH_TIGHT_M: f32 = 0.08;

// Asymmetric smoothing rates (fraction of the remaining gap per frame)
pub const GESTURE_RISE_RATE: f32 = 0.0035; // fingers closing: slow ramp up
pub const GESTURE_FALL_RATE: f32 = 0.0065; // fingers opening: faster ramp down

// Gesture gains
pub const SPEED_GAIN: f32 = 6.0; // phase speed multiplier at full gesture
pub const BRIGHTNESS_GAIN: f32 = 1.5;
pub const SHRINK_GAIN: f32 = 0.9; // fraction of scale removed at full gesture

// Vertical bobbing, independent of the gesture factor
pub const BOB_AMPLITUDE: f32 = 0.004;
pub const BOB_FREQUENCY: f32 = 1.3; // radians per second

// Glow material presets
pub const HUE_WARM: [f32; 3] = [1.5, 0.8, 0.3];
pub const HUE_COOL: [f32; 3] = [0.8, 1.0, 1.5];

#[inline]
pub fn fallback_anchor_vec3() -> Vec3 {
    Vec3::from(FALLBACK_ANCHOR)
}
