// Viewer tuning constants.
//
// Scene units are metres; the ring cluster is a few centimetres across, so
// the camera sits close to the anchor.
use glam::Vec3;

// Camera, relative to the cluster anchor
pub const CAMERA_BACK_M: f32 = 0.28;
pub const CAMERA_UP_M: f32 = 0.06;
pub const CAMERA_FOVY: f32 = std::f32::consts::FRAC_PI_4;
pub const CAMERA_ZNEAR: f32 = 0.01;
pub const CAMERA_ZFAR: f32 = 20.0;

// Simulated hand: where it sits and how far the pointer can spread it
pub const HAND_POSITION: Vec3 = Vec3::new(0.0, 1.2, -0.7);
pub const POINTER_SPREAD_MAX_M: f32 = 0.2; // spread at the window corner
pub const POINTER_FINGER_COUNT: usize = 5;

// Guide rings baked into a single double-sided batch
pub const GUIDE_RADII: [f32; 3] = [0.09, 0.115, 0.14];
pub const GUIDE_WIDTH: f32 = 0.002;
pub const GUIDE_SEGMENTS: u32 = 96;
pub const GUIDE_BRIGHTNESS: f32 = 0.15;

// Background
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.01,
    g: 0.01,
    b: 0.02,
    a: 1.0,
};

// Session
pub const CLUSTER_SEED: u64 = 42;
