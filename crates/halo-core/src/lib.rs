pub mod batch;
pub mod constants;
pub mod draw_order;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod instance;
pub mod mesh;
pub mod params;
pub mod pipeline;
pub mod sampling;
pub mod tracking;
pub static RING_WGSL: &str = include_str!("../shaders/ring.wgsl");

pub use batch::*;
pub use constants::*;
pub use draw_order::*;
pub use error::*;
pub use geometry::*;
pub use gesture::*;
pub use instance::*;
pub use mesh::*;
pub use params::*;
pub use pipeline::*;
pub use sampling::*;
pub use tracking::*;
