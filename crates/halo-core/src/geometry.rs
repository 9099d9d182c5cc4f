//! Procedural ring strips.
//!
//! A ring is an open cylinder of height `width` around the Y axis, unrolled
//! as a triangle strip: two vertices (bottom, top) per angular step.

use crate::constants::{
    BASE_RING_RADIUS, BASE_RING_WIDTH, DEFAULT_SEGMENTS, MAX_RING_VERTICES, MIN_SEGMENTS,
};
use crate::error::GeometryError;
use crate::mesh::{Aabb, MeshBuffers};
use glam::{Vec2, Vec3};
use std::f32::consts::TAU;

/// Immutable geometric parameters of one ring surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingDescriptor {
    pub radius: f32,
    pub width: f32,
    pub offset: Vec3,
    pub segments: u32,
}

impl Default for RingDescriptor {
    fn default() -> Self {
        Self {
            radius: BASE_RING_RADIUS,
            width: BASE_RING_WIDTH,
            offset: Vec3::ZERO,
            segments: DEFAULT_SEGMENTS,
        }
    }
}

impl RingDescriptor {
    pub fn new(radius: f32, width: f32, segments: u32) -> Self {
        Self {
            radius,
            width,
            offset: Vec3::ZERO,
            segments,
        }
    }

    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.segments as usize * 2
    }

    /// Checks the constraints every ring must meet before any buffer is sized.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.segments < MIN_SEGMENTS {
            return Err(GeometryError::invalid(format!(
                "segments must be at least {MIN_SEGMENTS}, got {}",
                self.segments
            )));
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(GeometryError::invalid(format!(
                "radius must be positive, got {}",
                self.radius
            )));
        }
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(GeometryError::invalid(format!(
                "width must be positive, got {}",
                self.width
            )));
        }
        if !self.offset.is_finite() {
            return Err(GeometryError::invalid("offset must be finite"));
        }
        if self.vertex_count() > MAX_RING_VERTICES {
            return Err(GeometryError::invalid(format!(
                "{} vertices would reach the 0xFFFF restart index",
                self.vertex_count()
            )));
        }
        Ok(())
    }
}

/// Which way a ring strip faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RingSide {
    Inside,
    Outside,
}

impl RingSide {
    pub const BOTH: [RingSide; 2] = [RingSide::Inside, RingSide::Outside];

    #[inline]
    pub fn normal_factor(self) -> f32 {
        match self {
            RingSide::Outside => 1.0,
            RingSide::Inside => -1.0,
        }
    }

    /// Index remap that flips strip winding: swaps the two vertices of
    /// every pair.
    #[inline]
    pub fn remap(self, local: u16) -> u16 {
        match self {
            RingSide::Outside => local,
            RingSide::Inside => local ^ 1,
        }
    }
}

/// Builds the strip for one ring.
///
/// Indices walk every vertex in emission order and then repeat the first
/// pair to close the seam, so a ring of `n` segments has `2n` vertices and
/// `2n + 2` indices.
pub fn generate_ring(desc: &RingDescriptor, side: RingSide) -> Result<MeshBuffers, GeometryError> {
    desc.validate()?;
    let vertex_count = desc.vertex_count();
    let mut mesh = MeshBuffers::with_capacity(vertex_count, vertex_count + 2);
    mesh.bounds = write_ring_vertices(desc, side.normal_factor(), &mut mesh, 0);

    mesh.indices
        .extend((0..vertex_count).map(|i| side.remap(i as u16)));
    mesh.indices.push(side.remap(0));
    mesh.indices.push(side.remap(1));
    Ok(mesh)
}

/// Writes one ring's vertex block into `mesh` starting at vertex `start`.
///
/// Each channel advances with its own cursor. Returns the bounds of the
/// written positions.
pub(crate) fn write_ring_vertices(
    desc: &RingDescriptor,
    normal_factor: f32,
    mesh: &mut MeshBuffers,
    start: usize,
) -> Aabb {
    let segments = desc.segments as usize;
    let half = desc.width * 0.5;
    let v_step = 1.0 / desc.segments as f32;
    let mut bounds = Aabb::EMPTY;

    let (mut pos_i, mut nrm_i, mut bit_i, mut uv_i) = (start, start, start, start);
    for i in 0..segments {
        let theta = TAU * i as f32 / desc.segments as f32;
        let (sin, cos) = theta.sin_cos();
        let x = desc.radius * cos;
        let z = desc.radius * sin;

        let bottom = Vec3::new(x, -half, z) + desc.offset;
        let top = Vec3::new(x, half, z) + desc.offset;
        mesh.positions[pos_i] = bottom;
        mesh.positions[pos_i + 1] = top;
        bounds.grow(bottom);
        bounds.grow(top);
        pos_i += 2;

        let normal = Vec3::new(cos, 0.0, sin) * normal_factor;
        mesh.normals[nrm_i] = normal;
        mesh.normals[nrm_i + 1] = normal;
        nrm_i += 2;

        let bitangent = Vec3::new(-sin, 0.0, cos);
        mesh.bitangents[bit_i] = bitangent;
        mesh.bitangents[bit_i + 1] = bitangent;
        bit_i += 2;

        let v = i as f32 * v_step;
        mesh.uv0[uv_i] = Vec2::new(0.0, v);
        mesh.uv0[uv_i + 1] = Vec2::new(1.0, v);
        uv_i += 2;
    }
    bounds
}
