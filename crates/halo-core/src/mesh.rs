//! CPU-side mesh buffers handed to the renderer.
//!
//! Vertex data is kept as one array per channel rather than interleaved, so
//! each channel can be written with its own cursor and uploaded as its own
//! vertex buffer. Only `uv0` carries data; `uv1` and `uv2` are kept zeroed so
//! the layout matches what the ring material expects.

use crate::constants::RESTART_INDEX;
use glam::{Vec2, Vec3};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Topology {
    TriangleStrip,
}

/// Axis-aligned bounding box, grown one point at a time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// An inverted box that any point will replace.
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    #[inline]
    pub fn grow(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[derive(Clone, Debug)]
pub struct MeshBuffers {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub bitangents: Vec<Vec3>,
    pub uv0: Vec<Vec2>,
    pub uv1: Vec<Vec2>,
    pub uv2: Vec<Vec2>,
    pub indices: Vec<u16>,
    pub topology: Topology,
    pub bounds: Aabb,
}

impl MeshBuffers {
    /// Zero-filled channels of exactly `vertex_count` entries and an index
    /// buffer with `index_capacity` reserved.
    pub(crate) fn with_capacity(vertex_count: usize, index_capacity: usize) -> Self {
        Self {
            positions: vec![Vec3::ZERO; vertex_count],
            normals: vec![Vec3::ZERO; vertex_count],
            bitangents: vec![Vec3::ZERO; vertex_count],
            uv0: vec![Vec2::ZERO; vertex_count],
            uv1: vec![Vec2::ZERO; vertex_count],
            uv2: vec![Vec2::ZERO; vertex_count],
            indices: Vec::with_capacity(index_capacity),
            topology: Topology::TriangleStrip,
            bounds: Aabb::EMPTY,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn normal_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }

    pub fn bitangent_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.bitangents)
    }

    /// Byte views of the three uv channels, in channel order.
    pub fn uv_bytes(&self) -> [&[u8]; 3] {
        [
            bytemuck::cast_slice(&self.uv0),
            bytemuck::cast_slice(&self.uv1),
            bytemuck::cast_slice(&self.uv2),
        ]
    }

    /// Index data padded to a 4-byte multiple, as GPU buffer writes require.
    pub fn index_bytes_padded(&self) -> Vec<u8> {
        let mut bytes = bytemuck::cast_slice::<u16, u8>(&self.indices).to_vec();
        if bytes.len() % 4 != 0 {
            bytes.extend_from_slice(&RESTART_INDEX.to_ne_bytes());
        }
        bytes
    }

    /// Triangles produced by walking the strip, skipping restart markers.
    ///
    /// Every other triangle has its first two corners swapped so all
    /// triangles come out with the winding the renderer sees.
    pub fn strip_triangles(&self) -> Vec<[u16; 3]> {
        let mut out = Vec::new();
        for run in self.indices.split(|&i| i == RESTART_INDEX) {
            for (k, w) in run.windows(3).enumerate() {
                if k % 2 == 0 {
                    out.push([w[0], w[1], w[2]]);
                } else {
                    out.push([w[1], w[0], w[2]]);
                }
            }
        }
        out
    }
}
