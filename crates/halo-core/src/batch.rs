//! Packs many rings into one shared vertex/index buffer pair.
//!
//! Each ring contributes a contiguous vertex block and a strip run closed by
//! `(first, second, RESTART_INDEX)`, so consecutive rings never stitch into
//! each other and the whole batch draws with a single call.

use crate::constants::{MAX_BATCH_VERTICES, RESTART_INDEX};
use crate::error::{BatchError, GeometryError};
use crate::geometry::{write_ring_vertices, RingDescriptor, RingSide};
use crate::mesh::MeshBuffers;

/// Which surfaces of every ring are baked into the batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchFaces {
    /// One outward-facing surface per ring.
    Front,
    /// Front surface plus an inward-facing copy, for renderers without
    /// back-face handling.
    DoubleSided,
}

impl BatchFaces {
    #[inline]
    fn copies(self) -> usize {
        match self {
            BatchFaces::Front => 1,
            BatchFaces::DoubleSided => 2,
        }
    }
}

/// Where one ring landed inside the shared buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchRange {
    /// Position of the ring in the input list.
    pub ring: usize,
    pub vertex_start: usize,
    pub vertex_count: usize,
    pub index_start: usize,
    pub index_count: usize,
}

/// A ring left out of the batch and why.
#[derive(Clone, Debug, PartialEq)]
pub struct RejectedRing {
    pub index: usize,
    pub error: GeometryError,
}

#[derive(Clone, Debug)]
pub struct RingBatch {
    pub mesh: MeshBuffers,
    pub ranges: Vec<BatchRange>,
    pub rejected: Vec<RejectedRing>,
}

/// Builds one mesh holding every valid ring in `rings`, in input order.
///
/// Rings that fail validation are skipped and reported in
/// [`RingBatch::rejected`]. The batch itself fails only when nothing is left
/// to build or when the surviving rings need more vertices than 16-bit
/// indices can address without touching the restart sentinel.
pub fn build_batch(rings: &[RingDescriptor], faces: BatchFaces) -> Result<RingBatch, BatchError> {
    let mut accepted = Vec::with_capacity(rings.len());
    let mut rejected = Vec::new();
    for (index, ring) in rings.iter().enumerate() {
        match ring.validate() {
            Ok(()) => accepted.push((index, ring)),
            Err(error) => {
                log::warn!("[batch] skipping ring {index}: {error}");
                rejected.push(RejectedRing { index, error });
            }
        }
    }
    if accepted.is_empty() {
        return Err(BatchError::Empty {
            rejected: rejected.len(),
        });
    }

    let copies = faces.copies();
    let required: usize = accepted
        .iter()
        .map(|(_, r)| r.vertex_count() * copies)
        .sum();
    if required > MAX_BATCH_VERTICES {
        return Err(BatchError::ResourceAllocationFailure {
            required,
            limit: MAX_BATCH_VERTICES,
        });
    }
    let index_capacity: usize = accepted
        .iter()
        .map(|(_, r)| (r.vertex_count() + 3) * copies)
        .sum();

    let mut mesh = MeshBuffers::with_capacity(required, index_capacity);
    let mut ranges = Vec::with_capacity(accepted.len());
    let mut vertex_start = 0usize;
    for (ring, desc) in accepted {
        let n = desc.vertex_count();
        let bounds = write_ring_vertices(
            desc,
            RingSide::Outside.normal_factor(),
            &mut mesh,
            vertex_start,
        );
        mesh.bounds = mesh.bounds.union(&bounds);

        let index_start = mesh.indices.len();
        push_strip_run(&mut mesh.indices, vertex_start, n, RingSide::Outside);
        if faces == BatchFaces::DoubleSided {
            let back_start = vertex_start + n;
            copy_back_block(&mut mesh, vertex_start, back_start, n);
            push_strip_run(&mut mesh.indices, back_start, n, RingSide::Inside);
        }

        ranges.push(BatchRange {
            ring,
            vertex_start,
            vertex_count: n * copies,
            index_start,
            index_count: mesh.indices.len() - index_start,
        });
        vertex_start += n * copies;
    }

    log::debug!(
        "[batch] rings={} rejected={} vertices={} indices={}",
        ranges.len(),
        rejected.len(),
        mesh.vertex_count(),
        mesh.index_count()
    );
    Ok(RingBatch {
        mesh,
        ranges,
        rejected,
    })
}

/// Appends one ring's strip followed by its seam closer and a restart marker.
fn push_strip_run(indices: &mut Vec<u16>, base: usize, vertex_count: usize, side: RingSide) {
    let at = |local: usize| (base + side.remap(local as u16) as usize) as u16;
    indices.extend((0..vertex_count).map(at));
    indices.push(at(0));
    indices.push(at(1));
    indices.push(RESTART_INDEX);
}

/// Duplicates the front block at `front` into `back` with negated normals.
///
/// Positions are copied rather than recomputed so both faces stay
/// bit-identical.
fn copy_back_block(mesh: &mut MeshBuffers, front: usize, back: usize, count: usize) {
    let src = front..front + count;
    mesh.positions.copy_within(src.clone(), back);
    mesh.bitangents.copy_within(src.clone(), back);
    mesh.uv0.copy_within(src, back);
    for k in 0..count {
        mesh.normals[back + k] = -mesh.normals[front + k];
    }
}
