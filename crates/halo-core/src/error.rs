//! Error types for geometry construction and parameter pushes.

use thiserror::Error;

/// A single ring could not be built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("invalid ring geometry: {reason}")]
    InvalidGeometryConfiguration { reason: String },
}

impl GeometryError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidGeometryConfiguration {
            reason: reason.into(),
        }
    }
}

/// A batch as a whole could not be built. No partial mesh is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BatchError {
    #[error("batch needs {required} vertices, limit is {limit}")]
    ResourceAllocationFailure { required: usize, limit: usize },
    #[error("no ring in the batch could be built ({rejected} rejected)")]
    Empty { rejected: usize },
}

/// A named parameter write was refused by the sink.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    #[error("material has no parameter named {0:?}")]
    Unknown(String),
    #[error("no instance with id {0}")]
    NoSuchInstance(usize),
}
