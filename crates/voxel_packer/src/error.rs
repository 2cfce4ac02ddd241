//! Error types for the voxelization pipeline.
//!
//! Only caller contract violations are errors. Ambiguous seeds, stuck
//! packing and iteration caps degrade the result instead of failing it.

use thiserror::Error;

/// Errors that abort a run before any subdivision happens.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PackerError {
  /// The mesh has no vertices to bound.
  #[error("mesh has no vertices")]
  EmptyMesh,

  /// A triangle references a vertex that does not exist.
  #[error("triangle {triangle} references vertex {index}, but mesh has {vertex_count} vertices")]
  InvalidIndex {
    triangle: usize,
    index: u32,
    vertex_count: usize,
  },

  /// Vertex positions or the transform produced NaN/infinite coordinates.
  #[error("mesh geometry contains non-finite coordinates")]
  NonFiniteGeometry,

  /// Configuration value out of range.
  #[error("invalid configuration: {0}")]
  InvalidConfig(String),

  /// The visibility probe cannot sample (missing renderer, shader, ...).
  #[error("visibility probe unavailable: {0}")]
  ProbeUnavailable(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PackerError>;
