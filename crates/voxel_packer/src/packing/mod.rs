//! Greedy box packing of the classified interior.
//!
//! Inside leaves are flattened into a uniform [`VoxelGrid`]. A BFS
//! [`DistanceField`] ranks voxels by depth below the interior boundary, and
//! boxes grow from the deepest unconsumed voxel until the coverage target is
//! met.
//!
//! ```text
//! Inside leaves ─► VoxelGrid ─► DistanceField ─► seed ─► expand ─► consume ─┐
//!                                                  ▲                         │
//!                                                  └──── coverage < target ──┘
//! ```
//!
//! # Module Structure
//!
//! - [`voxel_grid`]: `VoxelGrid`, `Voxel` - uniform interior voxels
//! - [`distance_field`]: `DistanceField` - BFS hop distance from the boundary
//! - [`packer`]: `pack`, `pack_grid`, `filter_small_boxes`

pub mod distance_field;
pub mod packer;
pub mod voxel_grid;

pub use distance_field::DistanceField;
pub use packer::{filter_small_boxes, pack, pack_grid};
pub use voxel_grid::{Voxel, VoxelGrid};

use crate::octree::DAabb3;

/// Final output of a packing run.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PackingResult {
  /// World-space boxes, in packing order, after small-box filtering.
  pub boxes: Vec<DAabb3>,
  /// `consumed_voxels / total_inside_voxels`, 0 for an empty interior.
  pub volume_coverage: f64,
  pub total_inside_voxels: usize,
  pub consumed_voxels: usize,
}

impl PackingResult {
  /// Result for a mesh with no interior.
  pub fn empty() -> Self {
    Self::default()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.boxes.is_empty()
  }
}

/// Why the packing loop stopped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
  /// No Inside voxels to pack.
  #[default]
  EmptyInterior,
  /// Coverage reached the configured threshold.
  CoverageReached,
  /// Every voxel is consumed.
  Exhausted,
  /// A box consumed nothing new.
  Stuck,
  /// `MAX_PACKING_ITERATIONS` boxes were packed.
  IterationCap,
}

/// Packing diagnostics, returned next to the [`PackingResult`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PackingStats {
  pub grid_key_collisions: usize,
  pub max_distance: u32,
  /// Packing loop iterations that produced a box.
  pub iterations: usize,
  pub boxes_before_filter: usize,
  pub boxes_filtered: usize,
  pub stop_reason: StopReason,
  /// Coverage after each accepted box. Non-decreasing.
  pub coverage_history: Vec<f64>,
}
