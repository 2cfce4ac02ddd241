//! PackerConfig - immutable tuning values for one voxelization run.

use crate::error::{PackerError, Result};

/// Deepest octree level accepted. Deeper requests are clamped.
pub const MAX_OCTREE_DEPTH: u8 = 8;

/// Configuration passed by value into every pipeline stage.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
  feature = "serde",
  derive(serde::Serialize, serde::Deserialize),
  serde(default)
)]
pub struct PackerConfig {
  /// Maximum octree depth (root = depth 0).
  pub max_depth: u8,

  /// Probe sample resolution. The CPU probe casts
  /// `clamp(sample_resolution / 16, 1, 32)²` rays per direction.
  pub sample_resolution: u32,

  /// Packing stops once this fraction of interior voxels is boxed.
  pub coverage_threshold: f64,

  /// Boxes smaller than this fraction of the summed box volume are dropped.
  pub min_box_volume_fraction: f64,

  /// Back-facing fraction above which a direction counts as pointing into
  /// solid interior.
  pub red_threshold: f64,

  /// Interior-pointing directions required for an Inside seed.
  pub min_faces_for_inside: u8,

  /// Votes required before propagation finalises a cell.
  pub confidence_threshold: u32,

  /// Relative padding applied to the mesh bounds before subdivision.
  pub bounds_padding: f64,

  /// Sample seed candidates on the rayon pool.
  pub parallel_sampling: bool,
}

impl Default for PackerConfig {
  fn default() -> Self {
    Self {
      max_depth: 5,
      sample_resolution: 128,
      coverage_threshold: 0.80,
      min_box_volume_fraction: 0.01,
      red_threshold: 0.03,
      min_faces_for_inside: 4,
      confidence_threshold: 16,
      bounds_padding: 0.01,
      parallel_sampling: true,
    }
  }
}

impl PackerConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_max_depth(mut self, max_depth: u8) -> Self {
    self.max_depth = max_depth;
    self
  }

  pub fn with_sample_resolution(mut self, sample_resolution: u32) -> Self {
    self.sample_resolution = sample_resolution;
    self
  }

  pub fn with_coverage_threshold(mut self, coverage_threshold: f64) -> Self {
    self.coverage_threshold = coverage_threshold;
    self
  }

  pub fn with_min_box_volume_fraction(mut self, fraction: f64) -> Self {
    self.min_box_volume_fraction = fraction;
    self
  }

  pub fn with_confidence_threshold(mut self, confidence_threshold: u32) -> Self {
    self.confidence_threshold = confidence_threshold;
    self
  }

  pub fn with_parallel_sampling(mut self, parallel_sampling: bool) -> Self {
    self.parallel_sampling = parallel_sampling;
    self
  }

  /// Octree depth actually used, after clamping to [`MAX_OCTREE_DEPTH`].
  #[inline]
  pub fn effective_max_depth(&self) -> u8 {
    self.max_depth.min(MAX_OCTREE_DEPTH)
  }

  /// Rays cast per axis of a probe face (the face casts this squared).
  #[inline]
  pub fn rays_per_axis(&self) -> u32 {
    (self.sample_resolution / 16).clamp(1, 32)
  }

  /// Reject values no stage can work with.
  pub fn validate(&self) -> Result<()> {
    fn unit_range(name: &str, value: f64) -> Result<()> {
      if !(0.0..=1.0).contains(&value) {
        return Err(PackerError::InvalidConfig(format!(
          "{name} must be within [0, 1], got {value}"
        )));
      }
      Ok(())
    }

    unit_range("coverage_threshold", self.coverage_threshold)?;
    unit_range("min_box_volume_fraction", self.min_box_volume_fraction)?;
    unit_range("red_threshold", self.red_threshold)?;

    if self.sample_resolution == 0 {
      return Err(PackerError::InvalidConfig(
        "sample_resolution must be positive".into(),
      ));
    }
    if !(1..=6).contains(&self.min_faces_for_inside) {
      return Err(PackerError::InvalidConfig(format!(
        "min_faces_for_inside must be within 1..=6, got {}",
        self.min_faces_for_inside
      )));
    }
    if self.confidence_threshold == 0 {
      return Err(PackerError::InvalidConfig(
        "confidence_threshold must be at least 1".into(),
      ));
    }
    if !self.bounds_padding.is_finite() || self.bounds_padding < 0.0 {
      return Err(PackerError::InvalidConfig(format!(
        "bounds_padding must be a non-negative number, got {}",
        self.bounds_padding
      )));
    }
    Ok(())
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
