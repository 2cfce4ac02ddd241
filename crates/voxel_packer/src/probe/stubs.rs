//! Deterministic probes for tests and benches.
//!
//! Both stubs count their `sample` calls so tests can assert that a stage
//! did (or did not) consult the oracle.

use std::sync::atomic::{AtomicUsize, Ordering};

use glam::DVec3;

use super::{FaceStats, ProbeSample, VisibilityProbe};
use crate::error::{PackerError, Result};
use crate::mesh::Triangle;

/// Returns the same sample for every point.
#[derive(Debug)]
pub struct ConstantProbe {
  sample: ProbeSample,
  unavailable: Option<String>,
  calls: AtomicUsize,
}

impl ConstantProbe {
  pub fn new(sample: ProbeSample) -> Self {
    Self {
      sample,
      unavailable: None,
      calls: AtomicUsize::new(0),
    }
  }

  /// Every direction fully back-facing.
  pub fn inside() -> Self {
    Self::new([FaceStats::new(1.0, 0.0); 6])
  }

  /// Every direction fully front-facing.
  pub fn outside() -> Self {
    Self::new([FaceStats::new(0.0, 1.0); 6])
  }

  /// Nothing seen in any direction.
  pub fn blind() -> Self {
    Self::new([FaceStats::EMPTY; 6])
  }

  /// `check_ready` fails with `reason`.
  pub fn unavailable(reason: impl Into<String>) -> Self {
    Self {
      unavailable: Some(reason.into()),
      ..Self::blind()
    }
  }

  /// Number of `sample` calls so far.
  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::Relaxed)
  }
}

impl VisibilityProbe for ConstantProbe {
  fn check_ready(&self) -> Result<()> {
    match &self.unavailable {
      Some(reason) => Err(PackerError::ProbeUnavailable(reason.clone())),
      None => Ok(()),
    }
  }

  fn sample(&self, _point: DVec3, _cell_size: f64, _occluders: &[Triangle]) -> ProbeSample {
    self.calls.fetch_add(1, Ordering::Relaxed);
    self.sample
  }
}

/// Computes the sample from the point and cell size with a closure.
pub struct FnProbe<F> {
  f: F,
  calls: AtomicUsize,
}

impl<F> FnProbe<F>
where
  F: Fn(DVec3, f64) -> ProbeSample + Send + Sync,
{
  pub fn new(f: F) -> Self {
    Self {
      f,
      calls: AtomicUsize::new(0),
    }
  }

  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::Relaxed)
  }
}

impl<F> VisibilityProbe for FnProbe<F>
where
  F: Fn(DVec3, f64) -> ProbeSample + Send + Sync,
{
  fn sample(&self, point: DVec3, cell_size: f64, _occluders: &[Triangle]) -> ProbeSample {
    self.calls.fetch_add(1, Ordering::Relaxed);
    (self.f)(point, cell_size)
  }
}
