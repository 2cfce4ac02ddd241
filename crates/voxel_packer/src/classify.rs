//! Seed classification: decide Inside/Outside for empty leaves with the
//! visibility probe.
//!
//! ```text
//! candidate leaf ──► outside mesh bounds? ──yes──► Outside (not a seed, no probe call)
//!                           │ no
//!                           ▼
//!                    probe.sample(center)
//!                           │
//!            red ≥ min_faces_for_inside ──► Inside  (seed)
//!            blue > 0 and red < 2       ──► Outside (seed)
//!            otherwise                  ──► Unknown (left for propagation)
//! ```
//!
//! "red" directions see back faces above `red_threshold`; "blue" directions
//! see any front face.

use glam::DVec3;
use rayon::prelude::*;

use crate::config::PackerConfig;
use crate::mesh::Triangle;
use crate::octree::{CellId, CellStatus, Octree};
use crate::probe::{ProbeSample, VisibilityProbe};

/// Outcome of classifying one probe sample.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SeedVerdict {
  Inside,
  Outside,
  Ambiguous,
}

/// Counters from one [`classify_seeds`] pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeedReport {
  pub candidates: usize,
  /// Settled Outside by the mesh-bounds test without sampling.
  pub fast_rejected: usize,
  pub probe_samples: usize,
  pub seeds_inside: usize,
  pub seeds_outside: usize,
  pub ambiguous: usize,
}

/// Unknown leaves without geometry, in leaf order.
pub fn find_candidates(octree: &Octree) -> Vec<CellId> {
  octree
    .leaves()
    .into_iter()
    .filter(|&id| {
      let state = octree.state(id);
      state.status == CellStatus::Unknown && !state.contains_geometry && !state.is_known
    })
    .collect()
}

/// Apply the red/blue policy to one sample.
pub fn classify_stats(sample: &ProbeSample, config: &PackerConfig) -> SeedVerdict {
  let red = sample
    .iter()
    .filter(|s| s.back_facing_fraction > config.red_threshold)
    .count();
  let blue = sample
    .iter()
    .filter(|s| s.front_facing_fraction > 0.0)
    .count();

  if red >= config.min_faces_for_inside as usize {
    SeedVerdict::Inside
  } else if blue > 0 && red < 2 {
    SeedVerdict::Outside
  } else {
    SeedVerdict::Ambiguous
  }
}

/// Classify every candidate leaf and mark the decided ones as known seeds.
///
/// Sampling may run on the rayon pool; verdicts are applied afterwards in
/// candidate order, so the tree ends up identical either way.
#[tracing::instrument(skip_all, name = "classify::classify_seeds")]
pub fn classify_seeds<P: VisibilityProbe + ?Sized>(
  octree: &mut Octree,
  probe: &P,
  occluders: &[Triangle],
  config: &PackerConfig,
) -> SeedReport {
  let candidates = find_candidates(octree);
  let mut report = SeedReport {
    candidates: candidates.len(),
    ..Default::default()
  };

  let mesh_bounds = *octree.mesh_bounds();
  let mut to_sample: Vec<(CellId, DVec3, f64)> = Vec::with_capacity(candidates.len());
  for id in candidates {
    let cell = octree.cell(id);
    if cell.bounds.overlaps(&mesh_bounds) {
      to_sample.push((id, cell.bounds.center(), cell.size()));
    } else if octree.state_mut(id).settle(CellStatus::Outside, false) {
      report.fast_rejected += 1;
    }
  }

  let samples: Vec<ProbeSample> = {
    let _span = tracing::info_span!("probe_samples", count = to_sample.len()).entered();
    let sample = |&(_, center, size): &(CellId, DVec3, f64)| probe.sample(center, size, occluders);
    if config.parallel_sampling {
      to_sample.par_iter().map(sample).collect()
    } else {
      to_sample.iter().map(sample).collect()
    }
  };
  report.probe_samples = samples.len();

  for ((id, ..), sample) in to_sample.iter().zip(&samples) {
    let state = octree.state_mut(*id);
    match classify_stats(sample, config) {
      SeedVerdict::Inside => {
        state.settle(CellStatus::Inside, true);
        report.seeds_inside += 1;
      }
      SeedVerdict::Outside => {
        state.settle(CellStatus::Outside, true);
        report.seeds_outside += 1;
      }
      SeedVerdict::Ambiguous => report.ambiguous += 1,
    }
  }

  tracing::debug!(
    candidates = report.candidates,
    fast_rejected = report.fast_rejected,
    inside = report.seeds_inside,
    outside = report.seeds_outside,
    ambiguous = report.ambiguous,
    "seeds classified"
  );
  report
}

#[cfg(test)]
#[path = "classify_test.rs"]
mod classify_test;
