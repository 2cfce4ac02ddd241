//! Status propagation: known cells vote on their unclassified neighbours.
//!
//! A FIFO queue starts with every probe-classified seed. Each dequeued cell
//! casts one vote (its own status) on every visible, not-yet-known neighbour.
//! A neighbour reaching `confidence_threshold` votes for one side is settled
//! and queued in turn, so classification spreads outward from the seeds.
//!
//! ```text
//! seed ──vote──► neighbour (votes_inside = 16) ──settle──► Inside ──vote──► ...
//! ```
//!
//! This is majority relaxation, not a shortest path: the result depends on
//! queue order, which is fixed (seeds in leaf order, neighbours by `CellId`).

use std::collections::{HashMap, VecDeque};

use glam::{DVec3, IVec3};

use crate::config::PackerConfig;
use crate::octree::{CellId, CellStatus, Octree};

/// Search radius for neighbours, in multiples of the dequeued cell size.
const SEARCH_RADIUS: f64 = 3.0;
/// Per-axis tolerance for grid adjacency.
const ADJACENT_AXIS_TOLERANCE: f64 = 1.1;
/// Distance below which any cell counts as a neighbour.
const NEAR_RADIUS: f64 = 1.5;

/// Counters from one [`propagate`] pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropagationReport {
  /// Cells dequeued.
  pub iterations: usize,
  pub propagated_inside: usize,
  pub propagated_outside: usize,
  /// Stopped at the iteration cap with work still queued.
  pub capped: bool,
}

/// Whether a cell at offset `delta` is visible from a cell of edge `size`.
///
/// Within `3 × size`, and either grid-adjacent (at least two axes within
/// `1.1 × size`) or closer than `1.5 × size`.
pub fn is_visible_neighbor(delta: DVec3, size: f64) -> bool {
  let distance = delta.length();
  if distance > SEARCH_RADIUS * size {
    return false;
  }
  let aligned_axes = delta
    .abs()
    .to_array()
    .iter()
    .filter(|&&d| d <= ADJACENT_AXIS_TOLERANCE * size)
    .count();
  aligned_axes >= 2 || distance <= NEAR_RADIUS * size
}

/// Spatial hash of open (unknown, geometry-free) leaf centers.
struct LeafIndex {
  origin: DVec3,
  bucket_size: f64,
  buckets: HashMap<IVec3, Vec<CellId>>,
}

impl LeafIndex {
  fn new(octree: &Octree, leaves: &[CellId]) -> Self {
    let mut index = Self {
      origin: octree.root().bounds.min,
      bucket_size: octree.finest_leaf_size(),
      buckets: HashMap::new(),
    };
    for &id in leaves {
      let state = octree.state(id);
      if state.is_known || state.contains_geometry {
        continue;
      }
      let key = index.key(octree.cell(id).bounds.center());
      index.buckets.entry(key).or_default().push(id);
    }
    index
  }

  #[inline]
  fn key(&self, point: DVec3) -> IVec3 {
    ((point - self.origin) / self.bucket_size).floor().as_ivec3()
  }

  /// Open cells visible from `id`, ascending by id. Cells settled since the
  /// index was built are skipped.
  fn visible_neighbors(&self, octree: &Octree, id: CellId) -> Vec<CellId> {
    let cell = octree.cell(id);
    let center = cell.bounds.center();
    let size = cell.size();
    let reach = DVec3::splat(SEARCH_RADIUS * size);
    let lo = self.key(center - reach);
    let hi = self.key(center + reach);

    let mut candidates: Vec<CellId> = Vec::new();
    let range = (hi - lo + IVec3::ONE).as_dvec3();
    if range.x * range.y * range.z > self.buckets.len() as f64 {
      // Coarse cell over a sparse index: scanning all buckets is cheaper.
      candidates.extend(self.buckets.values().flatten());
    } else {
      for z in lo.z..=hi.z {
        for y in lo.y..=hi.y {
          for x in lo.x..=hi.x {
            if let Some(ids) = self.buckets.get(&IVec3::new(x, y, z)) {
              candidates.extend(ids);
            }
          }
        }
      }
    }

    let mut visible: Vec<CellId> = candidates
      .into_iter()
      .filter(|&other| {
        other != id
          && !octree.state(other).is_known
          && is_visible_neighbor(octree.cell(other).bounds.center() - center, size)
      })
      .collect();
    visible.sort_unstable();
    visible
  }
}

/// Spread seed classifications through the open leaves.
///
/// Bounded by `2 × leaf count` dequeues; hitting the cap ends the stage with
/// the partial result.
#[tracing::instrument(skip_all, name = "propagate::propagate")]
pub fn propagate(octree: &mut Octree, config: &PackerConfig) -> PropagationReport {
  let leaves = octree.leaves();
  let index = LeafIndex::new(octree, &leaves);
  let threshold = config.confidence_threshold;
  let max_iterations = 2 * leaves.len();

  let mut queue: VecDeque<CellId> = leaves
    .iter()
    .copied()
    .filter(|&id| {
      let state = octree.state(id);
      state.is_known && state.is_seed
    })
    .collect();

  let mut report = PropagationReport::default();
  while let Some(id) = queue.pop_front() {
    if report.iterations >= max_iterations {
      report.capped = true;
      tracing::warn!(
        iterations = report.iterations,
        remaining = queue.len() + 1,
        "propagation iteration cap reached"
      );
      break;
    }
    report.iterations += 1;

    let voter = octree.state(id).status;
    if !matches!(voter, CellStatus::Inside | CellStatus::Outside) {
      continue;
    }

    for neighbor in index.visible_neighbors(octree, id) {
      let state = octree.state_mut(neighbor);
      let settled = match voter {
        CellStatus::Inside => {
          state.votes_inside += 1;
          state.votes_inside >= threshold
        }
        _ => {
          state.votes_outside += 1;
          state.votes_outside >= threshold
        }
      };
      if settled && state.settle(voter, false) {
        match voter {
          CellStatus::Inside => report.propagated_inside += 1,
          _ => report.propagated_outside += 1,
        }
        queue.push_back(neighbor);
      }
    }
  }

  tracing::debug!(
    iterations = report.iterations,
    inside = report.propagated_inside,
    outside = report.propagated_outside,
    "propagation finished"
  );
  report
}

#[cfg(test)]
#[path = "propagate_test.rs"]
mod propagate_test;
