//! Greedy box growth over the voxel grid.

use glam::{DVec3, IVec3};

use super::distance_field::{DistanceField, GridLookup};
use super::{PackingResult, PackingStats, StopReason, VoxelGrid};
use crate::config::PackerConfig;
use crate::octree::{DAabb3, Octree};
use crate::probe::Direction;

/// Relative box inflation used when testing which voxels a box encloses.
pub const CONTAINMENT_EPSILON: f64 = 0.01;

/// Boxes packed per run at most.
pub const MAX_PACKING_ITERATIONS: usize = 100;

/// Growth rounds per box at most. Each round tries all 6 directions.
pub const MAX_EXPANSION_ROUNDS: usize = 100;

/// Pack the Inside leaves of `octree`.
pub fn pack(octree: &Octree, config: &PackerConfig) -> (PackingResult, PackingStats) {
  let grid = VoxelGrid::from_octree(octree);
  pack_grid(&grid, config)
}

/// Pack `grid` until `config.coverage_threshold` is met, then drop
/// negligible boxes.
#[tracing::instrument(skip_all, name = "packing::pack", fields(voxels = grid.len()))]
pub fn pack_grid(grid: &VoxelGrid, config: &PackerConfig) -> (PackingResult, PackingStats) {
  let mut stats = PackingStats::default();
  if grid.is_empty() {
    tracing::warn!("no interior voxels to pack");
    return (PackingResult::empty(), stats);
  }

  let total = grid.len();
  let lookup = GridLookup::build(grid);
  stats.grid_key_collisions = lookup.collisions();

  let mut consumed = vec![false; total];
  let mut consumed_count = 0usize;
  let mut field: Option<DistanceField> = None;
  let mut boxes: Vec<DAabb3> = Vec::new();

  stats.stop_reason = StopReason::IterationCap;
  for _ in 0..MAX_PACKING_ITERATIONS {
    let coverage = consumed_count as f64 / total as f64;
    if coverage >= config.coverage_threshold {
      stats.stop_reason = StopReason::CoverageReached;
      break;
    }

    let field = field.get_or_insert_with(|| DistanceField::with_lookup(grid, &lookup));
    let Some(seed) = deepest_unconsumed(field, &consumed) else {
      stats.stop_reason = StopReason::Exhausted;
      break;
    };

    let bounds = expand_box(grid, &lookup, &consumed, seed);
    let newly = mark_consumed(grid, &bounds, &mut consumed);
    if newly == 0 {
      tracing::warn!(seed, "box consumed no new voxels, packing stuck");
      stats.stop_reason = StopReason::Stuck;
      break;
    }

    consumed_count += newly;
    boxes.push(bounds);
    stats.iterations += 1;
    let coverage = consumed_count as f64 / total as f64;
    stats.coverage_history.push(coverage);
    tracing::debug!(
      index = boxes.len() - 1,
      seed,
      consumed = newly,
      coverage,
      "box packed"
    );
  }

  if stats.stop_reason == StopReason::IterationCap {
    tracing::warn!(
      iterations = MAX_PACKING_ITERATIONS,
      "packing iteration cap reached"
    );
  }
  stats.max_distance = field.as_ref().map_or(0, DistanceField::max_distance);

  stats.boxes_before_filter = boxes.len();
  let boxes = filter_small_boxes(boxes, config.min_box_volume_fraction);
  stats.boxes_filtered = stats.boxes_before_filter - boxes.len();

  let result = PackingResult {
    boxes,
    volume_coverage: consumed_count as f64 / total as f64,
    total_inside_voxels: total,
    consumed_voxels: consumed_count,
  };
  tracing::debug!(
    boxes = result.boxes.len(),
    filtered = stats.boxes_filtered,
    coverage = result.volume_coverage,
    "packing finished"
  );
  (result, stats)
}

/// Unconsumed voxel with the greatest distance. Ties go to the lowest index.
fn deepest_unconsumed(field: &DistanceField, consumed: &[bool]) -> Option<usize> {
  let mut best: Option<(usize, u32)> = None;
  for (index, &distance) in field.distances().iter().enumerate() {
    if consumed[index] {
      continue;
    }
    if best.map_or(true, |(_, d)| distance > d) {
      best = Some((index, distance));
    }
  }
  best.map(|(index, _)| index)
}

/// Grow a box from voxel `seed` one cell at a time.
///
/// Directions are tried in [`Direction::ALL`] order every round. A step is
/// taken when the new slab holds at least one voxel and none of them is
/// consumed. Gaps in the slab are allowed.
pub fn expand_box(grid: &VoxelGrid, lookup: &GridLookup, consumed: &[bool], seed: usize) -> DAabb3 {
  let key = grid.voxels()[seed].key;
  let (mut lo, mut hi) = (key, key);

  for _ in 0..MAX_EXPANSION_ROUNDS {
    let mut grew = false;
    for direction in Direction::ALL {
      let axis = direction.axis();
      let positive = direction.sign() > 0.0;
      let layer = if positive { hi[axis] + 1 } else { lo[axis] - 1 };

      let (mut slab_lo, mut slab_hi) = (lo, hi);
      slab_lo[axis] = layer;
      slab_hi[axis] = layer;
      if slab_accepts(lookup, consumed, slab_lo, slab_hi) {
        if positive {
          hi[axis] = layer;
        } else {
          lo[axis] = layer;
        }
        grew = true;
      }
    }
    if !grew {
      break;
    }
  }

  grid.key_range_bounds(lo, hi)
}

/// At least one voxel in `lo..=hi`, none consumed.
fn slab_accepts(lookup: &GridLookup, consumed: &[bool], lo: IVec3, hi: IVec3) -> bool {
  let mut found = false;
  for z in lo.z..=hi.z {
    for y in lo.y..=hi.y {
      for x in lo.x..=hi.x {
        if let Some(index) = lookup.get(IVec3::new(x, y, z)) {
          if consumed[index] {
            return false;
          }
          found = true;
        }
      }
    }
  }
  found
}

/// Mark every voxel whose center lies in `bounds` (inflated by
/// [`CONTAINMENT_EPSILON`], at most a quarter voxel per side). Returns the
/// number of voxels newly consumed.
pub fn mark_consumed(grid: &VoxelGrid, bounds: &DAabb3, consumed: &mut [bool]) -> usize {
  let margin = (bounds.size() * (CONTAINMENT_EPSILON * 0.5))
    .min(DVec3::splat(grid.cell_size() * 0.25));
  let test = bounds.inflated(margin);

  let mut newly = 0;
  for (voxel, flag) in grid.voxels().iter().zip(consumed.iter_mut()) {
    if !*flag && test.contains_point(voxel.center()) {
      *flag = true;
      newly += 1;
    }
  }
  newly
}

/// Drop boxes smaller than `fraction` of the summed volume. Order is kept.
pub fn filter_small_boxes(boxes: Vec<DAabb3>, fraction: f64) -> Vec<DAabb3> {
  let total: f64 = boxes.iter().map(DAabb3::volume).sum();
  let min_volume = total * fraction;
  boxes
    .into_iter()
    .filter(|b| b.volume() >= min_volume)
    .collect()
}

#[cfg(test)]
#[path = "packer_test.rs"]
mod packer_test;
