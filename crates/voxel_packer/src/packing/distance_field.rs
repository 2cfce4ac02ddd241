//! BFS hop distance from the interior boundary.
//!
//! ```text
//! 1 1 1 1 1
//! 1 2 2 2 1      boundary voxels (missing a 6-neighbour) start at 1,
//! 1 2 3 2 1      every hop inward adds 1
//! 1 2 2 2 1
//! 1 1 1 1 1
//! ```
//!
//! Built once per packing run from the grid it ranks; never reuse it for a
//! different grid.

use std::collections::{HashMap, VecDeque};

use glam::IVec3;

use super::VoxelGrid;

/// 6-connected neighbour offsets.
const FACE_OFFSETS: [IVec3; 6] = [
  IVec3::new(1, 0, 0),
  IVec3::new(-1, 0, 0),
  IVec3::new(0, 1, 0),
  IVec3::new(0, -1, 0),
  IVec3::new(0, 0, 1),
  IVec3::new(0, 0, -1),
];

/// Key → voxel index lookup. On a key collision the later voxel wins.
#[derive(Clone, Debug, Default)]
pub struct GridLookup {
  slots: HashMap<IVec3, usize>,
  collisions: usize,
}

impl GridLookup {
  pub fn build(grid: &VoxelGrid) -> Self {
    let mut lookup = Self {
      slots: HashMap::with_capacity(grid.len()),
      collisions: 0,
    };
    for (index, voxel) in grid.voxels().iter().enumerate() {
      if let Some(previous) = lookup.slots.insert(voxel.key, index) {
        lookup.collisions += 1;
        tracing::warn!(
          key = ?voxel.key,
          previous,
          index,
          previous_cell = ?grid.voxels()[previous].source,
          cell = ?voxel.source,
          "voxel grid key collision"
        );
      }
    }
    lookup
  }

  #[inline]
  pub fn get(&self, key: IVec3) -> Option<usize> {
    self.slots.get(&key).copied()
  }

  #[inline]
  pub fn contains(&self, key: IVec3) -> bool {
    self.slots.contains_key(&key)
  }

  /// Voxels that quantized onto an occupied key.
  #[inline]
  pub fn collisions(&self) -> usize {
    self.collisions
  }
}

/// Per-voxel BFS distance, indexed like [`VoxelGrid::voxels`].
#[derive(Clone, Debug)]
pub struct DistanceField {
  distances: Vec<u32>,
  max_distance: u32,
  key_collisions: usize,
}

impl DistanceField {
  /// Seed every boundary voxel at distance 1 and flood inward. Voxels the
  /// flood never reaches fall back to 1.
  pub fn build(grid: &VoxelGrid) -> Self {
    let lookup = GridLookup::build(grid);
    Self::with_lookup(grid, &lookup)
  }

  pub fn with_lookup(grid: &VoxelGrid, lookup: &GridLookup) -> Self {
    let voxels = grid.voxels();
    let mut distances = vec![0u32; voxels.len()];
    let mut queue = VecDeque::new();

    for (index, voxel) in voxels.iter().enumerate() {
      if FACE_OFFSETS
        .iter()
        .any(|offset| !lookup.contains(voxel.key + *offset))
      {
        distances[index] = 1;
        queue.push_back(index);
      }
    }

    while let Some(index) = queue.pop_front() {
      let next = distances[index] + 1;
      let key = voxels[index].key;
      for offset in FACE_OFFSETS {
        if let Some(neighbor) = lookup.get(key + offset) {
          if distances[neighbor] == 0 {
            distances[neighbor] = next;
            queue.push_back(neighbor);
          }
        }
      }
    }

    let mut unreached = 0usize;
    for distance in distances.iter_mut().filter(|d| **d == 0) {
      *distance = 1;
      unreached += 1;
    }
    if unreached > 0 {
      tracing::debug!(unreached, "voxels unreachable from the boundary");
    }

    let max_distance = distances.iter().copied().max().unwrap_or(0);
    Self {
      distances,
      max_distance,
      key_collisions: lookup.collisions(),
    }
  }

  #[inline]
  pub fn distance(&self, index: usize) -> u32 {
    self.distances[index]
  }

  #[inline]
  pub fn distances(&self) -> &[u32] {
    &self.distances
  }

  #[inline]
  pub fn max_distance(&self) -> u32 {
    self.max_distance
  }

  #[inline]
  pub fn key_collisions(&self) -> usize {
    self.key_collisions
  }
}

#[cfg(test)]
#[path = "distance_field_test.rs"]
mod distance_field_test;
