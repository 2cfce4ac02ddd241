//! Uniform voxel view of the Inside leaves.
//!
//! Leaves coarser than the finest Inside leaf are split into finest-size
//! voxels, so every voxel has the same size and coverage counts volume.

use glam::{DVec3, IVec3};

use crate::octree::{CellId, CellStatus, DAabb3, Octree};

/// One interior voxel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Voxel {
  pub bounds: DAabb3,
  /// Integer grid coordinate, `floor((center - origin) / cell_size)`.
  pub key: IVec3,
  /// Leaf this voxel was cut from.
  pub source: CellId,
}

impl Voxel {
  #[inline]
  pub fn center(&self) -> DVec3 {
    self.bounds.center()
  }
}

/// Flat list of equally sized interior voxels.
#[derive(Clone, Debug)]
pub struct VoxelGrid {
  voxels: Vec<Voxel>,
  origin: DVec3,
  cell_size: f64,
}

impl VoxelGrid {
  /// Collect Inside leaves, in leaf order. Each leaf contributes its
  /// sub-voxels x-fastest, then y, then z.
  pub fn from_octree(octree: &Octree) -> Self {
    let origin = octree.root().bounds.min;
    let inside: Vec<CellId> = octree
      .leaves()
      .into_iter()
      .filter(|&id| octree.state(id).status == CellStatus::Inside)
      .collect();

    let cell_size = inside
      .iter()
      .map(|&id| octree.cell(id).size())
      .fold(f64::INFINITY, f64::min);
    if inside.is_empty() {
      return Self {
        voxels: Vec::new(),
        origin,
        cell_size: octree.root().size(),
      };
    }

    let mut grid = Self {
      voxels: Vec::new(),
      origin,
      cell_size,
    };
    for id in inside {
      let cell = octree.cell(id);
      // Leaf sizes are power-of-two multiples of the finest size
      let per_axis = (cell.size() / cell_size).round().max(1.0) as i32;
      for z in 0..per_axis {
        for y in 0..per_axis {
          for x in 0..per_axis {
            let min = cell.bounds.min + IVec3::new(x, y, z).as_dvec3() * cell_size;
            grid.push(DAabb3::new(min, min + DVec3::splat(cell_size)), id);
          }
        }
      }
    }
    grid
  }

  /// One voxel per integer key, for tests and tools.
  /// Voxel `i` reports `CellId(i)` as its source.
  pub fn from_keys(origin: DVec3, cell_size: f64, keys: &[IVec3]) -> Self {
    let mut grid = Self {
      voxels: Vec::with_capacity(keys.len()),
      origin,
      cell_size,
    };
    for (i, key) in keys.iter().enumerate() {
      let min = origin + key.as_dvec3() * cell_size;
      grid.push(DAabb3::new(min, min + DVec3::splat(cell_size)), CellId(i as u32));
    }
    grid
  }

  fn push(&mut self, bounds: DAabb3, source: CellId) {
    let key = self.key_of(bounds.center());
    self.voxels.push(Voxel {
      bounds,
      key,
      source,
    });
  }

  /// Integer coordinate of the voxel containing `point`.
  #[inline]
  pub fn key_of(&self, point: DVec3) -> IVec3 {
    ((point - self.origin) / self.cell_size).floor().as_ivec3()
  }

  /// World bounds of the inclusive key range `lo..=hi`.
  pub fn key_range_bounds(&self, lo: IVec3, hi: IVec3) -> DAabb3 {
    DAabb3::new(
      self.origin + lo.as_dvec3() * self.cell_size,
      self.origin + (hi + IVec3::ONE).as_dvec3() * self.cell_size,
    )
  }

  #[inline]
  pub fn voxels(&self) -> &[Voxel] {
    &self.voxels
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.voxels.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.voxels.is_empty()
  }

  #[inline]
  pub fn cell_size(&self) -> f64 {
    self.cell_size
  }

  #[inline]
  pub fn origin(&self) -> DVec3 {
    self.origin
  }

  /// Volume of a single voxel.
  #[inline]
  pub fn voxel_volume(&self) -> f64 {
    self.cell_size.powi(3)
  }
}
