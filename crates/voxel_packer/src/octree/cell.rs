//! Cell - one node of the arena octree, plus its mutable classification
//! state.

use super::DAabb3;

/// Index of a cell in the octree arena.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct CellId(pub u32);

impl CellId {
  /// The root is always the first cell allocated.
  pub const ROOT: Self = Self(0);

  #[inline]
  pub fn index(self) -> usize {
    self.0 as usize
  }
}

/// Inside/outside classification of a cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellStatus {
  /// Not classified (yet).
  #[default]
  Unknown,
  /// Inside the solid.
  Inside,
  /// In open space.
  Outside,
  /// Max-depth leaf touching geometry. Treated as solid boundary.
  Intersecting,
}

/// Per-cell classification state, stored by value in the arena.
///
/// Stages read and replace it through [`Octree::state`](super::Octree::state)
/// and [`Octree::state_mut`](super::Octree::state_mut).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct CellState {
  pub status: CellStatus,
  /// Set during construction, never cleared.
  pub contains_geometry: bool,
  pub votes_inside: u32,
  pub votes_outside: u32,
  /// Once true, `status` never changes again.
  pub is_known: bool,
  /// Classified directly by the probe rather than by propagation.
  pub is_seed: bool,
}

impl CellState {
  /// Finalize the status. Returns false (and changes nothing) when the cell
  /// is already known.
  pub fn settle(&mut self, status: CellStatus, is_seed: bool) -> bool {
    if self.is_known {
      return false;
    }
    self.status = status;
    self.is_known = true;
    self.is_seed = is_seed;
    true
  }
}

/// Octree node: bounds, depth, optional 8 children and classification state.
#[derive(Clone, Debug)]
pub struct Cell {
  pub bounds: DAabb3,
  pub depth: u8,
  /// `None` for leaves. Octant order: bit 0 = +X, bit 1 = +Y, bit 2 = +Z.
  pub children: Option<[CellId; 8]>,
  pub state: CellState,
}

impl Cell {
  pub fn new(bounds: DAabb3, depth: u8) -> Self {
    Self {
      bounds,
      depth,
      children: None,
      state: CellState::default(),
    }
  }

  #[inline]
  pub fn is_leaf(&self) -> bool {
    self.children.is_none()
  }

  /// Edge length (cells are cubes).
  #[inline]
  pub fn size(&self) -> f64 {
    self.bounds.size().x
  }

  /// Bounds of the child in `octant`: a cube of half the size, centered
  /// ±¼ of the parent size from the parent center on each axis.
  pub fn child_bounds(&self, octant: u8) -> DAabb3 {
    let quarter = self.bounds.size() * 0.25;
    let sign = |bit: u8| if octant & bit == 0 { -1.0 } else { 1.0 };
    let center = self.bounds.center()
      + glam::DVec3::new(sign(1) * quarter.x, sign(2) * quarter.y, sign(4) * quarter.z);
    DAabb3::from_center_half_extents(center, quarter)
  }
}
