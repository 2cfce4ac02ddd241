//! Arena octree used for inside/outside classification.
//!
//! Cells live in a flat `Vec` and refer to their children by [`CellId`], so
//! the tree has a single owner and every stage addresses cells by index.
//!
//! # Cell lifecycle
//!
//! ```text
//!            build                 classify / propagate
//! Unknown ──────────► Unknown ───────────────────────────► Inside | Outside
//!    │  (no triangles)                                (is_known = true)
//!    │
//!    └─────────────► Intersecting  (geometry at max depth, never reclassified)
//! ```
//!
//! # Module Structure
//!
//! - [`bounds`]: `DAabb3` - double-precision AABB
//! - [`cell`]: `Cell`, `CellId`, `CellState`, `CellStatus`
//! - [`build`]: mesh → octree subdivision

pub mod bounds;
pub mod build;
pub mod cell;

// Re-exports
pub use bounds::DAabb3;
pub use build::{build_octree, validate_bounds_override};
pub use cell::{Cell, CellId, CellState, CellStatus};

/// Arena-allocated octree. The root is always [`CellId::ROOT`].
#[derive(Clone, Debug)]
pub struct Octree {
  cells: Vec<Cell>,
  /// Tight world-space bounds of the mesh (unpadded).
  mesh_bounds: DAabb3,
}

impl Octree {
  /// Single-leaf tree over `root_bounds`.
  pub fn new(root_bounds: DAabb3, mesh_bounds: DAabb3) -> Self {
    Self {
      cells: vec![Cell::new(root_bounds, 0)],
      mesh_bounds,
    }
  }

  /// Split a leaf into 8 children and return their ids. Calling this on a
  /// cell that already has children returns the existing ones.
  pub fn subdivide(&mut self, id: CellId) -> [CellId; 8] {
    if let Some(children) = self.cells[id.index()].children {
      return children;
    }
    let parent = self.cells[id.index()].clone();
    let first = self.cells.len() as u32;
    let children: [CellId; 8] = std::array::from_fn(|octant| CellId(first + octant as u32));
    for octant in 0..8u8 {
      self
        .cells
        .push(Cell::new(parent.child_bounds(octant), parent.depth + 1));
    }
    self.cells[id.index()].children = Some(children);
    children
  }

  #[inline]
  pub fn root(&self) -> &Cell {
    &self.cells[0]
  }

  #[inline]
  pub fn cell(&self, id: CellId) -> &Cell {
    &self.cells[id.index()]
  }

  #[inline]
  pub fn state(&self, id: CellId) -> CellState {
    self.cells[id.index()].state
  }

  #[inline]
  pub fn state_mut(&mut self, id: CellId) -> &mut CellState {
    &mut self.cells[id.index()].state
  }

  #[inline]
  pub fn mesh_bounds(&self) -> &DAabb3 {
    &self.mesh_bounds
  }

  /// Total cells including interior nodes.
  #[inline]
  pub fn len(&self) -> usize {
    self.cells.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.cells.is_empty()
  }

  /// Leaf ids in depth-first octant order.
  pub fn leaves(&self) -> Vec<CellId> {
    let mut out = Vec::new();
    let mut stack = vec![CellId::ROOT];
    while let Some(id) = stack.pop() {
      match self.cells[id.index()].children {
        // Reverse so octant 0 is visited first
        Some(children) => stack.extend(children.iter().rev()),
        None => out.push(id),
      }
    }
    out
  }

  /// Edge length of the smallest leaf.
  pub fn finest_leaf_size(&self) -> f64 {
    self
      .cells
      .iter()
      .filter(|c| c.is_leaf())
      .map(Cell::size)
      .fold(f64::INFINITY, f64::min)
  }

  /// Deepest level present in the tree.
  pub fn depth(&self) -> u8 {
    self.cells.iter().map(|c| c.depth).max().unwrap_or(0)
  }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
