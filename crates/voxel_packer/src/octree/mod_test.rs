use glam::DVec3;

use super::*;

fn unit_tree() -> Octree {
  let root = DAabb3::new(DVec3::ZERO, DVec3::splat(8.0));
  Octree::new(root, root)
}

// =========================================================================
// Arena structure
// =========================================================================

/// A fresh tree is a single leaf root.
#[test]
fn test_new_tree_is_single_leaf() {
  let tree = unit_tree();
  assert_eq!(tree.len(), 1);
  assert!(tree.root().is_leaf());
  assert_eq!(tree.leaves(), vec![CellId::ROOT]);
  assert_eq!(tree.depth(), 0);
}

/// Subdivide allocates 8 consecutive children one level deeper.
#[test]
fn test_subdivide_allocates_8_children() {
  let mut tree = unit_tree();
  let children = tree.subdivide(CellId::ROOT);

  assert_eq!(tree.len(), 9);
  for (octant, child) in children.iter().enumerate() {
    assert_eq!(child.0, 1 + octant as u32);
    assert_eq!(tree.cell(*child).depth, 1);
    assert!(tree.cell(*child).is_leaf());
  }
  assert!(!tree.root().is_leaf());
}

/// Subdividing twice does not allocate a second set of children.
#[test]
fn test_subdivide_is_idempotent() {
  let mut tree = unit_tree();
  let first = tree.subdivide(CellId::ROOT);
  let second = tree.subdivide(CellId::ROOT);
  assert_eq!(first, second);
  assert_eq!(tree.len(), 9);
}

/// Octant bits: X (bit 0), Y (bit 1), Z (bit 2); children tile the parent.
#[test]
fn test_child_bounds_octant_layout() {
  let mut tree = unit_tree();
  let children = tree.subdivide(CellId::ROOT);

  for (octant, child) in children.iter().enumerate() {
    let bounds = tree.cell(*child).bounds;
    let expected_min = DVec3::new(
      if octant & 1 == 0 { 0.0 } else { 4.0 },
      if octant & 2 == 0 { 0.0 } else { 4.0 },
      if octant & 4 == 0 { 0.0 } else { 4.0 },
    );
    assert_eq!(bounds.min, expected_min, "Octant {} min mismatch", octant);
    assert_eq!(bounds.size(), DVec3::splat(4.0), "Octant {} size", octant);
  }

  let total: f64 = children.iter().map(|c| tree.cell(*c).bounds.volume()).sum();
  assert_eq!(total, tree.root().bounds.volume());
}

/// Leaves come back depth-first in octant order.
#[test]
fn test_leaves_depth_first_order() {
  let mut tree = unit_tree();
  let children = tree.subdivide(CellId::ROOT);
  let grandchildren = tree.subdivide(children[1]);

  let leaves = tree.leaves();
  assert_eq!(leaves.len(), 15);
  assert_eq!(leaves[0], children[0]);
  assert_eq!(&leaves[1..9], &grandchildren[..]);
  assert_eq!(&leaves[9..], &children[2..]);
  assert_eq!(tree.finest_leaf_size(), 2.0);
  assert_eq!(tree.depth(), 2);
}

// =========================================================================
// CellState
// =========================================================================

/// Settling marks the cell known; a known cell cannot be resettled.
#[test]
fn test_settle_is_final() {
  let mut state = CellState::default();
  assert!(state.settle(CellStatus::Inside, true));
  assert_eq!(state.status, CellStatus::Inside);
  assert!(state.is_known);
  assert!(state.is_seed);

  assert!(!state.settle(CellStatus::Outside, false));
  assert_eq!(state.status, CellStatus::Inside, "Known status is immutable");
  assert!(state.is_seed);
}

#[test]
fn test_state_mut_writes_through() {
  let mut tree = unit_tree();
  tree.state_mut(CellId::ROOT).votes_inside = 3;
  assert_eq!(tree.state(CellId::ROOT).votes_inside, 3);
}
