use glam::{DVec3, Vec3};

use super::*;
use crate::octree::CellState;
use crate::test_meshes;

fn build_cube(depth: u8) -> Octree {
  let config = PackerConfig::default().with_max_depth(depth);
  Octree::from_mesh(&test_meshes::cube(1.0), None, &config, None)
    .unwrap()
    .0
}

fn count_leaves(tree: &Octree, pred: impl Fn(&CellState) -> bool) -> usize {
  tree
    .leaves()
    .into_iter()
    .filter(|id| pred(&tree.state(*id)))
    .count()
}

// =========================================================================
// Root volume
// =========================================================================

/// Root is the padded mesh bounds expanded to a cube.
#[test]
fn test_root_bounds_padded_cube() {
  let bounds = DAabb3::new(DVec3::new(0.0, 0.0, 0.0), DVec3::new(10.0, 2.0, 4.0));
  let root = root_bounds(&bounds, 0.01);
  assert!((root.center() - bounds.center()).length() < 1e-9);
  let size = root.size();
  assert!((size.x - 10.2).abs() < 1e-9);
  assert!((size.y - 10.2).abs() < 1e-9);
  assert!((size.z - 10.2).abs() < 1e-9);
}

/// A point-like mesh still gets a non-degenerate root.
#[test]
fn test_root_bounds_never_zero_size() {
  let bounds = DAabb3::new(DVec3::ONE, DVec3::ONE);
  let root = root_bounds(&bounds, 0.01);
  assert!(root.size().x > 0.0);
}

// =========================================================================
// Subdivision
// =========================================================================

/// Depth 0: the root overlaps geometry and is already at max depth.
#[test]
fn test_depth_zero_root_is_intersecting() {
  let tree = build_cube(0);
  assert_eq!(tree.len(), 1);
  let state = tree.state(CellId::ROOT);
  assert_eq!(state.status, CellStatus::Intersecting);
  assert!(state.contains_geometry);
}

/// Closed cube at depth 3.
///
/// Root spans ±1.02 (8 fine cells of 0.255 per axis). The outer fine band
/// touches the faces; the inner 4×4×4 fine region is covered by 8 empty
/// depth-2 leaves; the remaining 152 cells of the inner 6×6×6 region are
/// empty depth-3 leaves.
#[test]
fn test_cube_depth_three_classification() {
  let tree = build_cube(3);

  assert_eq!(tree.len(), 1 + 8 + 64 + 448);
  assert_eq!(tree.leaves().len(), 8 + 448);
  assert_eq!(tree.depth(), 3);

  let unknown = count_leaves(&tree, |s| s.status == CellStatus::Unknown);
  let intersecting = count_leaves(&tree, |s| s.status == CellStatus::Intersecting);
  assert_eq!(unknown, 160);
  assert_eq!(intersecting, 296);

  for id in tree.leaves() {
    let state = tree.state(id);
    match state.status {
      CellStatus::Unknown => assert!(!state.contains_geometry),
      CellStatus::Intersecting => {
        assert!(state.contains_geometry);
        assert_eq!(tree.cell(id).depth, 3);
        assert!(state.is_known);
      }
      other => panic!("Build must not produce {:?}", other),
    }
  }
}

/// Interior nodes always contain geometry.
#[test]
fn test_interior_nodes_contain_geometry() {
  let tree = build_cube(3);
  for i in 0..tree.len() as u32 {
    let cell = tree.cell(CellId(i));
    if !cell.is_leaf() {
      assert!(cell.state.contains_geometry);
    }
  }
}

/// Zero triangles: the root is a single Unknown leaf.
#[test]
fn test_point_cloud_single_unknown_root() {
  let mesh = test_meshes::point_cloud(&[Vec3::ZERO, Vec3::ONE]);
  let config = PackerConfig::default();
  let (tree, triangles) = Octree::from_mesh(&mesh, None, &config, None).unwrap();

  assert!(triangles.is_empty());
  assert_eq!(tree.leaves(), vec![CellId::ROOT]);
  assert_eq!(tree.state(CellId::ROOT).status, CellStatus::Unknown);
  assert!(!tree.state(CellId::ROOT).contains_geometry);
}

/// An empty mesh is rejected before any subdivision.
#[test]
fn test_empty_mesh_rejected() {
  let result = Octree::from_mesh(
    &crate::mesh::TriangleMesh::default(),
    None,
    &PackerConfig::default(),
    None,
  );
  assert!(matches!(result, Err(crate::PackerError::EmptyMesh)));
}

/// The override replaces the root volume; mesh bounds stay tight.
#[test]
fn test_bounds_override() {
  let config = PackerConfig::default().with_max_depth(1);
  let override_bounds = DAabb3::new(DVec3::splat(-4.0), DVec3::splat(4.0));
  let (tree, _) = Octree::from_mesh(
    &test_meshes::cube(1.0),
    None,
    &config,
    Some(override_bounds),
  )
  .unwrap();

  assert_eq!(tree.root().bounds, override_bounds);
  assert_eq!(tree.mesh_bounds().max, DVec3::ONE);
  assert_eq!(tree.leaves().len(), 8);
}

/// Inverted or flat overrides cannot be subdivided.
#[test]
fn test_degenerate_bounds_override_rejected() {
  let inverted = DAabb3 {
    min: DVec3::ONE,
    max: DVec3::splat(-1.0),
  };
  let flat = DAabb3::new(DVec3::splat(-1.0), DVec3::new(1.0, 1.0, -1.0));
  for bounds in [inverted, flat] {
    let result = Octree::from_mesh(
      &test_meshes::cube(1.0),
      None,
      &PackerConfig::default(),
      Some(bounds),
    );
    assert!(matches!(result, Err(crate::PackerError::InvalidConfig(_))));
  }
}

/// Transform moves the tree to world space.
#[test]
fn test_transformed_mesh_builds_in_world_space() {
  let config = PackerConfig::default().with_max_depth(2);
  let transform = glam::DMat4::from_translation(DVec3::new(100.0, 0.0, 0.0));
  let (tree, _) = Octree::from_mesh(&test_meshes::cube(1.0), Some(&transform), &config, None)
    .unwrap();

  assert!((tree.root().bounds.center().x - 100.0).abs() < 1e-9);
  assert!((tree.mesh_bounds().min.x - 99.0).abs() < 1e-9);
}
