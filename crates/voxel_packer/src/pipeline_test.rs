use glam::{DMat4, DVec3, Vec3};

use super::*;
use crate::error::PackerError;
use crate::metrics::StageTimings;
use crate::octree::CellStatus;
use crate::packing::StopReason;
use crate::probe::stubs::ConstantProbe;
use crate::probe::RaycastProbe;
use crate::test_meshes;

fn cube_config() -> PackerConfig {
  PackerConfig::default()
    .with_max_depth(3)
    .with_sample_resolution(64)
}

fn run_cube(config: &PackerConfig) -> PackOutput {
  let probe = RaycastProbe::from_config(config);
  voxelize_and_pack(&test_meshes::cube(1.0), None, &probe, config).unwrap()
}

// =========================================================================
// Scenarios
// =========================================================================

/// Closed cube at depth 3: the whole interior is Inside and packs into one
/// box.
#[test]
fn test_solid_cube_packs_into_one_box() {
  let output = run_cube(&cube_config());
  let d = &output.diagnostics;

  assert_eq!(d.leaf_count, 456);
  assert_eq!(d.intersecting_leaf_count, 296);
  assert_eq!(d.candidate_count, 160);
  assert_eq!(d.seeds_inside, 160);
  assert_eq!(d.ambiguous, 0);
  assert_eq!(d.max_depth_reached, 3);

  assert_eq!(output.result.boxes.len(), 1);
  assert!(output.result.volume_coverage >= 0.8);
  assert_eq!(output.result.total_inside_voxels, 216);
  assert_eq!(d.stop_reason, StopReason::CoverageReached);
}

/// Identical inputs give identical boxes and counters.
#[test]
fn test_runs_are_deterministic() {
  let strip = |mut output: PackOutput| {
    output.diagnostics.timings = StageTimings::default();
    output
  };
  let config = cube_config().with_max_depth(4);
  assert_eq!(strip(run_cube(&config)), strip(run_cube(&config)));
}

/// No triangles: the root is the only candidate, nothing is seen, nothing
/// is packed.
#[test]
fn test_point_cloud_yields_empty_result() {
  let mesh = test_meshes::point_cloud(&[Vec3::ZERO, Vec3::ONE, Vec3::new(2.0, 0.5, 1.0)]);
  let config = PackerConfig::default();
  let probe = RaycastProbe::from_config(&config);
  let output = voxelize_and_pack(&mesh, None, &probe, &config).unwrap();

  assert_eq!(output.diagnostics.leaf_count, 1);
  assert_eq!(output.diagnostics.candidate_count, 1);
  assert_eq!(output.diagnostics.ambiguous, 1);
  assert_eq!(output.result, PackingResult::empty());
  assert_eq!(output.result.total_inside_voxels, 0);
  assert_eq!(output.diagnostics.stop_reason, StopReason::EmptyInterior);
}

/// Threshold 0: classified interior, but no boxes.
#[test]
fn test_zero_coverage_threshold_packs_nothing() {
  let output = run_cube(&cube_config().with_coverage_threshold(0.0));
  assert!(output.result.boxes.is_empty());
  assert_eq!(output.result.total_inside_voxels, 216);
  assert_eq!(output.result.volume_coverage, 0.0);
}

/// Cells outside the mesh bounds never reach the probe.
#[test]
fn test_fast_reject_skips_probe() {
  let config = PackerConfig::default().with_max_depth(2);
  let probe = ConstantProbe::inside();
  let bounds = DAabb3::new(DVec3::splat(-4.0), DVec3::splat(4.0));
  let output = VoxelPacker::new(config)
    .run_with_bounds(&test_meshes::cube(1.0), None, Some(bounds), &probe)
    .unwrap();

  assert_eq!(probe.calls(), 0);
  assert_eq!(output.diagnostics.fast_rejected, 56);
  assert_eq!(output.diagnostics.seeds_outside, 0);
  assert!(output.result.boxes.is_empty());
}

/// Two closed boxes: two separate interiors, two boxes.
#[test]
fn test_disjoint_boxes_pack_separately() {
  let mesh = test_meshes::disjoint_boxes(&[
    (Vec3::new(-3.0, -1.0, -1.0), Vec3::new(-1.0, 1.0, 1.0)),
    (Vec3::new(1.0, -1.0, -1.0), Vec3::new(3.0, 1.0, 1.0)),
  ]);
  let config = PackerConfig::default()
    .with_max_depth(4)
    .with_sample_resolution(32);
  let probe = RaycastProbe::from_config(&config);
  let output = voxelize_and_pack(&mesh, None, &probe, &config).unwrap();

  assert!(output.diagnostics.seeds_outside > 0);
  assert_eq!(output.result.total_inside_voxels, 128);
  assert_eq!(output.result.boxes.len(), 2);
  assert_eq!(output.result.volume_coverage, 1.0);

  let mut centers: Vec<f64> = output.result.boxes.iter().map(|b| b.center().x).collect();
  centers.sort_by(f64::total_cmp);
  assert!(centers[0] < -1.0 && centers[1] > 1.0);
  assert!((centers[0] + centers[1]).abs() < 1e-9);
}

/// Open geometry still terminates with a consistent result.
#[test]
fn test_open_mesh_terminates() {
  let mesh = TriangleMesh::new(
    vec![
      Vec3::new(-1.0, -1.0, 0.0),
      Vec3::new(1.0, -1.0, 0.0),
      Vec3::new(0.0, 1.0, 0.0),
    ],
    vec![[0, 1, 2]],
  );
  let config = PackerConfig::default()
    .with_max_depth(4)
    .with_sample_resolution(32);
  let probe = RaycastProbe::from_config(&config);
  let output = voxelize_and_pack(&mesh, None, &probe, &config).unwrap();

  let result = &output.result;
  assert!(result.consumed_voxels <= result.total_inside_voxels);
  assert!((0.0..=1.0).contains(&result.volume_coverage));
  assert!(output
    .diagnostics
    .coverage_history
    .windows(2)
    .all(|pair| pair[0] <= pair[1]));
  assert!(!output.diagnostics.propagation_capped);
}

/// A transform moves the packed boxes with the mesh.
#[test]
fn test_transform_moves_boxes() {
  let config = cube_config();
  let probe = RaycastProbe::from_config(&config);
  let transform = DMat4::from_translation(DVec3::new(100.0, 0.0, -50.0));
  let output = voxelize_and_pack(&test_meshes::cube(1.0), Some(&transform), &probe, &config)
    .unwrap();

  assert_eq!(output.result.boxes.len(), 1);
  let center = output.result.boxes[0].center();
  assert!((center - DVec3::new(100.0, 0.0, -50.0)).length() < 1e-9);
}

/// Stage timers are bounded by the total.
#[test]
fn test_timings_recorded() {
  let timings = run_cube(&cube_config()).diagnostics.timings;
  assert!(timings.total_us >= timings.octree_us);
  assert!(timings.total_us >= timings.classify_us);
  assert!(timings.total_us >= timings.pack_us);
}

// =========================================================================
// Hard failures
// =========================================================================

#[test]
fn test_probe_unavailable_aborts_before_sampling() {
  let probe = ConstantProbe::unavailable("no renderer");
  let result = voxelize_and_pack(
    &test_meshes::cube(1.0),
    None,
    &probe,
    &PackerConfig::default(),
  );
  assert_eq!(
    result,
    Err(PackerError::ProbeUnavailable("no renderer".into()))
  );
  assert_eq!(probe.calls(), 0);
}

#[test]
fn test_empty_mesh_rejected() {
  let result = voxelize_and_pack(
    &TriangleMesh::default(),
    None,
    &ConstantProbe::inside(),
    &PackerConfig::default(),
  );
  assert_eq!(result, Err(PackerError::EmptyMesh));
}

#[test]
fn test_bad_index_rejected() {
  let mesh = TriangleMesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![[0, 1, 7]]);
  let result = voxelize_and_pack(&mesh, None, &ConstantProbe::inside(), &PackerConfig::default());
  assert!(matches!(
    result,
    Err(PackerError::InvalidIndex { index: 7, .. })
  ));
}

#[test]
fn test_invalid_config_rejected() {
  let config = PackerConfig::default().with_coverage_threshold(1.5);
  let result = voxelize_and_pack(
    &test_meshes::cube(1.0),
    None,
    &ConstantProbe::inside(),
    &config,
  );
  assert!(matches!(result, Err(PackerError::InvalidConfig(_))));
}

#[test]
fn test_non_finite_bounds_override_rejected() {
  let bounds = DAabb3 {
    min: DVec3::splat(f64::NEG_INFINITY),
    max: DVec3::ONE,
  };
  let result = VoxelPacker::default().run_with_bounds(
    &test_meshes::cube(1.0),
    None,
    Some(bounds),
    &ConstantProbe::inside(),
  );
  assert_eq!(result, Err(PackerError::NonFiniteGeometry));
}

/// An inverted override is rejected before the probe is consulted.
#[test]
fn test_inverted_bounds_override_rejected() {
  let probe = ConstantProbe::inside();
  let bounds = DAabb3 {
    min: DVec3::ONE,
    max: DVec3::splat(-1.0),
  };
  let result = VoxelPacker::default().run_with_bounds(
    &test_meshes::cube(1.0),
    None,
    Some(bounds),
    &probe,
  );
  assert!(matches!(result, Err(PackerError::InvalidConfig(_))));
  assert_eq!(probe.calls(), 0);
}

/// A zero-thickness override is rejected too.
#[test]
fn test_flat_bounds_override_rejected() {
  let bounds = DAabb3::new(DVec3::new(-2.0, -2.0, 0.0), DVec3::new(2.0, 2.0, 0.0));
  let result = VoxelPacker::default().run_with_bounds(
    &test_meshes::cube(1.0),
    None,
    Some(bounds),
    &RaycastProbe::new(2),
  );
  assert!(matches!(result, Err(PackerError::InvalidConfig(_))));
}

/// Propagation fills in what the probe leaves ambiguous.
#[test]
fn test_cube_interior_all_inside_after_propagation() {
  let config = cube_config();
  let probe = RaycastProbe::from_config(&config);
  let mesh = test_meshes::cube(1.0);
  let (mut octree, triangles) = crate::octree::Octree::from_mesh(&mesh, None, &config, None).unwrap();
  classify_seeds(&mut octree, &probe, &triangles, &config);
  propagate(&mut octree, &config);

  for id in octree.leaves() {
    let state = octree.state(id);
    if !state.contains_geometry {
      assert_eq!(state.status, CellStatus::Inside);
    }
  }
}
