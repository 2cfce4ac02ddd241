//! Pipeline benchmarks on closed test meshes.
//!
//! - **octree_build**: subdivision only, by depth
//! - **classify**: CPU raycast probe over every seed candidate, serial vs rayon
//! - **full_pipeline**: validate → pack, cube and two disjoint boxes

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;
use voxel_packer::{
  classify::classify_seeds, test_meshes, voxelize_and_pack, Octree, PackerConfig, RaycastProbe,
};

// =============================================================================
// Octree
// =============================================================================

fn bench_octree_build(c: &mut Criterion) {
  let mut group = c.benchmark_group("octree_build");
  let mesh = test_meshes::cube(1.0);

  for depth in [3u8, 4, 5, 6] {
    let config = PackerConfig::default().with_max_depth(depth);
    group.bench_with_input(BenchmarkId::from_parameter(depth), &config, |b, config| {
      b.iter(|| black_box(Octree::from_mesh(&mesh, None, config, None)))
    });
  }

  group.finish();
}

// =============================================================================
// Classification
// =============================================================================

fn bench_classify(c: &mut Criterion) {
  let mut group = c.benchmark_group("classify");
  let mesh = test_meshes::cube(1.0);

  for parallel in [false, true] {
    let config = PackerConfig::default()
      .with_max_depth(4)
      .with_parallel_sampling(parallel);
    let probe = RaycastProbe::from_config(&config);
    let name = if parallel { "rayon" } else { "serial" };

    group.bench_function(name, |b| {
      b.iter_batched(
        || Octree::from_mesh(&mesh, None, &config, None).unwrap(),
        |(mut octree, triangles)| {
          black_box(classify_seeds(&mut octree, &probe, &triangles, &config))
        },
        criterion::BatchSize::SmallInput,
      )
    });
  }

  group.finish();
}

// =============================================================================
// Full pipeline
// =============================================================================

fn bench_full_pipeline(c: &mut Criterion) {
  let mut group = c.benchmark_group("full_pipeline");
  group.sample_size(20);

  let meshes = [
    ("cube", test_meshes::cube(1.0)),
    (
      "two_boxes",
      test_meshes::disjoint_boxes(&[
        (Vec3::new(-3.0, -1.0, -1.0), Vec3::new(-1.0, 1.0, 1.0)),
        (Vec3::new(1.0, -1.0, -1.0), Vec3::new(3.0, 1.0, 1.0)),
      ]),
    ),
  ];
  let config = PackerConfig::default().with_max_depth(4);
  let probe = RaycastProbe::from_config(&config);

  for (name, mesh) in &meshes {
    group.bench_function(*name, |b| {
      b.iter(|| black_box(voxelize_and_pack(mesh, None, &probe, &config)))
    });
  }

  group.finish();
}

criterion_group!(benches, bench_octree_build, bench_classify, bench_full_pipeline);
criterion_main!(benches);
