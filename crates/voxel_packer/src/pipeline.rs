//! Pipeline orchestrator: mesh in, boxes out.
//!
//! ```text
//! validate ─► probe ready? ─► octree ─► classify seeds ─► propagate ─► pack ─► filter
//!    │              │
//!    └── Err ◄──────┘   (nothing is built when either check fails)
//! ```
//!
//! Every stage after the checks degrades instead of failing: ambiguous
//! seeds stay Unknown, capped loops stop early, stuck packing returns what it
//! has.

use glam::DMat4;

use crate::classify::classify_seeds;
use crate::config::PackerConfig;
use crate::error::Result;
use crate::mesh::TriangleMesh;
use crate::metrics::{PipelineDiagnostics, StageTimer};
use crate::octree::{build_octree, validate_bounds_override, DAabb3};
use crate::packing::{pack, PackingResult};
use crate::probe::VisibilityProbe;
use crate::propagate::propagate;

/// Result of one run plus the diagnostics collected along the way.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PackOutput {
  pub result: PackingResult,
  pub diagnostics: PipelineDiagnostics,
}

/// Runs the full voxelize-and-pack pipeline with a fixed configuration.
#[derive(Clone, Debug, Default)]
pub struct VoxelPacker {
  config: PackerConfig,
}

impl VoxelPacker {
  pub fn new(config: PackerConfig) -> Self {
    Self { config }
  }

  #[inline]
  pub fn config(&self) -> &PackerConfig {
    &self.config
  }

  /// Pack `mesh`, optionally moved to world space by `transform`.
  pub fn run<P: VisibilityProbe + ?Sized>(
    &self,
    mesh: &TriangleMesh,
    transform: Option<&DMat4>,
    probe: &P,
  ) -> Result<PackOutput> {
    self.run_with_bounds(mesh, transform, None, probe)
  }

  /// Like [`VoxelPacker::run`], with `bounds_override` as the root volume
  /// instead of the padded mesh bounds.
  #[tracing::instrument(skip_all, name = "pipeline::run", fields(triangles = mesh.triangle_count()))]
  pub fn run_with_bounds<P: VisibilityProbe + ?Sized>(
    &self,
    mesh: &TriangleMesh,
    transform: Option<&DMat4>,
    bounds_override: Option<DAabb3>,
    probe: &P,
  ) -> Result<PackOutput> {
    let total = StageTimer::start();
    let config = &self.config;

    config.validate()?;
    mesh.validate()?;
    if let Some(bounds) = &bounds_override {
      validate_bounds_override(bounds)?;
    }
    probe.check_ready()?;

    let mesh_bounds = mesh.world_bounds(transform)?;
    let triangles = mesh.world_triangles(transform);
    let mut diagnostics = PipelineDiagnostics::new();

    let timer = StageTimer::start();
    let mut octree = build_octree(&triangles, mesh_bounds, config, bounds_override);
    diagnostics.timings.octree_us = timer.elapsed_us();
    diagnostics.record_octree(&octree);

    let timer = StageTimer::start();
    let seeds = classify_seeds(&mut octree, probe, &triangles, config);
    diagnostics.timings.classify_us = timer.elapsed_us();
    diagnostics.record_seeds(&seeds);

    let timer = StageTimer::start();
    let propagation = propagate(&mut octree, config);
    diagnostics.timings.propagate_us = timer.elapsed_us();
    diagnostics.record_propagation(&propagation);

    let timer = StageTimer::start();
    let (result, stats) = pack(&octree, config);
    diagnostics.timings.pack_us = timer.elapsed_us();
    diagnostics.record_packing(stats);

    diagnostics.timings.total_us = total.elapsed_us();
    tracing::info!(
      boxes = result.boxes.len(),
      coverage = result.volume_coverage,
      inside_voxels = result.total_inside_voxels,
      elapsed_us = diagnostics.timings.total_us,
      "voxelization finished"
    );

    Ok(PackOutput {
      result,
      diagnostics,
    })
  }
}

/// One-shot convenience wrapper around [`VoxelPacker::run`].
pub fn voxelize_and_pack<P: VisibilityProbe + ?Sized>(
  mesh: &TriangleMesh,
  transform: Option<&DMat4>,
  probe: &P,
  config: &PackerConfig,
) -> Result<PackOutput> {
  VoxelPacker::new(config.clone()).run(mesh, transform, probe)
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod pipeline_test;
