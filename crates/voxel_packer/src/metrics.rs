//! Per-run diagnostics returned next to the packing result.
//!
//! Every stage reports its counters here instead of through log output, so
//! callers and tests can inspect a run without a subscriber installed.
//!
//! # Usage
//!
//! ```ignore
//! let output = VoxelPacker::new(config).run(&mesh, None, &probe)?;
//! let d = &output.diagnostics;
//! println!("{} seeds, {} boxes, {} us", d.seeds_inside, d.boxes_before_filter, d.timings.total_us);
//! ```

use web_time::Instant;

use crate::classify::SeedReport;
use crate::octree::{CellStatus, Octree};
use crate::packing::{PackingStats, StopReason};
use crate::propagate::PropagationReport;

/// Wall time spent in each stage, in microseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StageTimings {
  pub octree_us: u64,
  pub classify_us: u64,
  pub propagate_us: u64,
  pub pack_us: u64,
  pub total_us: u64,
}

/// Stopwatch for one stage.
#[derive(Clone, Copy, Debug)]
pub struct StageTimer {
  start: Instant,
}

impl StageTimer {
  pub fn start() -> Self {
    Self {
      start: Instant::now(),
    }
  }

  /// Microseconds since [`StageTimer::start`].
  pub fn elapsed_us(&self) -> u64 {
    self.start.elapsed().as_micros() as u64
  }
}

/// Counters collected across one pipeline run.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PipelineDiagnostics {
  // Octree
  pub leaf_count: usize,
  /// Leaves flagged `contains_geometry`.
  pub geometry_leaf_count: usize,
  pub intersecting_leaf_count: usize,
  pub max_depth_reached: u8,

  // Seeds
  pub candidate_count: usize,
  pub fast_rejected: usize,
  pub probe_samples: usize,
  pub seeds_inside: usize,
  pub seeds_outside: usize,
  pub ambiguous: usize,

  // Propagation
  pub propagation_iterations: usize,
  pub propagated_inside: usize,
  pub propagated_outside: usize,
  pub propagation_capped: bool,

  // Packing
  pub grid_key_collisions: usize,
  pub max_distance: u32,
  pub packing_iterations: usize,
  pub boxes_before_filter: usize,
  pub boxes_filtered: usize,
  pub stop_reason: StopReason,
  /// Coverage after each packed box.
  pub coverage_history: Vec<f64>,

  pub timings: StageTimings,
}

impl PipelineDiagnostics {
  pub fn new() -> Self {
    Self::default()
  }

  /// Leaf statistics of a freshly built tree.
  pub fn record_octree(&mut self, octree: &Octree) {
    let leaves = octree.leaves();
    self.leaf_count = leaves.len();
    self.geometry_leaf_count = 0;
    self.intersecting_leaf_count = 0;
    for id in leaves {
      let state = octree.state(id);
      self.geometry_leaf_count += state.contains_geometry as usize;
      self.intersecting_leaf_count += (state.status == CellStatus::Intersecting) as usize;
    }
    self.max_depth_reached = octree.depth();
  }

  pub fn record_seeds(&mut self, report: &SeedReport) {
    self.candidate_count = report.candidates;
    self.fast_rejected = report.fast_rejected;
    self.probe_samples = report.probe_samples;
    self.seeds_inside = report.seeds_inside;
    self.seeds_outside = report.seeds_outside;
    self.ambiguous = report.ambiguous;
  }

  pub fn record_propagation(&mut self, report: &PropagationReport) {
    self.propagation_iterations = report.iterations;
    self.propagated_inside = report.propagated_inside;
    self.propagated_outside = report.propagated_outside;
    self.propagation_capped = report.capped;
  }

  pub fn record_packing(&mut self, stats: PackingStats) {
    self.grid_key_collisions = stats.grid_key_collisions;
    self.max_distance = stats.max_distance;
    self.packing_iterations = stats.iterations;
    self.boxes_before_filter = stats.boxes_before_filter;
    self.boxes_filtered = stats.boxes_filtered;
    self.stop_reason = stats.stop_reason;
    self.coverage_history = stats.coverage_history;
  }

  /// Leaves classified Inside, by the probe or by propagation.
  pub fn inside_leaf_count(&self) -> usize {
    self.seeds_inside + self.propagated_inside
  }

  /// Any stage stopped at a safety cap or got stuck.
  pub fn hit_limit(&self) -> bool {
    self.propagation_capped
      || matches!(
        self.stop_reason,
        StopReason::IterationCap | StopReason::Stuck
      )
  }
}
