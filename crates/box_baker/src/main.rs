//! Interior box baker.
//!
//! Reads an OBJ mesh, approximates its solid interior with axis-aligned boxes
//! and writes the boxes plus run diagnostics as JSON:
//!
//! ```text
//! {
//!   "mesh": "crate.obj",
//!   "result": { "boxes": [...], "volume_coverage": 0.93, ... },
//!   "diagnostics": { "leaf_count": 456, ... },
//!   "spheres": [[{ "center": [...], "offset": [...], "radius": 0.8 }], ...]
//! }
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

mod config;
mod obj;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use voxel_packer::{
  proxy_spheres, PackOutput, PipelineDiagnostics, PackingResult, ProxySphere, RaycastProbe,
  VoxelPacker,
};

use config::BakeConfig;

/// Interior box baker for static meshes.
#[derive(Parser, Debug)]
#[command(name = "bake_boxes")]
#[command(about = "Packs the interior of an OBJ mesh into axis-aligned boxes")]
struct Args {
  /// Path to the OBJ mesh.
  #[arg(short, long)]
  mesh: PathBuf,

  /// Path to a configuration TOML file.
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Output JSON path (default: next to the mesh, `<name>.boxes.json`).
  #[arg(short, long)]
  output: Option<PathBuf>,

  /// Also emit proxy spheres for every box.
  #[arg(long)]
  spheres: bool,
}

#[derive(Serialize)]
struct BakeReport<'a> {
  mesh: String,
  result: &'a PackingResult,
  diagnostics: &'a PipelineDiagnostics,
  #[serde(skip_serializing_if = "Option::is_none")]
  spheres: Option<Vec<Vec<ProxySphere>>>,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_target(false)
    .init();

  let args = Args::parse();

  let config = match &args.config {
    Some(path) => {
      tracing::info!(path = %path.display(), "loading config");
      BakeConfig::load(path)?
    }
    None => BakeConfig::default(),
  };

  let mesh = obj::load_obj(&args.mesh)?;
  tracing::info!(
    path = %args.mesh.display(),
    vertices = mesh.vertices.len(),
    triangles = mesh.triangle_count(),
    "loaded mesh"
  );

  let probe = RaycastProbe::from_config(&config.packer);
  let transform = config.transform();
  let output: PackOutput = VoxelPacker::new(config.packer.clone())
    .run(&mesh, transform.as_ref(), &probe)
    .with_context(|| format!("Failed to pack {}", args.mesh.display()))?;

  if output.diagnostics.hit_limit() {
    tracing::warn!(
      stop_reason = ?output.diagnostics.stop_reason,
      propagation_capped = output.diagnostics.propagation_capped,
      "packing stopped at a safety limit"
    );
  }

  let spheres = (args.spheres || config.spheres).then(|| {
    output
      .result
      .boxes
      .iter()
      .map(|b| proxy_spheres(b).into_vec())
      .collect()
  });

  let report = BakeReport {
    mesh: args.mesh.display().to_string(),
    result: &output.result,
    diagnostics: &output.diagnostics,
    spheres,
  };

  let output_path = args
    .output
    .unwrap_or_else(|| default_output_path(&args.mesh));
  let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
  std::fs::write(&output_path, json)
    .with_context(|| format!("Failed to write output: {}", output_path.display()))?;

  tracing::info!(
    path = %output_path.display(),
    boxes = output.result.boxes.len(),
    coverage = %format!("{:.1}%", output.result.volume_coverage * 100.0),
    "wrote boxes"
  );
  Ok(())
}

/// `dir/name.obj` becomes `dir/name.boxes.json`.
fn default_output_path(mesh: &Path) -> PathBuf {
  let stem = mesh
    .file_stem()
    .map(|s| s.to_string_lossy().into_owned())
    .unwrap_or_else(|| "mesh".to_string());
  mesh.with_file_name(format!("{stem}.boxes.json"))
}
