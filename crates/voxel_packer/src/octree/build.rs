//! Octree construction from a world-space triangle soup.
//!
//! A node is subdivided while it overlaps at least one triangle and has not
//! reached the maximum depth:
//!
//! ```text
//! no triangle overlaps        → leaf, Unknown (seed candidate)
//! overlap, depth == max_depth → leaf, Intersecting (solid boundary)
//! overlap, depth <  max_depth → 8 children, recurse
//! ```

use glam::{DMat4, DVec3};

use super::{CellId, CellStatus, DAabb3, Octree};
use crate::config::PackerConfig;
use crate::error::{PackerError, Result};
use crate::mesh::{Triangle, TriangleMesh};

/// Padded, cubic root volume around `bounds`.
///
/// Padding is relative to the largest extent; a minimum absolute pad keeps
/// flat or point-like meshes from producing a zero-size root.
pub fn root_bounds(bounds: &DAabb3, padding: f64) -> DAabb3 {
  let extent = bounds.size().max_element();
  let pad = (extent * padding).max(1e-6);
  bounds.inflated(DVec3::splat(pad)).to_cube()
}

/// Reject a root override that cannot be subdivided: non-finite corners
/// or `min >= max` on any axis.
pub fn validate_bounds_override(bounds: &DAabb3) -> Result<()> {
  if !bounds.is_finite() {
    return Err(PackerError::NonFiniteGeometry);
  }
  if !bounds.has_volume() {
    return Err(PackerError::InvalidConfig(format!(
      "bounds override must have min < max on every axis, got {:?}..{:?}",
      bounds.min, bounds.max
    )));
  }
  Ok(())
}

/// Build an octree over `triangles`.
///
/// `mesh_bounds` are the tight world bounds used for fast-reject during
/// classification. `bounds_override` replaces the padded mesh bounds as the
/// root volume (it is still expanded to a cube).
#[tracing::instrument(skip_all, name = "octree::build")]
pub fn build_octree(
  triangles: &[Triangle],
  mesh_bounds: DAabb3,
  config: &PackerConfig,
  bounds_override: Option<DAabb3>,
) -> Octree {
  let max_depth = config.effective_max_depth();
  if max_depth < config.max_depth {
    tracing::warn!(
      requested = config.max_depth,
      used = max_depth,
      "octree depth clamped"
    );
  }

  let root = match bounds_override {
    Some(bounds) => bounds.to_cube(),
    None => root_bounds(&mesh_bounds, config.bounds_padding),
  };

  let mut octree = Octree::new(root, mesh_bounds);
  let all: Vec<u32> = (0..triangles.len() as u32).collect();
  subdivide_recursive(&mut octree, CellId::ROOT, triangles, &all, max_depth);

  tracing::debug!(
    cells = octree.len(),
    leaves = octree.leaves().len(),
    depth = octree.depth(),
    "octree built"
  );
  octree
}

/// `candidates` are the triangles overlapping the parent. A triangle that
/// misses the parent cannot overlap a child, so each level only retests the
/// parent's survivors.
fn subdivide_recursive(
  octree: &mut Octree,
  id: CellId,
  triangles: &[Triangle],
  candidates: &[u32],
  max_depth: u8,
) {
  let bounds = octree.cell(id).bounds;
  let overlapping: Vec<u32> = candidates
    .iter()
    .copied()
    .filter(|&t| triangles[t as usize].overlaps_aabb(&bounds))
    .collect();

  let depth = octree.cell(id).depth;
  let state = octree.state_mut(id);
  if overlapping.is_empty() {
    state.status = CellStatus::Unknown;
    return;
  }

  state.contains_geometry = true;
  if depth >= max_depth {
    state.status = CellStatus::Intersecting;
    state.is_known = true;
    return;
  }

  for child in octree.subdivide(id) {
    subdivide_recursive(octree, child, triangles, &overlapping, max_depth);
  }
}

impl Octree {
  /// Validate the mesh, move it to world space and build the octree.
  ///
  /// Returns the world-space triangles alongside the tree; they are the
  /// occluder set for the visibility probe.
  pub fn from_mesh(
    mesh: &TriangleMesh,
    transform: Option<&DMat4>,
    config: &PackerConfig,
    bounds_override: Option<DAabb3>,
  ) -> Result<(Self, Vec<Triangle>)> {
    mesh.validate()?;
    if let Some(bounds) = &bounds_override {
      validate_bounds_override(bounds)?;
    }
    let mesh_bounds = mesh.world_bounds(transform)?;
    let triangles = mesh.world_triangles(transform);
    let octree = build_octree(&triangles, mesh_bounds, config, bounds_override);
    Ok((octree, triangles))
  }
}

#[cfg(test)]
#[path = "build_test.rs"]
mod build_test;
