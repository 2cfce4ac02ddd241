//! CPU reference probe: ray bundles against the triangle soup.

use glam::DVec3;

use super::{Direction, FaceStats, ProbeSample, VisibilityProbe};
use crate::config::PackerConfig;
use crate::mesh::{Facing, Triangle};

/// Near plane distance as a fraction of the sampled cell size.
pub const NEAR_PLANE_FACTOR: f64 = 0.05;

/// Casts an `n × n` bundle of rays through a 90° frustum around each axis
/// direction and counts the closest hit's facing.
///
/// Fractions are hits over rays cast; rays that escape count towards
/// neither side.
#[derive(Clone, Debug)]
pub struct RaycastProbe {
  /// Rays per frustum axis (n).
  pub rays_per_axis: u32,
  /// Near plane as a fraction of the cell size.
  pub near_plane_factor: f64,
}

impl Default for RaycastProbe {
  fn default() -> Self {
    Self::from_config(&PackerConfig::default())
  }
}

impl RaycastProbe {
  pub fn new(rays_per_axis: u32) -> Self {
    Self {
      rays_per_axis: rays_per_axis.max(1),
      near_plane_factor: NEAR_PLANE_FACTOR,
    }
  }

  /// Ray density derived from `sample_resolution`.
  pub fn from_config(config: &PackerConfig) -> Self {
    Self::new(config.rays_per_axis())
  }

  /// Normalized ray directions for one frustum, row-major over the two
  /// perpendicular axes.
  fn frustum_rays(&self, direction: Direction) -> Vec<DVec3> {
    let forward = direction.vector();
    let (u, v) = match direction.axis() {
      0 => (DVec3::Y, DVec3::Z),
      1 => (DVec3::Z, DVec3::X),
      _ => (DVec3::X, DVec3::Y),
    };

    let n = self.rays_per_axis;
    let step = 2.0 / n as f64;
    let mut rays = Vec::with_capacity((n * n) as usize);
    for i in 0..n {
      let s = -1.0 + (i as f64 + 0.5) * step;
      for j in 0..n {
        let t = -1.0 + (j as f64 + 0.5) * step;
        rays.push((forward + u * s + v * t).normalize());
      }
    }
    rays
  }

  /// Facing of the closest hit along one ray.
  fn closest_facing(origin: DVec3, dir: DVec3, near: f64, occluders: &[Triangle]) -> Option<Facing> {
    occluders
      .iter()
      .filter_map(|tri| tri.ray_intersection(origin, dir, near))
      .min_by(|a, b| a.distance.total_cmp(&b.distance))
      .map(|hit| hit.facing)
  }
}

impl VisibilityProbe for RaycastProbe {
  fn sample(&self, point: DVec3, cell_size: f64, occluders: &[Triangle]) -> ProbeSample {
    let near = cell_size * self.near_plane_factor;

    Direction::ALL.map(|direction| {
      let rays = self.frustum_rays(direction);
      let (mut back, mut front) = (0u32, 0u32);
      for dir in &rays {
        match Self::closest_facing(point, *dir, near, occluders) {
          Some(Facing::Back) => back += 1,
          Some(Facing::Front) => front += 1,
          None => {}
        }
      }
      let total = rays.len() as f64;
      FaceStats::new(back as f64 / total, front as f64 / total)
    })
  }
}

#[cfg(test)]
#[path = "raycast_test.rs"]
mod raycast_test;
