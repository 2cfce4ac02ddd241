//! Triangle mesh input and the world-space triangle soup derived from it.

use glam::{DMat4, DVec3, Vec3};

use crate::error::{PackerError, Result};
use crate::octree::DAabb3;

/// Indexed triangle mesh in local space.
///
/// Winding is counter-clockwise when seen from outside: the right-handed
/// normal of every triangle points away from the solid.
#[derive(Clone, Debug, Default)]
pub struct TriangleMesh {
  pub vertices: Vec<Vec3>,
  pub indices: Vec<[u32; 3]>,
}

impl TriangleMesh {
  pub fn new(vertices: Vec<Vec3>, indices: Vec<[u32; 3]>) -> Self {
    Self { vertices, indices }
  }

  #[inline]
  pub fn triangle_count(&self) -> usize {
    self.indices.len()
  }

  /// Check the caller contract: at least one vertex, indices in range,
  /// finite positions.
  pub fn validate(&self) -> Result<()> {
    if self.vertices.is_empty() {
      return Err(PackerError::EmptyMesh);
    }
    if !self.vertices.iter().all(|v| v.is_finite()) {
      return Err(PackerError::NonFiniteGeometry);
    }
    let vertex_count = self.vertices.len();
    for (triangle, tri) in self.indices.iter().enumerate() {
      if let Some(&index) = tri.iter().find(|&&i| i as usize >= vertex_count) {
        return Err(PackerError::InvalidIndex {
          triangle,
          index,
          vertex_count,
        });
      }
    }
    Ok(())
  }

  /// Local-space bounds, transformed corner by corner when a transform is
  /// supplied.
  pub fn world_bounds(&self, transform: Option<&DMat4>) -> Result<DAabb3> {
    let local = DAabb3::from_points(self.vertices.iter().map(|v| v.as_dvec3()))
      .ok_or(PackerError::EmptyMesh)?;
    let bounds = match transform {
      Some(m) => local.transformed(m),
      None => local,
    };
    if !bounds.is_finite() {
      return Err(PackerError::NonFiniteGeometry);
    }
    Ok(bounds)
  }

  /// World-space triangles. Indices must already be validated.
  pub fn world_triangles(&self, transform: Option<&DMat4>) -> Vec<Triangle> {
    let to_world = |i: u32| {
      let v = self.vertices[i as usize].as_dvec3();
      match transform {
        Some(m) => m.transform_point3(v),
        None => v,
      }
    };
    self
      .indices
      .iter()
      .map(|&[a, b, c]| Triangle::new(to_world(a), to_world(b), to_world(c)))
      .collect()
  }
}

/// Which side of a triangle a ray struck.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
  /// Ray travels against the normal: the origin is on the outside.
  Front,
  /// Ray travels along the normal: the origin is on the solid side.
  Back,
}

/// Closest-hit record for a ray cast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
  pub distance: f64,
  pub facing: Facing,
}

/// World-space triangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
  pub a: DVec3,
  pub b: DVec3,
  pub c: DVec3,
}

impl Triangle {
  pub fn new(a: DVec3, b: DVec3, c: DVec3) -> Self {
    Self { a, b, c }
  }

  /// Unnormalized right-handed normal, `(b - a) × (c - a)`.
  #[inline]
  pub fn normal(&self) -> DVec3 {
    (self.b - self.a).cross(self.c - self.a)
  }

  #[inline]
  pub fn aabb(&self) -> DAabb3 {
    DAabb3 {
      min: self.a.min(self.b).min(self.c),
      max: self.a.max(self.b).max(self.c),
    }
  }

  /// Simplified separating-axis overlap test against a box.
  ///
  /// Two stages: the triangle's bounds must overlap the box on every axis,
  /// then the triangle's plane must pass within the box's projected radius
  /// of its center. The 9 edge-cross axes are not tested, so a few
  /// near-corner triangles report a conservative overlap.
  pub fn overlaps_aabb(&self, aabb: &DAabb3) -> bool {
    if !self.aabb().overlaps(aabb) {
      return false;
    }

    let normal = self.normal();
    let length = normal.length();
    if length <= f64::EPSILON {
      // Degenerate sliver: the bounds test is all we can do.
      return true;
    }
    let normal = normal / length;

    let center = aabb.center();
    let half = aabb.half_extents();
    let radius = half.x * normal.x.abs() + half.y * normal.y.abs() + half.z * normal.z.abs();
    let distance = normal.dot(center - self.a);
    distance.abs() <= radius
  }

  /// Two-sided Möller–Trumbore intersection.
  ///
  /// Returns the hit distance along `dir` (in units of `dir`'s length) and
  /// which face was struck. Hits at or below `min_distance` are ignored.
  /// Barycentric bounds are slightly widened so rays through a shared edge
  /// hit at least one of the two triangles.
  pub fn ray_intersection(&self, origin: DVec3, dir: DVec3, min_distance: f64) -> Option<RayHit> {
    const EPS: f64 = 1e-12;
    const EDGE_TOLERANCE: f64 = 1e-9;

    let edge1 = self.b - self.a;
    let edge2 = self.c - self.a;
    let pvec = dir.cross(edge2);
    let det = edge1.dot(pvec);
    if det.abs() < EPS {
      return None;
    }
    let inv_det = 1.0 / det;

    let tvec = origin - self.a;
    let u = tvec.dot(pvec) * inv_det;
    if !(-EDGE_TOLERANCE..=1.0 + EDGE_TOLERANCE).contains(&u) {
      return None;
    }

    let qvec = tvec.cross(edge1);
    let v = dir.dot(qvec) * inv_det;
    if v < -EDGE_TOLERANCE || u + v > 1.0 + EDGE_TOLERANCE {
      return None;
    }

    let distance = edge2.dot(qvec) * inv_det;
    if distance <= min_distance {
      return None;
    }

    // det = -dir·normal, so a negative determinant means the ray runs along
    // the normal and struck the back face.
    let facing = if det < 0.0 { Facing::Back } else { Facing::Front };
    Some(RayHit { distance, facing })
  }
}

#[cfg(test)]
#[path = "mesh_test.rs"]
mod mesh_test;
