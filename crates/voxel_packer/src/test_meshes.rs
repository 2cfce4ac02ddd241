//! Simple closed meshes for testing and benchmarking.
//!
//! Every mesh here winds counter-clockwise seen from outside, so ray casts
//! from inside hit back faces only.

use glam::Vec3;

use crate::mesh::TriangleMesh;

/// Two triangles per face, corners in octant order
/// (bit 0 = +X, bit 1 = +Y, bit 2 = +Z).
const BOX_TRIANGLES: [[u32; 3]; 12] = [
  [0, 4, 6], // -X
  [0, 6, 2],
  [1, 3, 7], // +X
  [1, 7, 5],
  [0, 1, 5], // -Y
  [0, 5, 4],
  [2, 6, 7], // +Y
  [2, 7, 3],
  [0, 2, 3], // -Z
  [0, 3, 1],
  [4, 5, 7], // +Z
  [4, 7, 6],
];

/// Closed axis-aligned box spanning `min..max`.
pub fn box_mesh(min: Vec3, max: Vec3) -> TriangleMesh {
  let vertices = (0..8u32)
    .map(|octant| {
      Vec3::new(
        if octant & 1 == 0 { min.x } else { max.x },
        if octant & 2 == 0 { min.y } else { max.y },
        if octant & 4 == 0 { min.z } else { max.z },
      )
    })
    .collect();
  TriangleMesh::new(vertices, BOX_TRIANGLES.to_vec())
}

/// Closed cube centered at the origin.
pub fn cube(half_size: f32) -> TriangleMesh {
  box_mesh(Vec3::splat(-half_size), Vec3::splat(half_size))
}

/// Several closed boxes merged into one mesh. Boxes should not overlap.
pub fn disjoint_boxes(boxes: &[(Vec3, Vec3)]) -> TriangleMesh {
  let mut mesh = TriangleMesh::default();
  for &(min, max) in boxes {
    let part = box_mesh(min, max);
    let base = mesh.vertices.len() as u32;
    mesh.vertices.extend(part.vertices);
    mesh
      .indices
      .extend(part.indices.iter().map(|t| t.map(|i| i + base)));
  }
  mesh
}

/// Vertices without triangles: bounded, but nothing to collide with.
pub fn point_cloud(points: &[Vec3]) -> TriangleMesh {
  TriangleMesh::new(points.to_vec(), Vec::new())
}
