//! Minimal Wavefront OBJ reader.
//!
//! Only positions (`v`) and faces (`f`) are read; normals, texture
//! coordinates, groups and materials are skipped. Polygons are
//! fan-triangulated around their first corner.
//!
//! Face corners may be written as `i`, `i/t`, `i//n` or `i/t/n`. Negative
//! indices count back from the last vertex read so far.

use anyhow::{bail, Context, Result};
use glam::Vec3;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use voxel_packer::TriangleMesh;

/// Parse OBJ text from any reader.
pub fn parse_obj<R: Read>(reader: R) -> Result<TriangleMesh> {
  let reader = BufReader::new(reader);
  let mut vertices: Vec<Vec3> = Vec::new();
  let mut indices: Vec<[u32; 3]> = Vec::new();
  let mut corners: Vec<u32> = Vec::new();

  for (line_idx, line) in reader.lines().enumerate() {
    let line_no = line_idx + 1;
    let line = line.with_context(|| format!("Failed to read line {line_no}"))?;
    let mut parts = line.split_whitespace();

    match parts.next() {
      Some("v") => {
        let mut coords = [0.0f32; 3];
        for (axis, slot) in coords.iter_mut().enumerate() {
          let token = parts
            .next()
            .with_context(|| format!("Line {line_no}: vertex is missing coordinate {axis}"))?;
          *slot = token
            .parse()
            .with_context(|| format!("Line {line_no}: invalid coordinate '{token}'"))?;
        }
        vertices.push(Vec3::from_array(coords));
      }
      Some("f") => {
        corners.clear();
        for token in parts {
          corners.push(resolve_index(token, vertices.len(), line_no)?);
        }
        if corners.len() < 3 {
          bail!(
            "Line {line_no}: face needs at least 3 corners, found {}",
            corners.len()
          );
        }
        for i in 1..corners.len() - 1 {
          indices.push([corners[0], corners[i], corners[i + 1]]);
        }
      }
      _ => {}
    }
  }

  Ok(TriangleMesh::new(vertices, indices))
}

/// Load and parse an OBJ file.
pub fn load_obj(path: &Path) -> Result<TriangleMesh> {
  let file = std::fs::File::open(path)
    .with_context(|| format!("Failed to open mesh file: {}", path.display()))?;
  parse_obj(file).with_context(|| format!("Failed to parse mesh file: {}", path.display()))
}

/// Zero-based vertex index of one face corner.
fn resolve_index(token: &str, vertex_count: usize, line_no: usize) -> Result<u32> {
  let position = token.split('/').next().unwrap_or(token);
  let raw: i64 = position
    .parse()
    .with_context(|| format!("Line {line_no}: invalid face index '{token}'"))?;

  let resolved = match raw {
    0 => bail!("Line {line_no}: face index 0 is not valid in OBJ"),
    r if r > 0 => r - 1,
    r => vertex_count as i64 + r,
  };
  if resolved < 0 {
    bail!("Line {line_no}: relative index {raw} points before the first vertex");
  }
  u32::try_from(resolved).with_context(|| format!("Line {line_no}: face index {raw} too large"))
}
