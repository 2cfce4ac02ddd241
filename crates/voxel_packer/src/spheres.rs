//! Proxy spheres for sphere-based culling systems.
//!
//! A box is cut into at most 2 × 2 sub-boxes along its two longest axes and
//! each sub-box is wrapped in a sphere:
//!
//! ```text
//! ┌──────────┬──────────┐
//! │    ●     │    ●     │   8 × 2 × 2 box → 2 spheres along X
//! └──────────┴──────────┘
//! ```
//!
//! Before splitting, thin axes are fattened: the middle axis to at least ¼
//! of the longest, the shortest to at least ½ of the middle. Slabs and rods
//! therefore get spheres that over-cover rather than many tiny ones.

use glam::DVec3;
use smallvec::SmallVec;

use crate::octree::DAabb3;

/// Sub-boxes per axis at most.
pub const MAX_SPHERES_PER_AXIS: usize = 2;

/// Bounding sphere of one sub-box.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProxySphere {
  /// World-space center.
  pub center: DVec3,
  /// Center relative to the source box center.
  pub offset: DVec3,
  /// Half-diagonal of the sub-box.
  pub radius: f64,
}

/// Spheres covering `bounds`, at most [`MAX_SPHERES_PER_AXIS`]² of them.
pub fn proxy_spheres(bounds: &DAabb3) -> SmallVec<[ProxySphere; 4]> {
  let mut size = bounds.size();

  // Longest axis first; equal axes keep x, y, z order
  let mut axes = [0usize, 1, 2];
  axes.sort_by(|&a, &b| size[b].total_cmp(&size[a]));
  let [major, middle, minor] = axes;

  if size[major] * 0.25 > size[middle] {
    size[middle] = size[major] * 0.25;
  }
  if size[middle] * 0.5 > size[minor] {
    size[minor] = size[middle] * 0.5;
  }

  let middle_count = split_count(size[middle], size[minor]);
  let major_count = split_count(size[major], size[middle]);

  let mut sub_size = size;
  sub_size[major] = size[major] / major_count as f64;
  sub_size[middle] = size[middle] / middle_count as f64;

  let origin_center = bounds.center();
  let mut spheres = SmallVec::new();
  for i in 0..middle_count {
    for j in 0..major_count {
      let mut sub_min = bounds.min;
      sub_min[middle] += i as f64 * sub_size[middle];
      sub_min[major] += j as f64 * sub_size[major];
      let center = sub_min + sub_size * 0.5;
      spheres.push(ProxySphere {
        center,
        offset: center - origin_center,
        radius: (sub_size * 0.5).length(),
      });
    }
  }
  spheres
}

/// `floor(longer / shorter)` clamped to `1..=MAX_SPHERES_PER_AXIS`.
fn split_count(longer: f64, shorter: f64) -> usize {
  if shorter <= 0.0 {
    return 1;
  }
  ((longer / shorter).floor() as usize).clamp(1, MAX_SPHERES_PER_AXIS)
}
