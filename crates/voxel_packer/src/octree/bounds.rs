//! Axis-aligned bounding box with double precision.

use glam::{DMat4, DVec3};

/// Double-precision axis-aligned bounding box.
///
/// Used for octree cells, mesh bounds and the packed output boxes.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DAabb3 {
  /// Minimum corner (inclusive).
  pub min: DVec3,
  /// Maximum corner (inclusive).
  pub max: DVec3,
}

impl DAabb3 {
  /// Create a new AABB from min and max corners.
  ///
  /// # Panics
  /// Debug-asserts that min <= max on all axes.
  pub fn new(min: DVec3, max: DVec3) -> Self {
    debug_assert!(
      min.x <= max.x && min.y <= max.y && min.z <= max.z,
      "AABB min must be <= max on all axes"
    );
    Self { min, max }
  }

  /// Create a new AABB from center and half-extents.
  pub fn from_center_half_extents(center: DVec3, half_extents: DVec3) -> Self {
    Self {
      min: center - half_extents,
      max: center + half_extents,
    }
  }

  /// Smallest AABB enclosing every point. `None` for an empty iterator.
  pub fn from_points(points: impl IntoIterator<Item = DVec3>) -> Option<Self> {
    let mut points = points.into_iter();
    let first = points.next()?;
    let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
    Some(Self { min, max })
  }

  /// Check if this AABB overlaps with another.
  ///
  /// Two AABBs overlap if they share any interior or boundary points.
  #[inline]
  pub fn overlaps(&self, other: &DAabb3) -> bool {
    self.min.x <= other.max.x
      && self.max.x >= other.min.x
      && self.min.y <= other.max.y
      && self.max.y >= other.min.y
      && self.min.z <= other.max.z
      && self.max.z >= other.min.z
  }

  /// Check if this AABB contains a point.
  #[inline]
  pub fn contains_point(&self, point: DVec3) -> bool {
    point.x >= self.min.x
      && point.x <= self.max.x
      && point.y >= self.min.y
      && point.y <= self.max.y
      && point.z >= self.min.z
      && point.z <= self.max.z
  }

  /// Get the size of the AABB (max - min).
  #[inline]
  pub fn size(&self) -> DVec3 {
    self.max - self.min
  }

  /// Get the center of the AABB.
  #[inline]
  pub fn center(&self) -> DVec3 {
    (self.min + self.max) * 0.5
  }

  /// Half of [`size`](Self::size).
  #[inline]
  pub fn half_extents(&self) -> DVec3 {
    self.size() * 0.5
  }

  #[inline]
  pub fn volume(&self) -> f64 {
    let size = self.size();
    size.x * size.y * size.z
  }

  /// Grow every face outward by `margin` (per axis).
  #[inline]
  pub fn inflated(&self, margin: DVec3) -> Self {
    Self {
      min: self.min - margin,
      max: self.max + margin,
    }
  }

  /// Smallest cube sharing this box's center that encloses it.
  pub fn to_cube(&self) -> Self {
    let half = self.half_extents().max_element();
    Self::from_center_half_extents(self.center(), DVec3::splat(half))
  }

  /// The 8 corners, octant order (bit 0 = +X, bit 1 = +Y, bit 2 = +Z).
  pub fn corners(&self) -> [DVec3; 8] {
    std::array::from_fn(|octant| {
      DVec3::new(
        if octant & 1 == 0 { self.min.x } else { self.max.x },
        if octant & 2 == 0 { self.min.y } else { self.max.y },
        if octant & 4 == 0 { self.min.z } else { self.max.z },
      )
    })
  }

  /// Bounds of this box after `transform`, re-bounded corner by corner.
  pub fn transformed(&self, transform: &DMat4) -> Self {
    let corners = self.corners().map(|c| transform.transform_point3(c));
    // 8 corners, never empty
    let (min, max) = corners[1..]
      .iter()
      .fold((corners[0], corners[0]), |(min, max), &p| (min.min(p), max.max(p)));
    Self { min, max }
  }

  /// True when `min < max` on every axis.
  #[inline]
  pub fn has_volume(&self) -> bool {
    self.min.cmplt(self.max).all()
  }

  /// True when both corners are finite numbers.
  #[inline]
  pub fn is_finite(&self) -> bool {
    self.min.is_finite() && self.max.is_finite()
  }
}
