//! Visibility probe - the inside/outside oracle.
//!
//! From a sample point, a probe looks along the 6 principal axes and reports
//! how much of the surface it sees is back-facing (the direction points into
//! solid interior) versus front-facing (the direction points to open space).
//!
//! ```text
//!                +Y
//!                 │   back faces seen in most directions → Inside
//!          -X ────●──── +X
//!                 │   front faces / empty space           → Outside
//!                -Y         (±Z into the page)
//! ```
//!
//! [`RaycastProbe`] is the CPU reference implementation. GPU-backed probes
//! (render six views with facing-encoded shading and count pixels) plug in
//! through the same trait.

pub mod raycast;
pub mod stubs;

pub use raycast::RaycastProbe;

use glam::DVec3;

use crate::error::Result;
use crate::mesh::Triangle;

/// Principal axis directions, in sampling order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Direction {
  PosX,
  NegX,
  PosY,
  NegY,
  PosZ,
  NegZ,
}

impl Direction {
  /// All 6 directions in the fixed order +X, −X, +Y, −Y, +Z, −Z.
  pub const ALL: [Direction; 6] = [
    Direction::PosX,
    Direction::NegX,
    Direction::PosY,
    Direction::NegY,
    Direction::PosZ,
    Direction::NegZ,
  ];

  /// Unit vector along this direction.
  #[inline]
  pub fn vector(self) -> DVec3 {
    match self {
      Direction::PosX => DVec3::X,
      Direction::NegX => DVec3::NEG_X,
      Direction::PosY => DVec3::Y,
      Direction::NegY => DVec3::NEG_Y,
      Direction::PosZ => DVec3::Z,
      Direction::NegZ => DVec3::NEG_Z,
    }
  }

  /// Axis index (0 = X, 1 = Y, 2 = Z).
  #[inline]
  pub fn axis(self) -> usize {
    match self {
      Direction::PosX | Direction::NegX => 0,
      Direction::PosY | Direction::NegY => 1,
      Direction::PosZ | Direction::NegZ => 2,
    }
  }

  /// +1.0 for positive directions, -1.0 for negative ones.
  #[inline]
  pub fn sign(self) -> f64 {
    match self {
      Direction::PosX | Direction::PosY | Direction::PosZ => 1.0,
      Direction::NegX | Direction::NegY | Direction::NegZ => -1.0,
    }
  }
}

/// Facing statistics for one direction.
///
/// Fractions are relative to everything examined in that direction, so they
/// need not sum to 1 (the remainder saw nothing).
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct FaceStats {
  pub back_facing_fraction: f64,
  pub front_facing_fraction: f64,
}

impl FaceStats {
  pub const EMPTY: Self = Self {
    back_facing_fraction: 0.0,
    front_facing_fraction: 0.0,
  };

  pub fn new(back_facing_fraction: f64, front_facing_fraction: f64) -> Self {
    Self {
      back_facing_fraction,
      front_facing_fraction,
    }
  }
}

/// One probe result: [`FaceStats`] indexed like [`Direction::ALL`].
pub type ProbeSample = [FaceStats; 6];

/// Inside/outside oracle consumed by seed classification.
///
/// `sample` is a synchronous, blocking call with no side effects on pipeline
/// state. Implementations must be `Sync`: candidates may be sampled from the
/// rayon pool.
pub trait VisibilityProbe: Send + Sync {
  /// Fail fast when sampling resources (renderer, shaders, ...) are missing.
  /// Called once before any subdivision.
  fn check_ready(&self) -> Result<()> {
    Ok(())
  }

  /// Sample the 6 axis directions from `point`.
  ///
  /// # Parameters
  /// - `point`: World-space sample position (a cell center)
  /// - `cell_size`: Edge length of the sampled cell
  /// - `occluders`: World-space triangles to look at
  fn sample(&self, point: DVec3, cell_size: f64, occluders: &[Triangle]) -> ProbeSample;
}
