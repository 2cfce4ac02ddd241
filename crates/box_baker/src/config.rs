//! Bake configuration loaded from TOML.
//!
//! ```toml
//! scale = 0.01
//! translation = [0.0, 1.5, 0.0]
//!
//! [packer]
//! max_depth = 6
//! coverage_threshold = 0.9
//! ```
//!
//! Every key is optional; missing packer keys keep their defaults.

use anyhow::{Context, Result};
use glam::{DMat4, DVec3};
use serde::Deserialize;
use std::path::Path;
use voxel_packer::PackerConfig;

/// Root configuration for one bake.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BakeConfig {
  /// Pipeline tuning.
  pub packer: PackerConfig,
  /// Offset applied after scaling.
  pub translation: Option<[f64; 3]>,
  /// Uniform scale applied to the mesh.
  pub scale: Option<f64>,
  /// Also emit proxy spheres for every box.
  pub spheres: bool,
}

impl BakeConfig {
  /// Load configuration from a TOML file.
  pub fn load(path: &Path) -> Result<Self> {
    let content = std::fs::read_to_string(path)
      .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    Self::from_toml_str(&content)
  }

  /// Parse and validate TOML text.
  pub fn from_toml_str(content: &str) -> Result<Self> {
    let config: BakeConfig = toml::from_str(content).context("Failed to parse config TOML")?;

    if let Some(scale) = config.scale {
      if !scale.is_finite() || scale <= 0.0 {
        anyhow::bail!("scale must be positive and finite, got {scale}");
      }
    }
    if let Some(t) = config.translation {
      if !t.iter().all(|c| c.is_finite()) {
        anyhow::bail!("translation must be finite, got {t:?}");
      }
    }
    config.packer.validate()?;

    Ok(config)
  }

  /// Mesh-to-world transform, or `None` when neither scale nor translation
  /// is set.
  pub fn transform(&self) -> Option<DMat4> {
    if self.scale.is_none() && self.translation.is_none() {
      return None;
    }
    let scale = DVec3::splat(self.scale.unwrap_or(1.0));
    let translation = self.translation.map(DVec3::from_array).unwrap_or(DVec3::ZERO);
    Some(DMat4::from_scale_rotation_translation(
      scale,
      glam::DQuat::IDENTITY,
      translation,
    ))
  }
}
