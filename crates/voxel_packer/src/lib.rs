//! voxel_packer - approximate a mesh's solid interior with axis-aligned boxes
//!
//! This crate turns an arbitrary static triangle mesh into a handful of
//! axis-aligned boxes that together cover a configurable fraction of the
//! mesh's interior volume. The boxes are cheap collision/occlusion proxies
//! for places where exact mesh collision is too expensive.
//!
//! # Pipeline
//!
//! ```text
//! ┌─────────┐   ┌──────────┐   ┌──────────┐   ┌───────────┐   ┌──────┐   ┌────────┐
//! │ Octree  ├──►│ Seed     ├──►│ Classify ├──►│ Propagate ├──►│ Pack ├──►│ Filter │
//! │ build   │   │ search   │   │ (probe)  │   │ (votes)   │   │      │   │        │
//! └─────────┘   └──────────┘   └──────────┘   └───────────┘   └──────┘   └────────┘
//! ```
//!
//! - **Octree**: recursive subdivision around the mesh; leaves touching
//!   triangles at max depth become `Intersecting`, empty leaves stay
//!   `Unknown`.
//! - **Classify**: a [`VisibilityProbe`] looks out of each empty leaf in the 6
//!   axis directions. Mostly back faces means the leaf is inside the mesh.
//! - **Propagate**: classified seeds vote on their unclassified neighbours.
//! - **Pack**: boxes grow greedily from the deepest interior voxel, ranked by
//!   a BFS distance field.
//!
//! # Example
//!
//! ```ignore
//! use voxel_packer::{test_meshes, PackerConfig, RaycastProbe, VoxelPacker};
//!
//! let mesh = test_meshes::cube(1.0);
//! let probe = RaycastProbe::from_config(&PackerConfig::default());
//! let output = VoxelPacker::new(PackerConfig::default()).run(&mesh, None, &probe)?;
//!
//! println!("{} boxes, {:.0}% coverage",
//!     output.result.boxes.len(), output.result.volume_coverage * 100.0);
//! ```

pub mod config;
pub mod error;
pub mod mesh;

pub use config::PackerConfig;
pub use error::{PackerError, Result};
pub use mesh::{Triangle, TriangleMesh};

// Spatial subdivision
pub mod octree;
pub use octree::{Cell, CellId, CellState, CellStatus, DAabb3, Octree};

// Inside/outside oracle
pub mod probe;
pub use probe::{Direction, FaceStats, RaycastProbe, VisibilityProbe};

// Classification stages
pub mod classify;
pub mod propagate;

// Box packing
pub mod packing;
pub use packing::{PackingResult, StopReason, VoxelGrid};

// Culling spheres derived from packed boxes
pub mod spheres;
pub use spheres::{proxy_spheres, ProxySphere};

// Stage diagnostics
pub mod metrics;
pub use metrics::PipelineDiagnostics;

// Orchestrator
pub mod pipeline;
pub use pipeline::{voxelize_and_pack, PackOutput, VoxelPacker};

// Deterministic meshes for tests and benches
pub mod test_meshes;
