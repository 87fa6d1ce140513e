//! # texpack-mesher
//!
//! Converts Minecraft-style texture pack assets into binary glTF (GLB)
//! geometry: flat item textures become extruded voxel meshes, and JSON
//! block models become cuboid meshes with a packed texture atlas.
//!
//! ## Pipeline
//!
//! The components compose leaves-first:
//!
//! - [`pixel_source`] — an RGBA grid and its opaque bounding box (component A)
//! - [`voxel`] — per-opaque-pixel cube extrusion (component B)
//! - [`model`] — JSON model parsing, parent merge, texture alias resolution (component C)
//! - [`cuboid`] — model elements into a mesh (component D)
//! - [`atlas`] — texture atlas packing and UV remap (component E)
//! - [`glb`] — binary glTF serialization (component F)
//!
//! ## Quick Start
//!
//! ```ignore
//! use texpack_mesher::{pixel_source::PixelGrid, voxel::build_voxel_mesh, glb::export_glb, types::CoordSystem};
//!
//! let grid = PixelGrid::new(16, 16, rgba_bytes);
//! let mesh = build_voxel_mesh(&grid, 1.0, CoordSystem::ZUp).ok_or(MesherError::EmptyMesh)?;
//! let glb_bytes = export_glb(&mesh, None, "item/apple", CoordSystem::ZUp)?;
//! ```
//!
//! Errors are split by severity (§7): a [`MesherError`] aborts the whole
//! pipeline, while a [`Warning`] is collected alongside a partial result and
//! left for the caller to report — this crate's core never writes to
//! stdout/stderr itself.

pub mod atlas;
pub mod cuboid;
pub mod error;
pub mod glb;
pub mod mesh;
pub mod model;
pub mod pixel_source;
pub mod types;
pub mod voxel;

pub use error::{MesherError, Result, Warning};
pub use mesh::{Mesh, Vertex};
pub use types::{Axis, BoundingBox, CoordSystem, Direction, ElementRotation};

pub use atlas::TextureAtlas;
pub use cuboid::build_cuboid_mesh;
pub use glb::export_glb;
pub use model::loader::{load_model, load_model_by_name};
pub use model::Model;
pub use pixel_source::{opaque_bounds, PixelGrid, PixelSource};
pub use voxel::build_voxel_mesh;
