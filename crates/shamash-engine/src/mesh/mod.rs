//! CPU-side geometry.
//!
//! Responsibilities:
//! - vertex/mesh containers ready for GPU upload
//! - reading precompiled geometry out of GLB containers
//! - procedural primitives (ground quad, placeholder shapes)
//! - attribute reconstruction (normals, tangents) for incomplete sources

mod aabb;
mod data;
mod glb;
mod primitives;

pub use aabb::Aabb;
pub use data::{MeshData, RawVertex, Vertex};
