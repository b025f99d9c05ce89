//! Ray casting against room geometry
//!
//! # Module Organization
//!
//! - [`primitives`] - Basic geometric primitives (rays, boxes, triangles)
//! - [`mesh`] - Mesh-based collision geometry (model-space templates, world-space copies)

pub mod primitives;
pub mod mesh;

// Re-export commonly used types
pub use primitives::{Aabb, Ray, RayHit, Triangle};
pub use mesh::{CollisionMeshTemplate, WorldSpaceCollisionMesh};
