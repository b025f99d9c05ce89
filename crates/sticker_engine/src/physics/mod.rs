//! Physics module: ray/triangle intersection for picking

pub mod collision;

pub use collision::{Aabb, CollisionMeshTemplate, Ray, RayHit, Triangle};
