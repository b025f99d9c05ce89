//! Collision mesh representations
//!
//! Room geometry is stored in model space and transformed to world space only
//! when it is tested, mirroring how the scene graph owns local transforms.

use crate::foundation::math::{Mat4, Point3, Vec3};
use super::primitives::{Aabb, Ray, Triangle};

/// A collision mesh template stored in MODEL SPACE (local coordinates)
#[derive(Debug, Clone)]
pub struct CollisionMeshTemplate {
    /// Triangles in MODEL SPACE (local coordinates, never modified)
    pub local_triangles: Vec<Triangle>,
    /// Local bounds (model space)
    pub local_bounds: Aabb,
}

impl CollisionMeshTemplate {
    /// Creates a new collision mesh template from MODEL SPACE vertices and indices
    ///
    /// Index triples referencing missing vertices are skipped.
    pub fn from_vertices(vertices: &[Vec3], indices: &[u32]) -> Self {
        let mut skipped = 0usize;
        let triangles: Vec<Triangle> = indices
            .chunks_exact(3)
            .filter_map(|chunk| {
                let fetch = |i: u32| vertices.get(i as usize).copied();
                match (fetch(chunk[0]), fetch(chunk[1]), fetch(chunk[2])) {
                    (Some(v0), Some(v1), Some(v2)) => Some(Triangle::new(v0, v1, v2)),
                    _ => {
                        skipped += 1;
                        None
                    }
                }
            })
            .collect();

        if skipped > 0 {
            log::warn!("Skipped {} triangles with out-of-range indices", skipped);
        }

        Self::from_triangles(triangles)
    }

    /// Creates a template directly from model-space triangles
    pub fn from_triangles(triangles: Vec<Triangle>) -> Self {
        let mut bounds = Aabb::empty();
        for tri in &triangles {
            for vertex in [tri.v0, tri.v1, tri.v2] {
                bounds.expand_point(&vertex);
            }
        }

        Self {
            local_triangles: triangles,
            local_bounds: bounds,
        }
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.local_triangles.len()
    }

    /// Transform this template to world space using a transformation matrix
    pub fn to_world_space(&self, matrix: &Mat4) -> WorldSpaceCollisionMesh {
        let transform = |v: &Vec3| matrix.transform_point(&Point3::from(*v)).coords;

        let triangles: Vec<Triangle> = self
            .local_triangles
            .iter()
            .map(|tri| Triangle::new(transform(&tri.v0), transform(&tri.v1), transform(&tri.v2)))
            .collect();

        let mut bounds = Aabb::empty();
        for tri in &triangles {
            for vertex in [tri.v0, tri.v1, tri.v2] {
                bounds.expand_point(&vertex);
            }
        }

        WorldSpaceCollisionMesh { triangles, bounds }
    }
}

/// World-space collision mesh (temporary, created on-demand for ray tests)
#[derive(Debug)]
pub struct WorldSpaceCollisionMesh {
    /// Triangles in world space
    pub triangles: Vec<Triangle>,
    /// World-space bounds
    pub bounds: Aabb,
}

impl WorldSpaceCollisionMesh {
    /// Test ray intersection against all triangles in the mesh
    ///
    /// Returns the closest hit `(t, hit_point, normal)`. The normal is the
    /// world-space face normal flipped, if needed, to face the ray origin:
    /// whichever side the user clicked is the "outside" of that wall.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f64, Vec3, Vec3)> {
        self.bounds.intersect_ray(ray)?;

        let mut closest: Option<(f64, Vec3, Vec3)> = None;

        for triangle in &self.triangles {
            let Some((t, _u, _v)) = triangle.intersect_ray(ray) else {
                continue;
            };
            if closest.is_some_and(|(best, _, _)| t >= best) {
                continue;
            }
            let Some(mut normal) = triangle.normal() else {
                continue;
            };
            if normal.dot(&ray.direction) > 0.0 {
                normal = -normal;
            }
            closest = Some((t, ray.point_at(t), normal));
        }

        closest
    }
}
