//! Decal transform construction
//!
//! A decal's orientation is split in two: a base orientation that aligns the
//! quad with its wall, computed once at placement, and an absolute in-plane
//! angle the user edits with a slider. The final orientation is always
//! rebuilt from those two, so slider edits never accumulate error.

use serde::{Deserialize, Serialize};

use crate::core::config::PlacementConfig;
use crate::foundation::math::{world_up, Mat3, Quat, Rotation3, Transform, UnitVec3, Vec3};
use crate::physics::collision::RayHit;
use super::stabilizer::WallNormalStabilizer;
use super::PlacementError;

/// Above this |n·up| the up axis is too close to the normal for a cross product
const PARALLEL_LIMIT: f64 = 0.999;

/// Orientation carrying the local frame onto a surface
///
/// Local +Z (the quad's facing axis) maps onto `normal`, local +X onto the
/// tangent `up × normal` and local +Y onto `normal × tangent`. For walls
/// this keeps the image upright regardless of which wall it is on.
pub fn build_base(normal: &UnitVec3) -> Quat {
    let n = normal.into_inner();
    let reference = if n.dot(&world_up()).abs() > PARALLEL_LIMIT {
        Vec3::z()
    } else {
        world_up()
    };

    let tangent = reference.cross(&n).normalize();
    let bitangent = n.cross(&tangent);
    let basis = Mat3::from_columns(&[tangent, bitangent, n]);

    Quat::from_rotation_matrix(&Rotation3::from_matrix_unchecked(basis))
}

/// Base orientation turned about its own facing axis by `in_plane_rotation`
///
/// The axis is the world-space normal (`base * Z`), and the result is
/// computed from `base` every call.
pub fn apply_rotation(base: &Quat, in_plane_rotation: f64) -> Quat {
    let axis = UnitVec3::new_normalize(base * Vec3::z());
    Quat::from_axis_angle(&axis, in_plane_rotation) * base
}

/// Full placement of a decal on a wall
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecalTransform {
    /// Anchor point, already pushed off the surface
    pub position: Vec3,
    /// Stabilized outward normal
    pub normal: Vec3,
    /// Orientation before the user's in-plane rotation
    pub base_orientation: Quat,
    /// Absolute in-plane rotation in radians
    pub in_plane_rotation: f64,
    /// Uniform scale
    pub scale: f64,
}

impl DecalTransform {
    /// Orientation a renderer should use
    pub fn final_orientation(&self) -> Quat {
        apply_rotation(&self.base_orientation, self.in_plane_rotation)
    }

    /// Same placement with a new absolute rotation
    pub fn with_rotation(mut self, in_plane_rotation: f64) -> Self {
        self.in_plane_rotation = in_plane_rotation;
        self
    }

    /// Same placement with a new scale
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Scene transform for the decal mesh
    pub fn to_transform(&self) -> Transform {
        Transform::from_position_rotation(self.position, self.final_orientation())
            .with_uniform_scale(self.scale)
    }
}

/// Turns wall hits into [`DecalTransform`]s
#[derive(Debug, Clone)]
pub struct DecalTransformBuilder {
    stabilizer: WallNormalStabilizer,
    surface_offset: f64,
}

impl DecalTransformBuilder {
    /// Create a builder from placement configuration
    pub fn new(config: &PlacementConfig) -> Self {
        Self {
            stabilizer: WallNormalStabilizer::from_config(config),
            surface_offset: config.surface_offset,
        }
    }

    /// The stabilizer used for hits
    pub fn stabilizer(&self) -> &WallNormalStabilizer {
        &self.stabilizer
    }

    /// Place a decal at `point` on a surface with an already stabilized normal
    pub fn place(
        &self,
        point: &Vec3,
        normal: &UnitVec3,
        scale: f64,
        in_plane_rotation: f64,
    ) -> DecalTransform {
        DecalTransform {
            position: point + normal.into_inner() * self.surface_offset,
            normal: normal.into_inner(),
            base_orientation: build_base(normal),
            in_plane_rotation,
            scale,
        }
    }

    /// Stabilize the hit normal, then place
    pub fn place_hit(
        &self,
        hit: &RayHit,
        scale: f64,
        in_plane_rotation: f64,
    ) -> Result<DecalTransform, PlacementError> {
        let direction = self.stabilizer.stabilize(&hit.normal)?;
        let transform = self.place(&hit.point, &direction.unit_vector(), scale, in_plane_rotation);
        log::debug!(
            "Placed decal at {:?} facing {:?} (scale {:.3}, rotation {:.3})",
            transform.position,
            direction,
            scale,
            in_plane_rotation
        );
        Ok(transform)
    }
}

impl Default for DecalTransformBuilder {
    fn default() -> Self {
        Self::new(&PlacementConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decal::CardinalDirection;
    use crate::foundation::math::utils::deg_to_rad;
    use crate::scene::NodeId;
    use approx::assert_relative_eq;

    fn wall_hit(normal: Vec3) -> RayHit {
        RayHit {
            node: NodeId::default(),
            distance: 2.0,
            point: Vec3::new(1.0, 1.2, 0.4),
            normal,
        }
    }

    #[test]
    fn test_base_maps_facing_axis_onto_normal() {
        for direction in CardinalDirection::ALL {
            let base = build_base(&direction.unit_vector());
            assert_relative_eq!(base * Vec3::z(), direction.vector(), epsilon = 1e-12);
            // Walls keep the image upright
            assert_relative_eq!(base * Vec3::y(), Vec3::y(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_base_for_pos_x() {
        let base = build_base(&Vec3::x_axis());
        assert_relative_eq!(base * Vec3::x(), -Vec3::z(), epsilon = 1e-12);
        assert_relative_eq!(base * Vec3::y(), Vec3::y(), epsilon = 1e-12);
    }

    #[test]
    fn test_base_near_up_is_finite() {
        let base = build_base(&Vec3::y_axis());
        let q = base.quaternion();
        assert!(q.coords.iter().all(|c| c.is_finite()));
        assert_relative_eq!(base * Vec3::z(), Vec3::y(), epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_is_about_the_normal() {
        let base = build_base(&Vec3::x_axis());
        let rotated = apply_rotation(&base, deg_to_rad(30.0));
        // Facing axis unchanged, in-plane axes turned
        assert_relative_eq!(rotated * Vec3::z(), Vec3::x(), epsilon = 1e-12);
        assert_relative_eq!(
            (rotated * Vec3::y()).dot(&Vec3::y()),
            deg_to_rad(30.0).cos(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_rotation_edits_are_absolute() {
        let base = build_base(&Vec3::z_axis());
        let direct = DecalTransformBuilder::default()
            .place(&Vec3::zeros(), &Vec3::z_axis(), 1.0, deg_to_rad(10.0));

        let edited = DecalTransformBuilder::default()
            .place(&Vec3::zeros(), &Vec3::z_axis(), 1.0, deg_to_rad(45.0))
            .with_rotation(deg_to_rad(10.0));

        assert_eq!(edited.base_orientation, base);
        assert_relative_eq!(
            edited.final_orientation(),
            direct.final_orientation(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_repeated_slider_edits_do_not_drift() {
        let start = DecalTransformBuilder::default()
            .place(&Vec3::zeros(), &Vec3::x_axis(), 1.0, 0.0);
        let mut edited = start.clone();
        for step in 0..1000 {
            edited = edited.with_rotation(f64::from(step) * 0.01);
        }
        edited = edited.with_rotation(0.0);
        assert_eq!(edited, start);
    }

    #[test]
    fn test_place_offsets_along_normal() {
        let builder = DecalTransformBuilder::default();
        let placed = builder.place_hit(&wall_hit(Vec3::new(0.9, 0.1, 0.3)), 0.5, 0.0).unwrap();
        assert_eq!(placed.normal, Vec3::x());
        assert_relative_eq!(placed.position, Vec3::new(1.006, 1.2, 0.4), epsilon = 1e-12);
        assert_eq!(placed.scale, 0.5);
    }

    #[test]
    fn test_floor_hit_is_rejected() {
        let builder = DecalTransformBuilder::default();
        let result = builder.place_hit(&wall_hit(Vec3::new(0.1, 0.95, 0.0)), 0.5, 0.0);
        assert!(matches!(result, Err(PlacementError::NonWallHit { .. })));
    }

    #[test]
    fn test_to_transform_uses_final_orientation() {
        let placed = DecalTransformBuilder::default()
            .place(&Vec3::zeros(), &Vec3::z_axis(), 2.0, deg_to_rad(90.0));
        let transform = placed.to_transform();
        assert_relative_eq!(transform.rotation, placed.final_orientation(), epsilon = 1e-12);
        assert_relative_eq!(transform.scale, Vec3::repeat(2.0));
        // Image +X now points up
        assert_relative_eq!(transform.rotation * Vec3::x(), Vec3::y(), epsilon = 1e-12);
    }
}
