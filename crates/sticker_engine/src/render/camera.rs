//! # Perspective Camera
//!
//! The placement pipeline never draws anything itself, but it needs the
//! same camera the host renders with: pointer rays are unprojected through
//! its view-projection matrix.
//!
//! ## Conventions
//! - Right-handed, Y-up world space
//! - OpenGL-style clip space: NDC x/y in [-1, 1] with +Y up, z in [-1, 1]
//!
//! These match the browser renderer the scans are viewed in, so a pointer
//! position maps to the same world ray on both sides.

use crate::core::config::CameraConfig;
use crate::foundation::math::{utils, Mat4, Point3, Vec3, Vec4};
use crate::physics::collision::{Aabb, Ray};

/// Framing margin around the fitted bounds
const FIT_MARGIN: f64 = 1.2;

/// 3D camera for perspective projection
///
/// Matrices are computed on demand from position, target and lens
/// parameters; the host's orbit controls mutate `position`/`target`.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Orbit target in world space
    pub target: Vec3,

    /// Up vector (typically +Y)
    pub up: Vec3,

    /// Vertical field of view in radians
    pub fov: f64,

    /// Aspect ratio (width / height)
    pub aspect: f64,

    /// Distance to near clipping plane
    pub near: f64,

    /// Distance to far clipping plane
    pub far: f64,
}

impl Camera {
    /// Create a perspective camera looking at the origin
    ///
    /// # Arguments
    /// * `position` - Camera position in world space
    /// * `fov_degrees` - Vertical field of view in degrees
    /// * `aspect` - Viewport width / height
    /// * `near` - Near clipping plane (must be > 0)
    /// * `far` - Far clipping plane (must be > near)
    pub fn perspective(position: Vec3, fov_degrees: f64, aspect: f64, near: f64, far: f64) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::y(),
            fov: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
        }
    }

    /// Create the initial camera from configuration
    pub fn from_config(config: &CameraConfig, aspect: f64) -> Self {
        let mut camera =
            Self::perspective(config.position, config.fov_degrees, aspect, config.near, config.far);
        camera.target = config.target;
        camera
    }

    /// Point the camera at `target`
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
        log::trace!("Camera target updated to: {:?}", target);
    }

    /// Update aspect ratio after a viewport resize
    pub fn set_aspect_ratio(&mut self, aspect: f64) {
        if (self.aspect - aspect).abs() > 0.01 {
            log::debug!("Camera aspect ratio changed: {:.3} -> {:.3}", self.aspect, aspect);
        }
        self.aspect = aspect;
    }

    /// World-to-view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(&Point3::from(self.position), &Point3::from(self.target), &self.up)
    }

    /// View-to-clip matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    /// Combined `P × V`
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World-space ray through a point in normalized device coordinates
    ///
    /// # Arguments
    /// * `ndc_x` - -1 at the left edge, +1 at the right
    /// * `ndc_y` - -1 at the bottom edge, +1 at the top
    ///
    /// # Returns
    /// Ray from the camera position, or `None` if the camera is degenerate
    /// (zero aspect, target on top of the position, ...).
    ///
    /// # Process
    /// 1. Unproject the NDC point at the near (z = -1) and far (z = +1) planes
    /// 2. Perspective divide
    /// 3. Direction = far - near, origin = camera position
    pub fn screen_to_world_ray(&self, ndc_x: f64, ndc_y: f64) -> Option<Ray> {
        let inv_view_proj = self.view_projection().try_inverse()?;

        let unproject = |z: f64| -> Option<Vec3> {
            let h = inv_view_proj * Vec4::new(ndc_x, ndc_y, z, 1.0);
            if h.w.abs() < f64::EPSILON {
                return None;
            }
            let p = Vec3::new(h.x / h.w, h.y / h.w, h.z / h.w);
            p.iter().all(|c| c.is_finite()).then_some(p)
        };

        let near = unproject(-1.0)?;
        let far = unproject(1.0)?;
        let direction = (far - near).try_normalize(f64::EPSILON)?;

        Some(Ray::new(self.position, direction))
    }

    /// Frame a bounding box
    ///
    /// Keeps the current viewing direction, targets the box centre and backs
    /// off far enough for the largest dimension to fit the field of view
    /// with some margin. Clip planes are rescaled to the new distance. Empty
    /// bounds leave the camera untouched.
    pub fn fit_to_bounds(&mut self, bounds: &Aabb) {
        if bounds.is_empty() {
            log::debug!("fit_to_bounds: empty bounds, camera unchanged");
            return;
        }

        let center = bounds.center();
        let distance = bounds.max_dimension() * FIT_MARGIN / (self.fov / 2.0).tan();
        let direction = (self.position - self.target)
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vec3::z);

        self.target = center;
        self.position = center + direction * distance;
        self.near = distance / 100.0;
        self.far = distance * 100.0;

        log::info!(
            "Camera framed bounds centre {:?} at distance {:.3} (near {:.4}, far {:.1})",
            center,
            distance,
            self.near,
            self.far
        );
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default(), 16.0 / 9.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn looking_down_negative_z() -> Camera {
        let mut camera = Camera::perspective(Vec3::new(0.0, 1.0, 5.0), 60.0, 1.0, 0.1, 100.0);
        camera.look_at(Vec3::new(0.0, 1.0, 0.0));
        camera
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = looking_down_negative_z();
        let ray = camera.screen_to_world_ray(0.0, 0.0).unwrap();
        assert_relative_eq!(ray.origin, camera.position);
        assert_relative_eq!(ray.direction, -Vec3::z(), epsilon = 1e-9);
    }

    #[test]
    fn test_ndc_y_up_is_world_up() {
        let camera = looking_down_negative_z();
        let up = camera.screen_to_world_ray(0.0, 0.5).unwrap();
        let right = camera.screen_to_world_ray(0.5, 0.0).unwrap();
        assert!(up.direction.y > 0.0);
        assert!(right.direction.x > 0.0);

        // Top edge of the frustum sits at half the vertical fov
        let top = camera.screen_to_world_ray(0.0, 1.0).unwrap();
        assert_relative_eq!(top.direction.angle(&-Vec3::z()), camera.fov / 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_degenerate_camera_has_no_ray() {
        let mut camera = looking_down_negative_z();
        camera.target = camera.position;
        assert!(camera.screen_to_world_ray(0.0, 0.0).is_none());
    }

    #[test]
    fn test_fit_to_bounds() {
        let mut camera = Camera::default();
        let before = (camera.position - camera.target).normalize();
        let bounds = Aabb::new(Vec3::new(-1.0, 0.0, -2.0), Vec3::new(1.0, 3.0, 2.0));

        camera.fit_to_bounds(&bounds);

        let expected = 4.0 * 1.2 / (camera.fov / 2.0).tan();
        assert_relative_eq!(camera.target, Vec3::new(0.0, 1.5, 0.0));
        assert_relative_eq!((camera.position - camera.target).norm(), expected, epsilon = 1e-9);
        assert_relative_eq!((camera.position - camera.target).normalize(), before, epsilon = 1e-9);
        assert_relative_eq!(camera.near, expected / 100.0, epsilon = 1e-9);
        assert_relative_eq!(camera.far, expected * 100.0, epsilon = 1e-6);
    }

    #[test]
    fn test_fit_to_empty_bounds_is_noop() {
        let mut camera = Camera::default();
        let position = camera.position;
        camera.fit_to_bounds(&Aabb::empty());
        assert_eq!(camera.position, position);
    }
}
