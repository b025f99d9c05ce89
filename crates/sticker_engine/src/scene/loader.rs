//! Room loading contract and built-in geometry
//!
//! Decoding glTF/Draco/Meshopt belongs to the host. The engine only needs
//! "given a URL, eventually a [`SceneGraph`] or an error". When loading
//! fails the page must stay usable, so a small fallback scene (a cube above
//! a ground grid) is substituted and an error status is reported.

use crate::events::StatusMessage;
use crate::foundation::math::{constants, Quat, Transform, Vec3};
use crate::physics::collision::CollisionMeshTemplate;
use super::scene_graph::SceneGraph;

/// Errors surfaced by a [`SceneLoader`]
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    /// The model could not be fetched
    #[error("Failed to fetch model {url}: {reason}")]
    Fetch {
        /// Requested URL
        url: String,
        /// Transport-level reason
        reason: String,
    },

    /// The model was fetched but could not be decoded
    #[error("Failed to decode model {url}: {reason}")]
    Decode {
        /// Requested URL
        url: String,
        /// Decoder message
        reason: String,
    },

    /// Local file error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Produces room geometry from a model URL
pub trait SceneLoader {
    /// Load and decode the model at `url`
    fn load(&mut self, url: &str) -> Result<SceneGraph, LoadError>;
}

/// Result of [`load_room_or_fallback`]
#[derive(Debug)]
pub struct LoadedRoom {
    /// Geometry to raycast against
    pub scene: SceneGraph,
    /// True when the fallback scene replaced a failed load
    pub is_fallback: bool,
    /// Message for the user, if any
    pub status: Option<StatusMessage>,
}

/// Load a room, substituting [`fallback_scene`] on failure
pub fn load_room_or_fallback(loader: &mut dyn SceneLoader, url: &str) -> LoadedRoom {
    log::info!("[Model] loading: {}", url);
    match loader.load(url) {
        Ok(scene) => {
            log::info!("[Model] loaded OK: {} ({} nodes)", url, scene.len());
            LoadedRoom { scene, is_fallback: false, status: None }
        }
        Err(err) => {
            log::error!("[Model] load error: {}: {}", url, err);
            LoadedRoom {
                scene: fallback_scene(),
                is_fallback: true,
                status: Some(StatusMessage::error("Model load error. Check URL/CORS/decoders.")),
            }
        }
    }
}

/// Debug scene: a 0.5 cube at (0, 1.2, 0) above a 10x10 ground plane
pub fn fallback_scene() -> SceneGraph {
    let mut scene = SceneGraph::new();
    scene.add_root(
        "fallbackCube",
        Transform::from_position(Vec3::new(0.0, 1.2, 0.0)),
        Some(box_mesh(Vec3::repeat(0.25))),
    );
    scene.add_root(
        "fallbackGrid",
        Transform::from_position_rotation(Vec3::zeros(), rotation_x(-constants::PI / 2.0)),
        Some(plane_mesh(10.0, 10.0)),
    );
    scene
}

/// Closed shoebox room with its floor at y = 0, centred on the origin
///
/// One node per surface so hits can be attributed to a specific wall.
pub fn room_scene(width: f64, height: f64, depth: f64) -> SceneGraph {
    let pi = constants::PI;
    let half_pi = pi / 2.0;
    let (half_w, half_h, half_d) = (width / 2.0, height / 2.0, depth / 2.0);
    let mut scene = SceneGraph::new();
    let room = scene.add_root("room", Transform::identity(), None);

    let surfaces = [
        ("wall_back", Vec3::new(0.0, half_h, -half_d), Quat::identity(), width, height),
        ("wall_front", Vec3::new(0.0, half_h, half_d), rotation_y(pi), width, height),
        ("wall_left", Vec3::new(-half_w, half_h, 0.0), rotation_y(half_pi), depth, height),
        ("wall_right", Vec3::new(half_w, half_h, 0.0), rotation_y(-half_pi), depth, height),
        ("floor", Vec3::zeros(), rotation_x(-half_pi), width, depth),
        ("ceiling", Vec3::new(0.0, height, 0.0), rotation_x(half_pi), width, depth),
    ];

    for (name, position, rotation, w, h) in surfaces {
        // Parent exists; add_child cannot fail here
        if let Err(err) = scene.add_child(
            room,
            name,
            Transform::from_position_rotation(position, rotation),
            Some(plane_mesh(w, h)),
        ) {
            log::error!("Failed to build room surface {}: {}", name, err);
        }
    }

    scene
}

/// Quad in the local XY plane, centred on the origin, facing +Z
pub fn plane_mesh(width: f64, height: f64) -> CollisionMeshTemplate {
    let (hw, hh) = (width / 2.0, height / 2.0);
    let vertices = [
        Vec3::new(-hw, -hh, 0.0),
        Vec3::new(hw, -hh, 0.0),
        Vec3::new(hw, hh, 0.0),
        Vec3::new(-hw, hh, 0.0),
    ];
    CollisionMeshTemplate::from_vertices(&vertices, &[0, 1, 2, 0, 2, 3])
}

/// Axis-aligned box centred on the origin
pub fn box_mesh(half_extents: Vec3) -> CollisionMeshTemplate {
    let (x, y, z) = (half_extents.x, half_extents.y, half_extents.z);
    let vertices = [
        Vec3::new(-x, -y, -z),
        Vec3::new(x, -y, -z),
        Vec3::new(x, y, -z),
        Vec3::new(-x, y, -z),
        Vec3::new(-x, -y, z),
        Vec3::new(x, -y, z),
        Vec3::new(x, y, z),
        Vec3::new(-x, y, z),
    ];
    let indices = [
        4, 5, 6, 4, 6, 7, // +Z
        1, 0, 3, 1, 3, 2, // -Z
        5, 1, 2, 5, 2, 6, // +X
        0, 4, 7, 0, 7, 3, // -X
        7, 6, 2, 7, 2, 3, // +Y
        0, 1, 5, 0, 5, 4, // -Y
    ];
    CollisionMeshTemplate::from_vertices(&vertices, &indices)
}

fn rotation_x(angle: f64) -> Quat {
    Quat::from_axis_angle(&Vec3::x_axis(), angle)
}

fn rotation_y(angle: f64) -> Quat {
    Quat::from_axis_angle(&Vec3::y_axis(), angle)
}
