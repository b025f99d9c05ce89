//! Pointer → room surface
//!
//! Only the room graph is tested: decals are never part of it, so an
//! existing sticker cannot block a new placement behind it.

use crate::foundation::math::Vec2;
use crate::input::Viewport;
use crate::physics::collision::RayHit;
use crate::render::Camera;
use crate::scene::SceneGraph;

/// Nearest room surface under a client-space pointer position
///
/// `None` covers every "nothing to place on" case: pointer over a
/// zero-sized viewport, degenerate camera, or a ray that misses the room.
pub fn resolve(
    pointer: &Vec2,
    camera: &Camera,
    viewport: &Viewport,
    scene: &SceneGraph,
) -> Option<RayHit> {
    let ndc = viewport.screen_to_ndc(pointer)?;
    let ray = camera.screen_to_world_ray(ndc.x, ndc.y)?;
    let hit = scene.raycast(&ray);
    if hit.is_none() {
        log::trace!("Pointer {:?} missed the room", pointer);
    }
    hit
}
