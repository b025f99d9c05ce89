//! One viewer's placement session
//!
//! Wires pointer events, the camera and the room to the draft controller and
//! the live feed, and turns every outcome into a [`StatusMessage`]. This is
//! the surface a host (browser shim, native viewer, test) drives.

use crate::core::config::ApplicationConfig;
use crate::decal::{DecalController, DecalTransform, PlacementError};
use crate::events::{StatusLog, StatusMessage};
use crate::foundation::math::{utils, Vec2};
use crate::input::{ClickDetector, Viewport};
use crate::persistence::{DecalRecord, DecalStore, DraftCache, Subscription};
use crate::render::Camera;
use crate::scene::{LoadedRoom, PublishedDecals, SceneGraph};

/// Name of the cube in the fallback scene
const FALLBACK_FOCUS: &str = "fallbackCube";

/// Placement session state
#[derive(Debug)]
pub struct PlacementSession<C: DraftCache> {
    config: ApplicationConfig,
    scene: SceneGraph,
    camera: Camera,
    viewport: Viewport,
    clicks: ClickDetector,
    controller: DecalController<C>,
    published: PublishedDecals,
    subscription: Option<Subscription>,
    status: StatusLog,
}

impl<C: DraftCache> PlacementSession<C> {
    /// Create a session over `scene` with the configured initial camera
    pub fn new(config: ApplicationConfig, scene: SceneGraph, cache: C) -> Self {
        let viewport = Viewport::default().with_pixel_ratio(1.0, config.gesture.max_pixel_ratio);
        let aspect = viewport.aspect_ratio().unwrap_or(1.0);
        let camera = Camera::from_config(&config.camera, aspect);
        let clicks = ClickDetector::new(&config.gesture, viewport.pixel_ratio);
        let controller = DecalController::new(&config, cache);

        log::info!("Placement session ready ({} scene nodes)", scene.len());
        Self {
            config,
            scene,
            camera,
            viewport,
            clicks,
            controller,
            published: PublishedDecals::new(),
            subscription: None,
            status: StatusLog::new(),
        }
    }

    /// Create a session from a load result and frame the camera on it
    ///
    /// A fallback scene is framed on its cube and its load error is queued.
    pub fn from_loaded_room(config: ApplicationConfig, room: LoadedRoom, cache: C) -> Self {
        let LoadedRoom { scene, is_fallback, status } = room;
        let mut session = Self::new(config, scene, cache);

        let focus = if is_fallback {
            session
                .scene
                .find_by_name(FALLBACK_FOCUS)
                .map_or_else(|| session.scene.bounds(), |id| session.scene.node_bounds(id))
        } else {
            session.scene.bounds()
        };
        session.camera.fit_to_bounds(&focus);

        if let Some(message) = status {
            session.status.push(message);
        }
        session
    }

    /// Room geometry
    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// Current camera
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Camera for the host's orbit controls to move
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Current viewport
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Draft controller
    pub fn controller(&self) -> &DecalController<C> {
        &self.controller
    }

    /// Draft controller, for split (asynchronous) publishing
    pub fn controller_mut(&mut self) -> &mut DecalController<C> {
        &mut self.controller
    }

    /// Published decals in the scene
    pub fn published(&self) -> &PublishedDecals {
        &self.published
    }

    /// Active configuration
    pub fn config(&self) -> &ApplicationConfig {
        &self.config
    }

    /// Most recent status message
    pub fn last_status(&self) -> Option<&StatusMessage> {
        self.status.last()
    }

    /// Take queued status messages
    pub fn drain_status(&mut self) -> Vec<StatusMessage> {
        self.status.drain()
    }

    /// Container resized or moved to another display
    pub fn resize(&mut self, width: f64, height: f64, device_pixel_ratio: f64) {
        self.viewport.resize(width, height);
        self.viewport = self
            .viewport
            .with_pixel_ratio(device_pixel_ratio, self.config.gesture.max_pixel_ratio);
        self.clicks.set_pixel_ratio(self.viewport.pixel_ratio);
        if let Some(aspect) = self.viewport.aspect_ratio() {
            self.camera.set_aspect_ratio(aspect);
        }
    }

    /// Move the viewport within the page
    pub fn set_viewport_offset(&mut self, left: f64, top: f64) {
        self.viewport = self.viewport.with_offset(left, top);
    }

    /// Resume a cached draft; returns whether one was restored
    pub fn restore_draft(&mut self) -> bool {
        let restored = self.controller.restore_from_cache();
        if restored {
            self.status.push(StatusMessage::info("Restored your unpublished sticker."));
        }
        restored
    }

    /// Pick a local image file
    pub fn select_image(
        &mut self,
        name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<(), PlacementError> {
        let result = self.controller.select_image(name, bytes);
        self.report(result)?;
        self.status.push(StatusMessage::info("Image ready. Click a wall to place it."));
        Ok(())
    }

    /// Pick an image that already has a public URL
    pub fn select_remote_image(
        &mut self,
        url: impl Into<String>,
        width: u32,
        height: u32,
    ) -> Result<(), PlacementError> {
        let result = self.controller.select_remote_image(url, width, height);
        self.report(result)?;
        self.status.push(StatusMessage::info("Image ready. Click a wall to place it."));
        Ok(())
    }

    /// Pointer pressed at client coordinates
    pub fn pointer_down(&mut self, x: f64, y: f64, time_ms: f64) {
        self.clicks.pointer_down(Vec2::new(x, y), time_ms);
    }

    /// Pointer moved
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.clicks.pointer_move(Vec2::new(x, y));
    }

    /// Pointer released; places the draft if the press was a click
    pub fn pointer_up(&mut self, x: f64, y: f64, time_ms: f64) -> Option<DecalTransform> {
        let click = self.clicks.pointer_up(Vec2::new(x, y), time_ms)?;
        let result = self
            .controller
            .place_at(&click.position, &self.camera, &self.viewport, &self.scene);
        let transform = self.report(result).ok()?;
        self.status.push(StatusMessage::info("Placed. Adjust size and rotation, then publish."));
        Some(transform)
    }

    /// Pointer capture lost
    pub fn pointer_cancel(&mut self) {
        self.clicks.cancel();
    }

    /// Orbit controls began moving the camera
    pub fn orbit_start(&mut self) {
        self.clicks.orbit_start();
    }

    /// Orbit controls stopped
    pub fn orbit_end(&mut self) {
        self.clicks.orbit_end();
    }

    /// Scale slider moved
    pub fn set_scale(&mut self, scale: f64) -> Result<f64, PlacementError> {
        let result = self.controller.set_scale(scale);
        self.report(result)
    }

    /// Rotation slider moved (degrees, as the slider shows them)
    pub fn set_rotation_degrees(&mut self, degrees: f64) -> Result<(), PlacementError> {
        let result = self.controller.set_rotation(utils::deg_to_rad(degrees));
        self.report(result)
    }

    /// Remove button
    pub fn remove_draft(&mut self) {
        if self.controller.remove() {
            self.status.push(StatusMessage::info("Sticker removed."));
        }
    }

    /// Publish the draft synchronously
    ///
    /// The new row is added to the local feed right away; the echo from the
    /// insert stream is then ignored as a duplicate.
    pub fn publish(&mut self, store: &mut dyn DecalStore) -> Result<DecalRecord, PlacementError> {
        let result = self.controller.publish_with(store);
        let record = self.report(result)?;
        if let Err(err) = self.published.apply_insert(&record) {
            log::warn!("Published row {} could not be shown: {}", record.id, err);
        }
        self.status.push(StatusMessage::info("Published! Everyone can see your sticker now."));
        Ok(record)
    }

    /// Load existing decals and start following inserts
    pub fn connect_feed(&mut self, store: &dyn DecalStore) -> Result<usize, PlacementError> {
        // Subscribe first: rows inserted while listing are redelivered, not lost
        let subscription = store.subscribe();
        let history = store.list_ordered();
        let history = self.report(history.map_err(PlacementError::from))?;
        self.subscription = Some(subscription);
        Ok(self.published.load_history(&history))
    }

    /// Apply inserts delivered since the last poll; returns how many were new
    pub fn poll_feed(&mut self, store: &dyn DecalStore) -> Result<usize, PlacementError> {
        let Some(subscription) = self.subscription.as_mut() else {
            return Ok(0);
        };
        let rows = store.poll_inserted_since(subscription);
        let rows = self.report(rows.map_err(PlacementError::from))?;

        let mut added = 0;
        for row in &rows {
            match self.published.apply_insert(row) {
                Ok(true) => added += 1,
                Ok(false) => {}
                Err(err) => log::warn!("Skipping streamed decal {}: {}", row.id, err),
            }
        }
        Ok(added)
    }

    /// Forget every published decal (after an administrative purge)
    pub fn clear_published(&mut self) {
        self.published.clear();
    }

    /// Start over: drop the draft, ignore in-flight publishes
    pub fn reset(&mut self) {
        self.controller.reset_session();
        self.clicks.cancel();
    }

    fn report<T>(&mut self, result: Result<T, PlacementError>) -> Result<T, PlacementError> {
        if let Err(err) = &result {
            match err.status_message() {
                Some(message) => self.status.push(message),
                None => log::trace!("Silent outcome: {}", err),
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::persistence::{InMemoryDecalStore, InMemoryDraftCache};
    use crate::scene::loader::{load_room_or_fallback, room_scene, LoadError, SceneLoader};

    fn session() -> PlacementSession<InMemoryDraftCache> {
        let mut s = PlacementSession::new(
            ApplicationConfig::default(),
            room_scene(4.0, 3.0, 4.0),
            InMemoryDraftCache::new(),
        );
        let camera = s.camera_mut();
        camera.position = Vec3::new(0.3, 1.5, 1.0);
        camera.look_at(Vec3::new(0.3, 1.5, -2.0));
        s
    }

    fn click(
        s: &mut PlacementSession<InMemoryDraftCache>,
        x: f64,
        y: f64,
    ) -> Option<DecalTransform> {
        s.pointer_down(x, y, 0.0);
        s.pointer_up(x, y, 50.0)
    }

    #[test]
    fn test_click_without_image_prompts() {
        let mut s = session();
        assert!(click(&mut s, 640.0, 360.0).is_none());
        assert_eq!(s.last_status().map(StatusMessage::is_error), Some(false));
    }

    #[test]
    fn test_click_places_draft() {
        let mut s = session();
        s.select_remote_image("https://cdn/cat.png", 2, 1).unwrap();
        let placed = click(&mut s, 640.0, 360.0).unwrap();
        assert_eq!(placed.normal, Vec3::z());
        assert!(s.controller().state().is_placed());
    }

    #[test]
    fn test_floor_click_is_rejected_with_message() {
        let mut s = session();
        s.select_remote_image("https://cdn/cat.png", 1, 1).unwrap();
        // Bottom of the screen looks down at the floor
        s.camera_mut().look_at(Vec3::new(0.3, 0.0, -0.5));
        assert!(click(&mut s, 640.0, 719.0).is_none());
        assert!(s.last_status().is_some_and(StatusMessage::is_error));
        assert_eq!(s.controller().state().name(), "ImageReady");
    }

    #[test]
    fn test_publish_then_feed_echo_is_deduplicated() {
        let mut s = session();
        let mut store = InMemoryDecalStore::default();
        s.connect_feed(&store).unwrap();

        s.select_remote_image("https://cdn/cat.png", 2, 1).unwrap();
        click(&mut s, 640.0, 360.0).unwrap();
        let record = s.publish(&mut store).unwrap();

        assert_eq!(s.published().len(), 1);
        assert_eq!(s.poll_feed(&store).unwrap(), 0);
        assert!(s.published().get(&record.id).is_some());
        assert_eq!(s.controller().state().name(), "NoImage");
    }

    #[test]
    fn test_fallback_room_reports_error_and_frames_cube() {
        struct Broken;
        impl SceneLoader for Broken {
            fn load(&mut self, url: &str) -> Result<SceneGraph, LoadError> {
                Err(LoadError::Decode { url: url.to_string(), reason: "bad draco".to_string() })
            }
        }

        let room = load_room_or_fallback(&mut Broken, "scan.glb");
        let config = ApplicationConfig::default();
        let mut s = PlacementSession::from_loaded_room(config, room, InMemoryDraftCache::new());
        assert!(s.last_status().is_some_and(StatusMessage::is_error));
        assert!((s.camera().target - Vec3::new(0.0, 1.2, 0.0)).norm() < 1e-9);
        assert_eq!(s.drain_status().len(), 1);
    }

    #[test]
    fn test_viewport_offset_shifts_the_click() {
        let mut plain = session();
        plain.select_remote_image("https://cdn/cat.png", 2, 1).unwrap();
        let expected = click(&mut plain, 640.0, 360.0).unwrap();

        let mut shifted = session();
        shifted.set_viewport_offset(100.0, 50.0);
        shifted.select_remote_image("https://cdn/cat.png", 2, 1).unwrap();
        let placed = click(&mut shifted, 740.0, 410.0).unwrap();
        assert!((placed.position - expected.position).norm() < 1e-9);
        assert_eq!(placed.normal, Vec3::z());
    }

    #[test]
    fn test_clear_published_forgets_then_feed_reloads() {
        let mut s = session();
        let mut store = InMemoryDecalStore::default();
        s.connect_feed(&store).unwrap();
        s.select_remote_image("https://cdn/cat.png", 2, 1).unwrap();
        click(&mut s, 640.0, 360.0).unwrap();
        s.publish(&mut store).unwrap();

        s.clear_published();
        assert!(s.published().is_empty());
        assert_eq!(s.connect_feed(&store).unwrap(), 1);
        assert_eq!(s.published().len(), 1);
    }

    #[test]
    fn test_resize_caps_pixel_ratio() {
        let mut s = session();
        s.resize(800.0, 400.0, 3.0);
        assert_eq!(s.viewport().pixel_ratio, 2.0);
        assert!((s.camera().aspect - 2.0).abs() < 1e-12);
    }
}
