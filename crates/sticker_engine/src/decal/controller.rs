//! Draft decal controller
//!
//! Owns the one draft a session may have and every transition on it:
//! image selection, wall placement, slider edits, removal, publishing and
//! restoring from the soft cache.
//!
//! ## Publishing
//!
//! Publishing is split in two so the network half can run anywhere:
//!
//! 1. [`DecalController::begin_publish`] claims the single in-flight slot
//!    and hands out a [`PublishRequest`] snapshot of the draft.
//! 2. [`DecalController::finish_publish`] takes the outcome. Success clears
//!    the draft; failure leaves it exactly as it was so the user can retry.
//!
//! Every request carries the session generation it was issued under.
//! After [`DecalController::reset_session`] older results are ignored.

use chrono::Utc;

use crate::core::config::{ApplicationConfig, DecalConfig};
use crate::foundation::math::Vec2;
use crate::input::Viewport;
use crate::persistence::{
    DecalRecord, DecalStore, DraftCache, DraftCacheEntry, NewDecalRecord, StoreError,
};
use crate::physics::collision::RayHit;
use crate::render::Camera;
use crate::scene::SceneGraph;
use super::draft::{DraftDecalState, DraftImage, ImageRef};
use super::geometry::{DecalGeometry, ImageInfo};
use super::resolver::resolve;
use super::transform::{DecalTransform, DecalTransformBuilder};
use super::PlacementError;

/// Current slider values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecalSettings {
    /// Uniform scale
    pub scale: f64,
    /// In-plane rotation in radians
    pub rotation: f64,
}

/// Identifies one publish attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishTicket {
    generation: u64,
    draft_serial: u64,
}

/// Snapshot of a placed draft on its way to the store
#[derive(Debug, Clone)]
pub struct PublishRequest {
    /// Hand back to [`DecalController::finish_publish`]
    pub ticket: PublishTicket,
    /// Image to upload (or reuse, if it already has a URL)
    pub image: ImageRef,
    /// Placement at the time of the click
    pub transform: DecalTransform,
    /// Image width / height
    pub aspect_ratio: f64,
}

impl PublishRequest {
    /// Row to insert once the image has a public URL
    pub fn record(&self, image_url: impl Into<String>) -> NewDecalRecord {
        NewDecalRecord::from_transform(image_url, &self.transform, self.aspect_ratio)
    }

    /// Upload the image if needed, then insert the row
    pub fn execute(&self, store: &mut dyn DecalStore) -> Result<DecalRecord, StoreError> {
        let image_url = match &self.image {
            ImageRef::Url(url) => url.clone(),
            ImageRef::Local { name, bytes } => {
                let stamp = Utc::now().timestamp_millis();
                let path = format!("decals/{}-{}", stamp, sanitize_file_name(name));
                store.upload_blob(&path, bytes, content_type(bytes))?
            }
        };
        store.insert(self.record(image_url))
    }
}

fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "sticker".to_string()
    } else {
        cleaned
    }
}

fn content_type(bytes: &[u8]) -> &'static str {
    image::guess_format(bytes).map_or("application/octet-stream", |format| format.to_mime_type())
}

/// Owner of the draft decal
#[derive(Debug)]
pub struct DecalController<C: DraftCache> {
    state: DraftDecalState,
    settings: DecalSettings,
    builder: DecalTransformBuilder,
    decal_config: DecalConfig,
    cache: C,
    cache_key: String,
    generation: u64,
    draft_serial: u64,
    in_flight: Option<PublishTicket>,
}

impl<C: DraftCache> DecalController<C> {
    /// Create a controller with an empty draft
    pub fn new(config: &ApplicationConfig, cache: C) -> Self {
        Self {
            state: DraftDecalState::NoImage,
            settings: DecalSettings {
                scale: config.decal.default_scale,
                rotation: config.decal.default_rotation,
            },
            builder: DecalTransformBuilder::new(&config.placement),
            decal_config: config.decal.clone(),
            cache,
            cache_key: config.cache.key.clone(),
            generation: 0,
            draft_serial: 0,
            in_flight: None,
        }
    }

    /// Current draft
    pub fn state(&self) -> &DraftDecalState {
        &self.state
    }

    /// Current slider values
    pub fn settings(&self) -> DecalSettings {
        self.settings
    }

    /// The soft cache backend
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Whether a publish is in flight (publish button disabled)
    pub fn is_publishing(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Select a local image file
    ///
    /// Replaces any existing draft. Undecodable bytes leave the state as it was.
    pub fn select_image(
        &mut self,
        name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<(), PlacementError> {
        let info = ImageInfo::from_bytes(&bytes)?;
        let source = ImageRef::Local { name: name.into(), bytes };
        self.set_image(source, DecalGeometry::from_image(&info));
        Ok(())
    }

    /// Select an image that already has a public URL
    pub fn select_remote_image(
        &mut self,
        url: impl Into<String>,
        width: u32,
        height: u32,
    ) -> Result<(), PlacementError> {
        let info = ImageInfo::new(width, height)?;
        self.set_image(ImageRef::Url(url.into()), DecalGeometry::from_image(&info));
        Ok(())
    }

    fn set_image(&mut self, source: ImageRef, geometry: DecalGeometry) {
        log::info!("Selected image {} (aspect {:.3})", source.label(), geometry.aspect_ratio());
        self.draft_serial += 1;
        self.state = DraftDecalState::ImageReady { image: DraftImage { source, geometry } };
        self.persist();
    }

    /// Place (or move) the draft onto the wall under the pointer
    pub fn place_at(
        &mut self,
        pointer: &Vec2,
        camera: &Camera,
        viewport: &Viewport,
        scene: &SceneGraph,
    ) -> Result<DecalTransform, PlacementError> {
        let hit = resolve(pointer, camera, viewport, scene).ok_or(PlacementError::NoHit)?;
        self.place_hit(&hit)
    }

    /// Place (or move) the draft onto an already resolved surface hit
    ///
    /// Keeps the current scale and rotation. Rejected hits change nothing.
    pub fn place_hit(&mut self, hit: &RayHit) -> Result<DecalTransform, PlacementError> {
        if self.state.image().is_none() {
            return Err(PlacementError::MissingDraft);
        }
        let transform = self.builder.place_hit(hit, self.settings.scale, self.settings.rotation)?;

        if let Some(image) = self.take_image() {
            self.state = DraftDecalState::Placed { image, transform: transform.clone() };
        }
        self.note_edit();
        self.persist();
        Ok(transform)
    }

    /// Set the scale slider; returns the clamped value applied
    pub fn set_scale(&mut self, scale: f64) -> Result<f64, PlacementError> {
        if !scale.is_finite() {
            return Err(PlacementError::InvalidParameter(format!(
                "scale must be finite, got {}",
                scale
            )));
        }
        if self.state.image().is_none() {
            return Err(PlacementError::MissingDraft);
        }

        let scale = self.decal_config.clamp_scale(scale);
        self.settings.scale = scale;
        if let DraftDecalState::Placed { transform, .. } = &mut self.state {
            transform.scale = scale;
        }
        self.note_edit();
        self.persist();
        Ok(scale)
    }

    /// Set the rotation slider (absolute, radians)
    pub fn set_rotation(&mut self, radians: f64) -> Result<(), PlacementError> {
        if !radians.is_finite() {
            return Err(PlacementError::InvalidParameter(format!(
                "rotation must be finite, got {}",
                radians
            )));
        }
        if self.state.image().is_none() {
            return Err(PlacementError::MissingDraft);
        }

        self.settings.rotation = radians;
        if let DraftDecalState::Placed { transform, .. } = &mut self.state {
            transform.in_plane_rotation = radians;
        }
        self.note_edit();
        self.persist();
        Ok(())
    }

    /// Discard the draft; returns whether there was one
    pub fn remove(&mut self) -> bool {
        let had_draft = !matches!(self.state, DraftDecalState::NoImage);
        self.state = DraftDecalState::NoImage;
        self.cache.clear_draft(&self.cache_key);
        if had_draft {
            log::info!("Draft removed");
        }
        had_draft
    }

    /// Claim the in-flight slot and snapshot the placed draft
    pub fn begin_publish(&mut self) -> Result<PublishRequest, PlacementError> {
        if self.in_flight.is_some() {
            return Err(PlacementError::PublishInFlight);
        }
        let DraftDecalState::Placed { image, transform } = &self.state else {
            return Err(PlacementError::MissingDraft);
        };

        let ticket = PublishTicket { generation: self.generation, draft_serial: self.draft_serial };
        let request = PublishRequest {
            ticket,
            image: image.source.clone(),
            transform: transform.clone(),
            aspect_ratio: image.geometry.aspect_ratio(),
        };
        self.in_flight = Some(ticket);
        log::info!("Publishing {}", request.image.label());
        Ok(request)
    }

    /// Apply the outcome of a publish
    ///
    /// Returns `Ok(None)` for results from before a session reset. On
    /// success the draft is cleared, unless the user already replaced it
    /// with a different image. On failure the draft is untouched.
    pub fn finish_publish(
        &mut self,
        ticket: PublishTicket,
        result: Result<DecalRecord, StoreError>,
    ) -> Result<Option<DecalRecord>, PlacementError> {
        if ticket.generation != self.generation {
            log::debug!("Ignoring publish result from an earlier session");
            return Ok(None);
        }
        if self.in_flight == Some(ticket) {
            self.in_flight = None;
        }

        match result {
            Ok(record) => {
                log::info!("Published {} ({})", record.id, record.image_url);
                if ticket.draft_serial == self.draft_serial {
                    self.state = DraftDecalState::NoImage;
                    self.cache.clear_draft(&self.cache_key);
                }
                Ok(Some(record))
            }
            Err(err) => {
                log::warn!("Publish failed, draft kept for retry: {}", err);
                Err(PlacementError::Publish(err))
            }
        }
    }

    /// Publish synchronously against `store`
    pub fn publish_with(
        &mut self,
        store: &mut dyn DecalStore,
    ) -> Result<DecalRecord, PlacementError> {
        let request = self.begin_publish()?;
        let result = request.execute(store);
        self.finish_publish(request.ticket, result)?
            .ok_or(PlacementError::MissingDraft)
    }

    /// Drop the draft and invalidate outstanding publishes
    ///
    /// The soft cache is left alone so the draft can be restored.
    pub fn reset_session(&mut self) {
        self.generation += 1;
        self.in_flight = None;
        self.state = DraftDecalState::NoImage;
        log::debug!("Session reset (generation {})", self.generation);
    }

    /// Resume a draft from the soft cache
    ///
    /// Slider values are always restored. The draft itself comes back only
    /// if it has a remote image; it returns placed when the entry carries
    /// its base orientation. Returns whether a draft was restored.
    pub fn restore_from_cache(&mut self) -> bool {
        let Some(entry) = self.cache.load_draft(&self.cache_key) else {
            return false;
        };

        if entry.scale.is_finite() {
            self.settings.scale = self.decal_config.clamp_scale(entry.scale);
        }
        if entry.rotz.is_finite() {
            self.settings.rotation = entry.rotz;
        }

        let (Some(url), Some(aspect)) = (entry.image_url.clone(), entry.aspect_ratio) else {
            log::debug!("Cached draft has no remote image; restored slider values only");
            return false;
        };
        let geometry = match DecalGeometry::new(aspect) {
            Ok(geometry) => geometry,
            Err(err) => {
                log::warn!("Discarding cached draft: {}", err);
                self.cache.clear_draft(&self.cache_key);
                return false;
            }
        };

        let image = DraftImage { source: ImageRef::Url(url), geometry };
        self.draft_serial += 1;
        self.state = match entry.to_decal_transform() {
            Ok(Some(transform)) => {
                self.settings = DecalSettings {
                    scale: transform.scale,
                    rotation: transform.in_plane_rotation,
                };
                DraftDecalState::Placed { image, transform }
            }
            Ok(None) => DraftDecalState::ImageReady { image },
            Err(err) => {
                log::warn!("Cached placement unreadable, keeping image only: {}", err);
                DraftDecalState::ImageReady { image }
            }
        };
        log::info!("Restored draft from cache ({})", self.state.name());
        true
    }

    fn take_image(&mut self) -> Option<DraftImage> {
        match std::mem::take(&mut self.state) {
            DraftDecalState::NoImage => None,
            DraftDecalState::ImageReady { image } | DraftDecalState::Placed { image, .. } => {
                Some(image)
            }
        }
    }

    /// An edit during a publish makes the draft differ from the row being
    /// inserted, so that publish must not clear it
    fn note_edit(&mut self) {
        if self.in_flight.is_some() {
            self.draft_serial += 1;
        }
    }

    fn persist(&mut self) {
        let Some(image) = self.state.image() else {
            return;
        };
        let mut entry = DraftCacheEntry {
            image_url: image.source.url().map(str::to_string),
            aspect_ratio: Some(image.geometry.aspect_ratio()),
            scale: self.settings.scale,
            rotz: self.settings.rotation,
            ..Default::default()
        };
        if let Some(transform) = self.state.transform() {
            entry = entry.with_transform(transform);
        }
        self.cache.store_draft(&self.cache_key, &entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{utils::deg_to_rad, Vec3};
    use crate::persistence::{InMemoryDecalStore, InMemoryDraftCache};
    use crate::scene::NodeId;
    use approx::assert_relative_eq;
    use std::io::Cursor;

    fn controller() -> DecalController<InMemoryDraftCache> {
        DecalController::new(&ApplicationConfig::default(), InMemoryDraftCache::new())
    }

    fn hit(normal: Vec3) -> RayHit {
        RayHit { node: NodeId::default(), distance: 1.0, point: Vec3::new(0.2, 1.3, -2.0), normal }
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = image::DynamicImage::ImageRgba8(image::RgbaImage::new(width, height));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png).unwrap();
        bytes
    }

    fn placed_controller() -> DecalController<InMemoryDraftCache> {
        let mut c = controller();
        c.select_remote_image("https://cdn/cat.png", 400, 200).unwrap();
        c.place_hit(&hit(Vec3::z())).unwrap();
        c
    }

    #[test]
    fn test_lifecycle_select_place_edit_remove() {
        let mut c = controller();
        assert_eq!(c.state().name(), "NoImage");

        c.select_image("dog.png", png(4, 2)).unwrap();
        assert_eq!(c.state().name(), "ImageReady");

        let placed = c.place_hit(&hit(Vec3::new(0.05, 0.2, 0.97))).unwrap();
        assert_eq!(placed.normal, Vec3::z());
        assert_eq!(c.state().name(), "Placed");

        assert_eq!(c.set_scale(10.0).unwrap(), 3.0);
        c.set_rotation(deg_to_rad(15.0)).unwrap();
        let transform = c.state().transform().unwrap();
        assert_eq!(transform.scale, 3.0);
        assert_eq!(transform.base_orientation, placed.base_orientation);

        assert!(c.remove());
        assert_eq!(c.state().name(), "NoImage");
        assert!(!c.remove());
    }

    #[test]
    fn test_edits_without_draft_are_rejected() {
        let mut c = controller();
        assert_eq!(c.set_scale(1.0), Err(PlacementError::MissingDraft));
        assert_eq!(c.set_rotation(1.0), Err(PlacementError::MissingDraft));
        assert!(matches!(c.begin_publish(), Err(PlacementError::MissingDraft)));
        assert_eq!(c.place_hit(&hit(Vec3::z())), Err(PlacementError::MissingDraft));
    }

    #[test]
    fn test_publish_requires_placement() {
        let mut c = controller();
        c.select_remote_image("https://cdn/cat.png", 10, 10).unwrap();
        assert!(matches!(c.begin_publish(), Err(PlacementError::MissingDraft)));
    }

    #[test]
    fn test_rejected_hit_leaves_state_unchanged() {
        let mut c = placed_controller();
        let before = c.state().clone();
        let result = c.place_hit(&hit(Vec3::new(0.0, -1.0, 0.1)));
        assert!(matches!(result, Err(PlacementError::NonWallHit { .. })));
        assert_eq!(*c.state(), before);
    }

    #[test]
    fn test_invalid_image_leaves_state_unchanged() {
        let mut c = placed_controller();
        let before = c.state().clone();
        assert!(matches!(
            c.select_image("notes.txt", b"hello".to_vec()),
            Err(PlacementError::InvalidImage(_))
        ));
        assert_eq!(*c.state(), before);
    }

    #[test]
    fn test_rotation_edits_are_absolute() {
        let mut c = placed_controller();
        c.set_rotation(deg_to_rad(45.0)).unwrap();
        c.set_rotation(deg_to_rad(10.0)).unwrap();
        let edited = c.state().transform().unwrap().final_orientation();

        let mut direct = controller();
        direct.select_remote_image("https://cdn/cat.png", 400, 200).unwrap();
        direct.set_rotation(deg_to_rad(10.0)).unwrap();
        direct.place_hit(&hit(Vec3::z())).unwrap();
        let expected = direct.state().transform().unwrap().final_orientation();

        assert_relative_eq!(edited, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_single_publish_in_flight() {
        let mut c = placed_controller();
        let request = c.begin_publish().unwrap();
        assert!(c.is_publishing());
        assert!(matches!(c.begin_publish(), Err(PlacementError::PublishInFlight)));

        let mut store = InMemoryDecalStore::default();
        let record = request.execute(&mut store).unwrap();
        let finished = c.finish_publish(request.ticket, Ok(record)).unwrap();
        assert!(finished.is_some());
        assert!(!c.is_publishing());
        assert_eq!(c.state().name(), "NoImage");
    }

    #[test]
    fn test_inverted_scale_config_does_not_panic() {
        let mut config = ApplicationConfig::default();
        config.decal.min_scale = 2.0;
        config.decal.max_scale = 1.0;
        let mut c = DecalController::new(&config, InMemoryDraftCache::new());
        c.select_remote_image("https://cdn/cat.png", 1, 1).unwrap();
        assert_eq!(c.set_scale(1.5).unwrap(), 1.0);
    }

    #[test]
    fn test_edits_during_publish_keep_the_draft() {
        let mut c = placed_controller();
        let request = c.begin_publish().unwrap();
        c.set_scale(2.0).unwrap();

        let mut store = InMemoryDecalStore::default();
        let record = request.execute(&mut store).unwrap();
        let published = c.finish_publish(request.ticket, Ok(record)).unwrap().unwrap();

        assert_eq!(published.scale, 0.5);
        assert!(!c.is_publishing());
        assert_eq!(c.state().transform().map(|t| t.scale), Some(2.0));
        assert!(c.cache().raw(crate::persistence::DRAFT_CACHE_KEY).is_some());

        // The edited draft can be published on its own
        let second = c.publish_with(&mut store).unwrap();
        assert_eq!(second.scale, 2.0);
        assert_eq!(c.state().name(), "NoImage");
    }

    #[test]
    fn test_rotation_or_move_during_publish_keep_the_draft() {
        let mut store = InMemoryDecalStore::default();

        let mut rotated = placed_controller();
        let request = rotated.begin_publish().unwrap();
        rotated.set_rotation(0.4).unwrap();
        let record = request.execute(&mut store).unwrap();
        rotated.finish_publish(request.ticket, Ok(record)).unwrap();
        assert_eq!(rotated.state().transform().map(|t| t.in_plane_rotation), Some(0.4));

        let mut moved = placed_controller();
        let request = moved.begin_publish().unwrap();
        moved.place_hit(&hit(Vec3::x())).unwrap();
        let record = request.execute(&mut store).unwrap();
        moved.finish_publish(request.ticket, Ok(record)).unwrap();
        assert_eq!(moved.state().transform().map(|t| t.normal), Some(Vec3::x()));
    }

    #[test]
    fn test_failed_publish_keeps_draft_for_retry() {
        let mut c = placed_controller();
        c.set_rotation(0.3).unwrap();
        let before = c.state().clone();

        let mut store = InMemoryDecalStore::default();
        store.fail_next_insert(StoreError::Rejected("quota".to_string()));
        let result = c.publish_with(&mut store);

        assert!(matches!(result, Err(PlacementError::Publish(StoreError::Rejected(_)))));
        assert_eq!(*c.state(), before);
        assert!(!c.is_publishing());
        assert!(store.is_empty());

        let record = c.publish_with(&mut store).unwrap();
        assert_eq!(record.rotz, 0.3);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_local_image_is_uploaded_on_publish() {
        let mut c = controller();
        c.select_image("my sticker.png", png(2, 1)).unwrap();
        c.place_hit(&hit(Vec3::x())).unwrap();

        let mut store = InMemoryDecalStore::new("https://cdn.example.com");
        let record = c.publish_with(&mut store).unwrap();
        assert!(record.image_url.starts_with("https://cdn.example.com/decals/"));
        assert!(record.image_url.ends_with("my_sticker.png"));
        assert_eq!(store.blob(&record.image_url).map(|(_, ct)| ct), Some("image/png"));
        assert_eq!(record.aspect_ratio, Some(2.0));
    }

    #[test]
    fn test_failed_upload_keeps_draft() {
        let mut c = controller();
        c.select_image("a.png", png(2, 2)).unwrap();
        c.place_hit(&hit(Vec3::x())).unwrap();
        let before = c.state().clone();

        let mut store = InMemoryDecalStore::default();
        store.fail_next_upload(StoreError::Upload("503".to_string()));
        assert!(c.publish_with(&mut store).is_err());
        assert_eq!(*c.state(), before);
    }

    #[test]
    fn test_stale_result_after_reset_is_ignored() {
        let mut c = placed_controller();
        let request = c.begin_publish().unwrap();
        c.reset_session();
        assert!(!c.is_publishing());

        c.select_remote_image("https://cdn/new.png", 1, 1).unwrap();
        c.place_hit(&hit(Vec3::z())).unwrap();

        let mut store = InMemoryDecalStore::default();
        let record = request.execute(&mut store).unwrap();
        assert_eq!(c.finish_publish(request.ticket, Ok(record)).unwrap(), None);
        assert_eq!(c.state().name(), "Placed");
    }

    #[test]
    fn test_replaced_draft_survives_earlier_publish() {
        let mut c = placed_controller();
        let request = c.begin_publish().unwrap();
        c.select_remote_image("https://cdn/other.png", 1, 1).unwrap();

        let mut store = InMemoryDecalStore::default();
        let record = request.execute(&mut store).unwrap();
        assert!(c.finish_publish(request.ticket, Ok(record)).unwrap().is_some());
        assert_eq!(c.state().name(), "ImageReady");
        assert!(!c.is_publishing());
    }

    #[test]
    fn test_restore_placed_draft_from_cache() {
        let mut c = placed_controller();
        c.set_rotation(deg_to_rad(33.0)).unwrap();
        c.set_scale(0.8).unwrap();
        let expected = c.state().clone();

        let raw = c.cache().raw(crate::persistence::DRAFT_CACHE_KEY).unwrap().to_string();
        let mut cache = InMemoryDraftCache::new();
        cache.put(crate::persistence::DRAFT_CACHE_KEY, &raw).unwrap();

        let mut reloaded = DecalController::new(&ApplicationConfig::default(), cache);
        assert!(reloaded.restore_from_cache());
        assert_eq!(*reloaded.state(), expected);
        assert_eq!(reloaded.settings().scale, 0.8);
    }

    #[test]
    fn test_restore_local_draft_keeps_sliders_only() {
        let mut c = controller();
        c.select_image("a.png", png(2, 2)).unwrap();
        c.set_scale(1.5).unwrap();
        let raw = c.cache().raw(crate::persistence::DRAFT_CACHE_KEY).unwrap().to_string();

        let mut cache = InMemoryDraftCache::new();
        cache.put(crate::persistence::DRAFT_CACHE_KEY, &raw).unwrap();
        let mut reloaded = DecalController::new(&ApplicationConfig::default(), cache);
        assert!(!reloaded.restore_from_cache());
        assert_eq!(reloaded.state().name(), "NoImage");
        assert_eq!(reloaded.settings().scale, 1.5);
    }

    #[test]
    fn test_broken_cache_never_blocks() {
        let config = ApplicationConfig::default();
        let mut c = DecalController::new(&config, InMemoryDraftCache::unavailable());
        c.select_remote_image("https://cdn/cat.png", 2, 1).unwrap();
        c.place_hit(&hit(Vec3::z())).unwrap();
        assert!(!c.restore_from_cache());
        let mut store = InMemoryDecalStore::default();
        assert!(c.publish_with(&mut store).is_ok());
    }
}
