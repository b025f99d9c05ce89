//! Published decals visible to every viewer
//!
//! History is loaded once, then inserts arrive from the store's realtime
//! channel. The channel may redeliver a row, so everything is keyed by
//! record id. Entries are built straight from the stored columns and are
//! never edited afterwards.

use std::collections::HashMap;

use crate::decal::DecalGeometry;
use crate::foundation::math::Transform;
use crate::persistence::{DecalRecord, RecordError};

/// An immutable, published sticker
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedDecal {
    /// Store id
    pub id: String,
    /// Public image URL
    pub image_url: String,
    /// Scene transform from the stored final orientation
    pub transform: Transform,
    /// Quad geometry; `None` for rows without an aspect ratio, which are
    /// sized once the host has decoded the image
    pub geometry: Option<DecalGeometry>,
}

impl PublishedDecal {
    /// Build from a stored row
    pub fn from_record(record: &DecalRecord) -> Result<Self, RecordError> {
        let geometry = match record.aspect_ratio {
            Some(aspect) => match DecalGeometry::new(aspect) {
                Ok(geometry) => Some(geometry),
                Err(err) => {
                    log::warn!("Record {} has an unusable aspect ratio: {}", record.id, err);
                    None
                }
            },
            None => None,
        };

        Ok(Self {
            id: record.id.clone(),
            image_url: record.image_url.clone(),
            transform: record.to_transform()?,
            geometry,
        })
    }
}

/// Every published decal currently in the scene, in arrival order
#[derive(Debug, Default)]
pub struct PublishedDecals {
    decals: Vec<PublishedDecal>,
    index: HashMap<String, usize>,
}

impl PublishedDecals {
    /// Empty feed
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the initial history; returns how many rows were new
    ///
    /// Unreadable rows are skipped with a warning.
    pub fn load_history(&mut self, records: &[DecalRecord]) -> usize {
        let mut added = 0;
        for record in records {
            match self.apply_insert(record) {
                Ok(true) => added += 1,
                Ok(false) => {}
                Err(err) => log::warn!("Skipping stored decal {}: {}", record.id, err),
            }
        }
        log::info!("Loaded {} published decals ({} total)", added, self.decals.len());
        added
    }

    /// Add a row from the insert stream
    ///
    /// Returns `Ok(false)` when the id is already present.
    pub fn apply_insert(&mut self, record: &DecalRecord) -> Result<bool, RecordError> {
        if self.index.contains_key(&record.id) {
            log::trace!("Duplicate delivery of {} ignored", record.id);
            return Ok(false);
        }

        let decal = PublishedDecal::from_record(record)?;
        self.index.insert(decal.id.clone(), self.decals.len());
        self.decals.push(decal);
        Ok(true)
    }

    /// Look up by id
    pub fn get(&self, id: &str) -> Option<&PublishedDecal> {
        self.index.get(id).and_then(|&i| self.decals.get(i))
    }

    /// All decals in arrival order
    pub fn iter(&self) -> impl Iterator<Item = &PublishedDecal> {
        self.decals.iter()
    }

    /// Number of decals
    pub fn len(&self) -> usize {
        self.decals.len()
    }

    /// Whether there are none
    pub fn is_empty(&self) -> bool {
        self.decals.is_empty()
    }

    /// Drop everything (after an administrative purge)
    pub fn clear(&mut self) {
        self.decals.clear();
        self.index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decal::{CardinalDirection, DecalTransformBuilder};
    use crate::foundation::math::Vec3;
    use crate::persistence::NewDecalRecord;
    use chrono::Utc;

    fn record(id: &str, rotation: f64) -> DecalRecord {
        let transform = DecalTransformBuilder::default().place(
            &Vec3::new(1.0, 1.0, -2.0),
            &CardinalDirection::PosZ.unit_vector(),
            0.5,
            rotation,
        );
        NewDecalRecord::from_transform(format!("https://cdn/{}.png", id), &transform, 2.0)
            .into_record(id, Utc::now())
    }

    #[test]
    fn test_duplicate_delivery_is_ignored() {
        let mut feed = PublishedDecals::new();
        let row = record("a", 0.0);
        assert!(feed.apply_insert(&row).unwrap());
        assert!(!feed.apply_insert(&row).unwrap());
        assert_eq!(feed.len(), 1);
    }

    #[test]
    fn test_history_then_stream_overlap() {
        let mut feed = PublishedDecals::new();
        assert_eq!(feed.load_history(&[record("a", 0.0), record("b", 0.1)]), 2);
        assert!(feed.apply_insert(&record("b", 0.1)).is_ok_and(|added| !added));
        assert!(feed.apply_insert(&record("c", 0.2)).unwrap());
        let ids: Vec<&str> = feed.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn test_transform_comes_from_stored_quaternion() {
        let row = record("a", 0.9);
        let mut feed = PublishedDecals::new();
        feed.apply_insert(&row).unwrap();
        let decal = feed.get("a").unwrap();
        let rotation = crate::persistence::record::quat_to_array(&decal.transform.rotation);
        assert_eq!(rotation, row.quaternion);
        assert_eq!(decal.geometry.map(|g| g.aspect_ratio()), Some(2.0));
    }

    #[test]
    fn test_bad_rows_skipped() {
        let mut bad = record("bad", 0.0);
        bad.quaternion = [0.0, 0.0, 0.0, 0.0];
        let mut feed = PublishedDecals::new();
        assert_eq!(feed.load_history(&[bad.clone(), record("ok", 0.0)]), 1);
        assert!(feed.apply_insert(&bad).is_err());
        assert!(feed.get("bad").is_none());
    }

    #[test]
    fn test_clear_after_purge() {
        let mut feed = PublishedDecals::new();
        feed.load_history(&[record("a", 0.0)]);
        feed.clear();
        assert!(feed.is_empty());
        assert!(feed.apply_insert(&record("a", 0.0)).unwrap());
    }
}
