//! Wire shapes for published decals and the soft draft cache
//!
//! Rows are plain arrays of `f64` so they match the store's JSON columns.
//! The `quaternion` column is the final orientation a viewer renders. The
//! base orientation and normal are stored next to it, so a draft or a row
//! can be rebuilt without deriving the base backwards from the final value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decal::DecalTransform;
use crate::foundation::math::{Quat, Quaternion, Transform, Vec3};

/// A stored quaternion may drift this far from unit length
const UNIT_TOLERANCE: f64 = 1e-6;

/// Errors decoding a stored record
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    /// A numeric field is NaN or infinite
    #[error("Field `{0}` is not finite")]
    NonFinite(&'static str),

    /// A quaternion column is not unit length
    #[error("Field `{field}` is not a unit quaternion (norm {norm})")]
    NotUnit {
        /// Column name
        field: &'static str,
        /// Norm found
        norm: f64,
    },

    /// Malformed JSON
    #[error("Invalid record JSON: {0}")]
    Json(String),
}

/// `[x, y, z]` column
pub fn vec3_to_array(v: &Vec3) -> [f64; 3] {
    [v.x, v.y, v.z]
}

/// Read a `[x, y, z]` column
pub fn vec3_from_array(field: &'static str, a: [f64; 3]) -> Result<Vec3, RecordError> {
    if a.iter().all(|c| c.is_finite()) {
        Ok(Vec3::new(a[0], a[1], a[2]))
    } else {
        Err(RecordError::NonFinite(field))
    }
}

/// `[x, y, z, w]` column
pub fn quat_to_array(q: &Quat) -> [f64; 4] {
    [q.i, q.j, q.k, q.w]
}

/// Read a `[x, y, z, w]` column
///
/// The stored components are used as-is (no renormalization) so a value
/// read back is bit-identical to the one written.
pub fn quat_from_array(field: &'static str, a: [f64; 4]) -> Result<Quat, RecordError> {
    if !a.iter().all(|c| c.is_finite()) {
        return Err(RecordError::NonFinite(field));
    }
    let q = Quaternion::new(a[3], a[0], a[1], a[2]);
    let norm = q.norm();
    if (norm - 1.0).abs() > UNIT_TOLERANCE {
        return Err(RecordError::NotUnit { field, norm });
    }
    Ok(Quat::new_unchecked(q))
}

fn finite(field: &'static str, value: f64) -> Result<f64, RecordError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(RecordError::NonFinite(field))
    }
}

/// A published decal as stored and broadcast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecalRecord {
    /// Store-assigned identifier
    pub id: String,
    /// Public URL of the sticker image
    pub image_url: String,
    /// Anchor point
    pub position: [f64; 3],
    /// Final orientation `[x, y, z, w]`
    pub quaternion: [f64; 4],
    /// Uniform scale
    pub scale: f64,
    /// In-plane rotation (radians)
    pub rotz: f64,
    /// Base orientation `[x, y, z, w]`, absent on older rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_quaternion: Option<[f64; 4]>,
    /// Stabilized normal, absent on older rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal: Option<[f64; 3]>,
    /// Image width / height, absent on older rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<f64>,
    /// Store-assigned insertion time
    pub created_at: DateTime<Utc>,
}

impl DecalRecord {
    /// Scene transform straight from the stored columns
    pub fn to_transform(&self) -> Result<Transform, RecordError> {
        let position = vec3_from_array("position", self.position)?;
        let rotation = quat_from_array("quaternion", self.quaternion)?;
        let scale = finite("scale", self.scale)?;
        Ok(Transform::from_position_rotation(position, rotation).with_uniform_scale(scale))
    }

    /// Full editable transform, when the row carries its base orientation
    pub fn to_decal_transform(&self) -> Result<Option<DecalTransform>, RecordError> {
        let (Some(base), Some(normal)) = (self.base_quaternion, self.normal) else {
            return Ok(None);
        };
        Ok(Some(DecalTransform {
            position: vec3_from_array("position", self.position)?,
            normal: vec3_from_array("normal", normal)?,
            base_orientation: quat_from_array("base_quaternion", base)?,
            in_plane_rotation: finite("rotz", self.rotz)?,
            scale: finite("scale", self.scale)?,
        }))
    }

    /// Serialize to the store's JSON row
    pub fn to_json(&self) -> Result<String, RecordError> {
        serde_json::to_string(self).map_err(|e| RecordError::Json(e.to_string()))
    }

    /// Parse a JSON row
    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        serde_json::from_str(json).map_err(|e| RecordError::Json(e.to_string()))
    }
}

/// A row about to be inserted (no id or timestamp yet)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDecalRecord {
    /// Public URL of the sticker image
    pub image_url: String,
    /// Anchor point
    pub position: [f64; 3],
    /// Final orientation `[x, y, z, w]`
    pub quaternion: [f64; 4],
    /// Uniform scale
    pub scale: f64,
    /// In-plane rotation (radians)
    pub rotz: f64,
    /// Base orientation `[x, y, z, w]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_quaternion: Option<[f64; 4]>,
    /// Stabilized normal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal: Option<[f64; 3]>,
    /// Image width / height
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<f64>,
}

impl NewDecalRecord {
    /// Row for a placed decal
    pub fn from_transform(
        image_url: impl Into<String>,
        transform: &DecalTransform,
        aspect_ratio: f64,
    ) -> Self {
        Self {
            image_url: image_url.into(),
            position: vec3_to_array(&transform.position),
            quaternion: quat_to_array(&transform.final_orientation()),
            scale: transform.scale,
            rotz: transform.in_plane_rotation,
            base_quaternion: Some(quat_to_array(&transform.base_orientation)),
            normal: Some(vec3_to_array(&transform.normal)),
            aspect_ratio: Some(aspect_ratio),
        }
    }

    /// Attach store-assigned fields
    pub fn into_record(self, id: impl Into<String>, created_at: DateTime<Utc>) -> DecalRecord {
        DecalRecord {
            id: id.into(),
            image_url: self.image_url,
            position: self.position,
            quaternion: self.quaternion,
            scale: self.scale,
            rotz: self.rotz,
            base_quaternion: self.base_quaternion,
            normal: self.normal,
            aspect_ratio: self.aspect_ratio,
            created_at,
        }
    }
}

/// Locally cached draft, written on every placement or edit
///
/// `image_url` is only set for remote images; local files cannot be
/// re-opened after a reload, so those drafts restore their slider values
/// only. The placement columns are present once the draft is on a wall.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftCacheEntry {
    /// Remote image URL, if the draft image has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Image width / height
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<f64>,
    /// Uniform scale
    pub scale: f64,
    /// In-plane rotation (radians)
    pub rotz: f64,
    /// Anchor point
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<[f64; 3]>,
    /// Final orientation `[x, y, z, w]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quaternion: Option<[f64; 4]>,
    /// Base orientation `[x, y, z, w]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_quaternion: Option<[f64; 4]>,
    /// Stabilized normal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal: Option<[f64; 3]>,
}

impl DraftCacheEntry {
    /// Record the placement columns of a transform
    pub fn with_transform(mut self, transform: &DecalTransform) -> Self {
        self.position = Some(vec3_to_array(&transform.position));
        self.quaternion = Some(quat_to_array(&transform.final_orientation()));
        self.base_quaternion = Some(quat_to_array(&transform.base_orientation));
        self.normal = Some(vec3_to_array(&transform.normal));
        self.scale = transform.scale;
        self.rotz = transform.in_plane_rotation;
        self
    }

    /// Rebuild the placement, if the entry has one
    ///
    /// Entries without a base orientation are treated as unplaced.
    pub fn to_decal_transform(&self) -> Result<Option<DecalTransform>, RecordError> {
        let (Some(position), Some(base), Some(normal)) =
            (self.position, self.base_quaternion, self.normal)
        else {
            return Ok(None);
        };
        Ok(Some(DecalTransform {
            position: vec3_from_array("position", position)?,
            normal: vec3_from_array("normal", normal)?,
            base_orientation: quat_from_array("base_quaternion", base)?,
            in_plane_rotation: finite("rotz", self.rotz)?,
            scale: finite("scale", self.scale)?,
        }))
    }

    /// Serialize for the cache
    pub fn to_json(&self) -> Result<String, RecordError> {
        serde_json::to_string(self).map_err(|e| RecordError::Json(e.to_string()))
    }

    /// Parse a cached value
    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        serde_json::from_str(json).map_err(|e| RecordError::Json(e.to_string()))
    }
}
