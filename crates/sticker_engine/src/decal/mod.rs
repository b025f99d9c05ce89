//! Sticker placement core
//!
//! # Module Organization
//!
//! - [`resolver`] - Pointer → nearest room surface
//! - [`stabilizer`] - Noisy normal → one of four wall directions
//! - [`transform`] - Base orientation, in-plane rotation, surface offset
//! - [`geometry`] - Aspect-correct quad and image metadata
//! - [`draft`] - The single draft decal's state
//! - [`controller`] - Draft lifecycle: select, place, edit, publish, restore

pub mod resolver;
pub mod stabilizer;
pub mod transform;
pub mod geometry;
pub mod draft;
pub mod controller;

pub use controller::{DecalController, DecalSettings, PublishRequest, PublishTicket};
pub use draft::{DraftDecalState, DraftImage, ImageRef};
pub use geometry::{DecalGeometry, ImageInfo};
pub use resolver::resolve;
pub use stabilizer::{CardinalDirection, WallNormalStabilizer};
pub use transform::{apply_rotation, build_base, DecalTransform, DecalTransformBuilder};

use crate::events::StatusMessage;
use crate::persistence::{RecordError, StoreError};

/// Everything that can stop a placement-flow operation
///
/// None of these are fatal to the session. [`PlacementError::status_message`]
/// turns them into what the user sees.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PlacementError {
    /// The pointer ray missed the room
    #[error("No surface under the pointer")]
    NoHit,

    /// The surface is a floor or ceiling
    #[error("Surface is not a wall (up component {up_component:.3})")]
    NonWallHit {
        /// Up component of the unit normal
        up_component: f64,
    },

    /// Edit or publish with no draft to act on
    #[error("No draft decal")]
    MissingDraft,

    /// A publish is already running
    #[error("A publish is already in flight")]
    PublishInFlight,

    /// The selected file is not a usable image
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// A slider or caller passed an unusable value
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The store rejected or failed the publish
    #[error("Publish failed: {0}")]
    Publish(#[from] StoreError),

    /// A stored row could not be decoded
    #[error("Invalid record: {0}")]
    Record(#[from] RecordError),
}

impl PlacementError {
    /// User-facing message, or `None` when the outcome should be silent
    pub fn status_message(&self) -> Option<StatusMessage> {
        let message = match self {
            Self::NoHit => return None,
            Self::NonWallHit { .. } => StatusMessage::error("Stickers can only go on walls."),
            Self::MissingDraft => StatusMessage::info("Pick an image and click a wall first."),
            Self::PublishInFlight => StatusMessage::info("Already publishing, please wait."),
            Self::InvalidImage(reason) => {
                StatusMessage::error(format!("Could not read that image: {}", reason))
            }
            Self::InvalidParameter(reason) => StatusMessage::error(reason.clone()),
            Self::Publish(err) => {
                StatusMessage::error(format!(
                    "Publish failed ({}). Your sticker is still here, try again.",
                    err
                ))
            }
            Self::Record(err) => StatusMessage::error(format!("Skipped a stored sticker: {}", err)),
        };
        Some(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_hit_is_silent() {
        assert!(PlacementError::NoHit.status_message().is_none());
    }

    #[test]
    fn test_user_visible_messages() {
        let rejected = PlacementError::NonWallHit { up_component: 0.9 }.status_message().unwrap();
        assert!(rejected.is_error());

        let prompt = PlacementError::MissingDraft.status_message().unwrap();
        assert!(!prompt.is_error());

        let failed = PlacementError::from(StoreError::Network("timeout".to_string()))
            .status_message()
            .unwrap();
        assert!(failed.is_error());
        assert!(failed.text.contains("timeout"));
    }
}
