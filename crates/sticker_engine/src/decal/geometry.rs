//! Decal quad geometry and image metadata

use crate::foundation::math::{Point3, Vec2, Vec3};
use super::transform::DecalTransform;
use super::PlacementError;

/// Pixel dimensions of a decoded image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl ImageInfo {
    /// Create from known dimensions
    pub fn new(width: u32, height: u32) -> Result<Self, PlacementError> {
        if width == 0 || height == 0 {
            return Err(PlacementError::InvalidImage(format!(
                "image has zero size ({}x{})",
                width, height
            )));
        }
        Ok(Self { width, height })
    }

    /// Read an encoded image's size from its header without decoding pixels
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PlacementError> {
        let (width, height) = image::ImageReader::new(std::io::Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| PlacementError::InvalidImage(format!("Failed to read image: {}", e)))?
            .into_dimensions()
            .map_err(|e| PlacementError::InvalidImage(format!("Failed to decode image: {}", e)))?;

        log::debug!("Image header reports {}x{}", width, height);
        Self::new(width, height)
    }

    /// Width over height
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

/// Flat quad a decal is drawn on
///
/// Un-scaled size is `(aspect_ratio, 1)`, centred on the origin in the local
/// XY plane and facing local +Z. Scale multiplies both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecalGeometry {
    aspect_ratio: f64,
}

impl DecalGeometry {
    /// Geometry for an image with the given width/height ratio
    pub fn new(aspect_ratio: f64) -> Result<Self, PlacementError> {
        if !aspect_ratio.is_finite() || aspect_ratio <= 0.0 {
            return Err(PlacementError::InvalidImage(format!(
                "aspect ratio must be positive, got {}",
                aspect_ratio
            )));
        }
        Ok(Self { aspect_ratio })
    }

    /// Geometry for a decoded image
    pub fn from_image(info: &ImageInfo) -> Self {
        Self { aspect_ratio: info.aspect_ratio() }
    }

    /// Width over height
    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    /// Size before scaling
    pub fn unscaled_size(&self) -> Vec2 {
        Vec2::new(self.aspect_ratio, 1.0)
    }

    /// Size after a uniform scale
    pub fn scaled_size(&self, scale: f64) -> Vec2 {
        self.unscaled_size() * scale
    }

    /// Corners in local space, counter-clockwise from bottom-left
    pub fn local_corners(&self) -> [Vec3; 4] {
        let (hw, hh) = (self.aspect_ratio / 2.0, 0.5);
        [
            Vec3::new(-hw, -hh, 0.0),
            Vec3::new(hw, -hh, 0.0),
            Vec3::new(hw, hh, 0.0),
            Vec3::new(-hw, hh, 0.0),
        ]
    }

    /// Corners in world space for a placed decal
    pub fn world_corners(&self, transform: &DecalTransform) -> [Vec3; 4] {
        let matrix = transform.to_transform().to_matrix();
        self.local_corners()
            .map(|corner| matrix.transform_point(&Point3::from(corner)).coords)
    }
}
