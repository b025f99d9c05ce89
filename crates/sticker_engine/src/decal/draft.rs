//! The single, locally owned draft decal

use super::geometry::DecalGeometry;
use super::transform::DecalTransform;

/// Where the draft's image comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// A file picked on this device, not uploaded yet
    Local {
        /// File name as picked
        name: String,
        /// Encoded image bytes
        bytes: Vec<u8>,
    },
    /// An image that already has a public URL
    Url(String),
}

impl ImageRef {
    /// Public URL, for remote images
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Url(url) => Some(url),
            Self::Local { .. } => None,
        }
    }

    /// Short label for logs and status text
    pub fn label(&self) -> &str {
        match self {
            Self::Local { name, .. } => name,
            Self::Url(url) => url.rsplit('/').next().unwrap_or(url),
        }
    }
}

/// The draft's image and its quad
#[derive(Debug, Clone, PartialEq)]
pub struct DraftImage {
    /// Image source
    pub source: ImageRef,
    /// Quad sized to the image's aspect ratio
    pub geometry: DecalGeometry,
}

/// Lifecycle of the draft decal
///
/// Publishing is not a state of its own: a successful publish clears the
/// draft back to [`DraftDecalState::NoImage`] and the decal lives on in the
/// live feed.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DraftDecalState {
    /// Nothing selected
    #[default]
    NoImage,
    /// Image selected, waiting for a wall click
    ImageReady {
        /// Selected image
        image: DraftImage,
    },
    /// On a wall, editable
    Placed {
        /// Selected image
        image: DraftImage,
        /// Current placement
        transform: DecalTransform,
    },
}

impl DraftDecalState {
    /// Selected image, if any
    pub fn image(&self) -> Option<&DraftImage> {
        match self {
            Self::NoImage => None,
            Self::ImageReady { image } | Self::Placed { image, .. } => Some(image),
        }
    }

    /// Current placement, if on a wall
    pub fn transform(&self) -> Option<&DecalTransform> {
        match self {
            Self::Placed { transform, .. } => Some(transform),
            _ => None,
        }
    }

    /// Whether the draft is on a wall
    pub fn is_placed(&self) -> bool {
        matches!(self, Self::Placed { .. })
    }

    /// State name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::NoImage => "NoImage",
            Self::ImageReady { .. } => "ImageReady",
            Self::Placed { .. } => "Placed",
        }
    }
}
