//! # Unified Configuration System
//!
//! All tunables of the placement pipeline live here. The two wall-placement
//! constants (`wall_threshold`, `surface_offset`) were tuned by hand against a
//! single scanned room, so they are configuration rather than code.
//!
//! ## Configuration Categories
//!
//! - **Engine Config**: logging and debug behavior
//! - **Placement Config**: wall rejection threshold, surface offset, fallback normal
//! - **Gesture Config**: click-vs-drag thresholds
//! - **Decal Config**: scale range and slider defaults
//! - **Camera Config**: initial perspective camera
//! - **Cache Config**: soft draft cache location

use serde::{Serialize, Deserialize};

use crate::config::{Config, ConfigError};
use crate::decal::CardinalDirection;
use crate::foundation::math::Vec3;

/// # Engine Configuration
///
/// Core behavior shared by every subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default log filter (overridden by `RUST_LOG`)
    pub log_level: String,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Placement Configuration
///
/// Controls how a raw surface hit becomes a wall anchor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Surfaces whose |up component| is strictly greater than this are floor/ceiling
    pub wall_threshold: f64,
    /// Distance the decal is pushed off the wall along its normal
    pub surface_offset: f64,
    /// Direction used when a normal has no usable horizontal component
    pub fallback_normal: CardinalDirection,
}

impl PlacementConfig {
    /// Create a new placement configuration
    pub fn new() -> Self {
        Self {
            wall_threshold: 0.6,
            surface_offset: 0.006,
            fallback_normal: CardinalDirection::PosZ,
        }
    }

    /// Set the wall rejection threshold
    pub fn with_wall_threshold(mut self, threshold: f64) -> Self {
        self.wall_threshold = threshold;
        self
    }

    /// Set the surface offset
    pub fn with_surface_offset(mut self, offset: f64) -> Self {
        self.surface_offset = offset;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..1.0).contains(&self.wall_threshold) {
            return Err(ConfigError::Invalid(format!(
                "wall_threshold must be in [0, 1), got {}",
                self.wall_threshold
            )));
        }
        if !self.surface_offset.is_finite() || self.surface_offset < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "surface_offset must be a non-negative number, got {}",
                self.surface_offset
            )));
        }
        Ok(())
    }
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Gesture Configuration
///
/// Thresholds separating a click from a camera drag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Maximum travel in CSS pixels, multiplied by the device pixel ratio
    pub drag_threshold_px: f64,
    /// Longest press still treated as a click (milliseconds)
    pub max_click_ms: f64,
    /// Device pixel ratio cap (matches the renderer's cap)
    pub max_pixel_ratio: f64,
}

impl GestureConfig {
    /// Create a new gesture configuration
    pub fn new() -> Self {
        Self {
            drag_threshold_px: 6.0,
            max_click_ms: 300.0,
            max_pixel_ratio: 2.0,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.drag_threshold_px.is_finite() || self.drag_threshold_px <= 0.0 {
            return Err(ConfigError::Invalid("drag_threshold_px must be positive".to_string()));
        }
        if !self.max_click_ms.is_finite() || self.max_click_ms <= 0.0 {
            return Err(ConfigError::Invalid("max_click_ms must be positive".to_string()));
        }
        if !self.max_pixel_ratio.is_finite() || self.max_pixel_ratio < 1.0 {
            return Err(ConfigError::Invalid("max_pixel_ratio must be at least 1".to_string()));
        }
        Ok(())
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Decal Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecalConfig {
    /// Initial scale slider value
    pub default_scale: f64,
    /// Smallest scale the slider allows
    pub min_scale: f64,
    /// Largest scale the slider allows
    pub max_scale: f64,
    /// Initial rotation slider value (radians)
    pub default_rotation: f64,
}

impl DecalConfig {
    /// Create a new decal configuration
    pub fn new() -> Self {
        Self {
            default_scale: 0.5,
            min_scale: 0.05,
            max_scale: 3.0,
            default_rotation: 0.0,
        }
    }

    /// Clamp a requested scale into the allowed range
    ///
    /// Never panics, even for a range that failed [`DecalConfig::validate`];
    /// the upper bound wins when the bounds are inverted.
    pub fn clamp_scale(&self, scale: f64) -> f64 {
        scale.max(self.min_scale).min(self.max_scale)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = self.min_scale.is_finite() && self.max_scale.is_finite();
        if !finite || self.min_scale <= 0.0 || self.min_scale > self.max_scale {
            return Err(ConfigError::Invalid(format!(
                "scale range [{}, {}] is empty or non-positive",
                self.min_scale, self.max_scale
            )));
        }
        if !(self.min_scale..=self.max_scale).contains(&self.default_scale) {
            return Err(ConfigError::Invalid(format!(
                "default_scale {} outside [{}, {}]",
                self.default_scale, self.min_scale, self.max_scale
            )));
        }
        Ok(())
    }
}

impl Default for DecalConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Camera Configuration
///
/// Initial perspective camera. Navigation itself is owned by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f64,
    /// Near clipping plane
    pub near: f64,
    /// Far clipping plane
    pub far: f64,
    /// Initial camera position
    pub position: Vec3,
    /// Initial orbit target
    pub target: Vec3,
}

impl CameraConfig {
    /// Create a new camera configuration
    pub fn new() -> Self {
        Self {
            fov_degrees: 60.0,
            near: 0.1,
            far: 2000.0,
            position: Vec3::new(0.8, 1.5, 2.8),
            target: Vec3::new(0.0, 1.2, 0.0),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "fov_degrees out of range: {}",
                self.fov_degrees
            )));
        }
        if self.near <= 0.0 || self.far <= self.near {
            return Err(ConfigError::Invalid(format!(
                "clip planes must satisfy 0 < near < far, got near={} far={}",
                self.near, self.far
            )));
        }
        Ok(())
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Cache Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Key the draft is stored under
    pub key: String,
    /// Directory for the file-backed cache (host-specific)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            key: crate::persistence::DRAFT_CACHE_KEY.to_string(),
            directory: None,
        }
    }
}

/// # Complete Application Configuration
///
/// Top-level configuration that encompasses all engine subsystems.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Engine core configuration
    pub engine: EngineConfig,
    /// Wall placement configuration
    pub placement: PlacementConfig,
    /// Click/drag discrimination
    pub gesture: GestureConfig,
    /// Decal sizing
    pub decal: DecalConfig,
    /// Initial camera
    pub camera: CameraConfig,
    /// Soft draft cache
    pub cache: CacheConfig,
}

impl ApplicationConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.placement.validate()?;
        self.gesture.validate()?;
        self.decal.validate()?;
        self.camera.validate()?;
        Ok(())
    }
}

impl Config for ApplicationConfig {}
