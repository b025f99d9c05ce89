//! Viewport geometry for picking
//!
//! Converts client-space pointer positions (CSS pixels, origin top-left) to
//! Normalized Device Coordinates for ray casting.

use crate::foundation::math::Vec2;

/// The canvas rectangle the room is drawn into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Left edge in client pixels
    pub left: f64,
    /// Top edge in client pixels
    pub top: f64,
    /// Width in client pixels
    pub width: f64,
    /// Height in client pixels
    pub height: f64,
    /// Device pixel ratio in effect (already capped)
    pub pixel_ratio: f64,
}

impl Viewport {
    /// Viewport at the client origin with a pixel ratio of 1
    pub fn new(width: f64, height: f64) -> Self {
        Self { left: 0.0, top: 0.0, width, height, pixel_ratio: 1.0 }
    }

    /// Builder: offset the viewport within the page
    pub fn with_offset(mut self, left: f64, top: f64) -> Self {
        self.left = left;
        self.top = top;
        self
    }

    /// Builder: apply the device pixel ratio, capped at `max_ratio`
    pub fn with_pixel_ratio(mut self, device_ratio: f64, max_ratio: f64) -> Self {
        self.pixel_ratio = if device_ratio.is_finite() && device_ratio > 0.0 {
            device_ratio.min(max_ratio)
        } else {
            1.0
        };
        self
    }

    /// Update size after the container was resized
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Whether the viewport has a drawable area
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Width / height, if drawable
    pub fn aspect_ratio(&self) -> Option<f64> {
        self.is_valid().then(|| self.width / self.height)
    }

    /// Convert a client-space point to NDC
    ///
    /// NDC range: [-1, 1] where:
    /// - X: -1 = left, +1 = right
    /// - Y: -1 = bottom, +1 = top (flipped from pixel rows)
    ///
    /// Returns `None` for a zero-sized viewport.
    pub fn screen_to_ndc(&self, client: &Vec2) -> Option<Vec2> {
        if !self.is_valid() {
            return None;
        }
        let x = (client.x - self.left) / self.width * 2.0 - 1.0;
        let y = -((client.y - self.top) / self.height) * 2.0 + 1.0;
        Some(Vec2::new(x, y))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}
