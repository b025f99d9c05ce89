//! Render-side state the placement pipeline depends on

pub mod camera;

pub use camera::Camera;
