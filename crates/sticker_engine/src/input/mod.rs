//! Pointer input: viewport mapping and click discrimination

pub mod picking;
pub mod gesture;

pub use picking::Viewport;
pub use gesture::{ClickDetector, ClickEvent, GestureState};
