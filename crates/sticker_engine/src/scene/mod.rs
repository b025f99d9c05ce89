//! Scene management
//!
//! - [`scene_graph`] - Room geometry the pointer is raycast against
//! - [`loader`] - Loading contract, fallback and procedural rooms
//! - [`live_feed`] - Published decals shared by every viewer

pub mod scene_graph;
pub mod loader;
pub mod live_feed;

pub use scene_graph::{NodeId, SceneError, SceneGraph, SceneNode};
pub use loader::{load_room_or_fallback, LoadError, LoadedRoom, SceneLoader};
pub use live_feed::{PublishedDecal, PublishedDecals};
