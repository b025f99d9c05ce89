//! # Sticker Engine
//!
//! Surface-anchored decal placement for scanned 3D rooms.
//!
//! A user picks an image, clicks a wall of the loaded room, and the engine
//! produces a stable transform that keeps the sticker flush against that
//! wall. The same transform is serialized for the shared store and rebuilt
//! for every viewer without recomputation.
//!
//! ## Features
//!
//! - **Ray-Surface Resolution**: pointer → NDC → world ray → nearest room triangle
//! - **Wall-Normal Stabilization**: noisy scan normals snapped to ±X / ±Z
//! - **Decal Transforms**: base orientation + absolute in-plane rotation, never accumulated
//! - **Click/Drag Discrimination**: explicit gesture state machine aware of camera orbiting
//! - **Persistence Contracts**: store, live feed and soft draft cache behind traits
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sticker_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ApplicationConfig::default();
//!     let scene = sticker_engine::scene::loader::fallback_scene();
//!     let mut session = PlacementSession::new(config, scene, InMemoryDraftCache::new());
//!
//!     session.select_remote_image("https://example.com/cat.png", 512, 256)?;
//!     session.pointer_down(640.0, 360.0, 0.0);
//!     let _ = session.pointer_up(640.0, 360.0, 80.0);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;

pub mod foundation;
pub mod config;
pub mod events;
pub mod physics;
pub mod scene;
pub mod render;
pub mod input;
pub mod decal;
pub mod persistence;

mod session;

pub use session::PlacementSession;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        PlacementSession,
        foundation::math::{Vec2, Vec3, Quat, Transform},
        core::config::{
            ApplicationConfig, PlacementConfig, GestureConfig, DecalConfig, CameraConfig,
        },
        config::{Config, ConfigError},
        events::{StatusKind, StatusMessage},
        decal::{
            CardinalDirection, DecalController, DecalTransform, DraftDecalState,
            PlacementError, WallNormalStabilizer,
        },
        input::{ClickDetector, Viewport},
        render::Camera,
        scene::{SceneGraph, PublishedDecals},
        persistence::{
            DecalRecord, DecalStore, DraftCache, InMemoryDecalStore, InMemoryDraftCache,
            NewDecalRecord, StoreError,
        },
    };
}
