//! Sticker placement demo
//!
//! Headless walk through one placement session: load a room (or the fallback
//! scene), replay a scripted pointer sequence, edit and publish the sticker
//! to an in-memory store, then show it to a second viewer.
//!
//! Usage: `sticker_demo [config.toml|config.ron] [room://WxHxD]`

use std::io::Cursor;

use sticker_engine::foundation::logging;
use sticker_engine::persistence::{FileDraftCache, RecordError};
use sticker_engine::prelude::*;
use sticker_engine::scene::loader::{
    load_room_or_fallback, room_scene, LoadError, LoadedRoom, SceneLoader,
};

const DEFAULT_CONFIG: &str = "sticker.toml";
const DEFAULT_ROOM: &str = "room://4x3x4";

/// Demo failures
#[derive(thiserror::Error, Debug)]
enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Placement error: {0}")]
    Placement(#[from] PlacementError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Record error: {0}")]
    Record(#[from] RecordError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Builds shoebox rooms from `room://WxHxD` URLs; anything else fails
struct RoomLoader;

impl SceneLoader for RoomLoader {
    fn load(&mut self, url: &str) -> Result<SceneGraph, LoadError> {
        let Some(dims) = url.strip_prefix("room://") else {
            return Err(LoadError::Fetch {
                url: url.to_string(),
                reason: "only room:// URLs are available offline".to_string(),
            });
        };

        let parsed: Vec<f64> =
            dims.split('x').filter_map(|part| part.trim().parse().ok()).collect();
        match parsed.as_slice() {
            &[width, height, depth] if width > 0.0 && height > 0.0 && depth > 0.0 => {
                Ok(room_scene(width, height, depth))
            }
            _ => Err(LoadError::Decode {
                url: url.to_string(),
                reason: format!("expected WxHxD with positive sizes, got {:?}", dims),
            }),
        }
    }
}

fn main() {
    if let Err(err) = run() {
        log::error!("Demo failed: {}", err);
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let args: Vec<String> = std::env::args().collect();
    let config_path = args.get(1).map_or(DEFAULT_CONFIG, String::as_str);
    let room_url = args.get(2).map_or(DEFAULT_ROOM, String::as_str);

    let config = ApplicationConfig::load_or_default(config_path)?;
    config.validate()?;
    logging::init_with_level(&config.engine.log_level);
    log::info!("Starting sticker placement demo");

    let room = load_room_or_fallback(&mut RoomLoader, room_url);
    match config.cache.directory.clone() {
        Some(directory) => run_session(config, room, FileDraftCache::new(directory)),
        None => run_session(config, room, InMemoryDraftCache::new()),
    }
}

fn run_session<C: DraftCache>(
    config: ApplicationConfig,
    room: LoadedRoom,
    cache: C,
) -> Result<(), AppError> {
    let is_fallback = room.is_fallback;
    let mut store = InMemoryDecalStore::default();
    let mut author = PlacementSession::from_loaded_room(config.clone(), room, cache);
    author.resize(1280.0, 720.0, 1.0);
    author.connect_feed(&store)?;

    if !is_fallback {
        // Stand inside the room facing the back wall
        let camera = author.camera_mut();
        camera.position = Vec3::new(0.3, 1.5, 1.0);
        camera.look_at(Vec3::new(0.3, 1.5, -2.0));
    }

    if author.restore_draft() {
        log::info!("Continuing cached draft ({})", author.controller().state().name());
    } else {
        author.select_image("cat.png", sample_png(256, 128)?)?;
    }

    // A drag orbits the camera and must not place anything
    author.pointer_down(600.0, 360.0, 0.0);
    author.pointer_move(640.0, 360.0);
    if author.pointer_up(640.0, 360.0, 90.0).is_none() {
        log::info!("Drag ignored");
    }

    // Bottom edge of the screen looks at the floor
    author.pointer_down(640.0, 712.0, 400.0);
    let _ = author.pointer_up(640.0, 712.0, 460.0);

    author.pointer_down(640.0, 360.0, 800.0);
    match author.pointer_up(640.0, 360.0, 870.0) {
        Some(placed) => log::info!("Placed at {:?} facing {:?}", placed.position, placed.normal),
        None => log::warn!("Center click did not place the sticker"),
    }

    author.set_scale(0.8)?;
    author.set_rotation_degrees(15.0)?;
    let record = author.publish(&mut store)?;
    log::info!("Published row:\n{}", serde_json::to_string_pretty(&record)?);
    report_status(&mut author);

    let mut viewer =
        PlacementSession::new(config, author.scene().clone(), InMemoryDraftCache::new());
    let history = viewer.connect_feed(&store)?;
    log::info!("Viewer loaded {} published sticker(s)", history);
    for decal in viewer.published().iter() {
        log::info!("  {} {} at {:?}", decal.id, decal.image_url, decal.transform.position);
    }

    let mut editable = 0;
    for row in store.list_ordered()? {
        if row.to_decal_transform()?.is_some() {
            editable += 1;
        }
    }
    log::info!(
        "Demo finished with {} row(s) in the store, {} with a stored base orientation",
        store.len(),
        editable
    );
    Ok(())
}

fn report_status<C: DraftCache>(session: &mut PlacementSession<C>) {
    for message in session.drain_status() {
        match message.kind {
            StatusKind::Info => log::info!("[status] {}", message.text),
            StatusKind::Error => log::warn!("[status] {}", message.text),
        }
    }
}

/// Small checkerboard PNG standing in for a user's file
fn sample_png(width: u32, height: u32) -> Result<Vec<u8>, image::ImageError> {
    let pixels = image::RgbaImage::from_fn(width, height, |x, y| {
        if (x / 16 + y / 16) % 2 == 0 {
            image::Rgba([240, 90, 40, 255])
        } else {
            image::Rgba([255, 255, 255, 255])
        }
    });

    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(pixels)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
    Ok(bytes)
}
