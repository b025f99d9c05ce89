//! Persistence contracts
//!
//! - [`record`] - Row shapes for published decals and the draft cache
//! - [`store`] - The shared store (rows, blobs, insert stream)
//! - [`cache`] - Best-effort local draft cache

pub mod record;
pub mod store;
pub mod cache;

pub use record::{DecalRecord, DraftCacheEntry, NewDecalRecord, RecordError};
pub use store::{DecalStore, InMemoryDecalStore, StoreError, Subscription};
pub use cache::{CacheError, DraftCache, FileDraftCache, InMemoryDraftCache, DRAFT_CACHE_KEY};
