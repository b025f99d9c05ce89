//! Soft draft cache
//!
//! A best-effort key/value store that lets a draft survive a reload. Every
//! failure is logged and swallowed: losing the cache must never block the
//! user from placing or publishing.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::record::DraftCacheEntry;

/// Key the draft is stored under
pub const DRAFT_CACHE_KEY: &str = "sticker.draft.v1";

/// Errors from a [`DraftCache`] backend
#[derive(thiserror::Error, Debug)]
pub enum CacheError {
    /// Filesystem error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend refused the operation (quota, private mode, ...)
    #[error("Cache unavailable: {0}")]
    Unavailable(String),
}

/// String key/value storage for the draft
pub trait DraftCache {
    /// Read a value
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Write a value
    fn put(&mut self, key: &str, value: &str) -> Result<(), CacheError>;

    /// Remove a value
    fn clear(&mut self, key: &str) -> Result<(), CacheError>;

    /// Read and decode a draft, logging and ignoring failures
    fn load_draft(&self, key: &str) -> Option<DraftCacheEntry> {
        let raw = match self.get(key) {
            Ok(raw) => raw?,
            Err(err) => {
                log::warn!("Draft cache read failed: {}", err);
                return None;
            }
        };
        match DraftCacheEntry::from_json(&raw) {
            Ok(entry) => Some(entry),
            Err(err) => {
                log::warn!("Discarding unreadable draft cache entry: {}", err);
                None
            }
        }
    }

    /// Encode and write a draft, logging and ignoring failures
    fn store_draft(&mut self, key: &str, entry: &DraftCacheEntry) {
        let result = entry
            .to_json()
            .map_err(|e| CacheError::Unavailable(e.to_string()))
            .and_then(|json| self.put(key, &json));
        if let Err(err) = result {
            log::warn!("Draft cache write failed: {}", err);
        }
    }

    /// Remove the draft, logging and ignoring failures
    fn clear_draft(&mut self, key: &str) {
        if let Err(err) = self.clear(key) {
            log::warn!("Draft cache clear failed: {}", err);
        }
    }
}

/// Process-local cache; can be switched into a failing mode for tests
#[derive(Debug, Default)]
pub struct InMemoryDraftCache {
    values: HashMap<String, String>,
    unavailable: bool,
}

impl InMemoryDraftCache {
    /// Empty, working cache
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache whose every operation fails
    pub fn unavailable() -> Self {
        Self { values: HashMap::new(), unavailable: true }
    }

    /// Raw stored value
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    fn check(&self) -> Result<(), CacheError> {
        if self.unavailable {
            Err(CacheError::Unavailable("storage disabled".to_string()))
        } else {
            Ok(())
        }
    }
}

impl DraftCache for InMemoryDraftCache {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.check()?;
        Ok(self.values.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), CacheError> {
        self.check()?;
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&mut self, key: &str) -> Result<(), CacheError> {
        self.check()?;
        self.values.remove(key);
        Ok(())
    }
}

/// One JSON file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileDraftCache {
    directory: PathBuf,
}

impl FileDraftCache {
    /// Cache rooted at `directory` (created on first write)
    pub fn new(directory: impl AsRef<Path>) -> Self {
        Self { directory: directory.as_ref().to_path_buf() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.directory.join(format!("{}.json", file))
    }
}

impl DraftCache for FileDraftCache {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), CacheError> {
        std::fs::create_dir_all(&self.directory)?;
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn clear(&mut self, key: &str) -> Result<(), CacheError> {
        match std::fs::remove_file(self.path_for(key)) {
            Err(err) if err.kind() != std::io::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_round_trip() {
        let mut cache = InMemoryDraftCache::new();
        let entry = DraftCacheEntry { scale: 1.25, rotz: 0.5, ..Default::default() };
        cache.store_draft(DRAFT_CACHE_KEY, &entry);
        assert_eq!(cache.load_draft(DRAFT_CACHE_KEY), Some(entry));

        cache.clear_draft(DRAFT_CACHE_KEY);
        assert_eq!(cache.load_draft(DRAFT_CACHE_KEY), None);
    }

    #[test]
    fn test_unavailable_cache_is_swallowed() {
        let mut cache = InMemoryDraftCache::unavailable();
        cache.store_draft(DRAFT_CACHE_KEY, &DraftCacheEntry::default());
        assert_eq!(cache.load_draft(DRAFT_CACHE_KEY), None);
        cache.clear_draft(DRAFT_CACHE_KEY);
    }

    #[test]
    fn test_corrupt_entry_ignored() {
        let mut cache = InMemoryDraftCache::new();
        cache.put(DRAFT_CACHE_KEY, "{not json").unwrap();
        assert_eq!(cache.load_draft(DRAFT_CACHE_KEY), None);
    }

    #[test]
    fn test_file_cache() {
        let dir = std::env::temp_dir().join(format!("sticker_cache_{}", std::process::id()));
        let mut cache = FileDraftCache::new(&dir);
        assert_eq!(cache.get(DRAFT_CACHE_KEY).unwrap(), None);

        let entry = DraftCacheEntry {
            image_url: Some("https://cdn/cat.png".to_string()),
            scale: 0.5,
            ..Default::default()
        };
        cache.store_draft(DRAFT_CACHE_KEY, &entry);
        assert_eq!(cache.load_draft(DRAFT_CACHE_KEY), Some(entry));

        cache.clear(DRAFT_CACHE_KEY).unwrap();
        cache.clear(DRAFT_CACHE_KEY).unwrap();
        assert_eq!(cache.get(DRAFT_CACHE_KEY).unwrap(), None);
        std::fs::remove_dir_all(&dir).ok();
    }
}
