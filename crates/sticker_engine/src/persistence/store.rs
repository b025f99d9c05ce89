//! Shared decal store contract
//!
//! The hosted database, blob storage and realtime channel are external.
//! [`DecalStore`] is the slice of them the placement flow talks to.
//! [`InMemoryDecalStore`] backs tests and the demo binary.

use std::collections::HashMap;

use chrono::Utc;

use super::record::{DecalRecord, NewDecalRecord};

/// Failures reported by a [`DecalStore`]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// The store refused the request (quota, policy, validation)
    #[error("Rejected by store: {0}")]
    Rejected(String),

    /// Blob upload failed
    #[error("Upload failed: {0}")]
    Upload(String),
}

/// Position in the insert stream
///
/// Returned by [`DecalStore::subscribe`]; each poll yields rows inserted
/// after the previous poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription {
    cursor: u64,
}

impl Subscription {
    /// Subscription starting at `cursor`
    pub fn starting_at(cursor: u64) -> Self {
        Self { cursor }
    }

    /// Next sequence number this subscription will deliver
    pub fn cursor(&self) -> u64 {
        self.cursor
    }
}

/// Backend collaborator for publishing and viewing decals
pub trait DecalStore {
    /// Insert one row; the store assigns `id` and `created_at`
    fn insert(&mut self, record: NewDecalRecord) -> Result<DecalRecord, StoreError>;

    /// All rows, oldest first
    fn list_ordered(&self) -> Result<Vec<DecalRecord>, StoreError>;

    /// Start listening for inserts from now on
    fn subscribe(&self) -> Subscription;

    /// Rows inserted since the subscription's last poll
    fn poll_inserted_since(
        &self,
        subscription: &mut Subscription,
    ) -> Result<Vec<DecalRecord>, StoreError>;

    /// Store a blob and return its public URL
    fn upload_blob(
        &mut self,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<String, StoreError>;

    /// Delete every row and blob, returning the number of rows removed
    fn purge(&mut self) -> Result<usize, StoreError>;
}

#[derive(Debug, Clone)]
struct StoredBlob {
    bytes: Vec<u8>,
    content_type: String,
}

/// Process-local [`DecalStore`]
#[derive(Debug)]
pub struct InMemoryDecalStore {
    public_base_url: String,
    rows: Vec<(u64, DecalRecord)>,
    blobs: HashMap<String, StoredBlob>,
    next_seq: u64,
    fail_next_insert: Option<StoreError>,
    fail_next_upload: Option<StoreError>,
}

impl InMemoryDecalStore {
    /// Empty store serving blobs under `public_base_url`
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
            rows: Vec::new(),
            blobs: HashMap::new(),
            next_seq: 0,
            fail_next_insert: None,
            fail_next_upload: None,
        }
    }

    /// Make the next insert fail with `error`
    pub fn fail_next_insert(&mut self, error: StoreError) {
        self.fail_next_insert = Some(error);
    }

    /// Make the next upload fail with `error`
    pub fn fail_next_upload(&mut self, error: StoreError) {
        self.fail_next_upload = Some(error);
    }

    /// Number of stored rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the store has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Uploaded blob bytes and content type by public URL
    pub fn blob(&self, public_url: &str) -> Option<(&[u8], &str)> {
        let path = public_url.strip_prefix(&self.public_base_url)?.trim_start_matches('/');
        self.blobs
            .get(path)
            .map(|blob| (blob.bytes.as_slice(), blob.content_type.as_str()))
    }
}

impl Default for InMemoryDecalStore {
    fn default() -> Self {
        Self::new("memory://decals")
    }
}

impl DecalStore for InMemoryDecalStore {
    fn insert(&mut self, record: NewDecalRecord) -> Result<DecalRecord, StoreError> {
        if let Some(error) = self.fail_next_insert.take() {
            log::warn!("Insert failed: {}", error);
            return Err(error);
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        let stored = record.into_record(format!("decal-{}", seq + 1), Utc::now());
        log::debug!("Inserted {} ({})", stored.id, stored.image_url);
        self.rows.push((seq, stored.clone()));
        Ok(stored)
    }

    fn list_ordered(&self) -> Result<Vec<DecalRecord>, StoreError> {
        // Stable sort: equal timestamps keep insertion order
        let mut rows: Vec<DecalRecord> = self.rows.iter().map(|(_, r)| r.clone()).collect();
        rows.sort_by_key(|r| r.created_at);
        Ok(rows)
    }

    fn subscribe(&self) -> Subscription {
        Subscription::starting_at(self.next_seq)
    }

    fn poll_inserted_since(
        &self,
        subscription: &mut Subscription,
    ) -> Result<Vec<DecalRecord>, StoreError> {
        let fresh: Vec<DecalRecord> = self
            .rows
            .iter()
            .filter(|(seq, _)| *seq >= subscription.cursor)
            .map(|(_, r)| r.clone())
            .collect();
        subscription.cursor = self.next_seq;
        Ok(fresh)
    }

    fn upload_blob(
        &mut self,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<String, StoreError> {
        if let Some(error) = self.fail_next_upload.take() {
            log::warn!("Upload of {} failed: {}", path, error);
            return Err(error);
        }
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            return Err(StoreError::Upload("empty blob path".to_string()));
        }

        self.blobs.insert(
            path.to_string(),
            StoredBlob { bytes: bytes.to_vec(), content_type: content_type.to_string() },
        );
        let url = format!("{}/{}", self.public_base_url, path);
        log::debug!("Uploaded {} bytes to {}", bytes.len(), url);
        Ok(url)
    }

    fn purge(&mut self) -> Result<usize, StoreError> {
        let removed = self.rows.len();
        self.rows.clear();
        self.blobs.clear();
        log::info!("Purged {} decals", removed);
        Ok(removed)
    }
}
