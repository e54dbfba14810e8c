//! Local Store Module
//!
//! In-process cache engine combining HashMap storage with FIFO tracking,
//! byte-size capacity and absolute TTL expiry.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::cache::{CacheBackend, CacheEntry, FifoTracker};
use crate::error::{CacheError, Result};

// == Local State ==
/// Everything guarded by the store lock.
#[derive(Debug, Default)]
struct LocalState {
    entries: HashMap<String, CacheEntry>,
    fifo: FifoTracker,
    /// Sum of `size_bytes` over `entries`
    occupied_bytes: usize,
}

impl LocalState {
    fn remove(&mut self, key: &str) -> Option<CacheEntry> {
        let entry = self.entries.remove(key)?;
        self.fifo.remove(key);
        self.occupied_bytes -= entry.size_bytes;
        Some(entry)
    }

    /// Drops the entry under `key` if it has expired by `now`.
    fn expire_if_due(&mut self, key: &str, now: Instant) {
        let expired = self
            .entries
            .get(key)
            .is_some_and(|entry| entry.is_expired_at(now));
        if expired {
            self.remove(key);
            debug!(key, "Local entry expired");
        }
    }

    /// Evicts oldest insertions until `incoming` more bytes fit.
    fn make_room(&mut self, incoming: usize, capacity: usize) {
        while self.occupied_bytes + incoming > capacity {
            let Some(oldest) = self.fifo.pop_oldest() else {
                break;
            };
            if let Some(entry) = self.entries.remove(&oldest) {
                self.occupied_bytes -= entry.size_bytes;
                debug!(key = %oldest, size = entry.size_bytes, "Evicted oldest local entry");
            }
        }
    }
}

// == Local Store ==
/// Process-local byte-bounded cache.
///
/// Cloning yields another handle to the same storage.
#[derive(Debug, Clone)]
pub struct LocalStore {
    state: Arc<Mutex<LocalState>>,
    capacity_bytes: usize,
}

impl LocalStore {
    // == Constructor ==
    /// Creates a store that holds at most `capacity_bytes` of payload.
    pub fn new(capacity_bytes: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(LocalState::default())),
            capacity_bytes,
        }
    }

    /// Creates a store sized in megabytes.
    pub fn with_max_size_mb(max_size_mb: u64) -> Self {
        Self::new((max_size_mb as usize).saturating_mul(1024 * 1024))
    }

    pub fn capacity_bytes(&self) -> usize {
        self.capacity_bytes
    }

    /// Bytes currently charged against capacity.
    pub async fn occupied_bytes(&self) -> usize {
        self.state.lock().await.occupied_bytes
    }

    /// Number of stored entries, expired ones included until noticed.
    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.entries.is_empty()
    }
}

#[async_trait]
impl CacheBackend for LocalStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut state = self.state.lock().await;
        state.expire_if_due(key, Instant::now());
        Ok(state.entries.get(key).map(|entry| entry.value.clone()))
    }

    // == Set ==
    /// Stores a payload, evicting oldest insertions to make room.
    ///
    /// Any previous entry under the key is released first, so a rewrite
    /// counts as a fresh insertion.
    async fn set(&self, key: &str, value: Vec<u8>, ttl_seconds: u64) -> Result<()> {
        let size = value.len();
        let mut state = self.state.lock().await;
        state.remove(key);

        if size > self.capacity_bytes {
            return Err(CacheError::EntryTooLarge {
                key: key.to_string(),
                size,
                capacity: self.capacity_bytes,
            });
        }
        if ttl_seconds == 0 {
            debug!(key, "Zero TTL, not storing local entry");
            return Ok(());
        }

        state.make_room(size, self.capacity_bytes);
        state
            .entries
            .insert(key.to_string(), CacheEntry::new(value, ttl_seconds));
        state.fifo.record_insert(key);
        state.occupied_bytes += size;

        debug!(key, size, ttl = ttl_seconds, "Cached local entry");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.state.lock().await.remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        state.entries.clear();
        state.fifo.clear();
        state.occupied_bytes = 0;
        debug!("Local cache cleared");
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut state = self.state.lock().await;
        state.expire_if_due(key, Instant::now());
        Ok(state.entries.contains_key(key))
    }

    // == Purge Expired ==
    /// Removes all expired entries from the store.
    async fn purge_expired(&self) -> usize {
        let mut state = self.state.lock().await;
        let now = Instant::now();
        let expired_keys: Vec<String> = state
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            state.remove(key);
        }
        expired_keys.len()
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
