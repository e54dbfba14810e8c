//! Cache backend capability
//!
//! Every storage tier speaks the same five verbs over string keys and byte
//! payloads.

use async_trait::async_trait;

use crate::error::Result;

/// Storage tier operating on raw byte payloads.
///
/// A TTL of 0 means the value expires immediately: it is not stored and any
/// previous value under the key is dropped.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Returns the payload if present and not expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores a payload for `ttl_seconds`.
    async fn set(&self, key: &str, value: Vec<u8>, ttl_seconds: u64) -> Result<()>;

    /// Removes a key; absent keys are not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Removes every key owned by this backend.
    async fn clear(&self) -> Result<()>;

    /// True if the key is present and not expired.
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Drops expired entries eagerly, returning how many were removed.
    ///
    /// Backends whose storage expires keys on its own keep the default.
    async fn purge_expired(&self) -> usize {
        0
    }

    /// Short name used in logs and health output.
    fn name(&self) -> &'static str;
}

#[async_trait]
impl<B: CacheBackend + ?Sized> CacheBackend for Box<B> {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl_seconds: u64) -> Result<()> {
        (**self).set(key, value, ttl_seconds).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key).await
    }

    async fn clear(&self) -> Result<()> {
        (**self).clear().await
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        (**self).exists(key).await
    }

    async fn purge_expired(&self) -> usize {
        (**self).purge_expired().await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
