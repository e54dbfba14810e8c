//! Tiered Store Module
//!
//! Read-through composition of a local L1 and an optional shared L2.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::cache::{CacheBackend, LocalStore, RemoteStore};
use crate::error::Result;

// == Tiered Store ==
/// L1 in front of an optional L2.
///
/// L1 is authoritative for this process. L2 failures are logged and never
/// surface to the caller. An entry served from L2 is copied into L1 with the
/// full `repopulate_ttl`, not the time L2 had left on it.
#[derive(Debug, Clone)]
pub struct TieredStore<R = RemoteStore> {
    local: LocalStore,
    remote: Option<R>,
    repopulate_ttl: u64,
}

impl<R: CacheBackend> TieredStore<R> {
    // == Constructors ==
    /// Composes both tiers.
    pub fn new(local: LocalStore, remote: R, repopulate_ttl: u64) -> Self {
        Self {
            local,
            remote: Some(remote),
            repopulate_ttl,
        }
    }

    /// L1 only, used when the remote tier is not configured or unreachable.
    pub fn local_only(local: LocalStore, repopulate_ttl: u64) -> Self {
        Self {
            local,
            remote: None,
            repopulate_ttl,
        }
    }

    pub fn local(&self) -> &LocalStore {
        &self.local
    }

    pub fn remote(&self) -> Option<&R> {
        self.remote.as_ref()
    }

    pub fn repopulate_ttl(&self) -> u64 {
        self.repopulate_ttl
    }
}

#[async_trait]
impl<R: CacheBackend> CacheBackend for TieredStore<R> {
    // == Get ==
    /// L1 first; on an L1 miss, an L2 hit is copied back into L1.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        if let Some(value) = self.local.get(key).await? {
            debug!(key, "L1 hit");
            return Ok(Some(value));
        }

        let Some(remote) = &self.remote else {
            return Ok(None);
        };

        match remote.get(key).await {
            Ok(Some(value)) => {
                debug!(key, "L2 hit, repopulating L1");
                if let Err(e) = self
                    .local
                    .set(key, value.clone(), self.repopulate_ttl)
                    .await
                {
                    warn!(key, error = %e, "Failed to repopulate L1 from L2");
                }
                Ok(Some(value))
            }
            Ok(None) => Ok(None),
            Err(e) => {
                warn!(key, error = %e, "L2 get failed");
                Ok(None)
            }
        }
    }

    // == Set ==
    /// Writes both tiers independently; the L1 outcome is returned.
    async fn set(&self, key: &str, value: Vec<u8>, ttl_seconds: u64) -> Result<()> {
        let Some(remote) = &self.remote else {
            return self.local.set(key, value, ttl_seconds).await;
        };

        let local_result = self.local.set(key, value.clone(), ttl_seconds).await;
        if let Err(e) = remote.set(key, value, ttl_seconds).await {
            warn!(key, error = %e, "L2 set failed");
        }
        local_result
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.local.delete(key).await?;
        if let Some(remote) = &self.remote {
            if let Err(e) = remote.delete(key).await {
                warn!(key, error = %e, "L2 delete failed");
            }
        }
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.local.clear().await?;
        if let Some(remote) = &self.remote {
            if let Err(e) = remote.clear().await {
                warn!(error = %e, "L2 clear failed");
            }
        }
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        if self.local.exists(key).await? {
            return Ok(true);
        }
        match &self.remote {
            Some(remote) => Ok(remote.exists(key).await.unwrap_or_else(|e| {
                warn!(key, error = %e, "L2 exists check failed");
                false
            })),
            None => Ok(false),
        }
    }

    async fn purge_expired(&self) -> usize {
        self.local.purge_expired().await
    }

    fn name(&self) -> &'static str {
        if self.remote.is_some() {
            "hybrid"
        } else {
            "hybrid (local only)"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;

    /// A second LocalStore stands in for the shared tier.
    fn two_tier() -> (TieredStore<LocalStore>, LocalStore) {
        let l2 = LocalStore::new(1024 * 1024);
        let store = TieredStore::new(LocalStore::new(1024), l2.clone(), 300);
        (store, l2)
    }

    /// L2 whose every call fails.
    struct BrokenTier;

    #[async_trait]
    impl CacheBackend for BrokenTier {
        async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
            Err(CacheError::Internal("l2 down".to_string()))
        }
        async fn set(&self, _key: &str, _value: Vec<u8>, _ttl: u64) -> Result<()> {
            Err(CacheError::Internal("l2 down".to_string()))
        }
        async fn delete(&self, _key: &str) -> Result<()> {
            Err(CacheError::Internal("l2 down".to_string()))
        }
        async fn clear(&self) -> Result<()> {
            Err(CacheError::Internal("l2 down".to_string()))
        }
        async fn exists(&self, _key: &str) -> Result<bool> {
            Err(CacheError::Internal("l2 down".to_string()))
        }
        fn name(&self) -> &'static str {
            "broken"
        }
    }

    #[tokio::test]
    async fn test_set_writes_both_tiers() {
        let (store, l2) = two_tier();

        store.set("k", b"v".to_vec(), 60).await.unwrap();

        assert!(store.local().exists("k").await.unwrap());
        assert!(l2.exists("k").await.unwrap());
    }

    #[tokio::test]
    async fn test_read_through_after_l1_eviction() {
        let (store, l2) = two_tier();
        store.set("k", b"v".to_vec(), 60).await.unwrap();

        // Simulate an L1 eviction without touching L2
        store.local().delete("k").await.unwrap();
        assert!(!store.local().exists("k").await.unwrap());

        assert_eq!(store.get("k").await.unwrap(), Some(b"v".to_vec()));
        assert!(store.local().exists("k").await.unwrap());
        assert!(l2.exists("k").await.unwrap());
    }

    #[tokio::test]
    async fn test_repeated_get_is_stable() {
        let (store, l2) = two_tier();
        l2.set("only_in_l2", b"shared".to_vec(), 60).await.unwrap();

        let first = store.get("only_in_l2").await.unwrap();
        let second = store.get("only_in_l2").await.unwrap();

        assert_eq!(first, Some(b"shared".to_vec()));
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_miss_in_both_tiers() {
        let (store, _l2) = two_tier();
        assert!(store.get("missing").await.unwrap().is_none());
        assert!(!store.exists("missing").await.unwrap());
    }

    #[tokio::test]
    async fn test_exists_if_either_tier_has_key() {
        let (store, l2) = two_tier();
        l2.set("remote_only", b"v".to_vec(), 60).await.unwrap();
        store.local().set("local_only", b"v".to_vec(), 60).await.unwrap();

        assert!(store.exists("remote_only").await.unwrap());
        assert!(store.exists("local_only").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_and_clear_propagate() {
        let (store, l2) = two_tier();
        store.set("a", b"1".to_vec(), 60).await.unwrap();
        store.set("b", b"2".to_vec(), 60).await.unwrap();

        store.delete("a").await.unwrap();
        assert!(!l2.exists("a").await.unwrap());
        assert!(!store.local().exists("a").await.unwrap());

        store.clear().await.unwrap();
        assert!(l2.is_empty().await);
        assert!(store.local().is_empty().await);
    }

    #[tokio::test]
    async fn test_local_only_shape() {
        let store: TieredStore<LocalStore> = TieredStore::local_only(LocalStore::new(1024), 60);

        store.set("k", b"v".to_vec(), 60).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(b"v".to_vec()));
        store.delete("k").await.unwrap();
        store.clear().await.unwrap();
        assert!(store.remote().is_none());
        assert_eq!(store.name(), "hybrid (local only)");
    }

    #[tokio::test]
    async fn test_l2_failure_does_not_block_l1() {
        let store = TieredStore::new(LocalStore::new(1024), BrokenTier, 60);

        store.set("k", b"v".to_vec(), 60).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(b"v".to_vec()));
        assert!(store.get("missing").await.unwrap().is_none());
        assert!(!store.exists("missing").await.unwrap());
        store.delete("k").await.unwrap();
        store.clear().await.unwrap();
        assert!(store.local().is_empty().await);
    }

    #[tokio::test]
    async fn test_l2_still_written_when_l1_rejects() {
        let l2 = LocalStore::new(1024 * 1024);
        let store = TieredStore::new(LocalStore::new(10), l2.clone(), 60);

        let result = store.set("big", vec![0; 100], 60).await;

        assert!(matches!(result, Err(CacheError::EntryTooLarge { .. })));
        assert!(l2.exists("big").await.unwrap());
    }

    #[tokio::test]
    async fn test_repopulated_l1_copy_gets_repopulate_ttl() {
        let l2 = LocalStore::new(1024 * 1024);
        l2.set("short", b"s".to_vec(), 60).await.unwrap();
        l2.set("long", b"l".to_vec(), 60).await.unwrap();
        let short_lived = TieredStore::new(LocalStore::new(1024), l2.clone(), 1);
        let long_lived = TieredStore::new(LocalStore::new(1024), l2.clone(), 300);

        assert_eq!(short_lived.get("short").await.unwrap(), Some(b"s".to_vec()));
        assert_eq!(long_lived.get("long").await.unwrap(), Some(b"l".to_vec()));
        assert!(short_lived.local().exists("short").await.unwrap());

        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

        // The L1 copy follows repopulate_ttl, not the 60 s left in L2
        assert!(!short_lived.local().exists("short").await.unwrap());
        assert!(long_lived.local().exists("long").await.unwrap());
        assert!(l2.exists("short").await.unwrap());
    }
}
