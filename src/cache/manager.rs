//! Cache Manager Module
//!
//! Typed, best-effort front for any backend. Failures underneath are counted
//! and logged, never returned: the worst case looks like a disabled cache.

use std::future::Future;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, info, warn};

use crate::cache::{
    CacheBackend, CacheStats, JsonSerializer, LocalStore, RemoteStore, Serializer, StatsRecorder,
    TieredStore,
};
use crate::config::{BackendKind, Config, DEFAULT_TTL_SECONDS};
use crate::error::{CacheError, Result};

// == Cache Manager ==
/// Entry point for application code.
pub struct CacheManager<B, S = JsonSerializer> {
    backend: B,
    serializer: S,
    stats: StatsRecorder,
    default_ttl: u64,
}

impl<B: CacheBackend> CacheManager<B> {
    /// Wraps a backend with JSON payloads and the 3600 s default TTL.
    pub fn new(backend: B) -> Self {
        Self::with_default_ttl(backend, DEFAULT_TTL_SECONDS)
    }

    pub fn with_default_ttl(backend: B, default_ttl: u64) -> Self {
        Self::with_serializer(backend, JsonSerializer, default_ttl)
    }
}

impl CacheManager<Box<dyn CacheBackend>> {
    // == From Config ==
    /// Validates `config` and builds the backend it selects.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let backend = build_backend(config).await?;
        info!(backend = backend.name(), ttl = config.ttl_seconds, "Cache manager ready");
        Ok(Self::with_default_ttl(backend, config.ttl_seconds))
    }
}

impl<B: CacheBackend, S: Serializer> CacheManager<B, S> {
    pub fn with_serializer(backend: B, serializer: S, default_ttl: u64) -> Self {
        Self {
            backend,
            serializer,
            stats: StatsRecorder::new(),
            default_ttl,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn default_ttl(&self) -> u64 {
        self.default_ttl
    }

    // == Get ==
    /// Looks a value up, counting a hit, a miss, or an error.
    ///
    /// A payload that does not decode as `T` counts as an error and reads as
    /// absent.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let bytes = match self.backend.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                self.stats.record_miss();
                debug!(key, "Cache MISS");
                return None;
            }
            Err(e) => {
                self.stats.record_error();
                error!(key, error = %e, "Cache get error");
                return None;
            }
        };

        match self.serializer.deserialize(&bytes) {
            Ok(value) => {
                self.stats.record_hit();
                debug!(key, "Cache HIT");
                Some(value)
            }
            Err(e) => {
                self.stats.record_error();
                error!(key, error = %e, "Cached payload could not be decoded");
                None
            }
        }
    }

    // == Set ==
    /// Stores a value with the default TTL.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        self.set_with_ttl(key, value, self.default_ttl).await;
    }

    /// Stores a value for `ttl_seconds`; 0 expires it immediately.
    pub async fn set_with_ttl<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl_seconds: u64) {
        if let Err(e) = self.try_set(key, value, ttl_seconds).await {
            self.stats.record_error();
            error!(key, error = %e, "Cache set error");
            return;
        }
        self.stats.record_set();
    }

    async fn try_set<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl_seconds: u64) -> Result<()> {
        let bytes = self.serializer.serialize(value)?;
        self.backend.set(key, bytes, ttl_seconds).await
    }

    pub async fn delete(&self, key: &str) {
        if let Err(e) = self.backend.delete(key).await {
            self.stats.record_error();
            error!(key, error = %e, "Cache delete error");
        }
    }

    pub async fn clear(&self) {
        match self.backend.clear().await {
            Ok(()) => info!(backend = self.backend.name(), "Cache cleared"),
            Err(e) => {
                self.stats.record_error();
                error!(error = %e, "Cache clear error");
            }
        }
    }

    pub async fn exists(&self, key: &str) -> bool {
        match self.backend.exists(key).await {
            Ok(found) => found,
            Err(e) => {
                self.stats.record_error();
                error!(key, error = %e, "Cache exists error");
                false
            }
        }
    }

    // == Get Or Insert ==
    /// Returns the cached value, or runs `loader` and caches what it yields.
    ///
    /// Loader errors are handed back untouched and nothing is cached. Uses
    /// the default TTL when `ttl_seconds` is None.
    pub async fn get_or_insert_with<T, E, F, Fut>(
        &self,
        key: &str,
        ttl_seconds: Option<u64>,
        loader: F,
    ) -> std::result::Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        if let Some(cached) = self.get::<T>(key).await {
            return Ok(cached);
        }

        let value = loader().await?;
        self.set_with_ttl(key, &value, ttl_seconds.unwrap_or(self.default_ttl))
            .await;
        Ok(value)
    }

    // == Stats ==
    /// Returns a snapshot of the counters.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }

    pub fn reset_stats(&self) {
        self.stats.reset();
    }

    /// Drops expired local entries ahead of lazy expiry.
    pub async fn purge_expired(&self) -> usize {
        self.backend.purge_expired().await
    }

    /// Ends the manager's lifetime, releasing the backend and its connections.
    pub async fn close(self) {
        let stats = self.stats.snapshot();
        info!(
            backend = self.backend.name(),
            hits = stats.hits,
            misses = stats.misses,
            sets = stats.sets,
            errors = stats.errors,
            hit_rate = %stats.hit_rate_display(),
            "Cache manager closed"
        );
    }
}

// == Backend Factory ==
/// Builds the backend `config` selects.
///
/// `redis` fails when the server is unreachable; `hybrid` falls back to a
/// local-only tiered store with a warning.
pub async fn build_backend(config: &Config) -> Result<Box<dyn CacheBackend>> {
    config.validate()?;
    let local = || LocalStore::with_max_size_mb(config.max_size_mb);

    let backend: Box<dyn CacheBackend> = match config.backend {
        BackendKind::Memory => Box::new(local()),
        BackendKind::Redis => Box::new(connect_remote(config).await?),
        BackendKind::Hybrid => match connect_remote(config).await {
            Ok(remote) => Box::new(TieredStore::new(local(), remote, config.ttl_seconds)),
            Err(e) => {
                warn!(error = %e, "Remote cache unavailable, using memory-only cache");
                Box::new(TieredStore::<RemoteStore>::local_only(
                    local(),
                    config.ttl_seconds,
                ))
            }
        },
    };
    Ok(backend)
}

async fn connect_remote(config: &Config) -> Result<RemoteStore> {
    let url = config.remote_url.as_deref().ok_or_else(|| {
        CacheError::InvalidConfig(format!("REDIS_URL is required for the {} backend", config.backend))
    })?;
    RemoteStore::connect(url, config.key_prefix.clone(), config.remote_timeout()).await
}
