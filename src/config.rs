//! Configuration Module
//!
//! Handles loading and validating cache configuration from environment variables.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Default TTL applied when a caller does not pass one.
pub const DEFAULT_TTL_SECONDS: u64 = 3600;

/// Default namespace prefix for keys written to the remote tier.
pub const DEFAULT_KEY_PREFIX: &str = "app:";

// == Backend Kind ==
/// Which backend the manager is built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// In-process store only
    #[default]
    Memory,
    /// Redis only
    Redis,
    /// In-process L1 in front of Redis L2
    Hybrid,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Memory => "memory",
            BackendKind::Redis => "redis",
            BackendKind::Hybrid => "hybrid",
        }
    }
}

impl FromStr for BackendKind {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(BackendKind::Memory),
            "redis" => Ok(BackendKind::Redis),
            "hybrid" => Ok(BackendKind::Hybrid),
            other => Err(CacheError::InvalidConfig(format!(
                "unknown cache backend '{}' (expected memory, redis or hybrid)",
                other
            ))),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == Config ==
/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend selection
    pub backend: BackendKind,
    /// Default TTL in seconds for entries without explicit TTL
    pub ttl_seconds: u64,
    /// Local store capacity in megabytes
    pub max_size_mb: u64,
    /// Redis connection URL, required for `redis` and `hybrid`
    pub remote_url: Option<String>,
    /// Namespace prefix for remote keys
    pub key_prefix: String,
    /// Per-operation deadline for remote calls, in milliseconds
    pub remote_timeout_ms: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background sweep interval in seconds (0 disables the sweeper)
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_BACKEND` - memory, redis or hybrid (default: memory)
    /// - `CACHE_TTL_SECONDS` - Default TTL in seconds (default: 3600)
    /// - `CACHE_MAX_SIZE_MB` - Local store capacity (default: 100)
    /// - `REDIS_URL` - Remote store URL (no default)
    /// - `CACHE_KEY_PREFIX` - Remote key namespace (default: "app:")
    /// - `CACHE_REMOTE_TIMEOUT_MS` - Remote I/O deadline (default: 2000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 60)
    ///
    /// Fails only when `CACHE_BACKEND` names an unknown backend; malformed
    /// numbers fall back to their defaults.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let backend = match env::var("CACHE_BACKEND") {
            Ok(value) if !value.trim().is_empty() => value.parse()?,
            _ => defaults.backend,
        };

        Ok(Self {
            backend,
            ttl_seconds: parse_var("CACHE_TTL_SECONDS").unwrap_or(defaults.ttl_seconds),
            max_size_mb: parse_var("CACHE_MAX_SIZE_MB").unwrap_or(defaults.max_size_mb),
            remote_url: env::var("REDIS_URL").ok().filter(|url| !url.is_empty()),
            key_prefix: env::var("CACHE_KEY_PREFIX").unwrap_or(defaults.key_prefix),
            remote_timeout_ms: parse_var("CACHE_REMOTE_TIMEOUT_MS")
                .unwrap_or(defaults.remote_timeout_ms),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
        })
    }

    /// Checks the configuration, returning the first problem found.
    pub fn validate(&self) -> Result<()> {
        // hybrid without a URL runs local-only instead
        if self.backend == BackendKind::Redis && self.remote_url.is_none() {
            return Err(CacheError::InvalidConfig(
                "REDIS_URL is required when using the redis backend".to_string(),
            ));
        }
        if self.ttl_seconds == 0 {
            return Err(CacheError::InvalidConfig(
                "default TTL must be at least 1 second".to_string(),
            ));
        }
        if self.max_size_mb == 0 {
            return Err(CacheError::InvalidConfig(
                "local cache size must be at least 1 MB".to_string(),
            ));
        }
        if self.remote_timeout_ms == 0 {
            return Err(CacheError::InvalidConfig(
                "remote timeout must be greater than zero".to_string(),
            ));
        }
        if self.key_prefix.is_empty() {
            return Err(CacheError::InvalidConfig(
                "remote key prefix cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Local store capacity in bytes.
    pub fn max_size_bytes(&self) -> usize {
        (self.max_size_mb as usize).saturating_mul(1024 * 1024)
    }

    /// Remote I/O deadline.
    pub fn remote_timeout(&self) -> Duration {
        Duration::from_millis(self.remote_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendKind::Memory,
            ttl_seconds: DEFAULT_TTL_SECONDS,
            max_size_mb: 100,
            remote_url: None,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            remote_timeout_ms: 2000,
            server_port: 3000,
            cleanup_interval: 60,
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
