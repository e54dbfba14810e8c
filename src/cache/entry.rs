//! Cache Entry Module
//!
//! Defines the structure for individual local-store entries with absolute expiry.

use std::time::{Duration, Instant};

/// Longest lifetime an entry can get, about a century.
///
/// Larger TTLs are clamped so the expiry instant cannot overflow.
pub const MAX_TTL_SECONDS: u64 = 100 * 365 * 24 * 60 * 60;

// == Cache Entry ==
/// A single payload held by the local store, with its expiry and size.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The serialized payload
    pub value: Vec<u8>,
    /// Absolute expiry instant
    pub expires_at: Instant,
    /// Bytes charged against the store's capacity
    pub size_bytes: usize,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry expiring `ttl_seconds` from now.
    pub fn new(value: Vec<u8>, ttl_seconds: u64) -> Self {
        let size_bytes = value.len();
        Self {
            value,
            expires_at: expiry_after(Instant::now(), ttl_seconds),
            size_bytes,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry whose expiry equals the current instant
    /// is already expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Expiry check against a caller-supplied clock reading.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

fn expiry_after(now: Instant, ttl_seconds: u64) -> Instant {
    let ttl = Duration::from_secs(ttl_seconds.min(MAX_TTL_SECONDS));
    // Only fails on a monotonic clock near its upper bound
    now.checked_add(ttl).unwrap_or(now)
}
