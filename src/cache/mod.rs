//! Cache Module
//!
//! Two-tier caching: a byte-bounded in-process store with TTL expiry and FIFO
//! eviction, an optional Redis tier, and a typed manager in front of both.

mod backend;
mod entry;
mod fifo;
mod key;
mod local;
mod manager;
mod remote;
mod serializer;
mod stats;
mod tiered;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use backend::CacheBackend;
pub use entry::{CacheEntry, MAX_TTL_SECONDS};
pub use fifo::FifoTracker;
pub use key::create_key;
pub use local::LocalStore;
pub use manager::{build_backend, CacheManager};
pub use remote::RemoteStore;
pub use serializer::{JsonSerializer, Serializer};
pub use stats::{CacheStats, StatsRecorder};
pub use tiered::TieredStore;
