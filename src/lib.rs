//! Tiered Cache - a two-level cache for expensive, repeatable calls
//!
//! Provides a byte-bounded in-process store with TTL expiry and FIFO
//! eviction, an optional shared Redis tier with read-through population, and
//! a typed manager that derives keys and keeps hit/miss statistics.
//!
//! ```ignore
//! let manager = CacheManager::from_config(&Config::from_env()?).await?;
//! let key = create_key(&["topic", "elections"], &json!({"region": "Bihar"}))?;
//! let summary: Summary = manager
//!     .get_or_insert_with(&key, None, || fetch_summary("elections"))
//!     .await?;
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{
    create_key, CacheBackend, CacheManager, CacheStats, LocalStore, RemoteStore, TieredStore,
};
pub use config::{BackendKind, Config};
pub use error::{CacheError, Result};
pub use tasks::spawn_cleanup_task;
