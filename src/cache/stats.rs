//! Cache Statistics Module
//!
//! Tracks cache usage: hits, misses, successful sets, and absorbed errors.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time snapshot of the manager's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Lookups that returned a value
    pub hits: u64,
    /// Lookups that found nothing
    pub misses: u64,
    /// Values successfully written
    pub sets: u64,
    /// Backend or serialization failures absorbed by the manager
    pub errors: u64,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Hit rate as a percentage with one decimal, e.g. `"66.7%"`.
    pub fn hit_rate_display(&self) -> String {
        format!("{:.1}%", self.hit_rate() * 100.0)
    }
}

// == Stats Recorder ==
/// Lock-free counters shared by concurrent callers.
#[derive(Debug, Default)]
pub struct StatsRecorder {
    hits: AtomicU64,
    misses: AtomicU64,
    sets: AtomicU64,
    errors: AtomicU64,
}

impl StatsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_set(&self) {
        self.sets.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            sets: self.sets.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }

    /// Zeroes every counter.
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.sets.store(0, Ordering::Relaxed);
        self.errors.store(0, Ordering::Relaxed);
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = StatsRecorder::new().snapshot();
        assert_eq!(stats, CacheStats::default());
    }

    #[test]
    fn test_hit_rate_no_requests() {
        let stats = CacheStats::default();
        assert_eq!(stats.hit_rate(), 0.0);
        assert_eq!(stats.hit_rate_display(), "0.0%");
    }

    #[test]
    fn test_hit_rate_all_hits() {
        let recorder = StatsRecorder::new();
        recorder.record_hit();
        recorder.record_hit();
        recorder.record_hit();
        assert_eq!(recorder.snapshot().hit_rate(), 1.0);
        assert_eq!(recorder.snapshot().hit_rate_display(), "100.0%");
    }

    #[test]
    fn test_hit_rate_mixed() {
        let recorder = StatsRecorder::new();
        recorder.record_hit();
        recorder.record_hit();
        recorder.record_miss();
        let stats = recorder.snapshot();
        assert!((stats.hit_rate() - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(stats.hit_rate_display(), "66.7%");
    }

    #[test]
    fn test_sets_and_errors_do_not_affect_hit_rate() {
        let recorder = StatsRecorder::new();
        recorder.record_hit();
        recorder.record_miss();
        recorder.record_set();
        recorder.record_error();
        recorder.record_error();

        let stats = recorder.snapshot();
        assert_eq!(stats.sets, 1);
        assert_eq!(stats.errors, 2);
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn test_reset() {
        let recorder = StatsRecorder::new();
        recorder.record_hit();
        recorder.record_set();
        recorder.record_error();

        recorder.reset();
        assert_eq!(recorder.snapshot(), CacheStats::default());
    }
}
