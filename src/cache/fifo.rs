//! FIFO Tracker Module
//!
//! Tracks insertion order for oldest-first eviction.

use std::collections::{HashMap, VecDeque};

// == FIFO Tracker ==
/// Tracks insertion order for FIFO eviction.
///
/// Keys are stored in a VecDeque where:
/// - Front = Oldest insertion
/// - Back = Newest insertion
///
/// Reads never reorder keys; only a fresh insertion does. Removal is lazy:
/// the queue slot goes stale and is skipped when it reaches the front, so
/// every operation is amortized O(1).
#[derive(Debug, Default)]
pub struct FifoTracker {
    order: VecDeque<(String, u64)>,
    /// Insertion sequence of each live key
    live: HashMap<String, u64>,
    next_seq: u64,
}

impl FifoTracker {
    // == Constructor ==
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Record Insert ==
    /// Marks a key as the newest insertion.
    ///
    /// A key inserted again loses its old position.
    pub fn record_insert(&mut self, key: &str) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.live.insert(key.to_string(), seq);
        self.order.push_back((key.to_string(), seq));
        self.compact_if_sparse();
    }

    // == Remove ==
    /// Removes a key from the tracker.
    pub fn remove(&mut self, key: &str) {
        if self.live.remove(key).is_some() {
            self.compact_if_sparse();
        }
    }

    // == Pop Oldest ==
    /// Returns and removes the oldest inserted key.
    ///
    /// Returns None if tracker is empty.
    pub fn pop_oldest(&mut self) -> Option<String> {
        while let Some((key, seq)) = self.order.pop_front() {
            if self.live.get(&key) == Some(&seq) {
                self.live.remove(&key);
                return Some(key);
            }
        }
        None
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.live.clear();
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Drops stale slots once they outnumber live keys.
    fn compact_if_sparse(&mut self) {
        if self.order.len() > 2 * self.live.len() + 64 {
            let live = &self.live;
            self.order.retain(|(key, seq)| live.get(key) == Some(seq));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_in_insertion_order() {
        let mut fifo = FifoTracker::new();
        fifo.record_insert("a");
        fifo.record_insert("b");
        fifo.record_insert("c");

        assert_eq!(fifo.pop_oldest().as_deref(), Some("a"));
        assert_eq!(fifo.pop_oldest().as_deref(), Some("b"));
        assert_eq!(fifo.pop_oldest().as_deref(), Some("c"));
        assert!(fifo.pop_oldest().is_none());
    }

    #[test]
    fn test_reinsert_moves_to_back() {
        let mut fifo = FifoTracker::new();
        fifo.record_insert("a");
        fifo.record_insert("b");
        fifo.record_insert("a");

        assert_eq!(fifo.len(), 2);
        assert_eq!(fifo.pop_oldest().as_deref(), Some("b"));
        assert_eq!(fifo.pop_oldest().as_deref(), Some("a"));
        assert!(fifo.pop_oldest().is_none());
    }

    #[test]
    fn test_remove_and_clear() {
        let mut fifo = FifoTracker::new();
        fifo.record_insert("a");
        fifo.record_insert("b");

        fifo.remove("a");
        fifo.remove("missing");
        assert_eq!(fifo.len(), 1);
        assert_eq!(fifo.pop_oldest().as_deref(), Some("b"));

        fifo.record_insert("c");
        fifo.clear();
        assert!(fifo.is_empty());
        assert!(fifo.pop_oldest().is_none());
    }

    #[test]
    fn test_stale_slots_are_compacted() {
        let mut fifo = FifoTracker::new();
        fifo.record_insert("keep");
        for _ in 0..10_000 {
            fifo.record_insert("churn");
            fifo.remove("churn");
        }

        assert_eq!(fifo.len(), 1);
        assert!(fifo.order.len() <= 2 * fifo.live.len() + 64);
        assert_eq!(fifo.pop_oldest().as_deref(), Some("keep"));
        assert!(fifo.pop_oldest().is_none());
    }
}
