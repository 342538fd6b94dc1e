//! Cache Statistics Module
//!
//! Tracks where reads were served from and how many writes went through.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time snapshot of cache counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Gets answered from the in-memory map
    pub memory_hits: u64,
    /// Gets that fell through to the store and found a row
    pub store_hits: u64,
    /// Gets that found nothing in either layer
    pub misses: u64,
    /// Successful puts
    pub writes: u64,
    /// Successful deletes
    pub deletes: u64,
    /// Entries currently held in memory
    pub entries: usize,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the hit rate across both layers.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no gets have completed.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.memory_hits + self.store_hits;
        let total = hits + self.misses;
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }
}

// == Stats Recorder ==
/// Lock-free counters; reads record under a shared lock.
#[derive(Debug, Default)]
pub(crate) struct StatsRecorder {
    memory_hits: AtomicU64,
    store_hits: AtomicU64,
    misses: AtomicU64,
    writes: AtomicU64,
    deletes: AtomicU64,
}

impl StatsRecorder {
    /// Increments the memory hit counter.
    pub fn record_memory_hit(&self) {
        self.memory_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Increments the store hit counter.
    pub fn record_store_hit(&self) {
        self.store_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Increments the miss counter.
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Increments the write counter.
    pub fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    /// Increments the delete counter.
    pub fn record_delete(&self) {
        self.deletes.fetch_add(1, Ordering::Relaxed);
    }

    /// Copies the counters into a [`CacheStats`] with `entries` in memory.
    pub fn snapshot(&self, entries: usize) -> CacheStats {
        CacheStats {
            memory_hits: self.memory_hits.load(Ordering::Relaxed),
            store_hits: self.store_hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
            entries,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate_no_requests() {
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_counts_both_layers() {
        let recorder = StatsRecorder::default();
        recorder.record_memory_hit();
        recorder.record_store_hit();
        recorder.record_miss();
        recorder.record_miss();

        let stats = recorder.snapshot(0);
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn test_snapshot() {
        let recorder = StatsRecorder::default();
        recorder.record_write();
        recorder.record_write();
        recorder.record_delete();

        let stats = recorder.snapshot(3);
        assert_eq!(stats.writes, 2);
        assert_eq!(stats.deletes, 1);
        assert_eq!(stats.entries, 3);
        assert_eq!(stats.misses, 0);
    }

    #[test]
    fn test_stats_serialize() {
        let stats = CacheStats {
            memory_hits: 4,
            entries: 2,
            ..CacheStats::default()
        };
        let json = serde_json::to_value(&stats).unwrap();

        assert_eq!(json["memory_hits"], 4);
        assert_eq!(json["entries"], 2);
        assert_eq!(json["store_hits"], 0);
    }
}
