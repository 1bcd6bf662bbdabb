//! Paginator Statistics Module
//!
//! Tracks how often pages are served from fresh versus stale cache data.

use serde::Serialize;

// == Paginator Stats ==
/// Tracks paginator cache effectiveness.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PaginatorStats {
    /// Pages served while the cache was valid
    pub hits: u64,
    /// Pages requested while the cache was stale or empty
    pub misses: u64,
    /// Non-empty datasets loaded into the cache
    pub refreshes: u64,
    /// Explicit invalidations
    pub invalidations: u64,
    /// Entities currently held
    pub cached_entries: usize,
}

impl PaginatorStats {
    // == Constructor ==
    /// Creates a new PaginatorStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no pages have been requested.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_refresh(&mut self) {
        self.refreshes += 1;
    }

    pub fn record_invalidation(&mut self) {
        self.invalidations += 1;
    }

    pub fn set_cached_entries(&mut self, count: usize) {
        self.cached_entries = count;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = PaginatorStats::new();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.refreshes, 0);
        assert_eq!(stats.invalidations, 0);
        assert_eq!(stats.cached_entries, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        assert_eq!(PaginatorStats::new().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = PaginatorStats::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_record_refresh_and_invalidation() {
        let mut stats = PaginatorStats::new();
        stats.record_refresh();
        stats.record_invalidation();
        stats.record_invalidation();
        stats.set_cached_entries(12);

        assert_eq!(stats.refreshes, 1);
        assert_eq!(stats.invalidations, 2);
        assert_eq!(stats.cached_entries, 12);
    }
}
