//! Store Statistics
//!
//! Lookup outcomes and entry churn, snapshotted for the stats endpoint.

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    /// Absent keys plus keys found dead
    pub misses: u64,
    pub expirations: u64,
    pub evictions: u64,
    pub total_entries: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of lookups that found a live value, 0.0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        match self.lookups() {
            0 => 0.0,
            lookups => self.hits as f64 / lookups as f64,
        }
    }

    pub fn record_lookup(&mut self, found: bool) {
        if found {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Copy of these counters with `total_entries` set to `entries`.
    pub fn snapshot(&self, entries: usize) -> Self {
        Self {
            total_entries: entries,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stats() {
        let stats = CacheStats::new();
        assert_eq!(stats.lookups(), 0);
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_lookups_feed_hit_rate() {
        let mut stats = CacheStats::new();
        for found in [true, true, false, true] {
            stats.record_lookup(found);
        }

        assert_eq!(stats.hits, 3);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_churn_counters() {
        let mut stats = CacheStats::new();
        stats.record_expirations(3);
        stats.record_expirations(0);
        stats.record_eviction();

        assert_eq!(stats.expirations, 3);
        assert_eq!(stats.evictions, 1);
    }

    #[test]
    fn test_snapshot_sets_entry_count() {
        let mut stats = CacheStats::new();
        stats.record_lookup(true);

        let snapshot = stats.snapshot(42);
        assert_eq!(snapshot.total_entries, 42);
        assert_eq!(snapshot.hits, 1);
        assert_eq!(stats.total_entries, 0);
    }
}
