//! Caching of single-value log statistics.
//!
//! Uses moka for thread-safe concurrent caching. Entries are invalidated
//! explicitly by the owning [`Run`](super::Run) — per log when a property
//! changes, wholesale when the TimeROI is replaced — never by TTL.

use std::sync::atomic::{AtomicU64, Ordering};

use moka::sync::Cache;

use super::statistics::Statistic;

const DEFAULT_MAX_ENTRIES: u64 = 10_000;

/// Cache key: one statistic of one named log.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct StatKey {
    name: String,
    statistic: Statistic,
}

/// Statistics cache with targeted and global invalidation.
pub struct StatisticsCache {
    cache: Cache<StatKey, f64>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl StatisticsCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }

    pub fn with_capacity(max_entries: u64) -> Self {
        Self {
            cache: Cache::builder().max_capacity(max_entries).build(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Get a cached statistic value.
    pub fn get(&self, name: &str, statistic: Statistic) -> Option<f64> {
        let key = StatKey {
            name: name.to_string(),
            statistic,
        };
        if let Some(value) = self.cache.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            Some(value)
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            None
        }
    }

    /// Store a computed statistic value.
    pub fn put(&self, name: &str, statistic: Statistic, value: f64) {
        let key = StatKey {
            name: name.to_string(),
            statistic,
        };
        self.cache.insert(key, value);
    }

    /// Purge every entry for one log. The statistic set is fixed, so this is
    /// a bounded sweep rather than a scan of the whole cache.
    pub fn invalidate_log(&self, name: &str) {
        for statistic in Statistic::ALL {
            self.cache.invalidate(&StatKey {
                name: name.to_string(),
                statistic,
            });
        }
    }

    /// Drop every cached value.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;

        CacheStats {
            hits,
            misses,
            hit_rate: if total > 0 {
                hits as f64 / total as f64
            } else {
                0.0
            },
            entry_count: self.cache.entry_count(),
        }
    }
}

impl Default for StatisticsCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Hit rate (0.0 - 1.0)
    pub hit_rate: f64,
    /// Number of entries in cache
    pub entry_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_put_get() {
        let cache = StatisticsCache::new();
        cache.put("temperature", Statistic::Mean, 293.4);

        assert_eq!(cache.get("temperature", Statistic::Mean), Some(293.4));
        assert_eq!(cache.get("temperature", Statistic::Maximum), None);
        assert_eq!(cache.get("pressure", Statistic::Mean), None);
    }

    #[test]
    fn test_invalidate_log_sweeps_every_statistic() {
        let cache = StatisticsCache::new();
        for statistic in Statistic::ALL {
            cache.put("temperature", statistic, 1.0);
        }
        cache.put("pressure", Statistic::Mean, 2.0);

        cache.invalidate_log("temperature");

        for statistic in Statistic::ALL {
            assert_eq!(cache.get("temperature", statistic), None);
        }
        assert_eq!(cache.get("pressure", Statistic::Mean), Some(2.0));
    }

    #[test]
    fn test_invalidate_all() {
        let cache = StatisticsCache::new();
        cache.put("a", Statistic::Mean, 1.0);
        cache.put("b", Statistic::Median, 2.0);

        cache.invalidate_all();

        assert_eq!(cache.get("a", Statistic::Mean), None);
        assert_eq!(cache.get("b", Statistic::Median), None);
    }

    #[test]
    fn test_cache_stats() {
        let cache = StatisticsCache::new();
        cache.put("a", Statistic::Mean, 1.0);

        let _ = cache.get("a", Statistic::Mean); // hit
        let _ = cache.get("a", Statistic::Median); // miss

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate - 0.5).abs() < 0.01);
    }
}
