//! LRU Cache Metrics
//!
//! Metrics specific to the slot-table LRU cache: on top of the core
//! counters it tracks bulk purges and whole-cache resets.

extern crate alloc;

use super::{CacheMetrics, CoreCacheMetrics};
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// LRU-specific metrics (extends CoreCacheMetrics).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LruCacheMetrics {
    /// Core metrics common to all cache algorithms.
    pub core: CoreCacheMetrics,

    /// Number of bulk purge passes run.
    pub purge_passes: u64,

    /// Entries removed by bulk purges.
    pub purged: u64,

    /// Whole-cache resets, from `clear` or a sparse removal.
    pub resets: u64,
}

impl LruCacheMetrics {
    /// Creates zeroed metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one purge pass that removed `count` entries.
    pub fn record_purge(&mut self, count: usize) {
        self.purge_passes += 1;
        self.purged += count as u64;
    }

    /// Records a whole-cache reset.
    pub fn record_reset(&mut self) {
        self.resets += 1;
    }

    /// Converts the metrics to a map with a stable key order.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = self.core.to_btreemap();
        metrics.insert("purge_passes".to_string(), self.purge_passes as f64);
        metrics.insert("purged".to_string(), self.purged as f64);
        metrics.insert("resets".to_string(), self.resets as f64);
        metrics
    }
}

impl CacheMetrics for LruCacheMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "LRU"
    }
}
