//! Predicate-Based Bulk Eviction
//!
//! Bulk purges walk the recency list from least to most recently used, test
//! every entry against a predicate and delete the matches. Each deletion
//! unlinks the entry from both its bucket chain and the recency list under
//! the same removal policy as [`LruCache::remove`]. The evicted pairs are
//! returned in walk order so callers (typically a publish handler) can act on
//! exactly what was purged.
//!
//! The four named deletions are thin call sites over
//! [`LruCache::purge_where`]:
//!
//! | Operation | Matches | Stops early |
//! |-----------|---------|-------------|
//! | [`delete_by_template`](LruCache::delete_by_template) | `value.template_name() == name` | no |
//! | [`delete_by_class`](LruCache::delete_by_class) | `value.class_name() == name` | no |
//! | [`delete_by_uri`](LruCache::delete_by_uri) | `key.uri() == uri` | after the first match |
//! | [`delete_stale_after_publish`](LruCache::delete_stale_after_publish) | `value.renew_on_publish()` | no |
//!
//! An element without cache directives is treated as "always renew" and is
//! purged by `delete_stale_after_publish`.

extern crate alloc;

use crate::element::{ElementValue, UriKey};
use crate::lru::{LruCache, LruSegment};
use alloc::vec::Vec;
use core::hash::{BuildHasher, Hash};

/// Stop condition for a purge walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Sweep {
    All,
    FirstMatch,
}

impl<K: Hash + Eq, V, S: BuildHasher> LruSegment<K, V, S> {
    /// Deletes every entry matching `pred`, walking from the LRU end.
    pub(crate) fn purge<F>(&mut self, label: &'static str, sweep: Sweep, mut pred: F) -> Vec<(K, V)>
    where
        F: FnMut(&K, &V) -> bool,
    {
        let mut evicted = Vec::new();
        let mut cursor = self.head();

        while let Some(idx) = cursor {
            // Read the successor first: deleting `idx` rewires its links.
            let next = self.successor(idx);
            let matched = {
                let (key, value) = self.slot(idx);
                pred(key, value)
            };
            if !matched {
                cursor = next;
                continue;
            }

            evicted.push(self.take(idx));
            // A sparse reset may have dropped the rest of the cache.
            if sweep == Sweep::FirstMatch || self.is_empty() {
                break;
            }
            cursor = next;
        }

        self.record_purge(evicted.len());
        tracing::debug!(
            target: "element_cache::purge",
            predicate = label,
            evicted = evicted.len(),
            remaining = self.len(),
            "Bulk purge finished"
        );
        evicted
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> LruCache<K, V, S> {
    /// Deletes every entry for which `pred(key, value)` is `true`.
    ///
    /// Entries are visited from least to most recently used and nothing is
    /// promoted. Returns the evicted pairs in visit order.
    ///
    /// # Examples
    ///
    /// ```
    /// use element_cache::LruCache;
    /// use core::num::NonZeroUsize;
    ///
    /// let mut cache = LruCache::new(NonZeroUsize::new(4).unwrap());
    /// for i in 0..4 {
    ///     cache.put(i, i * 10);
    /// }
    /// let evicted = cache.purge_where(|_, v| v % 20 == 0);
    /// assert_eq!(evicted, vec![(0, 0), (2, 20)]);
    /// assert_eq!(cache.keys(), vec![1, 3]);
    /// ```
    pub fn purge_where<F>(&mut self, pred: F) -> Vec<(K, V)>
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.segment_mut().purge("custom", Sweep::All, pred)
    }

    /// Deletes every element rendered by template `name`.
    pub fn delete_by_template(&mut self, name: &str) -> Vec<(K, V)>
    where
        V: ElementValue,
    {
        self.segment_mut()
            .purge("template", Sweep::All, |_, value| value.template_name() == name)
    }

    /// Deletes every element rendered for class `name`.
    pub fn delete_by_class(&mut self, name: &str) -> Vec<(K, V)>
    where
        V: ElementValue,
    {
        self.segment_mut()
            .purge("class", Sweep::All, |_, value| value.class_name() == name)
    }

    /// Deletes the entry keyed by `uri`.
    ///
    /// URIs are unique keys, so the walk stops at the first match.
    pub fn delete_by_uri(&mut self, uri: &str) -> Vec<(K, V)>
    where
        K: UriKey,
    {
        self.segment_mut()
            .purge("uri", Sweep::FirstMatch, |key, _| key.uri() == uri)
    }

    /// Deletes every element that a publish invalidates.
    ///
    /// Elements without cache directives are always deleted.
    pub fn delete_stale_after_publish(&mut self) -> Vec<(K, V)>
    where
        V: ElementValue,
    {
        self.segment_mut()
            .purge("renew_on_publish", Sweep::All, |_, value| value.renew_on_publish())
    }
}
