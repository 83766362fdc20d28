//! Least Recently Used (LRU) Cache Implementation
//!
//! A fixed-capacity LRU cache built from two intrusive structures that share
//! one set of entries:
//!
//! - a **slot table** of `N` buckets, each heading a singly linked collision
//!   chain of the entries whose key hashes there, and
//! - a **recency list**, a doubly linked list over the same entries running
//!   from least recently used (head) to most recently used (tail).
//!
//! Entries live in an index-addressed arena owned by the slot table, so both
//! structures link by index and no unsafe code is involved.
//!
//! # Algorithm
//!
//! - `put` of a new key appends it at the tail. When the cache already holds
//!   `N` entries, the head is evicted first and its slot is reused for the
//!   new pair. The evicted pair is handed back to the caller.
//! - `get` on a hit moves the entry to the tail. This is the only promotion
//!   path unless [`UpdatePolicy::Promote`] is configured.
//! - The bucket count is fixed at `N`. Keys are never rehashed.
//!
//! # Performance Characteristics
//!
//! - Get/Put/Remove: O(1) expected, O(chain length) worst case
//! - Bulk purges and key snapshots: O(len)
//! - Memory: `N` bucket heads plus one arena slot per entry
//!
//! # Thread Safety
//!
//! [`LruCache`] is not synchronized. For shared access use
//! [`ConcurrentLruCache`](crate::ConcurrentLruCache), which guards the whole
//! structure with a single lock.

extern crate alloc;

use crate::config::{LruCacheConfig, RemovalPolicy, UpdatePolicy};
use crate::entry::Link;
use crate::list::{Indices, List};
use crate::metrics::{CacheMetrics, LruCacheMetrics};
use crate::table::SlotTable;
use crate::DefaultHashBuilder;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use core::num::NonZeroUsize;

/// Internal LRU segment containing the actual cache algorithm.
///
/// Shared between `LruCache` (single-threaded) and `ConcurrentLruCache`
/// (which wraps one segment in a mutex). All algorithm logic lives here.
pub(crate) struct LruSegment<K, V, S = DefaultHashBuilder> {
    config: LruCacheConfig,
    table: SlotTable<K, V>,
    list: List,
    hash_builder: S,
    metrics: LruCacheMetrics,
}

impl<K: Hash + Eq, V, S: BuildHasher> LruSegment<K, V, S> {
    pub(crate) fn init(config: LruCacheConfig, hash_builder: S) -> Self {
        LruSegment {
            config,
            table: SlotTable::new(config.capacity),
            list: List::new(),
            hash_builder,
            metrics: LruCacheMetrics::new(),
        }
    }

    #[inline]
    pub(crate) fn cap(&self) -> NonZeroUsize {
        self.config.capacity
    }

    #[inline]
    pub(crate) fn config(&self) -> &LruCacheConfig {
        &self.config
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.list.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.len() >= self.cap().get()
    }

    #[inline]
    pub(crate) fn metrics(&self) -> &LruCacheMetrics {
        &self.metrics
    }

    #[inline]
    fn bucket_for<Q>(&self, key: &Q) -> usize
    where
        Q: ?Sized + Hash,
    {
        self.table.bucket_index(self.hash_builder.hash_one(key))
    }

    fn lookup<Q>(&self, key: &Q) -> Link
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.find(self.bucket_for(key), key)
    }

    pub(crate) fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.touch(key).map(|idx| &self.table.entry(idx).value)
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let idx = self.touch(key)?;
        Some(&mut self.table.entry_mut(idx).value)
    }

    /// Looks a key up, promoting it on a hit and recording the outcome.
    fn touch<Q>(&mut self, key: &Q) -> Link
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.lookup(key) {
            Some(idx) => {
                self.list.move_to_back(&mut self.table, idx);
                self.metrics.core.record_hit();
                Some(idx)
            }
            None => {
                self.metrics.core.record_miss();
                None
            }
        }
    }

    pub(crate) fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.lookup(key).map(|idx| &self.table.entry(idx).value)
    }

    pub(crate) fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.lookup(key).is_some()
    }

    pub(crate) fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        let bucket = self.bucket_for(&key);

        if let Some(idx) = self.table.find(bucket, &key) {
            self.table.entry_mut(idx).value = value;
            if self.config.update_policy == UpdatePolicy::Promote {
                self.list.move_to_back(&mut self.table, idx);
            }
            self.metrics.core.record_update();
            return None;
        }

        if self.is_full() {
            if let Some(victim) = self.list.pop_front(&mut self.table) {
                self.table.unchain(victim);
                let evicted = self.table.recycle(victim, key, value, bucket);
                self.list.push_back(&mut self.table, victim);
                self.metrics.core.record_eviction();
                self.metrics.core.record_insertion();
                tracing::trace!(
                    target: "element_cache::lru",
                    slot = victim,
                    bucket = bucket,
                    "Evicted least recently used entry"
                );
                return Some(evicted);
            }
        }

        let idx = self.table.insert(key, value, bucket);
        self.list.push_back(&mut self.table, idx);
        self.metrics.core.record_insertion();
        None
    }

    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let idx = self.lookup(key)?;
        self.metrics.core.record_removal();
        Some(self.take(idx))
    }

    /// Deletes the entry in slot `idx` under the configured removal policy.
    pub(crate) fn take(&mut self, idx: usize) -> (K, V) {
        let sparse = self.sparse_reset_applies();
        let pair = self.unlink(idx);
        if sparse {
            self.reset();
        }
        pair
    }

    fn sparse_reset_applies(&self) -> bool {
        self.config.removal_policy == RemovalPolicy::ResetWhenSparse
            && !self.is_empty()
            && self.len() < 2
    }

    fn unlink(&mut self, idx: usize) -> (K, V) {
        self.list.detach(&mut self.table, idx);
        self.table.unchain(idx);
        self.table.release(idx)
    }

    fn reset(&mut self) {
        tracing::debug!(
            target: "element_cache::lru",
            previous_len = self.len(),
            "Sparse removal reset the cache"
        );
        self.wipe();
    }

    fn wipe(&mut self) {
        self.table.clear();
        self.list.clear();
        self.metrics.record_reset();
    }

    pub(crate) fn clear(&mut self) {
        tracing::debug!(
            target: "element_cache::lru",
            previous_len = self.len(),
            "Cache cleared"
        );
        self.wipe();
    }

    /// Slot indices from least to most recently used.
    pub(crate) fn indices(&self) -> Indices<'_, K, V> {
        self.list.indices(&self.table)
    }

    #[inline]
    pub(crate) fn head(&self) -> Link {
        self.list.head()
    }

    /// Next entry towards the most recently used end.
    #[inline]
    pub(crate) fn successor(&self, idx: usize) -> Link {
        self.table.entry(idx).next
    }

    pub(crate) fn slot(&self, idx: usize) -> (&K, &V) {
        let entry = self.table.entry(idx);
        (&entry.key, &entry.value)
    }

    pub(crate) fn record_purge(&mut self, count: usize) {
        self.metrics.record_purge(count);
    }

    pub(crate) fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.indices().map(|idx| self.slot(idx).0.clone()).collect()
    }

    /// Checks that the bucket chains and the recency list describe the same
    /// live entry set and that every structural invariant holds.
    ///
    /// # Panics
    ///
    /// Panics describing the first violated invariant.
    pub(crate) fn validate_invariants(&self) {
        let cap = self.cap().get();
        assert!(self.len() <= cap, "len {} exceeds capacity {cap}", self.len());
        assert_eq!(self.table.bucket_count(), cap, "bucket count changed");
        assert_eq!(
            self.table.occupied(),
            self.len(),
            "arena and recency list disagree on size"
        );

        // Recency list: forward walk with consistent back links
        let mut prev: Link = None;
        let mut walked = 0;
        for idx in self.indices() {
            let entry = self.table.entry(idx);
            assert_eq!(entry.prev, prev, "broken prev link at slot {idx}");
            prev = Some(idx);
            walked += 1;
            assert!(walked <= self.len(), "recency list has a cycle");
        }
        assert_eq!(walked, self.len(), "recency list length mismatch");
        assert_eq!(self.list.tail(), prev, "tail sentinel is stale");
        if let Some(head) = self.list.head() {
            assert!(self.table.entry(head).prev.is_none());
        }

        // Bucket chains: every entry sits in the bucket its key hashes to
        let mut chained = 0;
        for bucket in 0..self.table.bucket_count() {
            let mut cursor = self.table.bucket_head(bucket);
            while let Some(idx) = cursor {
                let entry = self.table.entry(idx);
                assert_eq!(entry.bucket, bucket, "slot {idx} chained in wrong bucket");
                assert_eq!(
                    self.bucket_for(&entry.key),
                    bucket,
                    "slot {idx} does not hash to its bucket"
                );
                chained += 1;
                assert!(chained <= self.len(), "bucket chains hold unlisted entries");
                cursor = entry.chain_next;
            }
        }
        assert_eq!(chained, self.len(), "some listed entries are not chained");
    }
}

impl<K, V, S> core::fmt::Debug for LruSegment<K, V, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LruSegment")
            .field("capacity", &self.config.capacity)
            .field("len", &self.list.len())
            .finish()
    }
}

/// A fixed-capacity Least Recently Used (LRU) cache.
///
/// Backed by a slot table with one bucket per slot and an intrusive recency
/// list. When the cache is full, inserting a new key evicts the least
/// recently used entry and returns it.
///
/// # Examples
///
/// ```
/// use element_cache::LruCache;
/// use core::num::NonZeroUsize;
///
/// let mut cache = LruCache::new(NonZeroUsize::new(2).unwrap());
///
/// cache.put("A", 1);
/// cache.put("B", 2);
///
/// // A third key evicts the least recently used one
/// assert_eq!(cache.put("C", 3), Some(("A", 1)));
/// assert_eq!(cache.get(&"A"), None);
///
/// // Reading B makes C the next victim
/// assert_eq!(cache.get(&"B"), Some(&2));
/// assert_eq!(cache.put("D", 4), Some(("C", 3)));
/// assert_eq!(cache.keys(), vec!["B", "D"]);
/// ```
#[derive(Debug)]
pub struct LruCache<K, V, S = DefaultHashBuilder> {
    segment: LruSegment<K, V, S>,
}

impl<K: Hash + Eq, V> LruCache<K, V> {
    /// Creates a cache with `cap` slots and default policies.
    pub fn new(cap: NonZeroUsize) -> Self {
        LruCache::init(LruCacheConfig::new(cap), None)
    }

    /// Creates a cache from a configuration with an optional hasher.
    ///
    /// # Examples
    ///
    /// ```
    /// use element_cache::config::{LruCacheConfig, UpdatePolicy};
    /// use element_cache::LruCache;
    /// use core::num::NonZeroUsize;
    ///
    /// let config = LruCacheConfig::new(NonZeroUsize::new(100).unwrap())
    ///     .with_update_policy(UpdatePolicy::Promote);
    /// let cache: LruCache<String, u32> = LruCache::init(config, None);
    /// assert!(cache.is_empty());
    /// ```
    pub fn init(config: LruCacheConfig, hasher: Option<DefaultHashBuilder>) -> Self {
        LruCache {
            segment: LruSegment::init(config, hasher.unwrap_or_default()),
        }
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> LruCache<K, V, S> {
    /// Creates a cache with `cap` slots and a custom hash builder.
    pub fn with_hasher(cap: NonZeroUsize, hash_builder: S) -> Self {
        LruCache::init_with_hasher(LruCacheConfig::new(cap), hash_builder)
    }

    /// Creates a cache from a configuration and a custom hash builder.
    pub fn init_with_hasher(config: LruCacheConfig, hash_builder: S) -> Self {
        LruCache {
            segment: LruSegment::init(config, hash_builder),
        }
    }

    /// The fixed number of slots.
    #[inline]
    pub fn cap(&self) -> NonZeroUsize {
        self.segment.cap()
    }

    /// The configuration the cache was built with.
    #[inline]
    pub fn config(&self) -> &LruCacheConfig {
        self.segment.config()
    }

    /// Number of cached entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.segment.len()
    }

    /// Returns `true` if nothing is cached.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segment.is_empty()
    }

    /// Returns `true` if every slot is in use, so the next new key evicts.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.segment.is_full()
    }

    /// Returns the value for `key`, making it the most recently used entry.
    #[inline]
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.get(key)
    }

    /// Mutable variant of [`get`](Self::get). Also promotes the entry.
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.get_mut(key)
    }

    /// Returns the value for `key` without touching its recency.
    #[inline]
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.peek(key)
    }

    /// Returns `true` if `key` is cached. Does not promote.
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.contains_key(key)
    }

    /// Inserts or overwrites `key`.
    ///
    /// Returns the pair evicted to make room, if any. Overwriting a cached
    /// key never evicts and never changes the length.
    #[inline]
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        self.segment.put(key, value)
    }

    /// Removes `key`, returning its value.
    ///
    /// Removing an absent key is a no-op. Under
    /// [`RemovalPolicy::ResetWhenSparse`], removing the sole cached entry
    /// resets the whole cache instead of unlinking it.
    #[inline]
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.remove(key).map(|(_, value)| value)
    }

    /// Removes `key`, returning the stored key and value.
    #[inline]
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.remove(key)
    }

    /// Drops every entry.
    #[inline]
    pub fn clear(&mut self) {
        self.segment.clear()
    }

    /// Snapshot of every cached key, least recently used first.
    pub fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.segment.keys()
    }

    /// Iterates over entries from least to most recently used without
    /// promoting them.
    pub fn iter(&self) -> Iter<'_, K, V, S> {
        Iter {
            segment: &self.segment,
            indices: self.segment.indices(),
        }
    }

    pub(crate) fn segment_mut(&mut self) -> &mut LruSegment<K, V, S> {
        &mut self.segment
    }

    #[doc(hidden)]
    pub fn debug_validate_invariants(&self) {
        self.segment.validate_invariants();
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> CacheMetrics for LruCache<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.metrics().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        self.segment.metrics().algorithm_name()
    }
}

/// Borrowing iterator over an [`LruCache`], least recently used first.
pub struct Iter<'a, K, V, S = DefaultHashBuilder> {
    segment: &'a LruSegment<K, V, S>,
    indices: Indices<'a, K, V>,
}

impl<'a, K: Hash + Eq, V, S: BuildHasher> Iterator for Iter<'a, K, V, S> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.indices.next()?;
        Some(self.segment.slot(idx))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> ExactSizeIterator for Iter<'_, K, V, S> {}

impl<K, V, S> core::fmt::Debug for Iter<'_, K, V, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Iter")
            .field("remaining", &self.indices.size_hint().0)
            .finish()
    }
}

impl<'a, K: Hash + Eq, V, S: BuildHasher> IntoIterator for &'a LruCache<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
