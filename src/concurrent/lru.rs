//! Concurrent LRU Cache Implementation
//!
//! The thread-safe counterpart to [`LruCache`](crate::LruCache). One
//! `parking_lot::Mutex` guards one LRU segment, so the recency order is
//! global and every operation is linearizable.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │              ConcurrentLruCache              │
//! │                                              │
//! │   ┌──────────────────────────────────────┐   │
//! │   │                Mutex                 │   │
//! │   │   ┌──────────────┬───────────────┐   │   │
//! │   │   │  slot table  │ recency list  │   │   │
//! │   │   │  (N buckets) │  LRU ... MRU  │   │   │
//! │   │   └──────────────┴───────────────┘   │   │
//! │   └──────────────────────────────────────┘   │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! # Thread Safety
//!
//! `ConcurrentLruCache` is `Send + Sync` whenever its keys, values and hasher
//! are `Send`, and is meant to be shared through `Arc`.
//!
//! # Example
//!
//! ```rust
//! use element_cache::ConcurrentLruCache;
//! use core::num::NonZeroUsize;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let cache = Arc::new(ConcurrentLruCache::new(NonZeroUsize::new(10_000).unwrap()));
//!
//! let handles: Vec<_> = (0..4).map(|i| {
//!     let cache = Arc::clone(&cache);
//!     thread::spawn(move || {
//!         for j in 0..1000 {
//!             cache.put(format!("key-{}-{}", i, j), j);
//!         }
//!     })
//! }).collect();
//!
//! for h in handles {
//!     h.join().unwrap();
//! }
//!
//! assert_eq!(cache.len(), 4000);
//! ```

extern crate alloc;

use crate::config::LruCacheConfig;
use crate::element::{ElementValue, UriKey};
use crate::lru::LruSegment;
use crate::metrics::CacheMetrics;
use crate::purge::Sweep;
use crate::DefaultHashBuilder;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use core::num::NonZeroUsize;
use parking_lot::Mutex;

/// A thread-safe LRU cache guarded by a single lock.
///
/// # Type Parameters
///
/// - `K`: Key type. Must implement `Hash + Eq`.
/// - `V`: Value type. [`get`](Self::get) additionally needs `V: Clone`.
/// - `S`: Hash builder type. Defaults to `DefaultHashBuilder`.
///
/// # Example
///
/// ```rust
/// use element_cache::ConcurrentLruCache;
/// use core::num::NonZeroUsize;
///
/// let cache = ConcurrentLruCache::new(NonZeroUsize::new(1000).unwrap());
/// cache.put("key".to_string(), 42);
/// assert_eq!(cache.get("key"), Some(42));
/// ```
pub struct ConcurrentLruCache<K, V, S = DefaultHashBuilder> {
    inner: Mutex<LruSegment<K, V, S>>,
}

impl<K: Hash + Eq, V> ConcurrentLruCache<K, V, DefaultHashBuilder> {
    /// Creates a concurrent cache with `cap` slots and default policies.
    pub fn new(cap: NonZeroUsize) -> Self {
        ConcurrentLruCache::init(LruCacheConfig::new(cap), None)
    }

    /// Creates a concurrent cache from a configuration with an optional
    /// hasher.
    ///
    /// This is the **recommended** way to create a concurrent cache.
    ///
    /// # Example
    ///
    /// ```rust
    /// use element_cache::config::{LruCacheConfig, RemovalPolicy};
    /// use element_cache::ConcurrentLruCache;
    ///
    /// let config = LruCacheConfig::try_from_capacity(256)
    ///     .unwrap()
    ///     .with_removal_policy(RemovalPolicy::Precise);
    /// let cache: ConcurrentLruCache<String, Vec<u8>> = ConcurrentLruCache::init(config, None);
    /// assert_eq!(cache.cap().get(), 256);
    /// ```
    pub fn init(config: LruCacheConfig, hasher: Option<DefaultHashBuilder>) -> Self {
        ConcurrentLruCache::init_with_hasher(config, hasher.unwrap_or_default())
    }
}

impl<K, V, S> ConcurrentLruCache<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Creates a concurrent cache with `cap` slots and a custom hash builder.
    pub fn with_hasher(cap: NonZeroUsize, hash_builder: S) -> Self {
        ConcurrentLruCache::init_with_hasher(LruCacheConfig::new(cap), hash_builder)
    }

    /// Creates a concurrent cache from a configuration and a custom hash
    /// builder.
    ///
    /// Use this for deterministic hashing or DoS-resistant hashers.
    pub fn init_with_hasher(config: LruCacheConfig, hash_builder: S) -> Self {
        ConcurrentLruCache {
            inner: Mutex::new(LruSegment::init(config, hash_builder)),
        }
    }

    /// Returns the fixed number of slots.
    pub fn cap(&self) -> NonZeroUsize {
        self.inner.lock().cap()
    }

    /// Returns the configuration the cache was built with.
    pub fn config(&self) -> LruCacheConfig {
        *self.inner.lock().config()
    }

    /// Returns the number of cached entries.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns `true` if the cache contains no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Returns `true` if every slot is in use.
    pub fn is_full(&self) -> bool {
        self.inner.lock().is_full()
    }

    /// Retrieves a value from the cache.
    ///
    /// Returns a **clone** of the value so the lock is not held by the
    /// caller. For operations that don't need ownership, use
    /// [`get_with()`](Self::get_with) instead.
    ///
    /// If the key exists, it becomes the most recently used entry.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    /// Retrieves a value and applies a function to it while holding the lock.
    ///
    /// The entry is promoted. The lock is released after `f` returns.
    ///
    /// # Example
    ///
    /// ```rust
    /// use element_cache::ConcurrentLruCache;
    /// use core::num::NonZeroUsize;
    ///
    /// let cache = ConcurrentLruCache::new(NonZeroUsize::new(8).unwrap());
    /// cache.put("greeting", String::from("hello world"));
    /// assert_eq!(cache.get_with(&"greeting", |v| v.len()), Some(11));
    /// ```
    pub fn get_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&V) -> R,
    {
        self.inner.lock().get(key).map(f)
    }

    /// Retrieves a mutable reference and applies a function to it.
    ///
    /// Allows in-place modification of cached values without removing them.
    pub fn get_mut_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&mut V) -> R,
    {
        self.inner.lock().get_mut(key).map(f)
    }

    /// Returns a clone of the value for `key` without promoting it.
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        self.inner.lock().peek(key).cloned()
    }

    /// Checks if the cache contains a key. Does not promote.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.inner.lock().contains_key(key)
    }

    /// Inserts or overwrites a key.
    ///
    /// # Returns
    ///
    /// - `Some((old_key, old_value))` if a new key forced an eviction
    /// - `None` otherwise, including when an existing key was overwritten
    pub fn put(&self, key: K, value: V) -> Option<(K, V)> {
        self.inner.lock().put(key, value)
    }

    /// Removes a key from the cache.
    ///
    /// # Returns
    ///
    /// - `Some(value)` if the key existed
    /// - `None` if the key was not found
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.inner.lock().remove(key).map(|(_, value)| value)
    }

    /// Removes all entries.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Snapshot of every cached key, least recently used first.
    pub fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.inner.lock().keys()
    }

    /// Deletes every entry for which `pred(key, value)` is `true`, atomically.
    pub fn purge_where<F>(&self, pred: F) -> Vec<(K, V)>
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.inner.lock().purge("custom", Sweep::All, pred)
    }

    /// Deletes every element rendered by template `name`.
    pub fn delete_by_template(&self, name: &str) -> Vec<(K, V)>
    where
        V: ElementValue,
    {
        self.inner
            .lock()
            .purge("template", Sweep::All, |_, value| value.template_name() == name)
    }

    /// Deletes every element rendered for class `name`.
    pub fn delete_by_class(&self, name: &str) -> Vec<(K, V)>
    where
        V: ElementValue,
    {
        self.inner
            .lock()
            .purge("class", Sweep::All, |_, value| value.class_name() == name)
    }

    /// Deletes the entry keyed by `uri`, stopping at the first match.
    pub fn delete_by_uri(&self, uri: &str) -> Vec<(K, V)>
    where
        K: UriKey,
    {
        self.inner
            .lock()
            .purge("uri", Sweep::FirstMatch, |key, _| key.uri() == uri)
    }

    /// Deletes every element that a publish invalidates. Elements without
    /// cache directives are always deleted.
    pub fn delete_stale_after_publish(&self) -> Vec<(K, V)>
    where
        V: ElementValue,
    {
        self.inner
            .lock()
            .purge("renew_on_publish", Sweep::All, |_, value| value.renew_on_publish())
    }

    #[doc(hidden)]
    pub fn debug_validate_invariants(&self) {
        self.inner.lock().validate_invariants();
    }
}

impl<K, V, S> CacheMetrics for ConcurrentLruCache<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.inner.lock().metrics().to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "ConcurrentLRU"
    }
}

impl<K, V, S> core::fmt::Debug for ConcurrentLruCache<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("ConcurrentLruCache")
            .field("capacity", &inner.cap())
            .field("len", &inner.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RemovalPolicy, UpdatePolicy};
    use crate::element::UriRef;

    extern crate std;
    use std::string::ToString;
    use std::sync::Arc;
    use std::thread;
    use std::vec;
    use std::vec::Vec;

    fn make_cache<K: Hash + Eq, V>(capacity: usize) -> ConcurrentLruCache<K, V> {
        ConcurrentLruCache::init(
            LruCacheConfig::new(NonZeroUsize::new(capacity).unwrap()),
            None,
        )
    }

    #[test]
    fn test_basic_operations() {
        let cache: ConcurrentLruCache<String, i32> = make_cache(100);

        assert!(cache.is_empty());
        assert_eq!(cache.len(), 0);

        cache.put("a".to_string(), 1);
        cache.put("b".to_string(), 2);
        cache.put("c".to_string(), 3);

        assert_eq!(cache.len(), 3);
        assert!(!cache.is_empty());

        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.get("b"), Some(2));
        assert_eq!(cache.get("c"), Some(3));
        assert_eq!(cache.get("d"), None);
    }

    #[test]
    fn test_cap_matches_single_threaded_cache() {
        let cap = NonZeroUsize::new(7).unwrap();
        let shared: ConcurrentLruCache<u32, u32> = ConcurrentLruCache::new(cap);
        let local: crate::LruCache<u32, u32> = crate::LruCache::new(cap);
        assert_eq!(shared.cap(), local.cap());
        assert_eq!(shared.cap(), shared.config().capacity);

        for i in 0..20 {
            shared.put(i, i);
        }
        assert_eq!(shared.len(), shared.cap().get());
    }

    #[test]
    fn test_global_eviction_order() {
        let cache = make_cache(2);
        cache.put("a", 1);
        cache.put("b", 2);
        assert_eq!(cache.get(&"a"), Some(1));
        assert_eq!(cache.put("c", 3), Some(("b", 2)));
        assert_eq!(cache.keys(), vec!["a", "c"]);
        assert!(cache.is_full());
    }

    #[test]
    fn test_get_with() {
        let cache: ConcurrentLruCache<String, String> = make_cache(100);

        cache.put("key".to_string(), "hello world".to_string());

        let len = cache.get_with("key", |v: &String| v.len());
        assert_eq!(len, Some(11));

        let missing = cache.get_with("missing", |v: &String| v.len());
        assert_eq!(missing, None);
    }

    #[test]
    fn test_get_mut_with() {
        let cache: ConcurrentLruCache<String, i32> = make_cache(100);

        cache.put("counter".to_string(), 0);

        cache.get_mut_with("counter", |v: &mut i32| *v += 1);
        cache.get_mut_with("counter", |v: &mut i32| *v += 1);

        assert_eq!(cache.get("counter"), Some(2));
    }

    #[test]
    fn test_peek_and_contains_do_not_promote() {
        let cache = make_cache(2);
        cache.put("a", 1);
        cache.put("b", 2);
        assert_eq!(cache.peek(&"a"), Some(1));
        assert!(cache.contains_key(&"a"));
        assert_eq!(cache.put("c", 3), Some(("a", 1)));
    }

    #[test]
    fn test_remove() {
        let cache: ConcurrentLruCache<String, i32> = make_cache(100);

        cache.put("a".to_string(), 1);
        cache.put("b".to_string(), 2);

        assert_eq!(cache.remove("a"), Some(1));
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.len(), 1);

        assert_eq!(cache.remove("nonexistent"), None);
    }

    #[test]
    fn test_clear() {
        let cache: ConcurrentLruCache<String, i32> = make_cache(100);

        cache.put("a".to_string(), 1);
        cache.put("b".to_string(), 2);
        cache.put("c".to_string(), 3);

        assert_eq!(cache.len(), 3);
        cache.clear();
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_policies_pass_through() {
        let config = LruCacheConfig::new(NonZeroUsize::new(3).unwrap())
            .with_update_policy(UpdatePolicy::Promote)
            .with_removal_policy(RemovalPolicy::ResetWhenSparse);
        let cache: ConcurrentLruCache<&str, i32> = ConcurrentLruCache::init(config, None);
        assert_eq!(cache.config(), config);

        cache.put("a", 1);
        cache.put("b", 2);
        cache.put("a", 3);
        assert_eq!(cache.keys(), vec!["b", "a"]);

        cache.remove(&"b");
        assert_eq!(cache.remove(&"zzz"), None);
        assert_eq!(cache.keys(), vec!["a"]);
        assert_eq!(cache.remove(&"a"), Some(3));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_delete_by_uri() {
        let cache: ConcurrentLruCache<UriRef, u32> = make_cache(8);
        cache.put(UriRef::from("/home"), 1);
        cache.put(UriRef::from("/about"), 2);

        let evicted = cache.delete_by_uri("/home");
        assert_eq!(evicted, vec![(UriRef::from("/home"), 1)]);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_metrics() {
        let cache = make_cache(2);
        cache.put(1, 1);
        cache.put(2, 2);
        cache.put(3, 3);
        let _ = cache.get(&3);
        let _ = cache.get(&1);
        cache.purge_where(|_, v| *v == 2);

        let metrics = cache.metrics();
        assert_eq!(metrics.get("evictions"), Some(&1.0));
        assert_eq!(metrics.get("cache_hits"), Some(&1.0));
        assert_eq!(metrics.get("cache_misses"), Some(&1.0));
        assert_eq!(metrics.get("purged"), Some(&1.0));
        assert_eq!(cache.algorithm_name(), "ConcurrentLRU");
    }

    #[test]
    fn test_concurrent_access() {
        let cache: Arc<ConcurrentLruCache<String, usize>> = Arc::new(make_cache(1000));
        let num_threads = 8;
        let ops_per_thread = 1000;

        let mut handles: Vec<std::thread::JoinHandle<()>> = Vec::new();

        for t in 0..num_threads {
            let cache = Arc::clone(&cache);
            handles.push(thread::spawn(move || {
                for i in 0..ops_per_thread {
                    let key = std::format!("thread_{}_key_{}", t, i);
                    cache.put(key.clone(), t * 1000 + i);
                    let _ = cache.get(&key);
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 1000);
        cache.debug_validate_invariants();
    }

    #[test]
    fn test_concurrent_mixed_operations() {
        let cache: Arc<ConcurrentLruCache<String, i32>> = Arc::new(make_cache(100));
        let num_threads = 8;
        let ops_per_thread = 500;

        let mut handles: Vec<std::thread::JoinHandle<()>> = Vec::new();

        for t in 0..num_threads {
            let cache = Arc::clone(&cache);
            handles.push(thread::spawn(move || {
                for i in 0..ops_per_thread {
                    let key = std::format!("key_{}", i % 200);

                    match i % 5 {
                        0 => {
                            cache.put(key, i);
                        }
                        1 => {
                            let _ = cache.get(&key);
                        }
                        2 => {
                            cache.get_mut_with(&key, |v: &mut i32| *v += 1);
                        }
                        3 => {
                            let _ = cache.remove(&key);
                        }
                        4 => {
                            cache.purge_where(|_, v| *v % 7 == 0);
                        }
                        _ => unreachable!(),
                    }

                    if i == 250 && t == 0 {
                        cache.clear();
                    }
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(cache.len() <= 100);
        cache.debug_validate_invariants();
    }
}
