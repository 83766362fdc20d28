#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Structure
//!
//! ```text
//!   buckets (N)                 arena slots                recency list
//!  ┌─────────┐      ┌──────────────────────────────┐
//!  │ 0: ─────┼────▶ │ slot 2 ─chain─▶ slot 0 ─▶ ∅  │      head (LRU)
//!  │ 1: ∅    │      │                              │        │
//!  │ 2: ─────┼────▶ │ slot 1 ─▶ ∅                  │        ▼
//!  │ ...     │      │                              │   slot 0 ⇄ slot 2 ⇄ slot 1
//!  └─────────┘      └──────────────────────────────┘                     ▲
//!                                                                        │
//!                                                                   tail (MRU)
//! ```
//!
//! Every entry sits on exactly one bucket chain (the bucket its key hashes
//! to, `hash mod N`) and on the recency list. The two structures always hold
//! the same entry set.
//!
//! ## Quick Reference
//!
//! | Type | Description | Use Case |
//! |------|-------------|----------|
//! | [`LruCache`] | Single-threaded LRU cache | Owned by one task or wrapped by the caller |
//! | [`ConcurrentLruCache`] | One-lock thread-safe LRU cache | Shared element and URI caches |
//!
//! ## Performance Characteristics
//!
//! | Operation | Cost |
//! |-----------|------|
//! | `get` / `put` / `remove` | O(1) expected |
//! | `delete_by_*`, `purge_where`, `keys` | O(len) |
//!
//! ## Code Examples
//!
//! ### Element cache with publish invalidation
//!
//! ```rust
//! use element_cache::element::{ElementKey, ElementValue, RenewDirectives};
//! use element_cache::LruCache;
//! use core::num::NonZeroUsize;
//!
//! #[derive(Clone)]
//! struct Rendered {
//!     template: String,
//!     class: String,
//!     directives: Option<RenewDirectives>,
//! }
//!
//! impl ElementValue for Rendered {
//!     type Directives = RenewDirectives;
//!     fn template_name(&self) -> &str { &self.template }
//!     fn class_name(&self) -> &str { &self.class }
//!     fn cache_directives(&self) -> Option<&RenewDirectives> { self.directives.as_ref() }
//! }
//!
//! let mut cache = LruCache::new(NonZeroUsize::new(64).unwrap());
//! let rendered = |directives| Rendered {
//!     template: "article".into(),
//!     class: "news".into(),
//!     directives,
//! };
//! cache.put(ElementKey::new("article", "news", "1"), rendered(Some(RenewDirectives::KEEP)));
//! cache.put(ElementKey::new("article", "news", "2"), rendered(None));
//!
//! // Only the element without a "keep" directive goes
//! let purged = cache.delete_stale_after_publish();
//! assert_eq!(purged.len(), 1);
//! assert_eq!(purged[0].0.qualifier(), "2");
//! ```
//!
//! ### Resolved-URI cache
//!
//! ```rust
//! use element_cache::element::UriRef;
//! use element_cache::LruCache;
//! use core::num::NonZeroUsize;
//!
//! let mut uris = LruCache::new(NonZeroUsize::new(128).unwrap());
//! uris.put(UriRef::from("/news/today"), 17u64);
//! assert_eq!(uris.get("/news/today"), Some(&17));
//! assert_eq!(uris.delete_by_uri("/news/today").len(), 1);
//! ```

#![no_std]

#[cfg(any(feature = "std", not(feature = "hashbrown"), test))]
extern crate std;

extern crate alloc;

/// Arena entry shared by the slot table and the recency list.
pub(crate) mod entry;

/// Fixed-size slot table with intrusive collision chains.
pub(crate) mod table;

/// Intrusive doubly linked recency list over arena indices.
pub(crate) mod list;

/// Cache configuration structures.
pub mod config;

/// Configuration errors.
pub mod error;

/// Value and key contracts consumed by the bulk purges.
pub mod element;

/// Least Recently Used (LRU) cache implementation.
///
/// Provides a fixed-size cache that evicts the least recently used items when
/// the capacity is reached.
pub mod lru;

/// Predicate-based bulk eviction.
pub mod purge;

/// Cache metrics system.
///
/// Tracks hits, misses, evictions and purges and reports them through the
/// [`CacheMetrics`](metrics::CacheMetrics) trait.
pub mod metrics;

/// Thread-safe cache built on a single `parking_lot` lock.
///
/// Available when the `concurrent` feature is enabled.
#[cfg(feature = "concurrent")]
pub mod concurrent;

/// Hash builder used when none is supplied.
#[cfg(feature = "hashbrown")]
pub type DefaultHashBuilder = hashbrown::DefaultHashBuilder;

/// Hash builder used when none is supplied.
#[cfg(not(feature = "hashbrown"))]
pub type DefaultHashBuilder = std::collections::hash_map::RandomState;

pub use config::{LruCacheConfig, RemovalPolicy, UpdatePolicy};
pub use element::{CacheDirectives, ElementKey, ElementValue, RenewDirectives, UriKey, UriRef};
pub use error::ConfigError;
pub use lru::LruCache;
pub use metrics::CacheMetrics;

#[cfg(feature = "concurrent")]
pub use concurrent::ConcurrentLruCache;
