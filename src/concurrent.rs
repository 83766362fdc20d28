//! Concurrent Cache
//!
//! Thread-safe access to the slot-table LRU cache.
//!
//! # Architecture
//!
//! [`ConcurrentLruCache`] owns exactly one LRU segment behind a
//! single `parking_lot::Mutex`. Every public operation, reads included,
//! acquires that lock for its whole duration, so the bucket chains and the
//! recency list are never observed half-updated. Bulk purges run entirely
//! under the lock and are atomic with respect to every other operation.
//!
//! ## Why Mutex Instead of RwLock?
//!
//! A `get` promotes the entry it finds, which rewires the recency list. Every
//! access is therefore a write and a read lock would buy nothing.
//!
//! ## Why One Lock?
//!
//! The bulk purges must see one global recency order and must delete every
//! match atomically. Striping the key space over several locks would split
//! that order and make purges observe a moving cache.
//!
//! # Performance Characteristics
//!
//! - **Get/Put/Remove**: O(1) expected, plus lock acquisition
//! - **Bulk purges and `keys`**: O(len), holding the lock throughout
//! - **Contention**: all callers serialize on the one lock
//!
//! # Feature Flag
//!
//! This module requires the `concurrent` feature:
//!
//! ```toml
//! [dependencies]
//! element-cache = { version = "0.1", features = ["concurrent"] }
//! ```

mod lru;

pub use self::lru::ConcurrentLruCache;
