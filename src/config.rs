//! Cache Configuration Module
//!
//! Configuration for the slot-table LRU cache. Like the other configuration
//! structs in this crate family, [`LruCacheConfig`] has public fields so it
//! can be built with a struct literal. [`LruCacheConfig::new`] fills in the
//! defaults, and [`LruCacheConfig::try_from_capacity`] validates untrusted
//! input.
//!
//! # Sizing Guidelines
//!
//! `capacity` is both the maximum number of entries and the number of
//! buckets in the slot table. It is fixed for the lifetime of the cache and
//! the table is never rehashed, so the memory footprint is predictable:
//!
//! ```text
//! Total Memory ≈ capacity × (size_of::<Option<usize>>()       // bucket head
//!                            + size_of::<K>() + size_of::<V>()
//!                            + 4 × size_of::<usize>())         // links + bucket
//! ```
//!
//! Element and URI caches are typically sized in the low hundreds to low
//! thousands of slots. Bulk purges walk every entry under the cache lock,
//! so very large capacities lengthen the time other callers wait during a
//! publish.
//!
//! # Examples
//!
//! ```
//! use element_cache::config::{LruCacheConfig, RemovalPolicy, UpdatePolicy};
//! use element_cache::LruCache;
//! use core::num::NonZeroUsize;
//!
//! let config = LruCacheConfig {
//!     capacity: NonZeroUsize::new(500).unwrap(),
//!     update_policy: UpdatePolicy::Promote,
//!     removal_policy: RemovalPolicy::Precise,
//! };
//! let cache: LruCache<String, i32> = LruCache::init(config, None);
//! assert_eq!(cache.cap().get(), 500);
//! ```

use crate::error::ConfigError;
use core::fmt;
use core::num::NonZeroUsize;

/// What `put` does to the recency of a key that is already cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdatePolicy {
    /// Overwrite the value and leave the entry where it is in the recency
    /// list. Only `get` promotes. This is the historical behavior.
    #[default]
    InPlace,
    /// Overwrite the value and move the entry to most recently used.
    Promote,
}

/// How a single-entry removal behaves when the cache is nearly empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemovalPolicy {
    /// Unlink exactly the removed entry, whatever the cache size.
    #[default]
    Precise,
    /// Legacy behavior: removing an entry while fewer than two are cached
    /// resets the whole cache instead of unlinking it. Removing an absent
    /// key is still a no-op. Bulk purges go through the same path.
    ///
    /// Kept for callers that depend on it. New code should use `Precise`.
    ResetWhenSparse,
}

/// Configuration for the slot-table LRU cache.
///
/// # Fields
///
/// - `capacity`: maximum number of entries, and the number of buckets.
/// - `update_policy`: whether overwriting an existing key promotes it.
/// - `removal_policy`: precise removal or the legacy sparse reset.
///
/// # Examples
///
/// ```
/// use element_cache::config::LruCacheConfig;
/// use core::num::NonZeroUsize;
///
/// let config = LruCacheConfig::new(NonZeroUsize::new(1000).unwrap());
/// assert_eq!(config.capacity.get(), 1000);
///
/// assert!(LruCacheConfig::try_from_capacity(0).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct LruCacheConfig {
    /// Maximum number of key-value pairs the cache can hold.
    pub capacity: NonZeroUsize,
    /// Recency handling for `put` on an existing key.
    pub update_policy: UpdatePolicy,
    /// Removal behavior when fewer than two entries are cached.
    pub removal_policy: RemovalPolicy,
}

impl LruCacheConfig {
    /// Creates a configuration with default policies.
    pub fn new(capacity: NonZeroUsize) -> Self {
        LruCacheConfig {
            capacity,
            update_policy: UpdatePolicy::default(),
            removal_policy: RemovalPolicy::default(),
        }
    }

    /// Creates a configuration from a raw slot count.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroCapacity`] if `capacity` is zero.
    pub fn try_from_capacity(capacity: usize) -> Result<Self, ConfigError> {
        NonZeroUsize::new(capacity)
            .map(Self::new)
            .ok_or(ConfigError::ZeroCapacity)
    }

    /// Sets the update policy.
    #[must_use]
    pub fn with_update_policy(mut self, policy: UpdatePolicy) -> Self {
        self.update_policy = policy;
        self
    }

    /// Sets the removal policy.
    #[must_use]
    pub fn with_removal_policy(mut self, policy: RemovalPolicy) -> Self {
        self.removal_policy = policy;
        self
    }
}

impl fmt::Debug for LruCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCacheConfig")
            .field("capacity", &self.capacity)
            .field("update_policy", &self.update_policy)
            .field("removal_policy", &self.removal_policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lru_config_defaults() {
        let config = LruCacheConfig::new(NonZeroUsize::new(1000).unwrap());
        assert_eq!(config.capacity.get(), 1000);
        assert_eq!(config.update_policy, UpdatePolicy::InPlace);
        assert_eq!(config.removal_policy, RemovalPolicy::Precise);
    }

    #[test]
    fn test_lru_config_builder() {
        let config = LruCacheConfig::new(NonZeroUsize::new(8).unwrap())
            .with_update_policy(UpdatePolicy::Promote)
            .with_removal_policy(RemovalPolicy::ResetWhenSparse);
        assert_eq!(config.update_policy, UpdatePolicy::Promote);
        assert_eq!(config.removal_policy, RemovalPolicy::ResetWhenSparse);
    }

    #[test]
    fn test_try_from_capacity() {
        assert_eq!(
            LruCacheConfig::try_from_capacity(0),
            Err(ConfigError::ZeroCapacity)
        );
        let config = LruCacheConfig::try_from_capacity(3).unwrap();
        assert_eq!(config.capacity.get(), 3);
    }
}
