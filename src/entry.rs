//! Arena Entry Type
//!
//! Every cached pair lives in one `Entry` stored in the slot table's arena.
//! The entry carries three intrusive links, all expressed as arena indices
//! rather than pointers:
//!
//! - `chain_next`: the next entry in the same bucket's collision chain
//! - `prev` / `next`: the neighbours in the recency list
//!
//! ```text
//!   buckets            arena
//!  ┌───────┐      ┌──────────────────────────────┐
//!  │ 0 ────┼────▶ │ #3  key=A  chain_next=#0     │──┐
//!  │ 1     │      ├──────────────────────────────┤  │
//!  │ 2 ────┼────▶ │ #1  key=C  chain_next=None   │  │
//!  └───────┘      ├──────────────────────────────┤  │
//!                 │ #0  key=B  chain_next=None   │◀─┘
//!                 └──────────────────────────────┘
//!   recency: head=#0 ⇄ #3 ⇄ #1=tail
//! ```
//!
//! An entry is live exactly while it is reachable from both its bucket chain
//! and the recency list.

/// Index of an entry in the arena, or `None` at the end of a chain or list.
pub(crate) type Link = Option<usize>;

/// A cached key/value pair plus its intrusive links.
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    /// Bucket chosen when the key was inserted. Never recomputed.
    pub(crate) bucket: usize,
    pub(crate) chain_next: Link,
    pub(crate) prev: Link,
    pub(crate) next: Link,
}

impl<K, V> Entry<K, V> {
    /// Creates an unlinked entry for `bucket`.
    pub(crate) fn new(key: K, value: V, bucket: usize) -> Self {
        Entry {
            key,
            value,
            bucket,
            chain_next: None,
            prev: None,
            next: None,
        }
    }

    /// Re-keys this entry in place, returning the pair it held.
    ///
    /// All links are reset; the caller re-threads the entry into the
    /// structures afterwards.
    pub(crate) fn recycle(&mut self, key: K, value: V, bucket: usize) -> (K, V) {
        let old_key = core::mem::replace(&mut self.key, key);
        let old_value = core::mem::replace(&mut self.value, value);
        self.bucket = bucket;
        self.chain_next = None;
        self.prev = None;
        self.next = None;
        (old_key, old_value)
    }

    /// Consumes the entry, yielding the stored pair.
    pub(crate) fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K: core::fmt::Debug, V> core::fmt::Debug for Entry<K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Entry")
            .field("key", &self.key)
            .field("bucket", &self.bucket)
            .field("chain_next", &self.chain_next)
            .field("prev", &self.prev)
            .field("next", &self.next)
            .finish()
    }
}
