//! Fixed-size slot table with intrusive collision chains.
//!
//! The table owns every entry of the cache. Entries live in a flat arena and
//! are addressed by index; each of the `N` buckets holds the index of the
//! first entry of its singly-linked collision chain. The bucket count equals
//! the configured capacity and never changes, so there is no rehashing: a
//! key's bucket is `hash mod N`, fixed when the entry is threaded in.
//!
//! Slots vacated by removals go onto a free list and are reused before the
//! arena grows, so the arena never exceeds `N` slots.

extern crate alloc;

use crate::entry::{Entry, Link};
use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::borrow::Borrow;
use core::num::NonZeroUsize;

pub(crate) struct SlotTable<K, V> {
    buckets: Box<[Link]>,
    arena: Vec<Option<Entry<K, V>>>,
    free: Vec<usize>,
}

impl<K, V> SlotTable<K, V> {
    /// Creates a table with `cap` buckets and room for `cap` entries.
    pub(crate) fn new(cap: NonZeroUsize) -> Self {
        SlotTable {
            buckets: vec![None; cap.get()].into_boxed_slice(),
            arena: Vec::with_capacity(cap.get()),
            free: Vec::new(),
        }
    }

    #[inline]
    pub(crate) fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Maps a key hash onto a bucket.
    #[inline]
    pub(crate) fn bucket_index(&self, hash: u64) -> usize {
        // The remainder is below the bucket count, so it always fits.
        (hash % self.buckets.len() as u64) as usize
    }

    #[inline]
    pub(crate) fn bucket_head(&self, bucket: usize) -> Link {
        self.buckets[bucket]
    }

    /// Number of occupied slots.
    #[inline]
    pub(crate) fn occupied(&self) -> usize {
        self.arena.len() - self.free.len()
    }

    pub(crate) fn entry(&self, idx: usize) -> &Entry<K, V> {
        match self.arena.get(idx) {
            Some(Some(entry)) => entry,
            _ => unreachable!("slot {idx} is not occupied"),
        }
    }

    pub(crate) fn entry_mut(&mut self, idx: usize) -> &mut Entry<K, V> {
        match self.arena.get_mut(idx) {
            Some(Some(entry)) => entry,
            _ => unreachable!("slot {idx} is not occupied"),
        }
    }

    /// Walks `bucket`'s chain looking for `key`.
    pub(crate) fn find<Q>(&self, bucket: usize, key: &Q) -> Link
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let mut cursor = self.buckets[bucket];
        while let Some(idx) = cursor {
            let entry = self.entry(idx);
            if entry.key.borrow() == key {
                return Some(idx);
            }
            cursor = entry.chain_next;
        }
        None
    }

    /// Stores a new pair and threads it at the head of `bucket`'s chain.
    ///
    /// The entry is not yet on the recency list.
    pub(crate) fn insert(&mut self, key: K, value: V, bucket: usize) -> usize {
        let mut entry = Entry::new(key, value, bucket);
        entry.chain_next = self.buckets[bucket];
        let idx = match self.free.pop() {
            Some(idx) => {
                self.arena[idx] = Some(entry);
                idx
            }
            None => {
                self.arena.push(Some(entry));
                self.arena.len() - 1
            }
        };
        self.buckets[bucket] = Some(idx);
        idx
    }

    /// Unthreads slot `idx` from its bucket chain. The slot stays occupied.
    pub(crate) fn unchain(&mut self, idx: usize) {
        let (bucket, next) = {
            let entry = self.entry(idx);
            (entry.bucket, entry.chain_next)
        };

        if self.buckets[bucket] == Some(idx) {
            self.buckets[bucket] = next;
        } else {
            let mut cursor = self.buckets[bucket];
            while let Some(cur) = cursor {
                let entry = self.entry_mut(cur);
                if entry.chain_next == Some(idx) {
                    entry.chain_next = next;
                    break;
                }
                cursor = entry.chain_next;
            }
        }
        self.entry_mut(idx).chain_next = None;
    }

    /// Repurposes an unchained slot for a new pair and threads it into
    /// `bucket`. Returns the pair the slot held before.
    pub(crate) fn recycle(&mut self, idx: usize, key: K, value: V, bucket: usize) -> (K, V) {
        let head = self.buckets[bucket];
        let entry = self.entry_mut(idx);
        let old = entry.recycle(key, value, bucket);
        entry.chain_next = head;
        self.buckets[bucket] = Some(idx);
        old
    }

    /// Frees an unchained slot and hands back its pair.
    pub(crate) fn release(&mut self, idx: usize) -> (K, V) {
        match self.arena.get_mut(idx).and_then(Option::take) {
            Some(entry) => {
                self.free.push(idx);
                entry.into_pair()
            }
            None => unreachable!("slot {idx} released twice"),
        }
    }

    /// Drops every entry and empties all buckets.
    pub(crate) fn clear(&mut self) {
        self.buckets.iter_mut().for_each(|head| *head = None);
        self.arena.clear();
        self.free.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(cap: usize) -> SlotTable<&'static str, i32> {
        SlotTable::new(NonZeroUsize::new(cap).unwrap())
    }

    #[test]
    fn test_bucket_index_wraps() {
        let table = table(4);
        assert_eq!(table.bucket_count(), 4);
        assert_eq!(table.bucket_index(0), 0);
        assert_eq!(table.bucket_index(5), 1);
        assert_eq!(table.bucket_index(u64::MAX), (u64::MAX % 4) as usize);
    }

    #[test]
    fn test_collisions_chain_from_head() {
        let mut table = table(1);
        let a = table.insert("a", 1, 0);
        let b = table.insert("b", 2, 0);
        let c = table.insert("c", 3, 0);

        assert_eq!(table.bucket_head(0), Some(c));
        assert_eq!(table.entry(c).chain_next, Some(b));
        assert_eq!(table.entry(b).chain_next, Some(a));
        assert_eq!(table.find(0, "a"), Some(a));
        assert_eq!(table.find(0, "b"), Some(b));
        assert_eq!(table.find(0, "missing"), None);
        assert_eq!(table.occupied(), 3);
    }

    #[test]
    fn test_unchain_middle_and_head() {
        let mut table = table(1);
        let a = table.insert("a", 1, 0);
        let b = table.insert("b", 2, 0);
        let c = table.insert("c", 3, 0);

        table.unchain(b);
        assert_eq!(table.entry(c).chain_next, Some(a));
        assert_eq!(table.find(0, "b"), None);

        table.unchain(c);
        assert_eq!(table.bucket_head(0), Some(a));
        assert_eq!(table.find(0, "a"), Some(a));
    }

    #[test]
    fn test_release_reuses_slot() {
        let mut table = table(2);
        let a = table.insert("a", 1, 0);
        table.insert("b", 2, 1);

        table.unchain(a);
        assert_eq!(table.release(a), ("a", 1));
        assert_eq!(table.occupied(), 1);

        let c = table.insert("c", 3, 0);
        assert_eq!(c, a);
        assert_eq!(table.occupied(), 2);
    }

    #[test]
    fn test_recycle_moves_slot_between_buckets() {
        let mut table = table(2);
        let a = table.insert("a", 1, 0);

        table.unchain(a);
        let old = table.recycle(a, "z", 26, 1);
        assert_eq!(old, ("a", 1));
        assert_eq!(table.bucket_head(0), None);
        assert_eq!(table.bucket_head(1), Some(a));
        assert_eq!(table.find(1, "z"), Some(a));
    }

    #[test]
    fn test_clear_empties_buckets() {
        let mut table = table(3);
        table.insert("a", 1, 0);
        table.insert("b", 2, 2);
        table.clear();
        assert_eq!(table.occupied(), 0);
        assert!((0..3).all(|b| table.bucket_head(b).is_none()));
    }
}
