//! Intrusive doubly linked recency list.
//!
//! The list does not own any entries. It threads the `prev`/`next` links of
//! entries that live in the [`SlotTable`] arena, ordered from least recently
//! used (`head`) to most recently used (`tail`). All operations are O(1)
//! except iteration.

use crate::entry::Link;
use crate::table::SlotTable;

/// Head/tail sentinels plus the number of linked entries.
///
/// Invariants: `head.prev` and `tail.next` are always `None`, and `len`
/// matches the number of entries reachable from `head`.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct List {
    head: Link,
    tail: Link,
    len: usize,
}

impl List {
    pub(crate) fn new() -> Self {
        List::default()
    }

    /// Least recently used entry.
    #[inline]
    pub(crate) fn head(&self) -> Link {
        self.head
    }

    /// Most recently used entry.
    #[inline]
    pub(crate) fn tail(&self) -> Link {
        self.tail
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Appends an unlinked entry at the most-recently-used end.
    pub(crate) fn push_back<K, V>(&mut self, table: &mut SlotTable<K, V>, idx: usize) {
        {
            let entry = table.entry_mut(idx);
            entry.prev = self.tail;
            entry.next = None;
        }
        match self.tail {
            Some(tail) => table.entry_mut(tail).next = Some(idx),
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
        self.len += 1;
    }

    /// Unlinks an entry, patching its neighbours and the sentinels.
    pub(crate) fn detach<K, V>(&mut self, table: &mut SlotTable<K, V>, idx: usize) {
        let (prev, next) = {
            let entry = table.entry_mut(idx);
            let links = (entry.prev, entry.next);
            entry.prev = None;
            entry.next = None;
            links
        };
        match prev {
            Some(prev) => table.entry_mut(prev).next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => table.entry_mut(next).prev = prev,
            None => self.tail = prev,
        }
        self.len -= 1;
    }

    /// Moves an entry to the most-recently-used end.
    pub(crate) fn move_to_back<K, V>(&mut self, table: &mut SlotTable<K, V>, idx: usize) {
        if self.tail == Some(idx) {
            return;
        }
        self.detach(table, idx);
        self.push_back(table, idx);
    }

    /// Detaches and returns the least recently used entry.
    pub(crate) fn pop_front<K, V>(&mut self, table: &mut SlotTable<K, V>) -> Link {
        let head = self.head?;
        self.detach(table, head);
        Some(head)
    }

    pub(crate) fn clear(&mut self) {
        *self = List::new();
    }

    /// Walks slot indices from least to most recently used.
    pub(crate) fn indices<'a, K, V>(&self, table: &'a SlotTable<K, V>) -> Indices<'a, K, V> {
        Indices {
            table,
            cursor: self.head,
            remaining: self.len,
        }
    }
}

/// Iterator over slot indices in recency order.
pub(crate) struct Indices<'a, K, V> {
    table: &'a SlotTable<K, V>,
    cursor: Link,
    remaining: usize,
}

impl<K, V> Iterator for Indices<'_, K, V> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let idx = self.cursor?;
        self.cursor = self.table.entry(idx).next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(idx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
