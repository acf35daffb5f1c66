use std::cmp::Ordering;

use super::database::ItemId;
use crate::error::{Container, MiningError, Result};

/// Primary key of a heap entry.
pub trait HeapKey: Copy {
    fn compare(&self, other: &Self) -> Ordering;
}

impl HeapKey for f64 {
    fn compare(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }
}

impl HeapKey for u64 {
    fn compare(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

impl HeapKey for usize {
    fn compare(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapOrder {
    Min,
    Max,
}

/// Array-backed binary heap of `(key, item)` entries with a hard capacity.
///
/// Entries rank by key, and on equal keys the smaller item ranks *higher*,
/// so a descending sort is key-descending with item ids ascending among ties.
/// Every ranked list in the miner relies on this total order.
#[derive(Debug, Clone)]
pub struct BoundedHeap<K> {
    entries: Vec<(K, ItemId)>,
    capacity: usize,
    order: HeapOrder,
    container: Container,
}

fn rank<K: HeapKey>(a: &(K, ItemId), b: &(K, ItemId)) -> Ordering {
    a.0.compare(&b.0).then_with(|| b.1.cmp(&a.1))
}

impl<K: HeapKey> BoundedHeap<K> {
    pub fn min_heap(capacity: usize, container: Container) -> Self {
        Self::new(capacity, HeapOrder::Min, container)
    }

    pub fn max_heap(capacity: usize, container: Container) -> Self {
        Self::new(capacity, HeapOrder::Max, container)
    }

    fn new(capacity: usize, order: HeapOrder, container: Container) -> Self {
        Self {
            entries: Vec::with_capacity(capacity.min(1024)),
            capacity,
            order,
            container,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// True when `a` belongs above `b` under this heap's order.
    fn above(&self, a: usize, b: usize) -> bool {
        let ord = rank(&self.entries[a], &self.entries[b]);
        match self.order {
            HeapOrder::Min => ord == Ordering::Less,
            HeapOrder::Max => ord == Ordering::Greater,
        }
    }

    pub fn insert(&mut self, key: K, item: ItemId) -> Result<()> {
        if self.entries.len() >= self.capacity {
            return Err(MiningError::capacity(self.container, self.capacity));
        }
        self.entries.push((key, item));
        let mut i = self.entries.len() - 1;
        while i > 0 {
            let parent = (i - 1) / 2;
            if !self.above(i, parent) {
                break;
            }
            self.entries.swap(i, parent);
            i = parent;
        }
        Ok(())
    }

    /// Removes the top entry: the minimum of a min-heap, the maximum of a
    /// max-heap.
    pub fn pop(&mut self) -> Result<(K, ItemId)> {
        if self.entries.is_empty() {
            return Err(MiningError::invariant(format!("{} underflow", self.container)));
        }
        let top = self.entries.swap_remove(0);
        let len = self.entries.len();
        self.sift_down(0, len);
        Ok(top)
    }

    fn sift_down(&mut self, mut i: usize, len: usize) {
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut best = i;
            if left < len && self.above(left, best) {
                best = left;
            }
            if right < len && self.above(right, best) {
                best = right;
            }
            if best == i {
                return;
            }
            self.entries.swap(i, best);
            i = best;
        }
    }

    fn rebuild(&mut self, order: HeapOrder) {
        if self.order == order {
            return;
        }
        self.order = order;
        let len = self.entries.len();
        for i in (0..len / 2).rev() {
            self.sift_down(i, len);
        }
    }

    /// In-place heap sort. Repeatedly moving the top behind the shrinking
    /// heap leaves the array in the reverse of the heap's order.
    fn heap_sort(mut self) -> Vec<(K, ItemId)> {
        for end in (1..self.entries.len()).rev() {
            self.entries.swap(0, end);
            self.sift_down(0, end);
        }
        self.entries
    }

    /// Key descending, item ascending on equal keys.
    pub fn into_sorted_descending(mut self) -> Vec<(K, ItemId)> {
        self.rebuild(HeapOrder::Min);
        self.heap_sort()
    }

    /// Key ascending, item descending on equal keys.
    pub fn into_sorted_ascending(mut self) -> Vec<(K, ItemId)> {
        self.rebuild(HeapOrder::Max);
        self.heap_sort()
    }

    /// Items only, in `into_sorted_descending` order.
    pub fn into_ranked_items(self) -> Vec<ItemId> {
        self.into_sorted_descending()
            .into_iter()
            .map(|(_, item)| item)
            .collect()
    }
}
