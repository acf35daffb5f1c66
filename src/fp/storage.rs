use super::database::ItemId;
use super::provenance::Provenance;
use crate::error::{Container, MiningError, Result};

/// Borrowed view of one stored pattern.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternRef<'a> {
    pub items: &'a [ItemId],
    /// Conditional tree support at emission time.
    pub support: f64,
    pub provenance: &'a Provenance,
    /// Measured ratio, once the validation pass has run.
    pub significance: Option<f64>,
}

/// Fixed-capacity store of emitted itemsets, kept in flat arrays.
#[derive(Debug, Clone)]
pub struct PatternStore {
    items: Vec<ItemId>,
    offsets: Vec<(usize, usize)>,
    supports: Vec<f64>,
    provenance: Vec<Provenance>,
    significance: Vec<Option<f64>>,
    capacity: usize,
}

impl PatternStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            offsets: Vec::new(),
            supports: Vec::new(),
            provenance: Vec::new(),
            significance: Vec::new(),
            capacity,
        }
    }

    /// Stores an itemset; items are kept ascending and deduplicated.
    pub fn add_itemset(&mut self, mut items: Vec<ItemId>, support: f64, provenance: Provenance) -> Result<usize> {
        if self.offsets.len() >= self.capacity {
            return Err(MiningError::capacity(Container::PatternStore, self.capacity));
        }
        items.sort_unstable();
        items.dedup();

        let start = self.items.len();
        self.items.extend_from_slice(&items);
        self.offsets.push((start, items.len()));
        self.supports.push(support);
        self.provenance.push(provenance);
        self.significance.push(None);

        Ok(self.offsets.len() - 1)
    }

    pub fn get_itemset(&self, idx: usize) -> &[ItemId] {
        let (start, len) = self.offsets[idx];
        &self.items[start..start + len]
    }

    pub fn get(&self, idx: usize) -> PatternRef<'_> {
        PatternRef {
            items: self.get_itemset(idx),
            support: self.supports[idx],
            provenance: &self.provenance[idx],
            significance: self.significance[idx],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = PatternRef<'_>> {
        (0..self.len()).map(move |idx| self.get(idx))
    }

    pub(crate) fn set_significance(&mut self, idx: usize, ratio: f64) {
        self.significance[idx] = Some(ratio);
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn remaining(&self) -> usize {
        self.capacity - self.len()
    }

    /// Number of stored itemsets per size; index 0 holds the 1-itemsets.
    pub fn level_counts(&self) -> Vec<usize> {
        level_counts(self.offsets.iter().map(|&(_, len)| len))
    }
}

/// Tallies itemset sizes per level; index 0 counts the 1-itemsets and
/// empty itemsets are skipped.
pub fn level_counts(sizes: impl IntoIterator<Item = usize>) -> Vec<usize> {
    let mut levels = Vec::new();
    for len in sizes {
        if len == 0 {
            continue;
        }
        if levels.len() < len {
            levels.resize(len, 0);
        }
        levels[len - 1] += 1;
    }
    levels
}
