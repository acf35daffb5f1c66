use tracing::warn;

use super::provenance::Provenance;
use crate::config::MinerConfig;
use crate::error::{Container, MiningError, Result};

/// Item identifier in the domain `[1, domain_size]`.
pub type ItemId = usize;

/// One input record: a source id and its `(item, weight)` pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub id: usize,
    pub items: Vec<(ItemId, u64)>,
}

impl Transaction {
    pub fn new(id: usize, items: Vec<(ItemId, u64)>) -> Self {
        Self { id, items }
    }
}

/// Per-item confidence coefficients; items never set have coefficient 0.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceTable {
    coefficients: Vec<Option<f64>>,
}

impl ConfidenceTable {
    pub fn new(domain_size: usize) -> Self {
        Self {
            coefficients: vec![None; domain_size + 1],
        }
    }

    pub fn from_pairs(domain_size: usize, pairs: impl IntoIterator<Item = (ItemId, f64)>) -> Result<Self> {
        let mut table = Self::new(domain_size);
        for (item, coefficient) in pairs {
            table.set(item, coefficient)?;
        }
        Ok(table)
    }

    pub fn domain_size(&self) -> usize {
        self.coefficients.len() - 1
    }

    pub fn set(&mut self, item: ItemId, coefficient: f64) -> Result<()> {
        self.check_item(item)?;
        if !coefficient.is_finite() || coefficient < 0.0 {
            return Err(MiningError::InvalidInput(format!(
                "confidence of item {item} must be finite and non-negative, got {coefficient}"
            )));
        }
        self.coefficients[item] = Some(coefficient);
        Ok(())
    }

    pub fn get(&self, item: ItemId) -> f64 {
        self.coefficients.get(item).copied().flatten().unwrap_or(0.0)
    }

    pub fn is_set(&self, item: ItemId) -> bool {
        matches!(self.coefficients.get(item), Some(Some(_)))
    }

    pub fn check_item(&self, item: ItemId) -> Result<()> {
        if item == 0 || item > self.domain_size() {
            return Err(MiningError::ItemOutOfDomain {
                item,
                domain: self.domain_size(),
            });
        }
        Ok(())
    }
}

/// A transaction with every weight already scaled by its item's confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedTransaction {
    pub id: usize,
    /// `(item, weight × confidence)`, ascending by item, one entry per item.
    pub entries: Vec<(ItemId, f64)>,
    /// Sum of all contributions.
    pub mass: f64,
}

impl WeightedTransaction {
    pub fn contribution(&self, item: ItemId) -> Option<f64> {
        self.entries
            .binary_search_by_key(&item, |&(i, _)| i)
            .ok()
            .map(|idx| self.entries[idx].1)
    }

    /// Whether every item of the ascending `itemset` occurs here.
    pub fn contains_all(&self, itemset: &[ItemId]) -> bool {
        let mut entries = self.entries.iter().map(|&(i, _)| i);
        itemset
            .iter()
            .all(|&wanted| entries.by_ref().any(|i| i == wanted))
    }
}

/// The fully materialised weighted database, re-readable for every scan.
#[derive(Debug, Clone)]
pub struct TransactionDatabase {
    transactions: Vec<WeightedTransaction>,
    confidence: ConfidenceTable,
    total_mass: f64,
}

impl TransactionDatabase {
    pub fn new(transactions: Vec<Transaction>, confidence: ConfidenceTable, config: &MinerConfig) -> Result<Self> {
        if confidence.domain_size() > config.max_items {
            return Err(MiningError::capacity(Container::ItemDomain, config.max_items));
        }
        if transactions.len() > config.max_transactions {
            return Err(MiningError::capacity(Container::TransactionDomain, config.max_transactions));
        }

        let mut weighted = Vec::with_capacity(transactions.len());
        let mut total_mass = 0.0;
        let mut unrated = Vec::new();

        for transaction in transactions {
            let mut raw = transaction.items;
            raw.sort_unstable_by_key(|&(item, _)| item);

            let mut entries: Vec<(ItemId, u64)> = Vec::with_capacity(raw.len());
            for (item, weight) in raw {
                confidence.check_item(item)?;
                if weight == 0 {
                    return Err(MiningError::InvalidInput(format!(
                        "transaction {} has a zero weight for item {item}",
                        transaction.id
                    )));
                }
                if !confidence.is_set(item) && !unrated.contains(&item) {
                    unrated.push(item);
                }
                match entries.last_mut() {
                    Some((last, w)) if *last == item => {
                        *w = w.checked_add(weight).ok_or_else(|| {
                            MiningError::InvalidInput(format!(
                                "transaction {} overflows the summed weight of item {item}",
                                transaction.id
                            ))
                        })?;
                    }
                    _ => entries.push((item, weight)),
                }
            }

            let entries: Vec<(ItemId, f64)> = entries
                .into_iter()
                .map(|(item, weight)| (item, weight as f64 * confidence.get(item)))
                .collect();
            let mass = entries.iter().map(|&(_, c)| c).sum::<f64>();
            total_mass += mass;
            weighted.push(WeightedTransaction {
                id: transaction.id,
                entries,
                mass,
            });
        }

        if !unrated.is_empty() {
            unrated.sort_unstable();
            warn!(items = ?unrated, "items without a confidence coefficient weigh nothing");
        }

        Ok(Self {
            transactions: weighted,
            confidence,
            total_mass,
        })
    }

    pub fn transactions(&self) -> &[WeightedTransaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn confidence(&self) -> &ConfidenceTable {
        &self.confidence
    }

    pub fn domain_size(&self) -> usize {
        self.confidence.domain_size()
    }

    pub fn total_mass(&self) -> f64 {
        self.total_mass
    }

    /// Input ids of the transactions whose positions `provenance` holds,
    /// ascending.
    pub fn source_ids(&self, provenance: &Provenance) -> Vec<usize> {
        let mut ids: Vec<usize> = provenance
            .iter()
            .filter_map(|position| self.transactions.get(position))
            .map(|transaction| transaction.id)
            .collect();
        ids.sort_unstable();
        ids
    }
}
