use rayon::prelude::*;
use serde::Serialize;

use super::database::{ItemId, TransactionDatabase, WeightedTransaction};
use super::storage::PatternStore;
use crate::config::{MinerConfig, SignificanceMeasure};
use crate::error::Result;

/// A reported itemset with its exact significance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignificantItemset {
    /// Ascending item ids.
    pub items: Vec<ItemId>,
    /// Conditional tree support at emission time.
    pub support: f64,
    pub significance: f64,
    /// Ids of the transactions that fed the pattern, ascending.
    pub sources: Vec<usize>,
}

/// Mass that `transaction` lends to `itemset` under `measure`; zero unless
/// it contains every item.
pub fn supporting_mass(transaction: &WeightedTransaction, itemset: &[ItemId], measure: SignificanceMeasure) -> f64 {
    if !transaction.contains_all(itemset) {
        return 0.0;
    }
    match measure {
        SignificanceMeasure::TransactionMass => transaction.mass,
        SignificanceMeasure::PatternShare => itemset
            .iter()
            .filter_map(|&item| transaction.contribution(item))
            .sum(),
    }
}

/// Exact significance ratio of `itemset` over the whole database.
pub fn significance(db: &TransactionDatabase, itemset: &[ItemId], measure: SignificanceMeasure) -> f64 {
    if db.total_mass() <= 0.0 {
        return 0.0;
    }
    let mass: f64 = db
        .transactions()
        .iter()
        .map(|transaction| supporting_mass(transaction, itemset, measure))
        .sum();
    mass / db.total_mass()
}

/// Third scan: records each candidate's measured ratio and returns the
/// candidates reaching `min_significance`, in emission order.
pub fn validate(store: &mut PatternStore, db: &TransactionDatabase, config: &MinerConfig) -> Result<Vec<SignificantItemset>> {
    let measure = config.measure;
    let ratios: Vec<f64> = if config.parallel_validation {
        let shared: &PatternStore = store;
        (0..shared.len())
            .into_par_iter()
            .map(|idx| significance(db, shared.get_itemset(idx), measure))
            .collect()
    } else {
        (0..store.len())
            .map(|idx| significance(db, store.get_itemset(idx), measure))
            .collect()
    };

    for (idx, &ratio) in ratios.iter().enumerate() {
        store.set_significance(idx, ratio);
    }

    let reported = store
        .iter()
        .filter_map(|pattern| {
            let ratio = pattern.significance?;
            (ratio >= config.min_significance).then(|| SignificantItemset {
                items: pattern.items.to_vec(),
                support: pattern.support,
                significance: ratio,
                sources: db.source_ids(pattern.provenance),
            })
        })
        .collect();
    Ok(reported)
}
