use ndarray::Array1;
use rustc_hash::FxHashMap;

use super::database::{ItemId, TransactionDatabase};
use super::heap::BoundedHeap;
use super::provenance::Provenance;
use super::tree::{HeaderTable, PrefixTree};
use crate::config::{ConditionalOrder, MinerConfig, SignificanceMeasure};
use crate::error::{Container, Result};

/// Relative slack on the tree threshold so float summation order cannot
/// drop a true positive; the validation pass is exact.
pub const PREFILTER_TOLERANCE: f64 = 1e-9;

/// Per-item aggregates from the first database scan, indexed by item id.
#[derive(Debug, Clone)]
pub struct ItemStatistics {
    /// Mass of every transaction containing the item, summed.
    pub transaction_mass: Array1<f64>,
    pub total_mass: f64,
}

impl ItemStatistics {
    pub fn scan(db: &TransactionDatabase) -> Self {
        let mut transaction_mass = Array1::<f64>::zeros(db.domain_size() + 1);

        for transaction in db.transactions() {
            for &(item, _) in &transaction.entries {
                transaction_mass[item] += transaction.mass;
            }
        }

        Self {
            transaction_mass,
            total_mass: db.total_mass(),
        }
    }
}

pub fn prefilter_threshold(total_mass: f64, min_significance: f64) -> f64 {
    total_mass * min_significance * (1.0 - PREFILTER_TOLERANCE)
}

/// Items whose transaction mass reaches `threshold`, ranked by mass
/// descending with ties on ascending item id.
pub fn rank_items(stats: &ItemStatistics, threshold: f64, capacity: usize) -> Result<Vec<ItemId>> {
    let mut queue = BoundedHeap::min_heap(capacity, Container::ItemQueue);
    for (item, &mass) in stats.transaction_mass.iter().enumerate().skip(1) {
        if mass > 0.0 && mass >= threshold {
            queue.insert(mass, item)?;
        }
    }
    Ok(queue.into_ranked_items())
}

/// Second scan: inserts every transaction, restricted to the ranked items
/// and sorted into header order. Provenance records the transaction's
/// position in `db`, never its input id.
pub fn build_prefix_tree(
    db: &TransactionDatabase,
    stats: &ItemStatistics,
    ranked_items: &[ItemId],
    config: &MinerConfig,
) -> Result<PrefixTree> {
    let mut fp_tree = PrefixTree::new(HeaderTable::from_ranked(ranked_items.iter().copied()));

    for (position, transaction) in db.transactions().iter().enumerate() {
        let mut queue = BoundedHeap::min_heap(config.branch_queue_capacity, Container::BranchQueue);
        let mut kept_mass = 0.0;
        for &(item, contribution) in &transaction.entries {
            if fp_tree.header().position(item).is_some() {
                queue.insert(stats.transaction_mass[item], item)?;
                kept_mass += contribution;
            }
        }
        if queue.is_empty() {
            continue;
        }

        let weight = match config.measure {
            SignificanceMeasure::TransactionMass => transaction.mass,
            SignificanceMeasure::PatternShare => kept_mass,
        };
        fp_tree.insert_path(
            &queue.into_ranked_items(),
            weight,
            Some(Provenance::singleton(position)),
        )?;
    }

    Ok(fp_tree)
}

/// Conditional frequency of every item on the paths through the chain at
/// `pos`: each chain node's count is added to itself and all its ancestors.
pub fn count_frequencies(tree: &PrefixTree, pos: usize) -> FxHashMap<ItemId, f64> {
    let mut counts: FxHashMap<ItemId, f64> = FxHashMap::default();
    for leaf in tree.chain(pos) {
        let count = tree.node(leaf).count;
        for idx in tree.path_to_root(leaf) {
            if let Some(item) = tree.node(idx).item {
                *counts.entry(item).or_insert(0.0) += count;
            }
        }
    }
    counts
}

fn qualifies(counts: &FxHashMap<ItemId, f64>, item: ItemId, threshold: f64) -> bool {
    counts.get(&item).is_some_and(|&count| count >= threshold)
}

/// Header of the tree conditioned on the item at `pos`: the items ranked
/// before it whose conditional count reaches `threshold`.
pub fn conditional_header(
    tree: &PrefixTree,
    pos: usize,
    counts: &FxHashMap<ItemId, f64>,
    threshold: f64,
    config: &MinerConfig,
) -> Result<HeaderTable> {
    let candidates = tree
        .header()
        .items()
        .take(pos)
        .filter(|&item| qualifies(counts, item, threshold));

    match config.conditional_order {
        ConditionalOrder::Resorted => {
            let mut queue = BoundedHeap::min_heap(config.item_queue_capacity, Container::ItemQueue);
            for item in candidates {
                queue.insert(counts[&item], item)?;
            }
            Ok(HeaderTable::from_ranked(queue.into_ranked_items()))
        }
        ConditionalOrder::Inherited => Ok(HeaderTable::from_ranked(candidates)),
    }
}

/// Projects the paths above every node of the chain at `pos` into a fresh
/// tree under `header`. Each path carries its chain node's count and
/// provenance.
pub fn build_conditional_tree(
    tree: &PrefixTree,
    pos: usize,
    header: HeaderTable,
    counts: &FxHashMap<ItemId, f64>,
    threshold: f64,
    config: &MinerConfig,
) -> Result<PrefixTree> {
    let mut conditional_tree = PrefixTree::new(header);

    for leaf in tree.chain(pos) {
        let node = tree.node(leaf);
        let Some(parent) = node.parent else {
            continue;
        };

        // Bottom-up, so the reverse of header order.
        let reversed: Vec<ItemId> = tree
            .path_to_root(parent)
            .filter_map(|idx| tree.node(idx).item)
            .filter(|&item| qualifies(counts, item, threshold))
            .collect();
        if reversed.is_empty() {
            continue;
        }

        match config.conditional_order {
            ConditionalOrder::Resorted => {
                let mut queue = BoundedHeap::min_heap(config.branch_queue_capacity, Container::BranchQueue);
                for &item in &reversed {
                    queue.insert(counts[&item], item)?;
                }
                conditional_tree.insert_path(&queue.into_ranked_items(), node.count, node.provenance.clone())?;
            }
            ConditionalOrder::Inherited => {
                conditional_tree.insert_path_reverse(&reversed, node.count, node.provenance.clone())?;
            }
        }
    }

    Ok(conditional_tree)
}
