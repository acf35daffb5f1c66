use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info, trace, warn};

use super::builder::{
    build_conditional_tree, build_prefix_tree, conditional_header, count_frequencies, prefilter_threshold,
    rank_items, ItemStatistics,
};
use super::combinations::enumerate_single_path;
use super::database::{ItemId, TransactionDatabase};
use super::memory::{GrowthStats, NodeBudget, NodeGuard};
use super::storage::{level_counts, PatternStore};
use super::tree::PrefixTree;
use super::validation::{validate, SignificantItemset};
use crate::config::MinerConfig;
use crate::error::{MiningError, Result};

/// Output of the tree-based phase, before validation.
#[derive(Debug, Clone)]
pub struct CandidateSet {
    pub store: PatternStore,
    pub stats: GrowthStats,
    /// Mass a conditional support must reach to be emitted.
    pub threshold: f64,
    pub total_mass: f64,
    /// Items of the global header table in canonical order.
    pub ranked_items: Vec<ItemId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MiningReport {
    pub itemsets: Vec<SignificantItemset>,
    /// Patterns emitted by the tree phase, validated or not.
    pub candidates: usize,
    pub min_significance: f64,
    pub total_mass: f64,
    /// Reported itemsets per size; index 0 holds the 1-itemsets.
    pub level_counts: Vec<usize>,
    pub stats: GrowthStats,
}

/// Runs all three database scans and returns the validated itemsets.
pub fn mine_significant_itemsets(db: &TransactionDatabase, config: &MinerConfig) -> Result<MiningReport> {
    let mut candidates = mine_candidates(db, config)?;

    let started = Instant::now();
    let itemsets = validate(&mut candidates.store, db, config)?;
    info!(
        candidates = candidates.store.len(),
        reported = itemsets.len(),
        elapsed_ms = started.elapsed().as_secs_f64() * 1e3,
        "validation scan complete"
    );

    let level_counts = level_counts(itemsets.iter().map(|itemset| itemset.items.len()));

    Ok(MiningReport {
        candidates: candidates.store.len(),
        min_significance: config.min_significance,
        total_mass: candidates.total_mass,
        level_counts,
        stats: candidates.stats,
        itemsets,
    })
}

/// First two scans plus pattern growth over the global tree.
pub fn mine_candidates(db: &TransactionDatabase, config: &MinerConfig) -> Result<CandidateSet> {
    config.validate()?;

    let started = Instant::now();
    let item_stats = ItemStatistics::scan(db);
    info!(
        transactions = db.len(),
        total_mass = item_stats.total_mass,
        elapsed_ms = started.elapsed().as_secs_f64() * 1e3,
        "first database scan complete"
    );

    let mut candidates = CandidateSet {
        store: PatternStore::new(config.max_itemsets),
        stats: GrowthStats::default(),
        threshold: 0.0,
        total_mass: item_stats.total_mass,
        ranked_items: Vec::new(),
    };
    if item_stats.total_mass <= 0.0 {
        warn!("database carries no weighted mass, nothing to mine");
        return Ok(candidates);
    }

    candidates.threshold = prefilter_threshold(item_stats.total_mass, config.min_significance);
    candidates.ranked_items = rank_items(&item_stats, candidates.threshold, config.item_queue_capacity)?;
    debug!(items = ?candidates.ranked_items, threshold = candidates.threshold, "ranked global items");
    if candidates.ranked_items.is_empty() {
        info!("no item reaches the significance bound");
        return Ok(candidates);
    }

    let started = Instant::now();
    let mut fp_tree = build_prefix_tree(db, &item_stats, &candidates.ranked_items, config)?;
    info!(
        nodes = fp_tree.node_count(),
        header_items = fp_tree.header().len(),
        elapsed_ms = started.elapsed().as_secs_f64() * 1e3,
        "prefix tree built"
    );

    let started = Instant::now();
    let (store, stats) = grow_tree(&mut fp_tree, candidates.threshold, config)?;
    info!(
        patterns = store.len(),
        levels = ?store.level_counts(),
        conditional_trees = stats.conditional_trees,
        peak_live_nodes = stats.peak_live_nodes,
        elapsed_ms = started.elapsed().as_secs_f64() * 1e3,
        "pattern growth complete"
    );

    candidates.store = store;
    candidates.stats = stats;
    Ok(candidates)
}

/// Mines every pattern of `tree` whose conditional support reaches
/// `threshold`. The tree's provenance is merged upward along the way.
pub fn grow_tree(tree: &mut PrefixTree, threshold: f64, config: &MinerConfig) -> Result<(PatternStore, GrowthStats)> {
    let budget = NodeBudget::from_limit(config.max_tree_nodes);
    let _global = NodeGuard::new(&budget, tree.node_count())?;

    let mut growth = Growth {
        config,
        threshold,
        budget: &budget,
        store: PatternStore::new(config.max_itemsets),
        stats: GrowthStats {
            global_tree_nodes: tree.node_count(),
            ..GrowthStats::default()
        },
    };
    growth.grow(tree, &[])?;
    growth.stats.peak_live_nodes = budget.peak_nodes();
    Ok((growth.store, growth.stats))
}

/// State shared by every recursion frame of one growth run.
struct Growth<'a> {
    config: &'a MinerConfig,
    threshold: f64,
    budget: &'a NodeBudget,
    store: PatternStore,
    stats: GrowthStats,
}

impl<'a> Growth<'a> {
    /// Mines `tree`, every emitted pattern being extended by `alpha`.
    fn grow(&mut self, tree: &mut PrefixTree, alpha: &[ItemId]) -> Result<()> {
        if tree.header().is_empty() {
            return Err(MiningError::invariant("growth step invoked on an empty header table"));
        }

        if self.config.single_path_shortcut && tree.is_single_path() {
            self.stats.single_path_hits += 1;
            let path = tree.single_path();
            let emitted = enumerate_single_path(&path, alpha, self.threshold, &mut self.store)?;
            trace!(?alpha, path_len = path.len(), emitted, "single path enumerated");
            return Ok(());
        }

        // Least significant first, so each step grows the pattern by one
        // item before any less significant item is considered.
        for pos in (0..tree.header().len()).rev() {
            let item = tree.header().entry(pos).item;
            let counts = count_frequencies(tree, pos);
            let support = counts.get(&item).copied().unwrap_or(0.0);

            let mut grown = Vec::with_capacity(alpha.len() + 1);
            grown.push(item);
            grown.extend_from_slice(alpha);

            if support >= self.threshold {
                self.store.add_itemset(grown.clone(), support, tree.chain_provenance(pos))?;
            }

            let header = conditional_header(tree, pos, &counts, self.threshold, self.config)?;
            tree.propagate_chain_provenance(pos);
            if header.is_empty() {
                continue;
            }

            let mut conditional_tree =
                build_conditional_tree(tree, pos, header, &counts, self.threshold, self.config)?;
            let _guard = NodeGuard::new(self.budget, conditional_tree.node_count())?;
            self.stats.conditional_trees += 1;
            self.stats.conditional_nodes += conditional_tree.node_count();

            self.grow(&mut conditional_tree, &grown)?;
        }
        Ok(())
    }
}
