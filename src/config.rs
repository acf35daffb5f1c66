use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{MiningError, Result};

/// How the significance of an itemset is measured during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SignificanceMeasure {
    /// Whole weighted mass of every transaction containing the itemset.
    #[default]
    TransactionMass,
    /// Only the weighted contributions of the itemset's own items.
    PatternShare,
}

/// Item order of the header table of a conditional tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionalOrder {
    /// Ranked by conditional count descending, item id ascending on ties.
    #[default]
    Resorted,
    /// Keeps the relative order of the parent header table.
    Inherited,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinerConfig {
    /// Minimum significance ratio in (0, 1].
    pub min_significance: f64,
    pub measure: SignificanceMeasure,
    /// Enumerate single-chain trees combinatorially instead of recursing.
    pub single_path_shortcut: bool,
    pub conditional_order: ConditionalOrder,
    /// Run the validation pass on the rayon thread pool.
    pub parallel_validation: bool,
    pub max_items: usize,
    pub max_transactions: usize,
    /// Capacity of the queue ranking the global item domain.
    pub item_queue_capacity: usize,
    /// Capacity of the queue ranking the items of one transaction or path.
    pub branch_queue_capacity: usize,
    pub max_itemsets: usize,
    /// Upper bound on tree nodes alive at once, across all trees.
    pub max_tree_nodes: Option<usize>,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            min_significance: 0.5,
            measure: SignificanceMeasure::default(),
            single_path_shortcut: true,
            conditional_order: ConditionalOrder::default(),
            parallel_validation: false,
            max_items: 10_000,
            max_transactions: 1_000_000,
            item_queue_capacity: 10_000,
            branch_queue_capacity: 256,
            max_itemsets: 50_000,
            max_tree_nodes: None,
        }
    }
}

impl MinerConfig {
    pub fn with_min_significance(min_significance: f64) -> Self {
        Self {
            min_significance,
            ..Self::default()
        }
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| MiningError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: MinerConfig = serde_json::from_str(&text).map_err(|e| MiningError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.min_significance > 0.0 && self.min_significance <= 1.0) {
            return Err(MiningError::InvalidConfig(format!(
                "min_significance must lie in (0, 1], got {}",
                self.min_significance
            )));
        }
        let bounds = [
            ("max_items", self.max_items),
            ("max_transactions", self.max_transactions),
            ("item_queue_capacity", self.item_queue_capacity),
            ("branch_queue_capacity", self.branch_queue_capacity),
            ("max_itemsets", self.max_itemsets),
        ];
        for (name, value) in bounds {
            if value == 0 {
                return Err(MiningError::InvalidConfig(format!("{name} must be positive")));
            }
        }
        if self.max_tree_nodes == Some(0) {
            return Err(MiningError::InvalidConfig("max_tree_nodes must be positive".into()));
        }
        Ok(())
    }
}
