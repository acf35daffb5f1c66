pub mod builder;
pub mod combinations;
pub mod database;
pub mod heap;
pub mod memory;
pub mod mining;
pub mod provenance;
pub mod storage;
pub mod tree;
pub mod validation;


pub use database::{ConfidenceTable, ItemId, Transaction, TransactionDatabase, WeightedTransaction};
pub use heap::{BoundedHeap, HeapKey, HeapOrder};
pub use memory::{GrowthStats, NodeBudget, NodeGuard};
pub use mining::{grow_tree, mine_candidates, mine_significant_itemsets, CandidateSet, MiningReport};
pub use provenance::Provenance;
pub use storage::{PatternRef, PatternStore};
pub use tree::{HeaderEntry, HeaderTable, NodeId, PathEntry, PrefixTree, TreeNode};
pub use validation::{significance, validate, SignificantItemset};
