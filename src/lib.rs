//! Mining of significant itemsets from weighted transactional data.
//!
//! Every transaction holds `(item, weight)` pairs and every item carries a
//! confidence coefficient. An itemset is significant when the weighted mass
//! of the transactions containing it, divided by the mass of the whole
//! database, reaches a threshold. Candidates are enumerated by FP-growth
//! over a prefix tree whose node counts bound that mass from above; a final
//! scan measures every candidate exactly. Each reported itemset also lists
//! the transactions it was drawn from.

pub mod config;
pub mod error;
pub mod fp;
pub mod io;

pub use config::{ConditionalOrder, MinerConfig, SignificanceMeasure};
pub use error::{Container, MiningError, Result};
pub use fp::{
    mine_candidates, mine_significant_itemsets, validate, CandidateSet, ConfidenceTable, ItemId, MiningReport,
    SignificantItemset, Transaction, TransactionDatabase,
};
pub use io::ReportFormat;
