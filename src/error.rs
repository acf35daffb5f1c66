use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::fp::ItemId;

/// Fixed-capacity containers whose bound is set through `MinerConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    ItemQueue,
    BranchQueue,
    PatternStore,
    TreeNodePool,
    ItemDomain,
    TransactionDomain,
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Container::ItemQueue => "item queue",
            Container::BranchQueue => "branch queue",
            Container::PatternStore => "pattern store",
            Container::TreeNodePool => "tree-node pool",
            Container::ItemDomain => "item domain",
            Container::TransactionDomain => "transaction domain",
        };
        f.write_str(name)
    }
}

/// Every failure aborts the run; there is no recovered category.
#[derive(Debug, Error)]
pub enum MiningError {
    #[error("{container} capacity of {capacity} exceeded; raise the bound and re-run")]
    CapacityExceeded { container: Container, capacity: usize },
    #[error("item {item} outside the item domain [1, {domain}]")]
    ItemOutOfDomain { item: ItemId, domain: usize },
    #[error("mining invariant violated: {0}")]
    InvariantViolation(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

impl MiningError {
    pub(crate) fn capacity(container: Container, capacity: usize) -> Self {
        MiningError::CapacityExceeded { container, capacity }
    }

    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        MiningError::InvariantViolation(message.into())
    }
}

pub type Result<T> = std::result::Result<T, MiningError>;
