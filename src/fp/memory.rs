use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Container, MiningError, Result};

/// Live tree-node accounting across the global tree and every conditional
/// tree that is alive at the same time.
#[derive(Debug)]
pub struct NodeBudget {
    max_nodes: usize,
    live_nodes: AtomicUsize,
    peak_nodes: AtomicUsize,
}

impl NodeBudget {
    pub fn new(max_nodes: usize) -> Self {
        Self {
            max_nodes,
            live_nodes: AtomicUsize::new(0),
            peak_nodes: AtomicUsize::new(0),
        }
    }

    pub fn unlimited() -> Self {
        Self::new(usize::MAX)
    }

    pub fn from_limit(limit: Option<usize>) -> Self {
        limit.map_or_else(Self::unlimited, Self::new)
    }

    pub fn allocate(&self, nodes: usize) -> Result<()> {
        let current = self.live_nodes.fetch_add(nodes, Ordering::SeqCst);
        let live = current.saturating_add(nodes);
        if live > self.max_nodes {
            self.live_nodes.fetch_sub(nodes, Ordering::SeqCst);
            return Err(MiningError::capacity(Container::TreeNodePool, self.max_nodes));
        }
        self.peak_nodes.fetch_max(live, Ordering::SeqCst);
        Ok(())
    }

    pub fn release(&self, nodes: usize) {
        self.live_nodes.fetch_sub(nodes, Ordering::SeqCst);
    }

    pub fn peak_nodes(&self) -> usize {
        self.peak_nodes.load(Ordering::SeqCst)
    }
}

/// Holds a tree's nodes against the budget until dropped.
pub struct NodeGuard<'a> {
    budget: &'a NodeBudget,
    nodes: usize,
}

impl<'a> NodeGuard<'a> {
    pub fn new(budget: &'a NodeBudget, nodes: usize) -> Result<Self> {
        budget.allocate(nodes)?;
        Ok(Self { budget, nodes })
    }
}

impl<'a> Drop for NodeGuard<'a> {
    fn drop(&mut self) {
        self.budget.release(self.nodes);
    }
}

/// Counters collected while growing patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GrowthStats {
    pub global_tree_nodes: usize,
    pub conditional_trees: usize,
    pub conditional_nodes: usize,
    pub peak_live_nodes: usize,
    pub single_path_hits: usize,
}
