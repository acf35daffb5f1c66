use rustc_hash::FxHashMap;

use crate::fp::database::ItemId;
use crate::fp::provenance::Provenance;

/// Index of a node in its tree's arena.
pub type NodeId = usize;

pub const ROOT: NodeId = 0;

/// One `(item, path prefix)` occurrence.
///
/// The arena owns every node; `first_child`/`last_child`/`sibling` are the
/// owning shape of the tree, while `parent` and `node_link` are traversal
/// back-references.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub item: Option<ItemId>,
    pub count: f64,
    pub provenance: Option<Provenance>,
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub last_child: Option<NodeId>,
    pub sibling: Option<NodeId>,
    pub node_link: Option<NodeId>,
}

impl TreeNode {
    pub fn new_root() -> Self {
        Self {
            item: None,
            count: 0.0,
            provenance: None,
            parent: None,
            first_child: None,
            last_child: None,
            sibling: None,
            node_link: None,
        }
    }

    pub fn new_item(item: ItemId, count: f64, parent: NodeId) -> Self {
        Self {
            item: Some(item),
            count,
            parent: Some(parent),
            ..Self::new_root()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderEntry {
    pub item: ItemId,
    /// Sum of the counts of every node in the chain.
    pub weight: f64,
    pub node_count: usize,
    pub head: Option<NodeId>,
    pub tail: Option<NodeId>,
}

impl HeaderEntry {
    fn new(item: ItemId) -> Self {
        Self {
            item,
            weight: 0.0,
            node_count: 0,
            head: None,
            tail: None,
        }
    }
}

/// Items of a tree in canonical order, each with its node-link chain.
#[derive(Debug, Clone, Default)]
pub struct HeaderTable {
    entries: Vec<HeaderEntry>,
    positions: FxHashMap<ItemId, usize>,
}

impl HeaderTable {
    /// Builds an empty-chained header whose order is the iteration order.
    pub fn from_ranked(items: impl IntoIterator<Item = ItemId>) -> Self {
        let mut header = Self::default();
        for item in items {
            header.positions.insert(item, header.entries.len());
            header.entries.push(HeaderEntry::new(item));
        }
        header
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn position(&self, item: ItemId) -> Option<usize> {
        self.positions.get(&item).copied()
    }

    pub fn entry(&self, pos: usize) -> &HeaderEntry {
        &self.entries[pos]
    }

    pub(crate) fn entry_mut(&mut self, pos: usize) -> &mut HeaderEntry {
        &mut self.entries[pos]
    }

    pub fn entries(&self) -> &[HeaderEntry] {
        &self.entries
    }

    pub fn items(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.entries.iter().map(|entry| entry.item)
    }
}

/// Shared-prefix tree plus its header table.
#[derive(Debug, Clone)]
pub struct PrefixTree {
    pub(crate) nodes: Vec<TreeNode>,
    pub(crate) header: HeaderTable,
}

impl PrefixTree {
    pub fn new(header: HeaderTable) -> Self {
        Self {
            nodes: vec![TreeNode::new_root()],
            header,
        }
    }

    pub fn header(&self) -> &HeaderTable {
        &self.header
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id]
    }

    /// Item nodes, excluding the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - 1
    }
}
