use super::tree::{NodeId, PrefixTree, TreeNode, ROOT};
use crate::error::{MiningError, Result};
use crate::fp::database::ItemId;
use crate::fp::provenance::Provenance;

/// One node of a flattened single-path tree.
#[derive(Debug, Clone, PartialEq)]
pub struct PathEntry {
    pub item: ItemId,
    pub count: f64,
    /// Sources of every insertion that passed through this node.
    pub provenance: Provenance,
}

impl PrefixTree {
    /// Child of `parent` holding `item`, found by scanning the sibling list.
    pub fn match_child(&self, parent: NodeId, item: ItemId) -> Option<NodeId> {
        self.children(parent).find(|&idx| self.nodes[idx].item == Some(item))
    }

    /// Inserts `items` top-down from the root, left to right.
    pub fn insert_path(&mut self, items: &[ItemId], count: f64, provenance: Option<Provenance>) -> Result<()> {
        self.insert_sequence(items.iter().copied(), count, provenance)
    }

    /// Same as `insert_path` but consumes `items` right to left, for lists
    /// gathered by walking parent pointers upward.
    pub fn insert_path_reverse(&mut self, items: &[ItemId], count: f64, provenance: Option<Provenance>) -> Result<()> {
        self.insert_sequence(items.iter().rev().copied(), count, provenance)
    }

    fn insert_sequence(
        &mut self,
        items: impl Iterator<Item = ItemId>,
        count: f64,
        provenance: Option<Provenance>,
    ) -> Result<()> {
        let mut current = ROOT;

        for item in items {
            let pos = self.header.position(item).ok_or_else(|| {
                MiningError::invariant(format!("item {item} inserted into a tree whose header lacks it"))
            })?;

            current = match self.match_child(current, item) {
                Some(child) => {
                    self.nodes[child].count += count;
                    child
                }
                None => self.attach_child(current, item, count, pos),
            };
            self.header.entry_mut(pos).weight += count;
        }

        // Only the last node of the path receives the provenance directly.
        if current != ROOT {
            if let Some(provenance) = provenance {
                self.nodes[current]
                    .provenance
                    .get_or_insert_with(Provenance::new)
                    .merge(&provenance);
            }
        }
        Ok(())
    }

    fn attach_child(&mut self, parent: NodeId, item: ItemId, count: f64, pos: usize) -> NodeId {
        let new_index = self.nodes.len();
        self.nodes.push(TreeNode::new_item(item, count, parent));

        match self.nodes[parent].last_child {
            Some(last) => self.nodes[last].sibling = Some(new_index),
            None => self.nodes[parent].first_child = Some(new_index),
        }
        self.nodes[parent].last_child = Some(new_index);

        let entry = self.header.entry_mut(pos);
        match entry.tail {
            Some(tail) => self.nodes[tail].node_link = Some(new_index),
            None => entry.head = Some(new_index),
        }
        let entry = self.header.entry_mut(pos);
        entry.tail = Some(new_index);
        entry.node_count += 1;

        new_index
    }

    /// Nodes of the header entry at `pos`, oldest first.
    pub fn chain(&self, pos: usize) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.header.entry(pos).head, move |&idx| self.nodes[idx].node_link)
    }

    /// `node` and its ancestors up to, but excluding, the root.
    pub fn path_to_root(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(node), move |&idx| self.nodes[idx].parent).filter(|&idx| idx != ROOT)
    }

    /// Children of `node` in insertion order.
    pub fn children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.nodes[node].first_child, move |&idx| self.nodes[idx].sibling)
    }

    pub fn is_single_path(&self) -> bool {
        let mut current = Some(ROOT);
        while let Some(idx) = current {
            let node = &self.nodes[idx];
            if node.first_child != node.last_child {
                return false;
            }
            current = node.first_child;
        }
        true
    }

    /// Flattens a single-path tree top-down. Each entry's provenance is the
    /// union of its own and every deeper node's, since insertions attach
    /// provenance only at the last node of their path.
    pub fn single_path(&self) -> Vec<PathEntry> {
        let mut path: Vec<PathEntry> = std::iter::successors(self.nodes[ROOT].first_child, |&idx| {
            self.nodes[idx].first_child
        })
        .filter_map(|idx| {
            let node = &self.nodes[idx];
            node.item.map(|item| PathEntry {
                item,
                count: node.count,
                provenance: node.provenance.clone().unwrap_or_default(),
            })
        })
        .collect();

        let mut below = Provenance::new();
        for entry in path.iter_mut().rev() {
            entry.provenance.merge(&below);
            below = entry.provenance.clone();
        }
        path
    }

    /// Union of the provenance of every node in the chain at `pos`.
    pub fn chain_provenance(&self, pos: usize) -> Provenance {
        let mut merged = Provenance::new();
        for idx in self.chain(pos) {
            if let Some(provenance) = &self.nodes[idx].provenance {
                merged.merge(provenance);
            }
        }
        merged
    }

    /// Merges the provenance of every node in the chain at `pos` into its
    /// parent, so an ancestor item mined later sees its descendants' sources.
    pub fn propagate_chain_provenance(&mut self, pos: usize) {
        let links: Vec<NodeId> = self.chain(pos).collect();
        for idx in links {
            let (Some(parent), Some(provenance)) = (self.nodes[idx].parent, self.nodes[idx].provenance.clone()) else {
                continue;
            };
            self.nodes[parent]
                .provenance
                .get_or_insert_with(Provenance::new)
                .merge(&provenance);
        }
    }
}
