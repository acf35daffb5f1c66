// Tree module - prefix tree, header table and node-link traversal

mod tree;
mod tree_ops;

pub use tree::{HeaderEntry, HeaderTable, NodeId, PrefixTree, TreeNode, ROOT};
pub use tree_ops::PathEntry;
