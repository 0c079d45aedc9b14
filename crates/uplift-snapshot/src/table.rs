//! The node table
//!
//! Ordered, index-addressable storage for every node in a snapshot. The
//! table exposes exactly the operations migration is allowed to perform:
//! indexed read, indexed in-place replace, and append. Append always
//! assigns the next sequential position, so an index issued earlier never
//! changes meaning. There is no removal; tombstoning a node in place is
//! the only sanctioned way to retire one.

use crate::index::NodeIndex;
use crate::node::Node;
use serde::{Deserialize, Serialize};

/// Ordered, index-addressed collection of nodes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeTable {
    nodes: Vec<Node>,
}

impl NodeTable {
    /// Create an empty table
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries, tombstones included
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the table has no entries
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether an index falls inside the table
    #[inline]
    #[must_use]
    pub fn contains(&self, index: NodeIndex) -> bool {
        index.position() < self.nodes.len()
    }

    /// Read the node at an index
    #[inline]
    #[must_use]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index.position())
    }

    /// Mutably borrow the node at an index
    #[inline]
    #[must_use]
    pub fn get_mut(&mut self, index: NodeIndex) -> Option<&mut Node> {
        self.nodes.get_mut(index.position())
    }

    /// Replace the node at an index, returning the previous entry
    ///
    /// Returns `None` (and leaves the table unchanged) if the index is out
    /// of bounds.
    pub fn replace(&mut self, index: NodeIndex, node: Node) -> Option<Node> {
        let slot = self.nodes.get_mut(index.position())?;
        Some(std::mem::replace(slot, node))
    }

    /// Append a node, returning the index it was assigned
    ///
    /// The assigned index is the table length before the append.
    pub fn append(&mut self, node: Node) -> NodeIndex {
        let index = NodeIndex::new(self.nodes.len());
        self.nodes.push(node);
        index
    }

    /// Iterate nodes in table order
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Iterate `(index, node)` pairs in table order
    pub fn iter_indexed(&self) -> impl Iterator<Item = (NodeIndex, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeIndex::new(i), n))
    }
}

impl From<Vec<Node>> for NodeTable {
    fn from(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }
}
