//! Forest nodes and arena indices.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Position of a node in the forest arena.
///
/// Indices are stable: nodes are never removed, so an index handed out by
/// the forest stays valid for the forest's lifetime.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeIndex(pub(crate) usize);

impl NodeIndex {
    /// Returns the raw arena slot.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Debug for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeIndex({})", self.0)
    }
}

/// One element of the forest.
///
/// The number of merge events between a node and the top of its tree is the
/// sum of `edge_weight` along its path plus the root's `base_weight`.
/// Compression redistributes edge weights along a path but never changes
/// that sum.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Node<K> {
    pub(crate) key: K,
    pub(crate) parent: NodeIndex,
    /// Only meaningful while this node is a root.
    pub(crate) size: usize,
    pub(crate) edge_weight: u64,
    /// Only nonzero while this node is a root.
    pub(crate) base_weight: u64,
}

impl<K: Copy> Node<K> {
    pub(crate) fn root(key: K, at: NodeIndex) -> Self {
        Self {
            key,
            parent: at,
            size: 1,
            edge_weight: 0,
            base_weight: 0,
        }
    }

    /// Returns the key this node was created for.
    #[must_use]
    pub fn key(&self) -> K {
        self.key
    }

    /// Returns the current parent (the node itself for a root).
    #[must_use]
    pub fn parent(&self) -> NodeIndex {
        self.parent
    }

    /// Returns the merge events carried by the edge to the parent.
    #[must_use]
    pub fn edge_weight(&self) -> u64 {
        self.edge_weight
    }

    /// Returns merge events held at this root and not yet pushed onto an edge.
    #[must_use]
    pub fn base_weight(&self) -> u64 {
        self.base_weight
    }

    /// Returns the subtree size recorded at this node.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Hangs this root under `parent`, folding its base weight into the new edge.
    pub(crate) fn attach_under(&mut self, parent: NodeIndex) {
        self.parent = parent;
        self.edge_weight = self.base_weight;
        self.base_weight = 0;
    }
}
