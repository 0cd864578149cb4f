//! Versioned disjoint-set forest.
//!
//! Every merge event is accounted for by weights stored on the forest:
//! `edge_weight` on each non-root node and `base_weight` on each root. The
//! live rank of a node (merge events its lineage has seen) is the sum of edge
//! weights on its path plus the root's base weight, and path compression
//! rewrites each visited edge to the sum of the segment it skips so that
//! this total never changes.
//!
//! Two ways of joining sets are provided:
//!
//! - [`Forest::merge_fresh`] creates a brand-new root for a new key and hangs
//!   both old roots under it. The new root's base weight is 1 (the merge that
//!   created it); each old root folds its own base weight into its new edge.
//!   Base weights are therefore always 0 or 1, and a node's rank counts the
//!   merge-formed identities on its path, including itself.
//! - [`Forest::union`] is the plain union-by-size, where the larger root keeps
//!   its identity and only the absorbed side sees a merge event.

use std::fmt;
use std::hash::Hash;

use lineage_foundation::{AllocationFailure, Conflict, Error, IdMap, Result, Store};
use tracing::trace;

use crate::node::{Node, NodeIndex};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Disjoint-set forest keyed by `K`, with merge-history weights.
///
/// Nodes live in an arena and are never removed. A root is a node whose
/// parent is its own index.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(serialize = "K: Serialize", deserialize = "K: Deserialize<'de>"))
)]
pub struct Forest<K>
where
    K: Copy + Eq + Hash,
{
    nodes: Vec<Node<K>>,
    index: IdMap<K, NodeIndex>,
    node_limit: Option<usize>,
}

impl<K> Default for Forest<K>
where
    K: Copy + Eq + Hash + fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

fn missing<K: fmt::Debug>(key: K) -> Error {
    Error::conflict(Conflict::NodeNotFound(format!("{key:?}")))
}

fn present<K: fmt::Debug>(key: K) -> Error {
    Error::conflict(Conflict::NodeExists(format!("{key:?}")))
}

impl<K> Forest<K>
where
    K: Copy + Eq + Hash + fmt::Debug,
{
    /// Creates an empty forest.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            index: IdMap::new(),
            node_limit: None,
        }
    }

    /// Creates an empty forest with room for `capacity` nodes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            ..Self::new()
        }
    }

    /// Caps the number of nodes; growing past it is an allocation failure.
    #[must_use]
    pub fn with_node_limit(mut self, limit: Option<usize>) -> Self {
        self.node_limit = limit;
        self
    }

    /// Returns the configured node ceiling.
    #[must_use]
    pub fn node_limit(&self) -> Option<usize> {
        self.node_limit
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the forest has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns true if a node exists for `key`.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains(key)
    }

    /// Returns the arena index of `key`'s node.
    ///
    /// # Errors
    ///
    /// Returns [`Conflict::NodeNotFound`] if `key` has no node.
    pub fn index_of(&self, key: K) -> Result<NodeIndex> {
        self.index.get(&key).copied().ok_or_else(|| missing(key))
    }

    /// Returns `key`'s node for inspection.
    #[must_use]
    pub fn node(&self, key: K) -> Option<&Node<K>> {
        self.index.get(&key).map(|at| &self.nodes[at.0])
    }

    /// Returns the keys of all current roots.
    pub fn roots(&self) -> impl Iterator<Item = K> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(i, node)| node.parent.0 == *i)
            .map(|(_, node)| node.key)
    }

    /// Makes room for `additional` nodes.
    ///
    /// Every fallible allocation a mutation needs goes through here before
    /// the mutation starts, so a failure leaves the forest untouched.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationFailure::NodeLimit`] if the node ceiling would be
    /// exceeded, or [`AllocationFailure::Reserve`] if the allocator refuses.
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        if let Some(limit) = self.node_limit {
            if self.nodes.len().saturating_add(additional) > limit {
                return Err(Error::allocation(AllocationFailure::NodeLimit { limit }));
            }
        }
        self.nodes.try_reserve(additional)?;
        Ok(())
    }

    /// Creates a singleton set for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Conflict::NodeExists`] if `key` already has a node, or an
    /// allocation failure from [`Forest::reserve`].
    pub fn make_set(&mut self, key: K) -> Result<NodeIndex> {
        if self.contains(&key) {
            return Err(present(key));
        }
        self.reserve(1)?;
        Ok(self.push_root(key))
    }

    fn push_root(&mut self, key: K) -> NodeIndex {
        let at = NodeIndex(self.nodes.len());
        self.nodes.push(Node::root(key, at));
        let inserted = self.index.insert_if_absent(key, at);
        debug_assert!(inserted, "push_root called for an existing key");
        at
    }

    /// Walks to the root without compressing.
    fn root_of(&self, mut at: NodeIndex) -> NodeIndex {
        while self.nodes[at.0].parent != at {
            at = self.nodes[at.0].parent;
        }
        at
    }

    /// Returns the root above `at`, compressing the path.
    ///
    /// Two passes: the first finds the root and the total edge weight, the
    /// second points every visited node at the root with an edge equal to
    /// its remaining distance.
    ///
    /// # Panics
    ///
    /// Panics if `at` was not issued by this forest.
    pub fn find_index(&mut self, at: NodeIndex) -> NodeIndex {
        let mut root = at;
        let mut total = 0;
        while self.nodes[root.0].parent != root {
            total += self.nodes[root.0].edge_weight;
            root = self.nodes[root.0].parent;
        }

        let mut current = at;
        let mut remaining = total;
        while current != root {
            let node = &mut self.nodes[current.0];
            let next = node.parent;
            let edge = node.edge_weight;
            node.parent = root;
            node.edge_weight = remaining;
            remaining -= edge;
            current = next;
        }
        root
    }

    /// Returns the key of the root of `key`'s set.
    ///
    /// # Errors
    ///
    /// Returns [`Conflict::NodeNotFound`] if `key` has no node.
    pub fn find(&mut self, key: K) -> Result<K> {
        let at = self.index_of(key)?;
        let root = self.find_index(at);
        Ok(self.nodes[root.0].key)
    }

    /// Returns the number of merge events on `key`'s path as of now.
    ///
    /// # Errors
    ///
    /// Returns [`Conflict::NodeNotFound`] if `key` has no node.
    pub fn live_rank(&mut self, key: K) -> Result<u64> {
        let at = self.index_of(key)?;
        let root = self.find_index(at);
        // After compression `at` hangs directly off `root`; a root's edge is 0.
        Ok(self.nodes[at.0].edge_weight + self.nodes[root.0].base_weight)
    }

    /// Returns the size of the set containing `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Conflict::NodeNotFound`] if `key` has no node.
    pub fn size_of(&mut self, key: K) -> Result<usize> {
        let at = self.index_of(key)?;
        let root = self.find_index(at);
        Ok(self.nodes[root.0].size)
    }

    /// Returns the number of parent links between `key` and its root.
    ///
    /// Does not compress.
    ///
    /// # Errors
    ///
    /// Returns [`Conflict::NodeNotFound`] if `key` has no node.
    pub fn depth(&self, key: K) -> Result<usize> {
        let mut at = self.index_of(key)?;
        let mut depth = 0;
        while self.nodes[at.0].parent != at {
            at = self.nodes[at.0].parent;
            depth += 1;
        }
        Ok(depth)
    }

    /// Joins the sets of `a` and `b` by size.
    ///
    /// The larger root survives (ties keep `a`'s root) and keeps its
    /// identity; the absorbed root's members see one merge event. Returns
    /// `false` if the two keys already share a root.
    ///
    /// # Errors
    ///
    /// Returns [`Conflict::NodeNotFound`] if either key has no node.
    pub fn union(&mut self, a: K, b: K) -> Result<bool> {
        let ia = self.index_of(a)?;
        let ib = self.index_of(b)?;
        let ra = self.find_index(ia);
        let rb = self.find_index(ib);
        if ra == rb {
            return Ok(false);
        }

        let (survivor, absorbed) = if self.nodes[ra.0].size < self.nodes[rb.0].size {
            (rb, ra)
        } else {
            (ra, rb)
        };
        let survivor_base = self.nodes[survivor.0].base_weight;
        let edge = (self.nodes[absorbed.0].base_weight + 1)
            .checked_sub(survivor_base)
            .ok_or_else(|| Error::internal("survivor base weight exceeds absorbed rank"))?;

        let absorbed_size = self.nodes[absorbed.0].size;
        let node = &mut self.nodes[absorbed.0];
        node.parent = survivor;
        node.edge_weight = edge;
        node.base_weight = 0;
        self.nodes[survivor.0].size += absorbed_size;

        trace!(
            survivor = ?self.nodes[survivor.0].key,
            absorbed = ?self.nodes[absorbed.0].key,
            edge,
            "union"
        );
        Ok(true)
    }

    /// Creates a root for `new` and hangs the roots of `a` and `b` under it.
    ///
    /// Validation happens before any mutation: both sources must exist,
    /// `new` must not, the three keys must be distinct, the sources must not
    /// already share a root, and room for the new node must be available.
    ///
    /// # Errors
    ///
    /// Returns [`Conflict::NodeNotFound`], [`Conflict::NodeExists`] or
    /// [`Conflict::AlreadyJoined`] on invalid keys, or an allocation failure
    /// from [`Forest::reserve`].
    pub fn merge_fresh(&mut self, a: K, b: K, new: K) -> Result<NodeIndex> {
        let ia = self.index_of(a)?;
        let ib = self.index_of(b)?;
        if self.contains(&new) {
            return Err(present(new));
        }
        let (ra, rb) = (self.root_of(ia), self.root_of(ib));
        if ra == rb {
            return Err(Error::conflict(Conflict::AlreadyJoined(format!(
                "{a:?}, {b:?}"
            ))));
        }
        self.reserve(1)?;

        let ra = self.find_index(ia);
        let rb = self.find_index(ib);
        let fresh = self.push_root(new);
        let mut size = 1;
        for old in [ra, rb] {
            let node = &mut self.nodes[old.0];
            node.attach_under(fresh);
            size += node.size;
        }
        let root = &mut self.nodes[fresh.0];
        root.size = size;
        root.base_weight = 1;

        trace!(?a, ?b, ?new, size, "merge_fresh");
        Ok(fresh)
    }

    /// Returns the node that was `key`'s root when `key`'s live rank was
    /// `snapshot`.
    ///
    /// Walks upward accumulating edge weights and stops at the first node
    /// whose cumulative weight reaches the snapshot (inclusive); if none
    /// does, the current root is returned. Exact for lineages built with
    /// [`Forest::merge_fresh`]; where compression has already collapsed
    /// several merges into one edge, the answer is the oldest node still on
    /// the path. Never mutates the forest.
    ///
    /// # Errors
    ///
    /// Returns [`Conflict::NodeNotFound`] if `key` has no node.
    pub fn as_of(&self, key: K, snapshot: u64) -> Result<K> {
        let mut at = self.index_of(key)?;
        let mut acc = 0;
        loop {
            let node = &self.nodes[at.0];
            if node.parent == at || acc + node.edge_weight >= snapshot {
                return Ok(node.key);
            }
            acc += node.edge_weight;
            at = node.parent;
        }
    }

    /// Checks the structural invariants of the forest.
    ///
    /// Roots carry no edge weight, non-roots carry no base weight, every
    /// parent link is in range and reaches a root, root sizes add up to the
    /// node count, and the key index agrees with the arena.
    ///
    /// # Errors
    ///
    /// Returns an internal error describing the first violation found.
    pub fn verify(&self) -> Result<()> {
        let len = self.nodes.len();
        if self.index.len() != len {
            return Err(Error::internal(format!(
                "index holds {} keys for {len} nodes",
                self.index.len()
            )));
        }

        let mut root_sizes = 0;
        for (i, node) in self.nodes.iter().enumerate() {
            if self.index.get(&node.key) != Some(&NodeIndex(i)) {
                return Err(Error::internal(format!(
                    "index disagrees for {:?}",
                    node.key
                )));
            }
            if node.parent.0 >= len {
                return Err(Error::internal(format!(
                    "{:?} has out-of-range parent",
                    node.key
                )));
            }
            if node.parent.0 == i {
                if node.edge_weight != 0 {
                    return Err(Error::internal(format!(
                        "root {:?} has edge weight {}",
                        node.key, node.edge_weight
                    )));
                }
                root_sizes += node.size;
            } else if node.base_weight != 0 {
                return Err(Error::internal(format!(
                    "non-root {:?} has base weight {}",
                    node.key, node.base_weight
                )));
            }

            let mut at = NodeIndex(i);
            let mut steps = 0;
            while self.nodes[at.0].parent != at {
                at = self.nodes[at.0].parent;
                steps += 1;
                if steps > len {
                    return Err(Error::internal(format!(
                        "cycle above {:?}",
                        node.key
                    )));
                }
            }
        }

        if root_sizes != len {
            return Err(Error::internal(format!(
                "root sizes sum to {root_sizes} for {len} nodes"
            )));
        }
        Ok(())
    }
}
