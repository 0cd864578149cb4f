//! Versioned disjoint-set forest for Lineage.
//!
//! This crate provides:
//! - [`Forest`] - Union-find over keyed nodes with merge-history weights
//! - [`Node`] / [`NodeIndex`] - Arena nodes and their stable indices
//!
//! Unlike a plain union-find, merging can fabricate a brand-new root
//! ([`Forest::merge_fresh`]), and every node can report how many merge
//! events its lineage has seen ([`Forest::live_rank`]) or which node was its
//! root at an earlier rank ([`Forest::as_of`]).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod forest;
pub mod node;

pub use forest::Forest;
pub use node::{Node, NodeIndex};
