//! Lineage - Versioned disjoint-set forest with merge history
//!
//! This crate re-exports all layers of the Lineage system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: lineage_registry   — Groups, entities, validating facade
//! Layer 1: lineage_forest     — Weighted union-find with fresh-root merges
//! Layer 0: lineage_foundation — Core types (GroupId, EntityId, Error, Status)
//! ```

pub use lineage_forest as forest;
pub use lineage_foundation as foundation;
pub use lineage_registry as registry;
