//! Group and entity registry for Lineage.
//!
//! This crate provides:
//! - [`Registry`] - Validating facade over groups, entities and their lineage
//! - [`GroupRecord`] / [`EntityRecord`] - Per-id metadata
//! - [`RegistryConfig`] - Capacity ceilings and self-checking

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod records;
pub mod registry;

pub use config::RegistryConfig;
pub use records::{EntityRecord, GroupRecord};
pub use registry::Registry;
