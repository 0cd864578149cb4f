//! Typed ids, errors, status codes, and id-keyed storage for Lineage.
//!
//! This crate provides:
//! - [`GroupId`] / [`EntityId`] - Validated positive identifiers
//! - [`Error`] - Categorized error types with context
//! - [`Status`] - Caller-facing outcome codes
//! - [`IdMap`] - Persistent associative store implementing [`Store`]

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collections;
pub mod error;
pub mod id;

pub use collections::{IdMap, Store};
pub use error::{
    AllocationFailure, Conflict, Error, ErrorContext, ErrorKind, InvalidInput, Result, Status,
};
pub use id::{EntityId, GroupId, distinct};
