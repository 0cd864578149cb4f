//! Integration tests for Layer 1: Forest
//!
//! Tests fresh-root merges, plain unions, rank accounting, and history queries.

mod merges;
mod unions;
