//! Integration tests for fresh-root merges
//!
//! Tests root identity, rank accounting across chained merges, and compression.

use lineage_forest::Forest;
use lineage_foundation::{Conflict, ErrorKind, Status};

fn forest_with(keys: &[u32]) -> Forest<u32> {
    let mut forest = Forest::new();
    for &k in keys {
        forest.make_set(k).unwrap();
    }
    forest
}

// =============================================================================
// Merge Basics
// =============================================================================

#[test]
fn merge_creates_new_root_over_both_sets() {
    let mut forest = forest_with(&[1, 2]);
    forest.merge_fresh(1, 2, 3).unwrap();

    assert_eq!(forest.find(1).unwrap(), 3);
    assert_eq!(forest.find(2).unwrap(), 3);
    assert_eq!(forest.find(3).unwrap(), 3);
    assert_eq!(forest.size_of(1).unwrap(), 3);
    assert_eq!(forest.roots().collect::<Vec<_>>(), vec![3]);
}

#[test]
fn every_merge_counts_once_per_lineage() {
    let mut forest = forest_with(&[1, 2, 4]);
    forest.merge_fresh(1, 2, 3).unwrap();
    forest.merge_fresh(3, 4, 5).unwrap();

    assert_eq!(forest.live_rank(1).unwrap(), 2);
    assert_eq!(forest.live_rank(2).unwrap(), 2);
    assert_eq!(forest.live_rank(3).unwrap(), 2);
    assert_eq!(forest.live_rank(4).unwrap(), 1);
    assert_eq!(forest.live_rank(5).unwrap(), 1);
}

#[test]
fn singleton_has_rank_zero() {
    let mut forest = forest_with(&[7]);
    assert_eq!(forest.live_rank(7).unwrap(), 0);
    assert_eq!(forest.depth(7).unwrap(), 0);
}

// =============================================================================
// Compression
// =============================================================================

#[test]
fn long_chain_compresses_without_changing_rank() {
    let mut forest = forest_with(&[0]);
    let mut top = 0;
    for step in 1..=50u32 {
        let single = 1000 + step;
        forest.make_set(single).unwrap();
        forest.merge_fresh(top, single, step).unwrap();
        top = step;
    }

    assert_eq!(forest.depth(0).unwrap(), 50);
    assert_eq!(forest.live_rank(0).unwrap(), 50);
    assert_eq!(forest.depth(0).unwrap(), 1);
    assert_eq!(forest.live_rank(0).unwrap(), 50);
    assert_eq!(forest.live_rank(25).unwrap(), 26);
    forest.verify().unwrap();
}

#[test]
fn merging_after_compression_keeps_counts() {
    let mut forest = forest_with(&[1, 2, 4, 6]);
    forest.merge_fresh(1, 2, 3).unwrap();
    forest.merge_fresh(3, 4, 5).unwrap();
    forest.find(1).unwrap();
    forest.merge_fresh(5, 6, 7).unwrap();

    assert_eq!(forest.live_rank(1).unwrap(), 3);
    assert_eq!(forest.live_rank(4).unwrap(), 2);
    assert_eq!(forest.live_rank(6).unwrap(), 1);
    forest.verify().unwrap();
}

// =============================================================================
// Rejections
// =============================================================================

#[test]
fn merge_of_joined_keys_is_rejected() {
    let mut forest = forest_with(&[1, 2]);
    forest.merge_fresh(1, 2, 3).unwrap();
    let before = forest.clone();

    let err = forest.merge_fresh(1, 2, 4).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::Conflict(Conflict::AlreadyJoined(_))
    ));
    assert_eq!(forest, before);
}

#[test]
fn merge_into_existing_key_is_rejected() {
    let mut forest = forest_with(&[1, 2]);
    let before = forest.clone();

    let result = forest.merge_fresh(1, 2, 2);
    assert_eq!(Status::of(&result), Status::Failure);
    assert_eq!(forest, before);
}

#[test]
fn node_limit_blocks_merge() {
    let mut forest = Forest::new().with_node_limit(Some(2));
    forest.make_set(1u32).unwrap();
    forest.make_set(2).unwrap();

    let result = forest.merge_fresh(1, 2, 3);
    assert_eq!(Status::of(&result), Status::AllocationError);
    assert_eq!(forest.len(), 2);
}
