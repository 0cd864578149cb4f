//! Integration tests for plain union-by-size

use lineage_forest::Forest;

fn forest_with(keys: &[u32]) -> Forest<u32> {
    let mut forest = Forest::new();
    for &k in keys {
        forest.make_set(k).unwrap();
    }
    forest
}

#[test]
fn union_keeps_first_root_on_tie() {
    let mut forest = forest_with(&[1, 2]);
    assert!(forest.union(1, 2).unwrap());

    assert_eq!(forest.find(2).unwrap(), 1);
    assert_eq!(forest.live_rank(1).unwrap(), 0);
    assert_eq!(forest.live_rank(2).unwrap(), 1);
}

#[test]
fn union_is_noop_for_joined_keys() {
    let mut forest = forest_with(&[1, 2]);
    forest.union(1, 2).unwrap();
    let before = forest.clone();

    assert!(!forest.union(2, 1).unwrap());
    assert_eq!(forest, before);
}

#[test]
fn larger_set_survives() {
    let mut forest = forest_with(&[1, 2, 3]);
    forest.union(2, 3).unwrap();
    forest.union(1, 2).unwrap();

    assert_eq!(forest.find(1).unwrap(), 2);
    assert_eq!(forest.size_of(1).unwrap(), 3);
    assert_eq!(forest.live_rank(3).unwrap(), 1);
    assert_eq!(forest.live_rank(1).unwrap(), 1);
    forest.verify().unwrap();
}

#[test]
fn union_with_unknown_key_fails() {
    let mut forest = forest_with(&[1]);
    assert!(forest.union(1, 9).is_err());
}
