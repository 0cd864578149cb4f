//! Integration tests for merge scenarios

use lineage_foundation::GroupId;
use lineage_registry::{Registry, RegistryConfig};

fn group(raw: i64) -> GroupId {
    GroupId::new(raw).unwrap()
}

fn strict() -> Registry {
    Registry::with_config(RegistryConfig::strict())
}

// =============================================================================
// Single and Chained Merges
// =============================================================================

#[test]
fn two_groups_merge_into_a_third() {
    let mut r = strict();
    r.create_group(1).unwrap();
    r.create_group(2).unwrap();
    r.add_entity(10, 1).unwrap();
    r.add_entity(11, 2).unwrap();
    r.merge_groups(1, 2, 3).unwrap();

    assert_eq!(r.current_group_of(10).unwrap(), group(3));
    assert_eq!(r.current_group_of(11).unwrap(), group(3));
    assert_eq!(r.live_entity_count_of(3).unwrap(), 2);
    assert_eq!(r.live_entity_count_of(1).unwrap(), 0);
    assert_eq!(r.live_entity_count_of(2).unwrap(), 0);
    assert_eq!(r.merge_events_since(10).unwrap(), 1);
}

#[test]
fn chained_merge_counts_per_entity() {
    let mut r = strict();
    r.create_group(1).unwrap();
    r.create_group(2).unwrap();
    r.add_entity(10, 1).unwrap();
    r.add_entity(11, 2).unwrap();
    r.merge_groups(1, 2, 3).unwrap();
    r.create_group(4).unwrap();
    r.add_entity(12, 4).unwrap();
    r.merge_groups(3, 4, 5).unwrap();

    assert_eq!(r.current_group_of(10).unwrap(), group(5));
    assert_eq!(r.current_group_of(12).unwrap(), group(5));
    assert_eq!(r.merge_events_since(10).unwrap(), 2);
    assert_eq!(r.merge_events_since(11).unwrap(), 2);
    assert_eq!(r.merge_events_since(12).unwrap(), 1);
    assert_eq!(r.live_entity_count_of(5).unwrap(), 3);
}

#[test]
fn empty_groups_can_merge() {
    let mut r = strict();
    r.create_group(1).unwrap();
    r.create_group(2).unwrap();
    r.merge_groups(2, 1, 3).unwrap();

    assert_eq!(r.live_entity_count_of(3).unwrap(), 0);
    assert_eq!(r.group(3).unwrap().formed_from(), Some((group(2), group(1))));
}

#[test]
fn entity_in_new_group_counts_only_later_merges() {
    let mut r = strict();
    for g in [1, 2, 4] {
        r.create_group(g).unwrap();
    }
    r.merge_groups(1, 2, 3).unwrap();
    r.add_entity(30, 3).unwrap();
    assert_eq!(r.merge_events_since(30).unwrap(), 0);

    r.merge_groups(3, 4, 5).unwrap();
    assert_eq!(r.merge_events_since(30).unwrap(), 1);
    assert_eq!(r.group_at_insertion(30).unwrap(), group(3));
}

// =============================================================================
// Long Lineages
// =============================================================================

#[test]
fn deep_lineage_stays_consistent() {
    let mut r = strict();
    r.create_group(1).unwrap();
    r.add_entity(1, 1).unwrap();
    let mut top = 1;
    for step in 0..100 {
        let single = 10_000 + step;
        let merged = 20_000 + step;
        r.create_group(single).unwrap();
        r.add_entity(single, single).unwrap();
        r.merge_groups(top, single, merged).unwrap();
        top = merged;
    }

    assert_eq!(r.current_group_of(1).unwrap(), group(top));
    assert_eq!(r.merge_events_since(1).unwrap(), 100);
    assert_eq!(r.merge_events_since(10_050).unwrap(), 50);
    assert_eq!(r.group_at_insertion(1).unwrap(), group(1));
    assert_eq!(r.live_entity_count_of(top).unwrap(), 101);
    assert_eq!(r.total_live_entities(), r.entity_count());
    r.verify().unwrap();
}

#[test]
fn repeated_queries_agree() {
    let mut r = Registry::new();
    for g in [1, 2, 4, 6] {
        r.create_group(g).unwrap();
    }
    r.add_entity(5, 4).unwrap();
    r.merge_groups(1, 2, 3).unwrap();
    r.merge_groups(4, 3, 7).unwrap();
    r.merge_groups(6, 7, 8).unwrap();

    let first = (r.current_group_of(5).unwrap(), r.merge_events_since(5).unwrap());
    let second = (r.current_group_of(5).unwrap(), r.merge_events_since(5).unwrap());
    assert_eq!(first, (group(8), 2));
    assert_eq!(first, second);
}
