//! Integration tests for rejected calls and status codes

use lineage_foundation::{Conflict, ErrorKind, GroupId, Status};
use lineage_registry::{Registry, RegistryConfig};

fn with_groups(groups: &[i64]) -> Registry {
    let mut r = Registry::with_config(RegistryConfig::strict());
    for &g in groups {
        r.create_group(g).unwrap();
    }
    r
}

// =============================================================================
// Status Codes
// =============================================================================

#[test]
fn success_status() {
    let mut r = Registry::new();
    assert_eq!(Status::of(&r.create_group(1)), Status::Success);
    assert_eq!(Status::Success.to_string(), "SUCCESS");
}

#[test]
fn non_positive_ids_report_invalid_input() {
    let mut r = with_groups(&[1, 2]);
    for raw in [0, -5] {
        assert_eq!(Status::of(&r.create_group(raw)), Status::InvalidInput);
        assert_eq!(Status::of(&r.add_entity(raw, 1)), Status::InvalidInput);
        assert_eq!(Status::of(&r.merge_groups(raw, 1, 2)), Status::InvalidInput);
        assert_eq!(Status::of(&r.current_group_of(raw)), Status::InvalidInput);
        assert_eq!(Status::of(&r.live_entity_count_of(raw)), Status::InvalidInput);
        assert_eq!(Status::of(&r.merge_events_since(raw)), Status::InvalidInput);
    }
}

#[test]
fn coinciding_merge_ids_report_invalid_input() {
    let mut r = with_groups(&[1, 2]);
    assert_eq!(Status::of(&r.merge_groups(1, 1, 3)), Status::InvalidInput);
    assert_eq!(Status::of(&r.merge_groups(1, 2, 1)), Status::InvalidInput);
    assert_eq!(Status::of(&r.merge_groups(1, 2, 2)), Status::InvalidInput);
}

#[test]
fn unknown_ids_report_failure() {
    let mut r = with_groups(&[1]);
    assert_eq!(Status::of(&r.add_entity(10, 2)), Status::Failure);
    assert_eq!(Status::of(&r.merge_groups(1, 2, 3)), Status::Failure);
    assert_eq!(Status::of(&r.current_group_of(10)), Status::Failure);
    assert_eq!(Status::of(&r.live_entity_count_of(2)), Status::Failure);
    assert_eq!(Status::Failure.to_string(), "FAILURE");
}

#[test]
fn limits_report_allocation_error() {
    let mut r = Registry::with_config(
        RegistryConfig::default()
            .with_node_limit(2)
            .with_entity_limit(1),
    );
    r.create_group(1).unwrap();
    r.create_group(2).unwrap();
    r.add_entity(10, 1).unwrap();

    assert_eq!(Status::of(&r.create_group(3)), Status::AllocationError);
    assert_eq!(Status::of(&r.merge_groups(1, 2, 3)), Status::AllocationError);
    assert_eq!(Status::of(&r.add_entity(11, 2)), Status::AllocationError);
}

// =============================================================================
// All-or-Nothing
// =============================================================================

#[test]
fn rejected_merges_change_nothing() {
    let mut r = with_groups(&[1, 2, 4]);
    r.add_entity(10, 1).unwrap();
    r.merge_groups(1, 2, 3).unwrap();
    let before = r.clone();

    assert!(r.merge_groups(1, 4, 6).is_err());
    assert!(r.merge_groups(3, 4, 2).is_err());
    assert!(r.merge_groups(3, 9, 6).is_err());
    assert!(r.merge_groups(3, 4, 3).is_err());
    assert_eq!(r, before);
}

#[test]
fn rejected_additions_change_nothing() {
    let mut r = with_groups(&[1, 2]);
    r.add_entity(10, 1).unwrap();
    r.merge_groups(1, 2, 3).unwrap();
    let before = r.clone();

    assert!(r.add_entity(10, 3).is_err());
    assert!(r.add_entity(11, 1).is_err());
    assert!(r.add_entity(11, 9).is_err());
    assert!(r.create_group(2).is_err());
    assert_eq!(r, before);
}

#[test]
fn absorbed_group_names_its_successor() {
    let mut r = with_groups(&[1, 2]);
    r.merge_groups(1, 2, 3).unwrap();

    let err = r.add_entity(10, 2).unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::Conflict(Conflict::GroupAbsorbed {
            group: GroupId::new(2).unwrap(),
            into: GroupId::new(3).unwrap(),
        })
    );
    assert!(err.to_string().contains("Group(3)"));
}
