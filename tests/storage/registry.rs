//! Integration tests for the name registry
//!
//! Tests collision policy, removal, and console completion helpers.

use canopy_foundation::{EntityId, ErrorKind};
use canopy_storage::Registry;

fn e(index: u32) -> EntityId {
    EntityId::new(index, 1)
}

#[test]
fn collision_keeps_first_owner() {
    let mut registry = Registry::new();
    registry.add_entity(e(1), "foo").unwrap();

    let err = registry.add_entity(e(2), "foo").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NameCollision { .. }));
    assert_eq!(registry.get_entity("foo"), Some(e(1)));
}

#[test]
fn erased_name_can_be_reused() {
    let mut registry = Registry::new();
    registry.add_entity(e(1), "foo").unwrap();
    assert_eq!(registry.erase_entity("foo"), Some(e(1)));

    registry.add_entity(e(2), "foo").unwrap();
    assert_eq!(registry.get_entity("foo"), Some(e(2)));
}

#[test]
fn completion_of_shared_prefix() {
    let mut registry = Registry::new();
    registry.add_entity(e(1), "turbo_polizei").unwrap();
    registry.add_entity(e(2), "turbo_pickup").unwrap();
    registry.add_entity(e(3), "tree").unwrap();

    assert_eq!(registry.complete("tu"), "turbo_p");
    assert_eq!(registry.complete("tr"), "tree");
    assert_eq!(registry.get_number_of_completions("t"), 3);
    assert!(registry.get_completions("x").is_empty());
}

#[test]
fn snapshots_are_independent() {
    let mut registry = Registry::new();
    registry.add_entity(e(1), "foo").unwrap();
    let snapshot = registry.clone();

    registry.erase_entity("foo");
    assert!(snapshot.is_name("foo"));
    assert!(!registry.is_name("foo"));
}
