//! Integration tests for parent and child modules
//!
//! Tests binding, capability checks, slot reuse and release on destruction.

use canopy_foundation::{BindingError, EntityId, EntityKind, ErrorKind, Relation};
use canopy_storage::{ChildModule, ParentModule};

fn e(index: u32) -> EntityId {
    EntityId::new(index, 1)
}

fn universe_scenes() -> ParentModule {
    ParentModule::new(e(0), Relation::Scenes)
}

// =============================================================================
// Binding
// =============================================================================

#[test]
fn bind_child_assigns_sequential_slots() {
    let mut parent = universe_scenes();
    let a = parent.bind_child(e(1), EntityKind::Scene).unwrap();
    let b = parent.bind_child(e(2), EntityKind::Scene).unwrap();

    assert_eq!(a.child_id(), Some(0));
    assert_eq!(b.child_id(), Some(1));
    assert_eq!(a.get_parent(), Some(e(0)));
    assert_eq!(parent.get_number_of_children(), 2);
    assert_eq!(parent.get(1), Some(e(2)));
}

#[test]
fn bind_child_rejects_wrong_kind() {
    let mut parent = universe_scenes();
    let err = parent.bind_child(e(1), EntityKind::Console).unwrap_err();

    assert!(matches!(
        err.kind,
        ErrorKind::Binding(BindingError::KindMismatch {
            relation: Relation::Scenes,
            child: EntityKind::Console,
        })
    ));
    assert!(parent.is_empty());
    assert_eq!(parent.slots().len(), 0);
}

#[test]
fn overload_module_accepts_every_signature() {
    let mut parent = ParentModule::new(e(0), Relation::LispFunctionOverloads);
    for (index, kind) in (1..).zip(EntityKind::OVERLOADS) {
        parent.bind_child(e(index), kind).unwrap();
    }
    assert_eq!(parent.get_number_of_children(), 4);
}

// =============================================================================
// Release
// =============================================================================

#[test]
fn destroyed_child_frees_slot_for_next_bind() {
    let mut parent = universe_scenes();
    let mut modules: Vec<ChildModule> = (1..=3)
        .map(|index| parent.bind_child(e(index), EntityKind::Scene).unwrap())
        .collect();

    assert!(modules[1].notify_destroyed(e(2), &mut parent));
    let reused = parent.bind_child(e(4), EntityKind::Scene).unwrap();

    assert_eq!(reused.child_id(), Some(1));
    assert_eq!(parent.get(1), Some(e(4)));
    assert_eq!(parent.get_number_of_children(), 3);
}

#[test]
fn unbind_of_free_slot_reports_false() {
    let mut parent = universe_scenes();
    parent.bind_child(e(1), EntityKind::Scene).unwrap();
    parent.bind_child(e(2), EntityKind::Scene).unwrap();

    assert!(parent.unbind_child(0));
    assert!(!parent.unbind_child(0));
    assert!(!parent.unbind_child(42));
    assert_eq!(parent.get_number_of_children(), 1);
}

#[test]
fn descendants_use_callback_per_child() {
    let mut parent = universe_scenes();
    parent.bind_child(e(1), EntityKind::Scene).unwrap();
    parent.bind_child(e(2), EntityKind::Scene).unwrap();

    let total = parent.get_number_of_descendants(|child| if child == e(1) { 3 } else { 0 });
    assert_eq!(total, 5);
}

#[test]
fn children_iterate_in_slot_order() {
    let mut parent = universe_scenes();
    for index in 1..=4 {
        parent.bind_child(e(index), EntityKind::Scene).unwrap();
    }
    parent.unbind_child(1);

    let children: Vec<_> = parent.children().collect();
    assert_eq!(children, vec![(0, e(1)), (2, e(3)), (3, e(4))]);
}
