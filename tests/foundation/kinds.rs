//! Integration tests for entity kinds, relations and handles

use canopy_foundation::{EntityId, EntityKind, OverloadSignature, Relation};

const ALL_KINDS: [EntityKind; 12] = [
    EntityKind::Universe,
    EntityKind::Scene,
    EntityKind::Shader,
    EntityKind::Material,
    EntityKind::Species,
    EntityKind::Object,
    EntityKind::Console,
    EntityKind::LispFunction,
    EntityKind::OVERLOADS[0],
    EntityKind::OVERLOADS[1],
    EntityKind::OVERLOADS[2],
    EntityKind::OVERLOADS[3],
];

// =============================================================================
// Relationship Table
// =============================================================================

#[test]
fn only_universe_is_a_root_kind() {
    for kind in ALL_KINDS {
        assert_eq!(kind.child_relation().is_none(), kind == EntityKind::Universe, "{kind}");
    }
}

#[test]
fn every_child_kind_has_a_parent_kind() {
    for kind in ALL_KINDS {
        let Some(relation) = kind.child_relation() else {
            continue;
        };
        assert!(relation.accepts(kind));
        assert!(
            ALL_KINDS.iter().any(|parent| parent.exposes(relation)),
            "nothing exposes {relation}"
        );
    }
}

#[test]
fn render_chain() {
    let chain = [
        EntityKind::Universe,
        EntityKind::Scene,
        EntityKind::Shader,
        EntityKind::Material,
        EntityKind::Species,
        EntityKind::Object,
    ];
    for pair in chain.windows(2) {
        let relation = pair[1].child_relation().unwrap();
        assert!(pair[0].exposes(relation), "{} should own {}", pair[0], pair[1]);
    }
    assert!(EntityKind::Object.parent_relations().is_empty());
}

#[test]
fn console_chain() {
    assert!(EntityKind::Universe.exposes(Relation::Consoles));
    assert!(EntityKind::Console.exposes(Relation::LispFunctions));
    assert!(EntityKind::LispFunction.exposes(Relation::LispFunctionOverloads));
    for overload in EntityKind::OVERLOADS {
        assert!(Relation::LispFunctionOverloads.accepts(overload));
        assert!(overload.is_lisp_function_overload());
        assert!(overload.parent_relations().is_empty());
    }
    assert!(!Relation::LispFunctionOverloads.accepts(EntityKind::LispFunction));
}

#[test]
fn relations_reject_foreign_kinds() {
    assert!(!Relation::Scenes.accepts(EntityKind::Console));
    assert!(!Relation::Objects.accepts(EntityKind::Species));
    assert!(!Relation::Species.accepts(EntityKind::Object));
}

// =============================================================================
// Overload Signatures
// =============================================================================

#[test]
fn overload_arity() {
    assert!(OverloadSignature::Nullary.accepts_arity(0));
    assert!(!OverloadSignature::Nullary.accepts_arity(1));
    assert!(OverloadSignature::Unary.accepts_arity(1));
    assert!(OverloadSignature::Binary.accepts_arity(2));
    assert!(!OverloadSignature::Binary.accepts_arity(3));
    assert!(OverloadSignature::Variadic.accepts_arity(0));
    assert!(OverloadSignature::Variadic.accepts_arity(17));
}

// =============================================================================
// Entity Handles
// =============================================================================

#[test]
fn null_handle() {
    assert!(EntityId::null().is_null());
    assert!(!EntityId::new(0, 1).is_null());
}

#[test]
fn handles_differ_by_generation() {
    let a = EntityId::new(3, 1);
    let b = EntityId::new(3, 3);
    assert_ne!(a, b);
    assert_eq!(a.index, b.index);
}

#[test]
fn type_names_are_distinct_for_concrete_kinds() {
    let names: std::collections::HashSet<_> = ALL_KINDS[..9].iter().map(|kind| kind.type_name()).collect();
    assert_eq!(names.len(), 9);
}
