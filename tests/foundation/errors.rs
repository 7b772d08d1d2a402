//! Integration tests for Error types
//!
//! Tests error construction, display, context, and classification.

use canopy_foundation::{BindingError, EntityId, EntityKind, Error, ErrorContext, ErrorKind, Relation};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_entity_not_found() {
    let err = Error::entity_not_found(EntityId::new(42, 1));
    assert!(matches!(err.kind, ErrorKind::EntityNotFound(_)));
    assert!(err.to_string().contains("42"));
}

#[test]
fn error_stale_entity() {
    let err = Error::stale_entity(EntityId::new(5, 2));
    assert!(matches!(err.kind, ErrorKind::StaleEntity(_)));
    assert!(err.is_invariant_violation());
}

#[test]
fn error_name_collision() {
    let existing = EntityId::new(3, 1);
    let err = Error::name_collision("foo", existing);
    assert!(matches!(
        &err.kind,
        ErrorKind::NameCollision { name, existing: holder } if name == "foo" && *holder == existing
    ));
    assert!(!err.is_invariant_violation());
}

#[test]
fn error_invalid_name() {
    let err = Error::invalid_name("");
    assert!(matches!(err.kind, ErrorKind::InvalidName(_)));
}

#[test]
fn error_not_erasable() {
    let err = Error::not_erasable(EntityId::new(0, 1));
    assert!(matches!(err.kind, ErrorKind::NotErasable(_)));
    assert!(err.to_string().contains("cannot be erased"));
}

// =============================================================================
// Binding Errors
// =============================================================================

#[test]
fn binding_errors_are_classified() {
    let errors = [
        BindingError::RelationNotExposed {
            parent: EntityKind::Object,
            relation: Relation::Objects,
        },
        BindingError::KindMismatch {
            relation: Relation::Scenes,
            child: EntityKind::Console,
        },
        BindingError::ParentDestroying(EntityId::new(1, 1)),
        BindingError::WouldCreateCycle {
            child: EntityId::new(1, 1),
            parent: EntityId::new(2, 1),
        },
        BindingError::RootCannotBind(EntityKind::Universe),
        BindingError::DepthExceeded { limit: 4 },
    ];

    for binding in errors {
        let err = Error::binding(binding.clone());
        assert!(err.is_binding());
        assert!(!err.is_invariant_violation());
        assert!(matches!(&err.kind, ErrorKind::Binding(inner) if *inner == binding));
    }
}

#[test]
fn kind_mismatch_display_names_relation_and_kind() {
    let err = Error::binding(BindingError::KindMismatch {
        relation: Relation::Scenes,
        child: EntityKind::Console,
    });
    let msg = err.to_string();
    assert!(msg.contains("parent_of_scenes"));
    assert!(msg.contains("console"));
}

// =============================================================================
// Error Context
// =============================================================================

#[test]
fn context_is_attached_and_displayed() {
    let entity = EntityId::new(7, 1);
    let context = ErrorContext::new()
        .with_operation("destroy")
        .with_entity(entity)
        .with_ancestor(EntityId::new(0, 1));
    let err = Error::invariant("slot still occupied").with_context(context);

    let context = err.context.as_ref().unwrap();
    assert_eq!(context.operation.as_deref(), Some("destroy"));
    assert_eq!(context.entity, Some(entity));
    assert_eq!(context.ancestry.len(), 1);

    let text = context.to_string();
    assert!(text.starts_with("in destroy"));
    assert!(text.contains("under"));
}

#[test]
fn invariant_violation_message() {
    let err = Error::invariant("release of free slot 3");
    assert!(err.is_invariant_violation());
    assert!(err.to_string().contains("release of free slot 3"));
}
