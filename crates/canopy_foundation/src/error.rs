//! Error types for canopy.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! Lookup misses are not errors: name and index queries return `Option`.

use std::fmt;

use thiserror::Error;

use crate::entity::EntityId;
use crate::kind::{EntityKind, Relation};

/// Result alias used throughout canopy.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for canopy operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an entity not found error.
    #[must_use]
    pub fn entity_not_found(id: EntityId) -> Self {
        Self::new(ErrorKind::EntityNotFound(id))
    }

    /// Creates a stale entity handle error.
    #[must_use]
    pub fn stale_entity(id: EntityId) -> Self {
        Self::new(ErrorKind::StaleEntity(id))
    }

    /// Creates a binding error.
    #[must_use]
    pub fn binding(error: BindingError) -> Self {
        Self::new(ErrorKind::Binding(error))
    }

    /// Creates a name collision error.
    #[must_use]
    pub fn name_collision(name: impl Into<String>, existing: EntityId) -> Self {
        Self::new(ErrorKind::NameCollision {
            name: name.into(),
            existing,
        })
    }

    /// Creates an invalid name error.
    #[must_use]
    pub fn invalid_name(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidName(name.into()))
    }

    /// Creates an invariant violation error.
    #[must_use]
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvariantViolation(message.into()))
    }

    /// Creates a not-erasable error.
    #[must_use]
    pub fn not_erasable(id: EntityId) -> Self {
        Self::new(ErrorKind::NotErasable(id))
    }

    /// Returns true for programmer errors: the ownership tree was used in a
    /// way that can only come from a logic bug (freed slots, stale handles).
    #[must_use]
    pub const fn is_invariant_violation(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::InvariantViolation(_) | ErrorKind::StaleEntity(_)
        )
    }

    /// Returns true if this error is a binding failure.
    #[must_use]
    pub const fn is_binding(&self) -> bool {
        matches!(self.kind, ErrorKind::Binding(_))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A child could not be bound to the requested parent.
    #[error("binding failed: {0}")]
    Binding(BindingError),

    /// The name is already registered to another entity.
    #[error("name collision: {name:?} is already bound to {existing:?}")]
    NameCollision {
        /// The name that was requested.
        name: String,
        /// The entity that currently owns the name.
        existing: EntityId,
    },

    /// The name is not acceptable (empty, or otherwise malformed).
    #[error("invalid name: {0:?}")]
    InvalidName(String),

    /// Entity was never allocated or its slot is free.
    #[error("entity not found: {0:?}")]
    EntityNotFound(EntityId),

    /// Entity handle is stale (generation mismatch).
    #[error("stale entity handle: {0:?}")]
    StaleEntity(EntityId),

    /// The ownership tree was used in a way that breaks its invariants.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// The entity refuses externally triggered deletion.
    #[error("entity cannot be erased: {0:?}")]
    NotErasable(EntityId),
}

/// Reasons a child cannot be bound to a parent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    /// The parent kind does not expose the child's relation.
    #[error("{parent} does not expose {relation}")]
    RelationNotExposed {
        /// Kind of the requested parent.
        parent: EntityKind,
        /// Relation the child needs.
        relation: Relation,
    },

    /// The child kind fails the relation's capability check.
    #[error("{relation} does not accept a {child}")]
    KindMismatch {
        /// Relation that rejected the child.
        relation: Relation,
        /// Kind of the rejected child.
        child: EntityKind,
    },

    /// The parent is being destroyed and accepts no new children.
    #[error("parent {0:?} is being destroyed")]
    ParentDestroying(EntityId),

    /// Binding would make an entity its own ancestor.
    #[error("binding {child:?} under {parent:?} would create a cycle")]
    WouldCreateCycle {
        /// Entity being moved.
        child: EntityId,
        /// Requested new parent.
        parent: EntityId,
    },

    /// Root kinds never have a parent.
    #[error("{0} is a root kind and cannot be bound to a parent")]
    RootCannotBind(EntityKind),

    /// The configured maximum tree depth would be exceeded.
    #[error("maximum depth {limit} exceeded")]
    DepthExceeded {
        /// The configured limit.
        limit: usize,
    },
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation that failed (`create`, `destroy`, ...).
    pub operation: Option<String>,
    /// Entity the operation targeted.
    pub entity: Option<EntityId>,
    /// Chain of ancestors, nearest first, when known.
    pub ancestry: Vec<EntityId>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the failing operation.
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Sets the targeted entity.
    #[must_use]
    pub fn with_entity(mut self, entity: EntityId) -> Self {
        self.entity = Some(entity);
        self
    }

    /// Appends an ancestor.
    #[must_use]
    pub fn with_ancestor(mut self, ancestor: EntityId) -> Self {
        self.ancestry.push(ancestor);
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(operation) = &self.operation {
            write!(f, "in {operation}")?;
        }
        if let Some(entity) = self.entity {
            write!(f, " on {entity:?}")?;
        }
        if !self.ancestry.is_empty() {
            writeln!(f)?;
            for ancestor in &self.ancestry {
                writeln!(f, "  under {ancestor:?}")?;
            }
        }
        Ok(())
    }
}
