//! Teardown hooks.
//!
//! A universe runs every registered hook exactly once for each entity it
//! destroys, after the entity's children are gone and before the entity is
//! detached from its parent.

use canopy_foundation::{EntityId, EntityKind};

/// What a hook learns about an entity being torn down.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TeardownEvent<'a> {
    /// The entity being destroyed.
    pub entity: EntityId,
    /// Its kind.
    pub kind: EntityKind,
    /// Its global name, if it had one.
    pub name: Option<&'a str>,
    /// Its parent, if still bound.
    pub parent: Option<EntityId>,
    /// Its slot index in the parent.
    pub child_id: Option<usize>,
}

/// Callback run once per destroyed entity.
pub trait TeardownHook: Send {
    /// Called during the entity's teardown.
    fn on_teardown(&mut self, event: &TeardownEvent<'_>);
}

impl<F> TeardownHook for F
where
    F: FnMut(&TeardownEvent<'_>) + Send,
{
    fn on_teardown(&mut self, event: &TeardownEvent<'_>) {
        self(event);
    }
}
