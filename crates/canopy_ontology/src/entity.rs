//! The capability contract shared by every entity kind.

use canopy_foundation::{EntityId, EntityKind};

use crate::record::{EntityRecord, Lifecycle};
use crate::universe::Universe;

/// Queries every entity answers, whatever its kind.
pub trait Entity {
    /// Handle of this entity.
    fn id(&self) -> EntityId;

    /// Kind of this entity.
    fn kind(&self) -> EntityKind;

    /// Type name as reported by `info`.
    fn type_name(&self) -> &'static str {
        self.kind().type_name()
    }

    /// Parent entity, `None` for the root.
    fn get_parent(&self) -> Option<EntityId>;

    /// Direct children across every relation.
    fn get_number_of_children(&self) -> usize;

    /// All descendants across every relation.
    fn get_number_of_descendants(&self) -> usize;

    /// Nearest scene at or above this entity.
    fn get_scene(&self) -> Option<EntityId>;

    /// Registered global name.
    fn global_name(&self) -> Option<&str>;

    /// Name among the parent's children.
    fn local_name(&self) -> Option<&str>;

    /// Whether the entity may be erased by name.
    fn can_be_erased(&self) -> bool;

    /// Slot index in the parent's collection.
    fn child_id(&self) -> Option<usize>;

    /// Lifecycle state.
    fn lifecycle(&self) -> Lifecycle;
}

/// A live entity borrowed from its universe.
#[derive(Clone, Copy, Debug)]
pub struct EntityRef<'u> {
    universe: &'u Universe,
    id: EntityId,
    record: &'u EntityRecord,
}

impl<'u> EntityRef<'u> {
    pub(crate) fn new(universe: &'u Universe, id: EntityId, record: &'u EntityRecord) -> Self {
        Self {
            universe,
            id,
            record,
        }
    }

    /// The underlying record.
    #[must_use]
    pub fn record(&self) -> &'u EntityRecord {
        self.record
    }

    /// Returns true if this entity is of `kind`.
    #[must_use]
    pub fn is(&self, kind: EntityKind) -> bool {
        self.record.kind() == kind
    }

    /// Direct children, in slot order.
    #[must_use]
    pub fn children(&self) -> Vec<EntityRef<'u>> {
        self.record
            .children()
            .into_iter()
            .filter_map(|child| self.universe.entity(child).ok())
            .collect()
    }

    /// The parent as a borrowed view.
    #[must_use]
    pub fn parent(&self) -> Option<EntityRef<'u>> {
        self.get_parent()
            .and_then(|parent| self.universe.entity(parent).ok())
    }
}

impl Entity for EntityRef<'_> {
    fn id(&self) -> EntityId {
        self.id
    }

    fn kind(&self) -> EntityKind {
        self.record.kind()
    }

    fn get_parent(&self) -> Option<EntityId> {
        self.record.child_module().get_parent()
    }

    fn get_number_of_children(&self) -> usize {
        self.record.number_of_children()
    }

    fn get_number_of_descendants(&self) -> usize {
        self.universe.descendants_of(self.id)
    }

    fn get_scene(&self) -> Option<EntityId> {
        self.universe.scene_of(self.id)
    }

    fn global_name(&self) -> Option<&str> {
        self.record.global_name()
    }

    fn local_name(&self) -> Option<&str> {
        self.universe.local_name(self.id).ok().flatten()
    }

    fn can_be_erased(&self) -> bool {
        self.record.can_be_erased()
    }

    fn child_id(&self) -> Option<usize> {
        self.record.child_module().child_id()
    }

    fn lifecycle(&self) -> Lifecycle {
        self.record.lifecycle()
    }
}
