//! Per-entity records stored in a universe's arena.

use std::fmt;

use canopy_foundation::{EntityId, EntityKind, Relation};
use canopy_storage::{ChildModule, ParentModule};

/// Lifecycle state of an entity.
///
/// `Unbound → Bound → Destroying → Destroyed`. `Destroyed` is terminal: the
/// record is gone from the arena and the handle is stale.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    /// Allocated but not attached to a parent yet.
    Unbound,
    /// Attached (or the root) and reachable.
    Bound,
    /// Teardown in progress; children are being destroyed.
    Destroying,
    /// Gone. Only reported for handles that no longer resolve.
    Destroyed,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unbound => "unbound",
            Self::Bound => "bound",
            Self::Destroying => "destroying",
            Self::Destroyed => "destroyed",
        };
        f.write_str(s)
    }
}

/// Everything a universe knows about one entity.
#[derive(Clone, Debug)]
pub struct EntityRecord {
    pub(crate) kind: EntityKind,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) child: ChildModule,
    /// One module per relation the kind exposes, in `parent_relations` order.
    pub(crate) parents: Vec<ParentModule>,
    pub(crate) global_name: Option<String>,
    pub(crate) can_be_erased: bool,
}

impl EntityRecord {
    pub(crate) fn new(kind: EntityKind, can_be_erased: bool) -> Self {
        Self {
            kind,
            lifecycle: Lifecycle::Unbound,
            child: ChildModule::unbound(),
            parents: Vec::new(),
            global_name: None,
            can_be_erased,
        }
    }

    /// Creates the parent modules once the record's own handle is known.
    pub(crate) fn init_parent_modules(&mut self, id: EntityId) {
        self.parents = self
            .kind
            .parent_relations()
            .iter()
            .map(|&relation| ParentModule::new(id, relation))
            .collect();
    }

    /// Returns the entity's kind.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Returns the child-side module.
    #[must_use]
    pub fn child_module(&self) -> &ChildModule {
        &self.child
    }

    /// Returns the parent module for `relation`, if the kind exposes it.
    #[must_use]
    pub fn parent_module(&self, relation: Relation) -> Option<&ParentModule> {
        self.parents.iter().find(|module| module.relation() == relation)
    }

    pub(crate) fn parent_module_mut(&mut self, relation: Relation) -> Option<&mut ParentModule> {
        self.parents
            .iter_mut()
            .find(|module| module.relation() == relation)
    }

    /// Iterates all parent modules.
    pub fn parent_modules(&self) -> impl Iterator<Item = &ParentModule> + '_ {
        self.parents.iter()
    }

    /// Returns the registered global name.
    #[must_use]
    pub fn global_name(&self) -> Option<&str> {
        self.global_name.as_deref()
    }

    /// Returns whether the entity may be erased by name.
    #[must_use]
    pub fn can_be_erased(&self) -> bool {
        self.can_be_erased
    }

    /// Handles of all children across every relation, in teardown order.
    #[must_use]
    pub fn children(&self) -> Vec<EntityId> {
        self.parents
            .iter()
            .flat_map(|module| module.children().map(|(_, child)| child))
            .collect()
    }

    /// Number of children across every relation.
    #[must_use]
    pub fn number_of_children(&self) -> usize {
        self.parents
            .iter()
            .map(ParentModule::get_number_of_children)
            .sum()
    }
}
