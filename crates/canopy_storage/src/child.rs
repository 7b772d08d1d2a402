//! Child-side bookkeeping.
//!
//! Every entity carries a `ChildModule` recording where it lives in its
//! parent: the parent's handle, the relation it was bound through and its
//! slot index. The back-reference is non-owning; the parent's
//! [`ParentModule`] holds the owning side.

use canopy_foundation::{EntityId, Relation};

use crate::parent::ParentModule;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Binding state of a child.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
enum ChildState {
    /// Root entity; never has a parent.
    Root,
    /// Bound into `parent`'s module for `relation` at slot `child_id`.
    Bound {
        parent: EntityId,
        relation: Relation,
        child_id: usize,
    },
    /// Not (or no longer) bound to any parent.
    Unbound,
}

/// Back-reference from a child entity to its slot in a parent.
///
/// Only [`ParentModule::bind_child`] produces a bound module. Once
/// [`notify_destroyed`](Self::notify_destroyed) or
/// [`detach`](Self::detach) has run the module is unbound and every accessor
/// returns `None`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChildModule {
    state: ChildState,
}

impl ChildModule {
    /// Module for a root entity.
    #[must_use]
    pub const fn root() -> Self {
        Self {
            state: ChildState::Root,
        }
    }

    /// Module for an entity that is not bound yet.
    #[must_use]
    pub const fn unbound() -> Self {
        Self {
            state: ChildState::Unbound,
        }
    }

    pub(crate) const fn bound(parent: EntityId, relation: Relation, child_id: usize) -> Self {
        Self {
            state: ChildState::Bound {
                parent,
                relation,
                child_id,
            },
        }
    }

    /// Returns the parent entity, or `None` for roots and unbound children.
    #[must_use]
    pub const fn get_parent(&self) -> Option<EntityId> {
        match self.state {
            ChildState::Bound { parent, .. } => Some(parent),
            ChildState::Root | ChildState::Unbound => None,
        }
    }

    /// Returns the slot index in the parent's collection.
    #[must_use]
    pub const fn child_id(&self) -> Option<usize> {
        match self.state {
            ChildState::Bound { child_id, .. } => Some(child_id),
            ChildState::Root | ChildState::Unbound => None,
        }
    }

    /// Returns the relation this child was bound through.
    #[must_use]
    pub const fn relation(&self) -> Option<Relation> {
        match self.state {
            ChildState::Bound { relation, .. } => Some(relation),
            ChildState::Root | ChildState::Unbound => None,
        }
    }

    /// Returns true while bound to a parent.
    #[must_use]
    pub const fn is_bound(&self) -> bool {
        matches!(self.state, ChildState::Bound { .. })
    }

    /// Returns true for root modules.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        matches!(self.state, ChildState::Root)
    }

    /// Releases this child's slot in `parent_module` and becomes unbound.
    ///
    /// `child` is the entity owning this module. The slot is only released
    /// if `parent_module` is the module this child was bound into and the
    /// slot still points at `child`, so a late or repeated notification can
    /// never free a slot that belongs to someone else.
    ///
    /// Returns true if a slot was released. A second call is a no-op.
    pub fn notify_destroyed(&mut self, child: EntityId, parent_module: &mut ParentModule) -> bool {
        self.release_from(child, parent_module)
    }

    /// Same check and release as [`notify_destroyed`](Self::notify_destroyed),
    /// for a child that lives on and is moving to another parent.
    pub fn release_from(&mut self, child: EntityId, parent_module: &mut ParentModule) -> bool {
        let ChildState::Bound {
            parent,
            relation,
            child_id,
        } = self.state
        else {
            return false;
        };
        self.state = ChildState::Unbound;

        if parent_module.owner() != parent || parent_module.relation() != relation {
            log::warn!(
                "{child:?} notified {} of {:?}, but is bound to {relation} of {parent:?}",
                parent_module.relation(),
                parent_module.owner()
            );
            return false;
        }
        if parent_module.get(child_id) != Some(child) {
            log::warn!("slot {child_id} of {relation} of {parent:?} no longer holds {child:?}");
            return false;
        }

        parent_module.unbind_child(child_id)
    }

    /// Becomes unbound without touching any parent module.
    ///
    /// Used when the parent record is already gone. Returns true if the
    /// module was bound.
    pub fn detach(&mut self) -> bool {
        let was_bound = self.is_bound();
        if was_bound {
            self.state = ChildState::Unbound;
        }
        was_bound
    }
}

impl Default for ChildModule {
    fn default() -> Self {
        Self::unbound()
    }
}
