//! Parent-side bookkeeping for one child relation.
//!
//! An entity owns one `ParentModule` per relation its kind exposes
//! ("parent of scenes", "parent of lisp functions", ...). The module keeps
//! the children's handles in a [`SlotAllocator`]; a child's slot index is its
//! `child_id` and stays stable until the child is unbound.
//!
//! A child may also carry a local name, unique among the children of one
//! module. Local names live here rather than in the global registry and go
//! away with the slot.

use canopy_foundation::{BindingError, EntityId, EntityKind, Error, Relation, Result};
use im::OrdMap;

use crate::child::ChildModule;
use crate::registry::Registry;
use crate::slot::SlotAllocator;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Owning side of one parent/child relation.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParentModule {
    /// Entity that owns this module.
    owner: EntityId,
    /// Relation this module serves.
    relation: Relation,
    /// Children by slot index.
    children: SlotAllocator<EntityId>,
    /// Local names to slot indices.
    local_names: OrdMap<String, usize>,
}

impl ParentModule {
    /// Creates an empty module for `relation`, owned by `owner`.
    #[must_use]
    pub fn new(owner: EntityId, relation: Relation) -> Self {
        Self {
            owner,
            relation,
            children: SlotAllocator::new(),
            local_names: OrdMap::new(),
        }
    }

    /// Returns the owning entity.
    #[must_use]
    pub const fn owner(&self) -> EntityId {
        self.owner
    }

    /// Returns the relation served by this module.
    #[must_use]
    pub const fn relation(&self) -> Relation {
        self.relation
    }

    /// Binds `child` of kind `kind` and returns its populated child module.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::KindMismatch`] if the relation does not accept
    /// `kind`. Nothing is mutated in that case.
    pub fn bind_child(&mut self, child: EntityId, kind: EntityKind) -> Result<ChildModule> {
        if !self.relation.accepts(kind) {
            return Err(Error::binding(BindingError::KindMismatch {
                relation: self.relation,
                child: kind,
            }));
        }

        let child_id = self.children.allocate(child);
        Ok(ChildModule::bound(self.owner, self.relation, child_id))
    }

    /// Releases slot `child_id` and drops its local name. Returns whether a
    /// child was present.
    pub fn unbind_child(&mut self, child_id: usize) -> bool {
        match self.children.release(child_id) {
            Ok(_) => {
                self.clear_local_name(child_id);
                true
            }
            Err(err) => {
                log::warn!("{} of {:?}: {err}", self.relation, self.owner);
                false
            }
        }
    }

    /// Gives the child at slot `child_id` the local name `name`, replacing
    /// any local name it had.
    ///
    /// # Errors
    ///
    /// - Invalid name
    /// - Name collision if another child of this module holds `name`
    /// - Invariant violation if the slot is empty
    ///
    /// Nothing is mutated on error.
    pub fn set_local_name(&mut self, child_id: usize, name: &str) -> Result<()> {
        let Some(child) = self.get(child_id) else {
            return Err(Error::invariant(format!(
                "slot {child_id} of {} of {:?} is empty",
                self.relation, self.owner
            )));
        };
        self.check_local_name(name, child)?;

        self.clear_local_name(child_id);
        self.local_names.insert(name.to_string(), child_id);
        Ok(())
    }

    /// Removes the local name of the child at slot `child_id` and returns it.
    pub fn clear_local_name(&mut self, child_id: usize) -> Option<String> {
        let name = self.local_name_of(child_id)?.to_string();
        self.local_names.remove(&name);
        Some(name)
    }

    /// Checks that `name` is valid and either free or held by `child`.
    ///
    /// # Errors
    ///
    /// Returns an invalid name or name collision error.
    pub fn check_local_name(&self, name: &str, child: EntityId) -> Result<()> {
        Registry::validate_name(name)?;
        match self.get_child(name) {
            Some(existing) if existing != child => Err(Error::name_collision(name, existing)),
            _ => Ok(()),
        }
    }

    /// Returns true if a child with local name `name` is bound here.
    #[must_use]
    pub fn has_child(&self, name: &str) -> bool {
        self.local_names.contains_key(name)
    }

    /// Returns the child with local name `name`.
    #[must_use]
    pub fn get_child(&self, name: &str) -> Option<EntityId> {
        self.local_names
            .get(name)
            .and_then(|&child_id| self.get(child_id))
    }

    /// Returns the local name of the child at slot `child_id`.
    #[must_use]
    pub fn local_name_of(&self, child_id: usize) -> Option<&str> {
        self.local_names
            .iter()
            .find(|&(_, &slot)| slot == child_id)
            .map(|(name, _)| name.as_str())
    }

    /// Iterates `(local_name, child_id)` pairs in name order.
    pub fn local_names(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.local_names
            .iter()
            .map(|(name, &child_id)| (name.as_str(), child_id))
    }

    /// Returns the child at slot `child_id`.
    #[must_use]
    pub fn get(&self, child_id: usize) -> Option<EntityId> {
        self.children.get(child_id).copied()
    }

    /// Number of bound children (occupied slots, not capacity).
    #[must_use]
    pub fn get_number_of_children(&self) -> usize {
        self.children.occupied()
    }

    /// Counts every descendant reachable through this module.
    ///
    /// `descendants_of` must return the number of descendants of a child
    /// across all of that child's own relations.
    pub fn get_number_of_descendants<F>(&self, mut descendants_of: F) -> usize
    where
        F: FnMut(EntityId) -> usize,
    {
        self.children
            .iter()
            .map(|(_, &child)| 1 + descendants_of(child))
            .sum()
    }

    /// Iterates `(child_id, child)` pairs in slot order.
    pub fn children(&self) -> impl Iterator<Item = (usize, EntityId)> + '_ {
        self.children.iter().map(|(child_id, &child)| (child_id, child))
    }

    /// Returns true if no child is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Read access to the underlying slots.
    #[must_use]
    pub fn slots(&self) -> &SlotAllocator<EntityId> {
        &self.children
    }
}
