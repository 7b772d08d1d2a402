//! Name-based lookup for console and scripting consumers.
//!
//! Everything here reads through the registry. A name that is not
//! registered, or that resolves to the wrong kind, yields `None` rather than
//! an error.

use std::fmt;

use canopy_foundation::{EntityId, EntityKind, Error, OverloadSignature, Relation, Result};

use crate::entity::{Entity, EntityRef};
use crate::record::Lifecycle;
use crate::universe::Universe;

/// Summary printed by the console `info` command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityInfo {
    /// The entity.
    pub entity: EntityId,
    /// Its kind.
    pub kind: EntityKind,
    /// Global name, if any.
    pub name: Option<String>,
    /// Local name in the parent, if any.
    pub local_name: Option<String>,
    /// Parent, `None` for the root.
    pub parent: Option<EntityId>,
    /// Direct children.
    pub number_of_children: usize,
    /// All descendants.
    pub number_of_descendants: usize,
    /// Whether `delete` may erase it.
    pub can_be_erased: bool,
    /// Lifecycle state.
    pub lifecycle: Lifecycle,
}

impl EntityInfo {
    fn of(entity: &EntityRef<'_>) -> Self {
        Self {
            entity: entity.id(),
            kind: entity.kind(),
            name: entity.global_name().map(str::to_string),
            local_name: entity.local_name().map(str::to_string),
            parent: entity.get_parent(),
            number_of_children: entity.get_number_of_children(),
            number_of_descendants: entity.get_number_of_descendants(),
            can_be_erased: entity.can_be_erased(),
            lifecycle: entity.lifecycle(),
        }
    }
}

impl fmt::Display for EntityInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "type: {}", self.kind.type_name())?;
        writeln!(f, "name: {}", self.name.as_deref().unwrap_or("(unnamed)"))?;
        if let Some(local_name) = &self.local_name {
            writeln!(f, "local name: {local_name}")?;
        }
        match self.parent {
            Some(parent) => writeln!(f, "parent: {parent}")?,
            None => writeln!(f, "parent: (none)")?,
        }
        writeln!(f, "number of children: {}", self.number_of_children)?;
        writeln!(f, "number of descendants: {}", self.number_of_descendants)?;
        writeln!(f, "can be erased: {}", self.can_be_erased)?;
        write!(f, "lifecycle: {}", self.lifecycle)
    }
}

impl Universe {
    /// Looks up an entity by global name.
    #[must_use]
    pub fn get_entity(&self, name: &str) -> Option<EntityId> {
        self.registry().get_entity(name)
    }

    /// Looks up a named entity and checks its kind against `predicate`.
    pub fn resolve<P>(&self, name: &str, predicate: P) -> Option<EntityRef<'_>>
    where
        P: FnOnce(EntityKind) -> bool,
    {
        let entity = self.entity(self.get_entity(name)?).ok()?;
        predicate(entity.kind()).then_some(entity)
    }

    /// Looks up a named entity of exactly `kind`.
    #[must_use]
    pub fn resolve_kind(&self, name: &str, kind: EntityKind) -> Option<EntityRef<'_>> {
        self.resolve(name, |candidate| candidate == kind)
    }

    /// All registered names, sorted and space separated.
    #[must_use]
    pub fn entity_names(&self) -> String {
        self.registry().get_entity_names()
    }

    /// Registered names starting with `prefix`.
    #[must_use]
    pub fn get_completions(&self, prefix: &str) -> Vec<String> {
        self.registry().get_completions(prefix)
    }

    /// Number of registered names starting with `prefix`.
    #[must_use]
    pub fn get_number_of_completions(&self, prefix: &str) -> usize {
        self.registry().get_number_of_completions(prefix)
    }

    /// Longest common extension of `prefix` over all matching names.
    #[must_use]
    pub fn complete(&self, prefix: &str) -> String {
        self.registry().complete(prefix)
    }

    /// Summary of a named entity.
    #[must_use]
    pub fn info(&self, name: &str) -> Option<EntityInfo> {
        self.resolve(name, |_| true).map(|entity| EntityInfo::of(&entity))
    }

    /// Summary of an entity by handle.
    ///
    /// # Errors
    ///
    /// Returns an error for stale or unknown handles.
    pub fn info_of(&self, id: EntityId) -> Result<EntityInfo> {
        self.entity(id).map(|entity| EntityInfo::of(&entity))
    }

    /// Destroys the named entity if it allows erasure.
    ///
    /// Returns `Ok(false)` when the name is not registered.
    ///
    /// # Errors
    ///
    /// Returns a not erasable error, leaving the entity alive, when its
    /// `can_be_erased` flag is off (always the case for the root).
    pub fn delete_entity_by_name(&mut self, name: &str) -> Result<bool> {
        let Some(id) = self.get_entity(name) else {
            log::debug!("delete: no entity named {name:?}");
            return Ok(false);
        };
        if id == self.root() || !self.record(id)?.can_be_erased() {
            return Err(Error::not_erasable(id));
        }
        self.destroy(id)?;
        Ok(true)
    }

    /// Picks the overload of the named lisp function that accepts `argc`
    /// arguments.
    ///
    /// Exact signatures win over variadic ones; among equals the lowest slot
    /// wins.
    #[must_use]
    pub fn resolve_overload(&self, function_name: &str, argc: usize) -> Option<EntityId> {
        let function = self.resolve_kind(function_name, EntityKind::LispFunction)?;
        let overloads = self
            .parent_module(function.id(), Relation::LispFunctionOverloads)
            .ok()?;

        let matching: Vec<(EntityId, OverloadSignature)> = overloads
            .children()
            .filter_map(|(_, child)| match self.record(child).ok()?.kind() {
                EntityKind::LispFunctionOverload(signature) if signature.accepts_arity(argc) => {
                    Some((child, signature))
                }
                _ => None,
            })
            .collect();

        matching
            .iter()
            .find(|&&(_, signature)| signature != OverloadSignature::Variadic)
            .or_else(|| matching.first())
            .map(|&(child, _)| child)
    }
}
