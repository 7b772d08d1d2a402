//! The simulation root and lifecycle orchestrator.
//!
//! A `Universe` owns the arena of entity records, the name registry and the
//! root entity. Every structural change to the ownership tree goes through
//! it: [`create`](Universe::create) binds a new entity into its parent's
//! slot collection, [`destroy`](Universe::destroy) tears down a subtree
//! children first and releases each slot on the way back up, and
//! [`rebind`](Universe::rebind) moves an entity to another parent.
//!
//! All operations are synchronous and single-threaded. Hosts that need to
//! share a universe across threads wrap it in one coarse lock, see
//! [`SharedUniverse`].

use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, Mutex};

use canopy_foundation::{BindingError, EntityId, EntityKind, Error, ErrorContext, Relation, Result};
use canopy_storage::{ChildModule, EntityStore, ParentModule, Registry};

use crate::config::UniverseConfig;
use crate::entity::{Entity, EntityRef};
use crate::hook::{TeardownEvent, TeardownHook};
use crate::record::{EntityRecord, Lifecycle};

/// Binds `child` into `module` and registers its local name there.
///
/// Nothing stays bound if the name is refused.
fn bind_named(
    module: &mut ParentModule,
    child: EntityId,
    kind: EntityKind,
    local_name: Option<&str>,
) -> Result<ChildModule> {
    let child_module = module.bind_child(child, kind)?;
    if let (Some(name), Some(child_id)) = (local_name, child_module.child_id()) {
        if let Err(err) = module.set_local_name(child_id, name) {
            module.unbind_child(child_id);
            return Err(err);
        }
    }
    Ok(child_module)
}

/// A universe behind a single coarse lock.
pub type SharedUniverse = Arc<Mutex<Universe>>;

/// Simulation root: entity arena, name registry and root entity.
pub struct Universe {
    entities: EntityStore<EntityRecord>,
    registry: Registry,
    root: EntityId,
    active_scene: Option<EntityId>,
    config: UniverseConfig,
    hooks: Vec<Box<dyn TeardownHook>>,
}

impl fmt::Debug for Universe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Universe")
            .field("root", &self.root)
            .field("entities", &self.entities.len())
            .field("names", &self.registry.len())
            .field("active_scene", &self.active_scene)
            .field("hooks", &self.hooks.len())
            .finish_non_exhaustive()
    }
}

impl Universe {
    /// Creates a universe holding only its root entity.
    ///
    /// # Errors
    ///
    /// Returns an invalid name error if `config.root_name` is not a usable
    /// name.
    pub fn new(config: UniverseConfig) -> Result<Self> {
        let mut entities = EntityStore::new();
        let mut registry = Registry::new();

        let mut record = EntityRecord::new(EntityKind::Universe, false);
        record.child = ChildModule::root();
        record.lifecycle = Lifecycle::Bound;
        if let Some(name) = &config.root_name {
            Registry::validate_name(name)?;
            record.global_name = Some(name.clone());
        }

        let root = entities.spawn(record);
        entities.fetch_mut(root)?.init_parent_modules(root);
        if let Some(name) = &config.root_name {
            registry.add_entity(root, name)?;
        }

        log::debug!("universe created with root {root:?}");

        Ok(Self {
            entities,
            registry,
            root,
            active_scene: None,
            config,
            hooks: Vec::new(),
        })
    }

    /// Moves this universe behind a shared lock.
    #[must_use]
    pub fn into_shared(self) -> SharedUniverse {
        Arc::new(Mutex::new(self))
    }

    /// Returns the root entity.
    #[must_use]
    pub fn root(&self) -> EntityId {
        self.root
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &UniverseConfig {
        &self.config
    }

    /// Returns the name registry.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Number of live entities, root included.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Registers a hook run once for every entity destroyed from now on.
    pub fn add_teardown_hook(&mut self, hook: impl TeardownHook + 'static) {
        self.hooks.push(Box::new(hook));
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Creates an entity of `kind` under `parent`, optionally named.
    ///
    /// # Errors
    ///
    /// - Stale or unknown `parent`
    /// - [`BindingError`] if `parent` does not expose the kind's relation, is
    ///   being destroyed, or the depth limit would be exceeded
    /// - Invalid name or name collision
    ///
    /// On error nothing is created and no state changes.
    pub fn create(
        &mut self,
        parent: EntityId,
        kind: EntityKind,
        name: Option<&str>,
    ) -> Result<EntityId> {
        let can_be_erased = self.config.default_can_be_erased;
        self.create_with(parent, kind, name, None, can_be_erased)
    }

    pub(crate) fn create_with(
        &mut self,
        parent: EntityId,
        kind: EntityKind,
        name: Option<&str>,
        local_name: Option<&str>,
        can_be_erased: bool,
    ) -> Result<EntityId> {
        let operation = format!("create {kind}");

        let relation = self
            .check_bindable(parent, kind)
            .map_err(|err| err.with_context(self.error_context(&operation, parent)))?;
        if let Some(limit) = self.config.max_depth {
            if self.depth(parent)? + 1 > limit {
                return Err(Error::binding(BindingError::DepthExceeded { limit })
                    .with_context(self.error_context(&operation, parent)));
            }
        }
        if let Some(name) = name {
            self.registry.check_available(name, EntityId::null())?;
        }
        if let Some(local_name) = local_name {
            self.check_local_name(parent, local_name, EntityId::null())?;
        }

        let id = self
            .entities
            .spawn(EntityRecord::new(kind, can_be_erased));
        let bound = self
            .parent_module_mut(parent, relation)
            .and_then(|module| bind_named(module, id, kind, local_name));
        let child_module = match bound {
            Ok(child_module) => child_module,
            Err(err) => {
                self.entities.destroy(id)?;
                return Err(err.with_context(self.error_context(&operation, parent)));
            }
        };

        let record = self.entities.fetch_mut(id)?;
        record.init_parent_modules(id);
        record.child = child_module;
        record.lifecycle = Lifecycle::Bound;
        if let Some(name) = name {
            self.registry.add_entity(id, name)?;
            record.global_name = Some(name.to_string());
        }

        if kind.is_scene() && self.config.activate_new_scenes {
            self.active_scene = Some(id);
        }

        log::debug!(
            "created {kind} {id:?} in {relation} of {parent:?} at slot {}",
            child_module.child_id().unwrap_or_default()
        );
        Ok(id)
    }

    /// Checks that a `kind` child could bind under `parent` and returns the
    /// relation it would use.
    fn check_bindable(&self, parent: EntityId, kind: EntityKind) -> Result<Relation> {
        let relation = kind
            .child_relation()
            .ok_or_else(|| Error::binding(BindingError::RootCannotBind(kind)))?;
        let record = self.entities.fetch(parent)?;

        if record.lifecycle == Lifecycle::Destroying {
            return Err(Error::binding(BindingError::ParentDestroying(parent)));
        }
        if !record.kind.exposes(relation) {
            return Err(Error::binding(BindingError::RelationNotExposed {
                parent: record.kind,
                relation,
            }));
        }
        Ok(relation)
    }

    /// Checks that `name` is a valid local name not held by another child of
    /// `parent` in any relation.
    fn check_local_name(&self, parent: EntityId, name: &str, child: EntityId) -> Result<()> {
        Registry::validate_name(name)?;
        match self.local_name_holder(parent, name)? {
            Some(existing) if existing != child => Err(Error::name_collision(name, existing)),
            _ => Ok(()),
        }
    }

    fn local_name_holder(&self, parent: EntityId, name: &str) -> Result<Option<EntityId>> {
        Ok(self
            .entities
            .fetch(parent)?
            .parents
            .iter()
            .find_map(|module| module.get_child(name)))
    }

    /// Context naming `operation`, its target and the target's ancestors.
    fn error_context(&self, operation: &str, entity: EntityId) -> ErrorContext {
        let mut context = ErrorContext::new()
            .with_operation(operation)
            .with_entity(entity);
        let mut current = self.entities.get(entity).and_then(|record| record.child.get_parent());
        while let Some(parent) = current {
            if context.ancestry.len() >= self.entities.len() {
                break;
            }
            context = context.with_ancestor(parent);
            current = self.entities.get(parent).and_then(|record| record.child.get_parent());
        }
        context
    }

    fn parent_module_mut(&mut self, id: EntityId, relation: Relation) -> Result<&mut ParentModule> {
        let record = self.entities.fetch_mut(id)?;
        let kind = record.kind;
        record.parent_module_mut(relation).ok_or_else(|| {
            Error::binding(BindingError::RelationNotExposed {
                parent: kind,
                relation,
            })
        })
    }

    // =========================================================================
    // Destruction
    // =========================================================================

    /// Destroys `id` and, first, every descendant.
    ///
    /// Each destroyed entity runs the teardown hooks, loses its registry
    /// name and releases its slot in its parent. Calling this for an entity
    /// whose teardown is already running is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error for stale or unknown handles, and an invariant
    /// violation if a subtree could not be emptied. Entities whose teardown
    /// started but could not finish go back to `Bound`; children destroyed
    /// before the failure stay destroyed.
    pub fn destroy(&mut self, id: EntityId) -> Result<()> {
        let record = self.entities.fetch_mut(id)?;
        if record.lifecycle == Lifecycle::Destroying {
            log::debug!("{id:?} is already being destroyed");
            return Ok(());
        }
        record.lifecycle = Lifecycle::Destroying;

        let kind = record.kind;
        let children = record.children();
        log::debug!("destroying {kind} {id:?} and {} children", children.len());

        let result = self
            .destroy_children(id, kind, children)
            .and_then(|()| self.finish_teardown(id));
        if let Err(err) = &result {
            log::warn!("teardown of {kind} {id:?} failed: {err}");
            if let Some(record) = self.entities.get_mut(id) {
                record.lifecycle = Lifecycle::Bound;
            }
        }
        result
    }

    fn destroy_children(
        &mut self,
        id: EntityId,
        kind: EntityKind,
        children: Vec<EntityId>,
    ) -> Result<()> {
        for child in children {
            if self.entities.exists(child) {
                self.destroy(child)?;
            } else {
                log::warn!("{kind} {id:?} held stale child {child:?}");
            }
        }
        Ok(())
    }

    fn finish_teardown(&mut self, id: EntityId) -> Result<()> {
        let record = self.entities.fetch(id)?;
        let remaining = record.number_of_children();
        if remaining != 0 {
            return Err(Error::invariant(format!(
                "{remaining} children still bound after cascading destroy"
            ))
            .with_context(self.error_context("destroy", id)));
        }

        let kind = record.kind;
        let mut child_module = record.child;
        let name = record.global_name.clone();

        let event = TeardownEvent {
            entity: id,
            kind,
            name: name.as_deref(),
            parent: child_module.get_parent(),
            child_id: child_module.child_id(),
        };
        for hook in &mut self.hooks {
            hook.on_teardown(&event);
        }

        if self.active_scene == Some(id) {
            self.active_scene = None;
        }
        if let Some(name) = &name {
            self.registry.erase_entity_if(name, id);
        }

        if let (Some(parent), Some(relation)) = (child_module.get_parent(), child_module.relation()) {
            match self
                .entities
                .get_mut(parent)
                .and_then(|record| record.parent_module_mut(relation))
            {
                Some(module) => {
                    if !child_module.notify_destroyed(id, module) {
                        log::warn!("{id:?} was not found in {relation} of {parent:?}");
                    }
                }
                None => {
                    log::warn!("parent {parent:?} of {id:?} is gone; detaching");
                    child_module.detach();
                }
            }
        }

        self.entities.destroy(id)?;
        log::debug!("destroyed {kind} {id:?}");
        Ok(())
    }

    // =========================================================================
    // Rebinding and attributes
    // =========================================================================

    /// Moves `id` (with its subtree) under `new_parent`.
    ///
    /// The entity gets a fresh slot index in the new parent and keeps its
    /// local name there. Moving to the current parent is a no-op.
    ///
    /// # Errors
    ///
    /// Fails without changing anything if `new_parent` does not expose the
    /// entity's relation, is being destroyed, is the entity itself or one of
    /// its descendants, already has a child with the entity's local name, or
    /// the depth limit would be exceeded.
    pub fn rebind(&mut self, id: EntityId, new_parent: EntityId) -> Result<()> {
        let local_name = self.local_name(id)?.map(str::to_string);
        let record = self.entities.fetch(id)?;
        let kind = record.kind;
        let mut old = record.child;
        if record.lifecycle == Lifecycle::Destroying {
            return Err(Error::invariant(format!("rebind of {id:?} during its teardown")));
        }

        let relation = self.check_bindable(new_parent, kind)?;
        if old.get_parent() == Some(new_parent) {
            return Ok(());
        }
        if new_parent == id || self.is_ancestor(id, new_parent)? {
            return Err(Error::binding(BindingError::WouldCreateCycle {
                child: id,
                parent: new_parent,
            }));
        }
        if let Some(limit) = self.config.max_depth {
            if self.depth(new_parent)? + 1 + self.height(id)? > limit {
                return Err(Error::binding(BindingError::DepthExceeded { limit }));
            }
        }
        if let Some(local_name) = &local_name {
            self.check_local_name(new_parent, local_name, id)?;
        }

        let new = bind_named(
            self.parent_module_mut(new_parent, relation)?,
            id,
            kind,
            local_name.as_deref(),
        )?;
        if let (Some(parent), Some(old_relation)) = (old.get_parent(), old.relation()) {
            if let Some(module) = self
                .entities
                .get_mut(parent)
                .and_then(|record| record.parent_module_mut(old_relation))
            {
                old.release_from(id, module);
            }
        }
        self.entities.fetch_mut(id)?.child = new;

        log::debug!(
            "rebound {kind} {id:?} from {:?} to {new_parent:?} at slot {}",
            old.get_parent(),
            new.child_id().unwrap_or_default()
        );
        Ok(())
    }

    /// Local name of `id` in its parent, if any.
    ///
    /// # Errors
    ///
    /// See [`entity`](Self::entity).
    pub fn local_name(&self, id: EntityId) -> Result<Option<&str>> {
        let child = self.entities.fetch(id)?.child;
        let (Some(parent), Some(relation), Some(child_id)) =
            (child.get_parent(), child.relation(), child.child_id())
        else {
            return Ok(None);
        };
        Ok(self
            .entities
            .get(parent)
            .and_then(|record| record.parent_module(relation))
            .and_then(|module| module.local_name_of(child_id)))
    }

    /// Gives `id` the local name `name` in its parent, replacing its previous
    /// local name.
    ///
    /// Local names are unique among the children of one parent, across all
    /// of the parent's relations, and independent of global names.
    ///
    /// # Errors
    ///
    /// - Stale or unknown `id`
    /// - [`BindingError::RootCannotBind`] for the root, which has no parent
    /// - Invalid name, or a name collision with a sibling
    ///
    /// The old local name is kept on error.
    pub fn set_local_name(&mut self, id: EntityId, name: &str) -> Result<()> {
        let record = self.entities.fetch(id)?;
        let kind = record.kind;
        let child = record.child;
        let (Some(parent), Some(relation), Some(child_id)) =
            (child.get_parent(), child.relation(), child.child_id())
        else {
            return Err(Error::binding(BindingError::RootCannotBind(kind)));
        };

        self.check_local_name(parent, name, id)?;
        self.parent_module_mut(parent, relation)?
            .set_local_name(child_id, name)?;

        log::debug!("{id:?} is now known as {name:?} in {parent:?}");
        Ok(())
    }

    /// Removes the local name of `id` and returns it.
    ///
    /// # Errors
    ///
    /// See [`entity`](Self::entity).
    pub fn clear_local_name(&mut self, id: EntityId) -> Result<Option<String>> {
        let child = self.entities.fetch(id)?.child;
        let (Some(parent), Some(relation), Some(child_id)) =
            (child.get_parent(), child.relation(), child.child_id())
        else {
            return Ok(None);
        };
        Ok(self
            .parent_module_mut(parent, relation)?
            .clear_local_name(child_id))
    }

    /// Returns true if `parent` has a child with local name `name`.
    ///
    /// # Errors
    ///
    /// See [`entity`](Self::entity).
    pub fn has_child(&self, parent: EntityId, name: &str) -> Result<bool> {
        self.local_name_holder(parent, name).map(|holder| holder.is_some())
    }

    /// Child of `parent` with local name `name`.
    ///
    /// # Errors
    ///
    /// See [`entity`](Self::entity).
    pub fn get_child(&self, parent: EntityId, name: &str) -> Result<Option<EntityId>> {
        self.local_name_holder(parent, name)
    }

    /// Gives `id` the global name `name`, freeing its previous name.
    ///
    /// # Errors
    ///
    /// Invalid names and names held by another entity are rejected; the old
    /// name is kept in that case.
    pub fn set_global_name(&mut self, id: EntityId, name: &str) -> Result<()> {
        self.entities.validate(id)?;
        self.registry.check_available(name, id)?;

        let record = self.entities.fetch_mut(id)?;
        if record.global_name.as_deref() == Some(name) {
            return Ok(());
        }
        if let Some(old) = record.global_name.take() {
            self.registry.erase_entity_if(&old, id);
        }
        self.registry.add_entity(id, name)?;
        record.global_name = Some(name.to_string());

        log::debug!("{id:?} is now named {name:?}");
        Ok(())
    }

    /// Removes the global name of `id` and returns it.
    ///
    /// # Errors
    ///
    /// Returns an error for stale or unknown handles.
    pub fn clear_global_name(&mut self, id: EntityId) -> Result<Option<String>> {
        let record = self.entities.fetch_mut(id)?;
        let old = record.global_name.take();
        if let Some(old) = &old {
            self.registry.erase_entity_if(old, id);
        }
        Ok(old)
    }

    /// Allows or forbids erasing `id` by name.
    ///
    /// # Errors
    ///
    /// The root can never be made erasable.
    pub fn set_can_be_erased(&mut self, id: EntityId, can_be_erased: bool) -> Result<()> {
        if id == self.root && can_be_erased {
            return Err(Error::not_erasable(id));
        }
        self.entities.fetch_mut(id)?.can_be_erased = can_be_erased;
        Ok(())
    }

    /// Returns the active scene.
    #[must_use]
    pub fn active_scene(&self) -> Option<EntityId> {
        self.active_scene
    }

    /// Makes `scene` the active scene.
    ///
    /// # Errors
    ///
    /// Fails for stale handles and for entities that are not scenes.
    pub fn set_active_scene(&mut self, scene: EntityId) -> Result<()> {
        let kind = self.entities.fetch(scene)?.kind;
        if !kind.is_scene() {
            return Err(Error::binding(BindingError::KindMismatch {
                relation: Relation::Scenes,
                child: kind,
            }));
        }
        self.active_scene = Some(scene);
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Borrowed view of a live entity.
    ///
    /// # Errors
    ///
    /// Returns a stale entity or entity not found error for handles that do
    /// not resolve, including destroyed entities.
    pub fn entity(&self, id: EntityId) -> Result<EntityRef<'_>> {
        let record = self.entities.fetch(id)?;
        Ok(EntityRef::new(self, id, record))
    }

    /// Returns the record of a live entity.
    ///
    /// # Errors
    ///
    /// See [`entity`](Self::entity).
    pub fn record(&self, id: EntityId) -> Result<&EntityRecord> {
        self.entities.fetch(id)
    }

    /// Returns true if `id` resolves to a live entity.
    #[must_use]
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.entities.exists(id)
    }

    /// Lifecycle state of `id`; `Destroyed` once the handle no longer resolves.
    #[must_use]
    pub fn lifecycle(&self, id: EntityId) -> Lifecycle {
        self.entities
            .get(id)
            .map_or(Lifecycle::Destroyed, EntityRecord::lifecycle)
    }

    /// Parent of `id`, `None` for the root.
    ///
    /// # Errors
    ///
    /// See [`entity`](Self::entity).
    pub fn get_parent(&self, id: EntityId) -> Result<Option<EntityId>> {
        self.entity(id).map(|entity| entity.get_parent())
    }

    /// Number of direct children of `id` across all relations.
    ///
    /// # Errors
    ///
    /// See [`entity`](Self::entity).
    pub fn get_number_of_children(&self, id: EntityId) -> Result<usize> {
        self.entity(id).map(|entity| entity.get_number_of_children())
    }

    /// Number of descendants of `id` across all relations.
    ///
    /// # Errors
    ///
    /// See [`entity`](Self::entity).
    pub fn get_number_of_descendants(&self, id: EntityId) -> Result<usize> {
        self.entity(id).map(|entity| entity.get_number_of_descendants())
    }

    /// Nearest scene at or above `id`.
    ///
    /// # Errors
    ///
    /// See [`entity`](Self::entity).
    pub fn get_scene(&self, id: EntityId) -> Result<Option<EntityId>> {
        self.entity(id).map(|entity| entity.get_scene())
    }

    /// Parent module of `id` for `relation`.
    ///
    /// # Errors
    ///
    /// Fails for stale handles and kinds that do not expose `relation`.
    pub fn parent_module(&self, id: EntityId, relation: Relation) -> Result<&ParentModule> {
        let record = self.entities.fetch(id)?;
        record.parent_module(relation).ok_or_else(|| {
            Error::binding(BindingError::RelationNotExposed {
                parent: record.kind,
                relation,
            })
        })
    }

    /// Direct children of `id`, across relations, in slot order.
    ///
    /// # Errors
    ///
    /// See [`entity`](Self::entity).
    pub fn children(&self, id: EntityId) -> Result<Vec<EntityId>> {
        self.entities.fetch(id).map(EntityRecord::children)
    }

    /// Iterates every live entity and its record.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &EntityRecord)> + '_ {
        self.entities.iter()
    }

    /// Number of ancestors of `id` (the root has depth 0).
    ///
    /// # Errors
    ///
    /// Fails for stale handles, or if the parent chain is longer than the
    /// number of live entities (a cycle).
    pub fn depth(&self, id: EntityId) -> Result<usize> {
        let mut depth = 0;
        let mut current = self.entities.fetch(id)?.child.get_parent();
        while let Some(parent) = current {
            depth += 1;
            if depth > self.entities.len() {
                return Err(Error::invariant(format!("parent chain of {id:?} loops")));
            }
            current = self.entities.fetch(parent)?.child.get_parent();
        }
        Ok(depth)
    }

    /// Returns true if `ancestor` is a strict ancestor of `id`.
    fn is_ancestor(&self, ancestor: EntityId, id: EntityId) -> Result<bool> {
        let mut current = self.entities.fetch(id)?.child.get_parent();
        let mut steps = 0;
        while let Some(parent) = current {
            if parent == ancestor {
                return Ok(true);
            }
            steps += 1;
            if steps > self.entities.len() {
                return Err(Error::invariant(format!("parent chain of {id:?} loops")));
            }
            current = self.entities.fetch(parent)?.child.get_parent();
        }
        Ok(false)
    }

    /// Height of the subtree rooted at `id` (a leaf has height 0).
    fn height(&self, id: EntityId) -> Result<usize> {
        let mut height = 0;
        for child in self.entities.fetch(id)?.children() {
            height = height.max(1 + self.height(child)?);
        }
        Ok(height)
    }

    pub(crate) fn descendants_of(&self, id: EntityId) -> usize {
        self.entities.get(id).map_or(0, |record| {
            record
                .parents
                .iter()
                .map(|module| module.get_number_of_descendants(|child| self.descendants_of(child)))
                .sum()
        })
    }

    pub(crate) fn scene_of(&self, id: EntityId) -> Option<EntityId> {
        let mut current = Some(id);
        while let Some(candidate) = current {
            let record = self.entities.get(candidate)?;
            if record.kind.is_scene() {
                return Some(candidate);
            }
            current = record.child.get_parent();
        }
        None
    }

    /// Verifies parent/child symmetry and registry consistency.
    ///
    /// # Errors
    ///
    /// Returns the first invariant violation found.
    pub fn check_consistency(&self) -> Result<()> {
        for (id, record) in self.entities.iter() {
            if let (Some(parent), Some(relation), Some(child_id)) = (
                record.child.get_parent(),
                record.child.relation(),
                record.child.child_id(),
            ) {
                let holder = self
                    .entities
                    .get(parent)
                    .and_then(|parent| parent.parent_module(relation))
                    .and_then(|module| module.get(child_id));
                if holder != Some(id) {
                    return Err(Error::invariant(format!(
                        "{id:?} claims slot {child_id} of {relation} of {parent:?}, which holds {holder:?}"
                    )));
                }
            } else if !record.child.is_root() {
                return Err(Error::invariant(format!("{id:?} is live but unbound")));
            }

            let mut local_names = BTreeSet::new();
            for module in &record.parents {
                for (name, child_id) in module.local_names() {
                    if module.get(child_id).is_none() {
                        return Err(Error::invariant(format!(
                            "local name {name:?} in {} of {id:?} points at empty slot {child_id}",
                            module.relation()
                        )));
                    }
                    if !local_names.insert(name) {
                        return Err(Error::invariant(format!(
                            "local name {name:?} is used twice under {id:?}"
                        )));
                    }
                }
                for (child_id, child) in module.children() {
                    let back = self.entities.get(child).map(|child| child.child);
                    let symmetric = back.is_some_and(|back| {
                        back.get_parent() == Some(id) && back.child_id() == Some(child_id)
                    });
                    if !symmetric {
                        return Err(Error::invariant(format!(
                            "slot {child_id} of {} of {id:?} holds {child:?}, which does not point back",
                            module.relation()
                        )));
                    }
                }
            }

            if let Some(name) = &record.global_name {
                if self.registry.get_entity(name) != Some(id) {
                    return Err(Error::invariant(format!(
                        "{id:?} is named {name:?} but the registry disagrees"
                    )));
                }
            }
        }

        for (name, id) in self.registry.iter() {
            let recorded = self.entities.get(id).and_then(EntityRecord::global_name);
            if recorded != Some(name) {
                return Err(Error::invariant(format!(
                    "registry maps {name:?} to {id:?}, which is named {recorded:?}"
                )));
            }
        }
        Ok(())
    }
}
