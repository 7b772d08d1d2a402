//! Fluent entity creation.

use canopy_foundation::{EntityId, EntityKind, Result};

use crate::universe::Universe;

/// Builder returned by [`Universe::build`].
///
/// ```
/// use canopy_foundation::EntityKind;
/// use canopy_ontology::{Universe, UniverseConfig};
///
/// let mut universe = Universe::new(UniverseConfig::default()).unwrap();
/// let scene = universe.build(EntityKind::Scene).named("helsinki").create().unwrap();
/// let shader = universe.build(EntityKind::Shader).under(scene).create().unwrap();
/// assert_eq!(universe.get_parent(shader).unwrap(), Some(scene));
/// ```
#[derive(Debug)]
#[must_use = "builders do nothing until `create` is called"]
pub struct EntityBuilder<'u> {
    universe: &'u mut Universe,
    kind: EntityKind,
    parent: EntityId,
    name: Option<String>,
    local_name: Option<String>,
    can_be_erased: Option<bool>,
}

impl EntityBuilder<'_> {
    /// Parent to bind under. Defaults to the root.
    pub fn under(mut self, parent: EntityId) -> Self {
        self.parent = parent;
        self
    }

    /// Global name to register.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Local name to register in the parent.
    pub fn local_name(mut self, local_name: impl Into<String>) -> Self {
        self.local_name = Some(local_name.into());
        self
    }

    /// Overrides the configured erasability default.
    pub fn can_be_erased(mut self, can_be_erased: bool) -> Self {
        self.can_be_erased = Some(can_be_erased);
        self
    }

    /// Creates the entity.
    ///
    /// # Errors
    ///
    /// See [`Universe::create`].
    pub fn create(self) -> Result<EntityId> {
        let can_be_erased = self
            .can_be_erased
            .unwrap_or(self.universe.config().default_can_be_erased);
        self.universe.create_with(
            self.parent,
            self.kind,
            self.name.as_deref(),
            self.local_name.as_deref(),
            can_be_erased,
        )
    }
}

impl Universe {
    /// Starts building an entity of `kind` under the root.
    pub fn build(&mut self, kind: EntityKind) -> EntityBuilder<'_> {
        let parent = self.root();
        EntityBuilder {
            universe: self,
            kind,
            parent,
            name: None,
            local_name: None,
            can_be_erased: None,
        }
    }
}
