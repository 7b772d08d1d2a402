//! Name registry scoped to one universe.
//!
//! Names are unique. Registering a name that is already taken is rejected
//! and the existing mapping is kept; there is no overwrite path. Names are
//! kept in an ordered persistent map so that prefix completion is a range
//! scan and snapshots are O(1) clones.

use im::OrdMap;

use canopy_foundation::{EntityId, Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Name to entity lookup table.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Registry {
    names: OrdMap<String, EntityId>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks that `name` is usable as an entity name.
    ///
    /// # Errors
    ///
    /// Returns an invalid name error for empty names and names containing
    /// whitespace (they could never be typed as a single console argument).
    pub fn validate_name(name: &str) -> Result<()> {
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(Error::invalid_name(name));
        }
        Ok(())
    }

    /// Returns true if `name` is registered.
    #[must_use]
    pub fn is_name(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Checks whether `entity` could register `name` right now.
    ///
    /// # Errors
    ///
    /// Returns an invalid name error, or a name collision if another entity
    /// holds the name.
    pub fn check_available(&self, name: &str, entity: EntityId) -> Result<()> {
        Self::validate_name(name)?;
        match self.names.get(name) {
            Some(&existing) if existing != entity => Err(Error::name_collision(name, existing)),
            _ => Ok(()),
        }
    }

    /// Registers `name` for `entity`.
    ///
    /// Re-registering the same name for the same entity is a no-op.
    ///
    /// # Errors
    ///
    /// See [`check_available`](Self::check_available). On error the registry
    /// is unchanged.
    pub fn add_entity(&mut self, entity: EntityId, name: &str) -> Result<()> {
        self.check_available(name, entity)?;
        self.names.insert(name.to_string(), entity);
        Ok(())
    }

    /// Removes `name` and returns the entity it mapped to.
    pub fn erase_entity(&mut self, name: &str) -> Option<EntityId> {
        self.names.remove(name)
    }

    /// Removes `name` only if it currently maps to `entity`.
    pub fn erase_entity_if(&mut self, name: &str, entity: EntityId) -> bool {
        if self.names.get(name) == Some(&entity) {
            self.names.remove(name);
            true
        } else {
            false
        }
    }

    /// Looks up an entity by name.
    #[must_use]
    pub fn get_entity(&self, name: &str) -> Option<EntityId> {
        self.names.get(name).copied()
    }

    /// Number of registered names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if no name is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates `(name, entity)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, EntityId)> + '_ {
        self.names.iter().map(|(name, &entity)| (name.as_str(), entity))
    }

    /// All registered names, sorted and space separated.
    #[must_use]
    pub fn get_entity_names(&self) -> String {
        self.names
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Names starting with `prefix`, in order.
    #[must_use]
    pub fn get_completions(&self, prefix: &str) -> Vec<String> {
        self.names
            .range(prefix.to_string()..)
            .take_while(|(name, _)| name.starts_with(prefix))
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Number of names starting with `prefix`.
    #[must_use]
    pub fn get_number_of_completions(&self, prefix: &str) -> usize {
        self.names
            .range(prefix.to_string()..)
            .take_while(|(name, _)| name.starts_with(prefix))
            .count()
    }

    /// Extends `prefix` to the longest prefix shared by all its completions.
    ///
    /// Returns `prefix` unchanged when nothing matches.
    #[must_use]
    pub fn complete(&self, prefix: &str) -> String {
        let completions = self.get_completions(prefix);
        let Some((first, rest)) = completions.split_first() else {
            return prefix.to_string();
        };

        let mut common = first.len();
        for other in rest {
            common = first
                .char_indices()
                .zip(other.chars())
                .take_while(|((_, a), b)| a == b)
                .last()
                .map_or(0, |((i, a), _)| i + a.len_utf8())
                .min(common);
        }
        first[..common].to_string()
    }
}
