//! Entity arena with generational indices.
//!
//! The `EntityStore` owns every entity record of a universe. Handles are
//! `EntityId`s; a destroyed entity's index goes back on a free list and its
//! generation is bumped, so old handles are detected as stale.

use canopy_foundation::{EntityId, Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
struct Entry<T> {
    /// Even generations are free, odd generations are alive.
    generation: u32,
    value: Option<T>,
}

/// Generational arena of entity records.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntityStore<T> {
    entries: Vec<Entry<T>>,
    /// Free list of indices available for reuse.
    free_list: Vec<u32>,
    /// Count of live entities.
    live_count: usize,
}

impl<T> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EntityStore<T> {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            free_list: Vec::new(),
            live_count: 0,
        }
    }

    /// Stores `value` and returns its handle.
    ///
    /// Reuses indices from the free list when available.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX - 1` indices would be in use.
    pub fn spawn(&mut self, value: T) -> EntityId {
        self.live_count += 1;

        if let Some(index) = self.free_list.pop() {
            let entry = &mut self.entries[index as usize];
            // Was even/free, now odd/alive
            entry.generation += 1;
            entry.value = Some(value);
            EntityId::new(index, entry.generation)
        } else {
            let index = u32::try_from(self.entries.len())
                .ok()
                .filter(|&index| index != u32::MAX)
                .expect("entity index space exhausted");
            // New entities start at generation 1 (odd = alive)
            self.entries.push(Entry {
                generation: 1,
                value: Some(value),
            });
            EntityId::new(index, 1)
        }
    }

    /// Removes an entity and returns its record.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is stale or was never allocated.
    pub fn destroy(&mut self, id: EntityId) -> Result<T> {
        self.validate(id)?;

        let entry = &mut self.entries[id.index as usize];
        // Was odd/alive, now even/free
        entry.generation += 1;
        let value = entry
            .value
            .take()
            .ok_or_else(|| Error::invariant(format!("live entry {id:?} held no record")))?;
        self.free_list.push(id.index);
        self.live_count -= 1;

        Ok(value)
    }

    /// Checks if a handle refers to a live entity.
    #[must_use]
    pub fn exists(&self, id: EntityId) -> bool {
        self.validate(id).is_ok()
    }

    /// Validates that a handle refers to a live entity.
    ///
    /// # Errors
    ///
    /// Returns a stale entity error on generation mismatch, and an entity not
    /// found error for indices that were never allocated or are free.
    pub fn validate(&self, id: EntityId) -> Result<()> {
        let Some(entry) = self.entries.get(id.index as usize) else {
            return Err(Error::entity_not_found(id));
        };

        if entry.generation != id.generation {
            // Entity was destroyed and possibly reused
            return Err(Error::stale_entity(id));
        }

        if entry.generation % 2 == 0 {
            return Err(Error::entity_not_found(id));
        }

        Ok(())
    }

    /// Returns the record for a live handle.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.entries
            .get(id.index as usize)
            .filter(|entry| entry.generation == id.generation)
            .and_then(|entry| entry.value.as_ref())
    }

    /// Mutable variant of [`get`](Self::get).
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.entries
            .get_mut(id.index as usize)
            .filter(|entry| entry.generation == id.generation)
            .and_then(|entry| entry.value.as_mut())
    }

    /// Returns the record for a handle, or why it is unusable.
    ///
    /// # Errors
    ///
    /// See [`validate`](Self::validate).
    pub fn fetch(&self, id: EntityId) -> Result<&T> {
        self.validate(id)?;
        self.get(id).ok_or_else(|| Error::entity_not_found(id))
    }

    /// Mutable variant of [`fetch`](Self::fetch).
    ///
    /// # Errors
    ///
    /// See [`validate`](Self::validate).
    pub fn fetch_mut(&mut self, id: EntityId) -> Result<&mut T> {
        self.validate(id)?;
        self.get_mut(id).ok_or_else(|| Error::entity_not_found(id))
    }

    /// Returns the total number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live_count
    }

    /// Returns true if there are no live entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live_count == 0
    }

    /// Iterates over live entities and their records.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> + '_ {
        self.entries.iter().zip(0u32..).filter_map(|(entry, index)| {
            entry
                .value
                .as_ref()
                .map(|value| (EntityId::new(index, entry.generation), value))
        })
    }

    /// Returns the current generation for an index, if it exists.
    #[must_use]
    pub fn generation(&self, index: u32) -> Option<u32> {
        self.entries.get(index as usize).map(|entry| entry.generation)
    }
}
