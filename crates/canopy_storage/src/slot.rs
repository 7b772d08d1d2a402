//! Dense slot storage with index reuse.
//!
//! A `SlotAllocator` hands out stable `usize` indices. Freed indices are
//! reused oldest first before any new index is minted, and the backing vector
//! is trimmed whenever its tail is freed, so its length tracks the live
//! high-water mark rather than the number of allocations ever made.
//!
//! # Compaction rule
//!
//! Releasing the last slot pops every trailing empty slot and then drops
//! free-list entries that now point past the end. Releasing any other slot
//! pushes its index to the back of the free list. The free list therefore
//! never holds an index that is out of range or occupied.

use std::collections::VecDeque;

use canopy_foundation::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Dense array of optional slots plus a FIFO free list of reclaimed indices.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SlotAllocator<T> {
    /// Slot contents. The last element is always `Some`.
    slots: Vec<Option<T>>,
    /// Reclaimed indices, oldest first.
    free_list: VecDeque<usize>,
    /// Number of occupied slots.
    occupied: usize,
}

impl<T> Default for SlotAllocator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SlotAllocator<T> {
    /// Creates an empty allocator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: VecDeque::new(),
            occupied: 0,
        }
    }

    /// Stores `value` and returns its index.
    ///
    /// Reuses the oldest freed index when one is available, otherwise
    /// appends and grows the collection by one.
    pub fn allocate(&mut self, value: T) -> usize {
        self.occupied += 1;

        if let Some(index) = self.free_list.pop_front() {
            debug_assert!(
                self.slots.get(index).is_some_and(Option::is_none),
                "free list held unusable index {index}"
            );
            self.slots[index] = Some(value);
            log::trace!("slot {index} reused");
            return index;
        }

        let index = self.slots.len();
        self.slots.push(Some(value));
        log::trace!("slot {index} minted");
        index
    }

    /// Empties the slot at `index` and returns what it held.
    ///
    /// # Errors
    ///
    /// Returns an invariant violation if `index` is out of range or already
    /// free. The allocator is left unchanged in that case.
    pub fn release(&mut self, index: usize) -> Result<T> {
        let length = self.slots.len();
        let Some(slot) = self.slots.get_mut(index) else {
            return Err(Error::invariant(format!(
                "release of slot {index} beyond length {length}"
            )));
        };
        let Some(value) = slot.take() else {
            return Err(Error::invariant(format!(
                "release of slot {index}, which is already free"
            )));
        };
        self.occupied -= 1;

        if index + 1 == length {
            while matches!(self.slots.last(), Some(None)) {
                self.slots.pop();
            }
            let length = self.slots.len();
            self.free_list.retain(|&free| free < length);
        } else {
            self.free_list.push_back(index);
        }

        Ok(value)
    }

    /// Returns the value at `index`, or `None` if out of range or free.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Mutable variant of [`get`](Self::get).
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    /// Returns true if `index` currently holds a value.
    #[must_use]
    pub fn is_occupied(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// Length of the slot collection: one past the highest occupied index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.occupied
    }

    /// Returns true if no slot is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Indices waiting for reuse, oldest first.
    pub fn free_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.free_list.iter().copied()
    }

    /// Iterates occupied slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|value| (index, value)))
    }
}
