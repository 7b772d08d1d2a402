//! Slot allocation, parent/child bookkeeping, name registry and entity arena.
//!
//! This crate provides:
//! - [`SlotAllocator`] - Dense slots with FIFO index reuse and tail compaction
//! - [`ParentModule`] - Owning-side bookkeeping for one child relation
//! - [`ChildModule`] - Child-side back-reference to its parent's slot
//! - [`Registry`] - Name to entity lookup with prefix completion
//! - [`EntityStore`] - Generational arena for entity records

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod child;
pub mod entity;
pub mod parent;
pub mod registry;
pub mod slot;

pub use child::ChildModule;
pub use entity::EntityStore;
pub use parent::ParentModule;
pub use registry::Registry;
pub use slot::SlotAllocator;
