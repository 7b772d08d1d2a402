//! Canopy - Entity ownership tree for simulations
//!
//! This crate re-exports all layers of the Canopy system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: canopy_ontology   - Universe, lifecycle, naming, lookup
//! Layer 1: canopy_storage    - Slot allocation, parent/child modules, registry
//! Layer 0: canopy_foundation - Core types (EntityId, EntityKind, Relation, Error)
//! ```

pub use canopy_foundation as foundation;
pub use canopy_ontology as ontology;
pub use canopy_storage as storage;
