//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: EntityId, EntityKind, Relation and Error.

mod errors;
mod kinds;
