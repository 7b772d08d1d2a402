//! Integration tests for Layer 2: Ontology
//!
//! Tests for the universe: creation, destruction, rebinding, naming and
//! name-based lookup.

mod local_names;
