//! Cross-layer integration tests for canopy
//!
//! Tests that exercise the public facade across foundation, storage and
//! ontology together.

mod scenarios;
mod shared;
