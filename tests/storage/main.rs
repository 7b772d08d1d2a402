//! Integration tests for Layer 1: Storage
//!
//! Tests for slot allocation, parent/child modules, the entity arena and the
//! name registry.

mod modules;
mod registry;
