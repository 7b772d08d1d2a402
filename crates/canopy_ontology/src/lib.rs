//! Entity lifecycle orchestration over the canopy ownership tree.
//!
//! This crate provides:
//! - [`Universe`] - The simulation root: create, destroy, rebind and query entities
//! - [`Entity`] - The capability contract every entity answers, via [`EntityRef`]
//! - [`UniverseConfig`] - Root naming, erasability defaults and depth limits
//! - [`TeardownHook`] - Callbacks run exactly once per destroyed entity
//! - Name-based lookup for console and scripting consumers ([`EntityInfo`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod builder;
pub mod config;
pub mod entity;
pub mod hook;
pub mod lookup;
pub mod record;
pub mod universe;

pub use builder::EntityBuilder;
pub use config::UniverseConfig;
pub use entity::{Entity, EntityRef};
pub use hook::{TeardownEvent, TeardownHook};
pub use lookup::EntityInfo;
pub use record::{EntityRecord, Lifecycle};
pub use universe::{SharedUniverse, Universe};
