//! Core identifiers, entity kinds, relations and errors for canopy.
//!
//! This crate provides:
//! - [`EntityId`] - Generational entity handles
//! - [`EntityKind`] - The closed set of entity kinds in the ownership tree
//! - [`Relation`] - Declared parent/child relationships and their capability checks
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod entity;
pub mod error;
pub mod kind;

pub use entity::EntityId;
pub use error::{BindingError, Error, ErrorContext, ErrorKind, Result};
pub use kind::{EntityKind, OverloadSignature, Relation};
