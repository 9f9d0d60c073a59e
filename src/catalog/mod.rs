//! Schema Catalog subsystem
//!
//! The catalog is consumed, not built here: it maps field names to their
//! primitive kind and, for nested or collection fields, to the nested catalog.
//! It is read-only and shared by all compiles. Resolution is case-insensitive;
//! the resolved canonical name is what compiled predicates carry.

mod types;

pub use types::{Catalog, FieldDescriptor, FieldKind};
