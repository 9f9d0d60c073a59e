//! Seek (keyset) pagination subsystem
//!
//! Given an ordered list of sort keys with optional cursor boundary values,
//! the planner derives the composite boundary predicate, the forward or
//! backward sort directives, and the final filter + sort + limit plan.
//! Boundary predicates are expressed in the same filter-string grammar as
//! user queries and compiled through the standard pipeline.
//!
//! The bundled in-memory executor is the reference backing provider; an
//! external engine consumes the same plan through its own adapter.

mod executor;
mod keys;
mod planner;

pub use executor::MemoryExecutor;
pub use keys::{SeekDirection, SeekPlan, SortDirective, SortKey, SortOrder};
pub use planner::plan;
