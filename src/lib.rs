//! searchstring - compiles human-typed filter strings into executable predicates
//!
//! A filter string like `age>=30 and (name=John* or city=Paris)` is compiled
//! against a schema catalog into an immutable predicate AST that can be
//! evaluated in memory or emitted back into filter-string form for a backing
//! query engine. The seek module derives keyset-pagination plans whose
//! boundary predicates are expressed in the same grammar and compiled through
//! the same pipeline.

pub mod catalog;
pub mod compiler;
pub mod errors;
pub mod parser;
pub mod predicate;
pub mod seek;
