//! Predicate AST, evaluator, and emitter
//!
//! The AST is a closed sum type built once per compile and never mutated.
//! `evaluate` interprets a node against a single `serde_json::Value` object;
//! `emit` serializes a node back into the filter-string grammar, which is
//! also the wire form handed to external backing providers.

mod ast;
mod eval;
mod emit;

pub use ast::{Connective, FieldPath, Operator, PredicateNode, TypedValue};
pub use emit::emit;
pub use eval::{evaluate, lookup_path};

pub(crate) use eval::field_date;
