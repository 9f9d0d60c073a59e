//! Clause compiler and AST assembler
//!
//! `compile` is the single entry point used by both the user-filter path
//! and the seek-boundary path: it segments the input, resolves each clause
//! against the catalog, coerces literals to the resolved field kinds, and
//! folds the leaves with standard AND/OR precedence under the recorded
//! grouping parentheses.

mod assembler;
mod clause;

pub use assembler::assemble;
pub use clause::compile_clause;

use crate::catalog::Catalog;
use crate::errors::SearchResult;
use crate::parser::segment;
use crate::predicate::PredicateNode;

/// Compiles a search string into a predicate AST.
///
/// A blank or whitespace-only input compiles to `Always(true)`.
pub fn compile(input: &str, catalog: &Catalog) -> SearchResult<PredicateNode> {
    if input.trim().is_empty() {
        return Ok(PredicateNode::Always(true));
    }

    let (clauses, connectives) = segment(input)?;

    let mut leaves = Vec::with_capacity(clauses.len());
    let mut grouping = Vec::with_capacity(clauses.len());
    for clause in &clauses {
        leaves.push(compile_clause(clause, catalog)?);
        grouping.push((clause.leading_parens, clause.trailing_parens));
    }

    assemble(leaves, &connectives, &grouping)
}
