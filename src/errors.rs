//! Error taxonomy for search compilation and seek planning
//!
//! Four deterministic classes, all surfaced synchronously:
//! - Syntax: malformed bracket nesting or no recognizable clause
//! - UnknownField: a path segment does not resolve in the catalog
//! - InvalidValue: a literal fails to coerce to the resolved field kind
//! - OperatorNotAllowed: operator incompatible with the resolved kind
//!
//! Planning failures reduce to the same taxonomy since seek boundary
//! predicates are compiled through the standard pipeline.

use thiserror::Error;

/// Result type for compile and plan operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors surfaced to the caller of the compiler or planner
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// Malformed input text
    #[error("Syntax error at position {position}: {reason}")]
    Syntax { reason: String, position: usize },

    /// A field path segment did not resolve in the catalog
    #[error("Property '{path}' - not found!")]
    UnknownField { path: String },

    /// A literal could not be coerced to the resolved field kind
    #[error("Property '{field}' has wrong value '{literal}', according to its type '{expected}'.")]
    InvalidValue {
        field: String,
        literal: String,
        expected: String,
    },

    /// Operator incompatible with the resolved field kind
    #[error("Operator '{operator}' not allowed for property '{field}'. Allowed operators: {allowed}")]
    OperatorNotAllowed {
        operator: String,
        field: String,
        allowed: String,
    },
}

impl SearchError {
    /// Create a syntax error
    pub fn syntax(reason: impl Into<String>, position: usize) -> Self {
        Self::Syntax {
            reason: reason.into(),
            position,
        }
    }

    /// Create an unknown field error
    pub fn unknown_field(path: impl Into<String>) -> Self {
        Self::UnknownField { path: path.into() }
    }

    /// Create an invalid value error
    pub fn invalid_value(
        field: impl Into<String>,
        literal: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            literal: literal.into(),
            expected: expected.into(),
        }
    }

    /// Create an operator-not-allowed error
    pub fn operator_not_allowed(
        operator: impl Into<String>,
        field: impl Into<String>,
        allowed: impl Into<String>,
    ) -> Self {
        Self::OperatorNotAllowed {
            operator: operator.into(),
            field: field.into(),
            allowed: allowed.into(),
        }
    }
}
