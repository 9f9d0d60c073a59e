//! Predicate AST structures
//!
//! Defines the comparison operators, field paths, typed literals, and the
//! predicate node sum type produced by the compiler.

use chrono::NaiveDate;
use std::fmt;
use uuid::Uuid;

/// Comparison operators in token-matching priority order.
///
/// Priority is by specificity, not length: `!=`, `>=`, `<=` are checked
/// before `=`, `<`, `>` so a shorter operator never matches inside a longer
/// one at the same text position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `!=`
    Ne,
    /// `>=`
    Ge,
    /// `<=`
    Le,
    /// `=`
    Eq,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `contains`
    Contains,
    /// `startswith`
    StartsWith,
    /// `endswith`
    EndsWith,
    /// `empty`
    Empty,
}

impl Operator {
    /// All operators in token-matching priority order
    pub const ALL: [Operator; 10] = [
        Operator::Ne,
        Operator::Ge,
        Operator::Le,
        Operator::Eq,
        Operator::Lt,
        Operator::Gt,
        Operator::Contains,
        Operator::StartsWith,
        Operator::EndsWith,
        Operator::Empty,
    ];

    /// Returns the literal token for this operator
    pub fn token(&self) -> &'static str {
        match self {
            Operator::Ne => "!=",
            Operator::Ge => ">=",
            Operator::Le => "<=",
            Operator::Eq => "=",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Contains => "contains",
            Operator::StartsWith => "startswith",
            Operator::EndsWith => "endswith",
            Operator::Empty => "empty",
        }
    }

    /// Returns true for `=` and `!=`
    pub fn is_equality(&self) -> bool {
        matches!(self, Operator::Eq | Operator::Ne)
    }

    /// Returns true for `>`, `>=`, `<`, `<=`
    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            Operator::Gt | Operator::Ge | Operator::Lt | Operator::Le
        )
    }

    /// Returns true for `contains`, `startswith`, `endswith`
    pub fn is_substring(&self) -> bool {
        matches!(
            self,
            Operator::Contains | Operator::StartsWith | Operator::EndsWith
        )
    }

    /// Returns true for word-shaped tokens (spaced on emit)
    pub fn is_word(&self) -> bool {
        self.is_substring() || matches!(self, Operator::Empty)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// The AND/OR connective between two adjacent clauses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
}

impl Connective {
    pub fn as_str(&self) -> &'static str {
        match self {
            Connective::And => "and",
            Connective::Or => "or",
        }
    }
}

/// Ordered, non-empty sequence of resolved field-name segments.
///
/// Segments carry the canonical catalog casing; every prefix of the path
/// resolved in the catalog at compile time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    /// Creates a path from resolved segments
    pub fn new(segments: Vec<String>) -> Self {
        debug_assert!(!segments.is_empty());
        Self(segments)
    }

    /// Creates a single-segment path
    pub fn single(segment: impl Into<String>) -> Self {
        Self(vec![segment.into()])
    }

    /// Returns the path segments
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Returns the dot-separated form
    pub fn dotted(&self) -> String {
        self.0.join(".")
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dotted())
    }
}

/// A literal coerced to the resolved field kind
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// Null comparison target (empty literal, `empty` operator)
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Date-only value; both operands truncate to date on comparison
    Date(NaiveDate),
    Guid(Uuid),
    /// Plain enumeration member; relational comparisons use `value`
    Enum { name: String, value: i64 },
    /// Flagged enumeration member; equality becomes a bit test on `value`
    Flags { name: String, value: i64 },
}

/// Immutable predicate AST node
#[derive(Debug, Clone, PartialEq)]
pub enum PredicateNode {
    /// Constant predicate; a blank search string compiles to `Always(true)`
    Always(bool),
    /// One field/operator/value comparison leaf
    Comparison {
        path: FieldPath,
        op: Operator,
        value: TypedValue,
    },
    /// Existential quantification: some element of the collection at `path`
    /// satisfies the nested predicate
    Any {
        path: FieldPath,
        predicate: Box<PredicateNode>,
    },
    And(Box<PredicateNode>, Box<PredicateNode>),
    Or(Box<PredicateNode>, Box<PredicateNode>),
}

impl PredicateNode {
    /// Creates a comparison leaf
    pub fn comparison(path: FieldPath, op: Operator, value: TypedValue) -> Self {
        Self::Comparison { path, op, value }
    }

    /// Conjoins two nodes
    pub fn and(self, other: PredicateNode) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    /// Disjoins two nodes
    pub fn or(self, other: PredicateNode) -> Self {
        Self::Or(Box::new(self), Box::new(other))
    }
}
