//! In-memory predicate evaluation
//!
//! Interprets a predicate node against a single `serde_json::Value` object.
//! Pure function over the AST; nodes are never mutated. Missing or null
//! fields fail positive comparisons, which makes them satisfy `!=` and
//! `empty`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;
use std::cmp::Ordering;
use uuid::Uuid;

use super::ast::{FieldPath, Operator, PredicateNode, TypedValue};

/// Evaluates a predicate node against one object
pub fn evaluate(node: &PredicateNode, object: &Value) -> bool {
    match node {
        PredicateNode::Always(value) => *value,
        PredicateNode::Comparison { path, op, value } => {
            eval_comparison(lookup_path(object, path), *op, value)
        }
        PredicateNode::Any { path, predicate } => match lookup_path(object, path) {
            Some(Value::Array(elements)) => {
                elements.iter().any(|element| evaluate(predicate, element))
            }
            _ => false,
        },
        PredicateNode::And(left, right) => evaluate(left, object) && evaluate(right, object),
        PredicateNode::Or(left, right) => evaluate(left, object) || evaluate(right, object),
    }
}

/// Walks a field path through nested objects
pub fn lookup_path<'a>(object: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    let mut current = object;
    for segment in path.segments() {
        current = current.get(segment)?;
    }
    Some(current)
}

fn eval_comparison(field: Option<&Value>, op: Operator, value: &TypedValue) -> bool {
    match op {
        Operator::Empty => is_empty(field),
        Operator::Eq => matches_eq(field, value),
        Operator::Ne => !matches_eq(field, value),
        Operator::Contains | Operator::StartsWith | Operator::EndsWith => {
            substring_match(field, op, value)
        }
        _ => match ordered_compare(field, value) {
            Some(ordering) => relation_holds(op, ordering),
            None => false,
        },
    }
}

/// Null/empty check: missing, null, empty string, or empty array
fn is_empty(field: Option<&Value>) -> bool {
    match field {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(a)) => a.is_empty(),
        Some(_) => false,
    }
}

fn matches_eq(field: Option<&Value>, value: &TypedValue) -> bool {
    let field = match field {
        Some(v) if !v.is_null() => v,
        // Equality against null is the null check itself
        _ => return matches!(value, TypedValue::Null),
    };

    match value {
        TypedValue::Null => false,
        TypedValue::Bool(expected) => field.as_bool() == Some(*expected),
        TypedValue::Int(expected) => {
            field.as_i64() == Some(*expected) || field.as_f64() == Some(*expected as f64)
        }
        TypedValue::Float(expected) => field.as_f64() == Some(*expected),
        TypedValue::Str(expected) => field.as_str() == Some(expected.as_str()),
        TypedValue::Date(expected) => field_date(field) == Some(*expected),
        TypedValue::Guid(expected) => field
            .as_str()
            .and_then(|s| Uuid::parse_str(s).ok())
            .map(|u| u == *expected)
            .unwrap_or(false),
        TypedValue::Enum { name, value } => match field {
            Value::String(member) => member == name,
            _ => field.as_i64() == Some(*value),
        },
        // HasFlag: the field's flag set includes every bit of the member
        TypedValue::Flags { value, .. } => field
            .as_i64()
            .map(|bits| bits & *value == *value)
            .unwrap_or(false),
    }
}

fn substring_match(field: Option<&Value>, op: Operator, value: &TypedValue) -> bool {
    let needle = match value {
        TypedValue::Str(s) => s.as_str(),
        _ => return false,
    };
    // Non-string fields are stringified before matching
    let haystack = match field {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => return false,
    };
    match op {
        Operator::Contains => haystack.contains(needle),
        Operator::StartsWith => haystack.starts_with(needle),
        Operator::EndsWith => haystack.ends_with(needle),
        _ => false,
    }
}

/// Compares a document value against a typed literal, when ordering is
/// defined for the literal's kind.
///
/// String ordering is ordinal, collapsed to a sign and compared against
/// zero by `relation_holds`. Dates compare date-only. Enums compare by
/// their underlying integer.
fn ordered_compare(field: Option<&Value>, value: &TypedValue) -> Option<Ordering> {
    let field = match field {
        Some(v) if !v.is_null() => v,
        _ => return None,
    };

    match value {
        TypedValue::Int(expected) => {
            if let Some(actual) = field.as_i64() {
                Some(actual.cmp(expected))
            } else {
                field.as_f64()?.partial_cmp(&(*expected as f64))
            }
        }
        TypedValue::Float(expected) => field.as_f64()?.partial_cmp(expected),
        TypedValue::Str(expected) => Some(field.as_str()?.cmp(expected.as_str())),
        TypedValue::Date(expected) => Some(field_date(field)?.cmp(expected)),
        TypedValue::Enum { value, .. } => Some(field.as_i64()?.cmp(value)),
        _ => None,
    }
}

fn relation_holds(op: Operator, ordering: Ordering) -> bool {
    match op {
        Operator::Gt => ordering == Ordering::Greater,
        Operator::Ge => ordering != Ordering::Less,
        Operator::Lt => ordering == Ordering::Less,
        Operator::Le => ordering != Ordering::Greater,
        _ => false,
    }
}

/// Reads a document date value, truncated to date-only.
///
/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS`, and bare `YYYY-MM-DD`.
pub(crate) fn field_date(field: &Value) -> Option<NaiveDate> {
    let text = field.as_str()?;
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant.date_naive());
    }
    if let Ok(local) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Some(local.date());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}
