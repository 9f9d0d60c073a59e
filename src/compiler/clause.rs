//! Single-clause compilation
//!
//! Resolves the clause's field path against the catalog, coerces the raw
//! literal to the resolved kind, and emits one predicate leaf. A
//! non-terminal collection segment compiles the remaining suffix against
//! the collection's element catalog under an existential binding.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::catalog::{Catalog, FieldDescriptor, FieldKind};
use crate::errors::{SearchError, SearchResult};
use crate::parser::RawClause;
use crate::predicate::{FieldPath, Operator, PredicateNode, TypedValue};

/// Compiles one raw clause into a predicate leaf
pub fn compile_clause(clause: &RawClause, catalog: &Catalog) -> SearchResult<PredicateNode> {
    let segments: Vec<&str> = clause.field.split('.').collect();
    compile_path(
        &segments,
        clause.operator,
        &clause.value,
        catalog,
        &clause.field,
    )
}

fn compile_path(
    segments: &[&str],
    operator: Operator,
    raw_value: &str,
    catalog: &Catalog,
    full_path: &str,
) -> SearchResult<PredicateNode> {
    let mut resolved: Vec<String> = Vec::with_capacity(segments.len());
    let mut current = catalog;

    for (depth, segment) in segments.iter().enumerate() {
        let (canonical, descriptor) = current
            .resolve(segment)
            .ok_or_else(|| SearchError::unknown_field(full_path))?;
        resolved.push(canonical.to_string());

        if depth + 1 == segments.len() {
            return leaf(FieldPath::new(resolved), descriptor, operator, raw_value);
        }

        match (&descriptor.kind, descriptor.is_collection) {
            (FieldKind::Object { fields }, true) => {
                // Existential: compile the suffix against the element
                // catalog with a fresh binding per element.
                let inner =
                    compile_path(&segments[depth + 1..], operator, raw_value, fields, full_path)?;
                return Ok(PredicateNode::Any {
                    path: FieldPath::new(resolved),
                    predicate: Box::new(inner),
                });
            }
            (FieldKind::Object { fields }, false) => current = fields,
            // A scalar segment cannot be traversed further
            _ => return Err(SearchError::unknown_field(full_path)),
        }
    }

    // Segments are non-empty: split('.') yields at least one element
    unreachable!("field path with no segments")
}

fn leaf(
    path: FieldPath,
    descriptor: &FieldDescriptor,
    op: Operator,
    raw: &str,
) -> SearchResult<PredicateNode> {
    let field = path.dotted();

    // An empty literal under =/!= is a null comparison for every
    // non-string kind.
    if raw.is_empty() && op.is_equality() && descriptor.kind != FieldKind::String {
        return Ok(PredicateNode::comparison(path, op, TypedValue::Null));
    }

    match &descriptor.kind {
        FieldKind::String => {
            if op == Operator::Eq && raw.contains('*') {
                return Ok(wildcard(path, raw));
            }
            match op {
                Operator::Empty => Ok(PredicateNode::comparison(path, op, TypedValue::Null)),
                // Equality, substring, and relational (ordinal sign
                // collapse) all apply to strings directly.
                _ => Ok(PredicateNode::comparison(
                    path,
                    op,
                    TypedValue::Str(raw.to_string()),
                )),
            }
        }
        FieldKind::Int => match op {
            Operator::Empty => Ok(PredicateNode::comparison(path, op, TypedValue::Null)),
            _ if op.is_substring() => Err(substring_not_allowed(op, &field)),
            _ => {
                let value = raw
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| SearchError::invalid_value(&field, raw, "int"))?;
                Ok(PredicateNode::comparison(path, op, TypedValue::Int(value)))
            }
        },
        FieldKind::Float => match op {
            Operator::Empty => Ok(PredicateNode::comparison(path, op, TypedValue::Null)),
            _ if op.is_substring() => Err(substring_not_allowed(op, &field)),
            _ => {
                let value = raw
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| SearchError::invalid_value(&field, raw, "float"))?;
                Ok(PredicateNode::comparison(path, op, TypedValue::Float(value)))
            }
        },
        FieldKind::Bool => match op {
            Operator::Empty => Ok(PredicateNode::comparison(path, op, TypedValue::Null)),
            _ if op.is_substring() => Err(substring_not_allowed(op, &field)),
            _ => {
                let value = parse_bool(raw)
                    .ok_or_else(|| SearchError::invalid_value(&field, raw, "bool"))?;
                // Preserved quirk: any relational operator on a boolean
                // collapses to a != test against the parsed literal.
                let op = if op.is_equality() { op } else { Operator::Ne };
                Ok(PredicateNode::comparison(path, op, TypedValue::Bool(value)))
            }
        },
        FieldKind::Date => match op {
            Operator::Empty => Ok(PredicateNode::comparison(path, op, TypedValue::Null)),
            _ if op.is_substring() => Err(substring_not_allowed(op, &field)),
            _ => {
                let date = NaiveDate::parse_from_str(raw, "%d.%m.%Y")
                    .map_err(|_| SearchError::invalid_value(&field, raw, "date"))?;
                Ok(PredicateNode::comparison(path, op, TypedValue::Date(date)))
            }
        },
        FieldKind::Guid => match op {
            Operator::Empty => Ok(PredicateNode::comparison(path, op, TypedValue::Null)),
            Operator::Eq | Operator::Ne => {
                let guid = Uuid::parse_str(raw)
                    .map_err(|_| SearchError::invalid_value(&field, raw, "guid"))?;
                Ok(PredicateNode::comparison(path, op, TypedValue::Guid(guid)))
            }
            _ => Err(SearchError::operator_not_allowed(
                op.token(),
                &field,
                "=,!=,empty",
            )),
        },
        FieldKind::Enum { members } => match op {
            Operator::Empty => Ok(PredicateNode::comparison(path, op, TypedValue::Null)),
            _ if op.is_substring() => Err(substring_not_allowed(op, &field)),
            // Equality parses the member name; relational compares the
            // underlying integers.
            _ => {
                let value = *members
                    .get(raw)
                    .ok_or_else(|| SearchError::invalid_value(&field, raw, "enum"))?;
                Ok(PredicateNode::comparison(
                    path,
                    op,
                    TypedValue::Enum {
                        name: raw.to_string(),
                        value,
                    },
                ))
            }
        },
        FieldKind::Flags { members } => match op {
            Operator::Empty => Ok(PredicateNode::comparison(path, op, TypedValue::Null)),
            Operator::Eq | Operator::Ne => {
                let value = *members
                    .get(raw)
                    .ok_or_else(|| SearchError::invalid_value(&field, raw, "flags"))?;
                Ok(PredicateNode::comparison(
                    path,
                    op,
                    TypedValue::Flags {
                        name: raw.to_string(),
                        value,
                    },
                ))
            }
            _ => Err(SearchError::operator_not_allowed(
                op.token(),
                &field,
                "=,!=",
            )),
        },
        FieldKind::Object { .. } => match op {
            Operator::Empty => Ok(PredicateNode::comparison(path, op, TypedValue::Null)),
            _ => Err(SearchError::invalid_value(
                &field,
                raw,
                descriptor.kind.kind_name(),
            )),
        },
    }
}

/// Splits an `=` literal on `*` into a startswith test for the first
/// non-empty part, an endswith test for the last, and a contains test for
/// each interior part, all conjoined. A literal of only `*` matches
/// everything.
fn wildcard(path: FieldPath, raw: &str) -> PredicateNode {
    let parts: Vec<&str> = raw.split('*').collect();
    let mut node: Option<PredicateNode> = None;

    for (index, part) in parts.iter().enumerate() {
        if part.trim().is_empty() {
            continue;
        }
        let op = if index == 0 {
            Operator::StartsWith
        } else if index + 1 == parts.len() {
            Operator::EndsWith
        } else {
            Operator::Contains
        };
        let test =
            PredicateNode::comparison(path.clone(), op, TypedValue::Str(part.to_string()));
        node = Some(match node {
            Some(previous) => previous.and(test),
            None => test,
        });
    }

    node.unwrap_or(PredicateNode::Always(true))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn substring_not_allowed(op: Operator, field: &str) -> SearchError {
    SearchError::operator_not_allowed(op.token(), field, "=,!=,>,>=,<,<=,empty")
}
