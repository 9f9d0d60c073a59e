//! Emits a predicate AST back into filter-string form
//!
//! The output parses through the standard pipeline to an equivalent AST.
//! Grouping parentheses are inserted exactly where the tree requires them:
//! an `Or` operand of an `And`. Symbol operators are glued to their operands,
//! word operators are spaced.

use super::ast::{FieldPath, Operator, PredicateNode, TypedValue};

/// Renders a node into the filter-string grammar.
///
/// `Always(true)` (a blank compile) renders as the empty string.
pub fn emit(node: &PredicateNode) -> String {
    emit_prefixed(node, None)
}

fn emit_prefixed(node: &PredicateNode, prefix: Option<&FieldPath>) -> String {
    match node {
        PredicateNode::Always(_) => String::new(),
        PredicateNode::Comparison { path, op, value } => {
            let full_path = join_path(prefix, path);
            match op {
                Operator::Empty => format!("{} empty", full_path),
                _ if op.is_word() => {
                    format!("{} {} {}", full_path, op.token(), render_value(value))
                }
                _ => format!("{}{}{}", full_path, op.token(), render_value(value)),
            }
        }
        // Existential nodes re-flatten to the dotted collection path; the
        // prefix distributes over every comparison in the suffix predicate.
        PredicateNode::Any { path, predicate } => {
            let full_path = match prefix {
                Some(outer) => {
                    let mut segments = outer.segments().to_vec();
                    segments.extend(path.segments().iter().cloned());
                    FieldPath::new(segments)
                }
                None => path.clone(),
            };
            emit_prefixed(predicate, Some(&full_path))
        }
        PredicateNode::And(left, right) => format!(
            "{} and {}",
            emit_operand(left, prefix),
            emit_operand(right, prefix)
        ),
        PredicateNode::Or(left, right) => format!(
            "{} or {}",
            emit_prefixed(left, prefix),
            emit_prefixed(right, prefix)
        ),
    }
}

/// An Or operand of an And needs explicit grouping; everything else binds
/// at least as tightly as the surrounding And.
fn emit_operand(node: &PredicateNode, prefix: Option<&FieldPath>) -> String {
    match node {
        PredicateNode::Or(_, _) => format!("({})", emit_prefixed(node, prefix)),
        _ => emit_prefixed(node, prefix),
    }
}

fn join_path(prefix: Option<&FieldPath>, path: &FieldPath) -> String {
    match prefix {
        Some(outer) => format!("{}.{}", outer.dotted(), path.dotted()),
        None => path.dotted(),
    }
}

fn render_value(value: &TypedValue) -> String {
    match value {
        TypedValue::Null => String::new(),
        TypedValue::Bool(b) => b.to_string(),
        TypedValue::Int(i) => i.to_string(),
        TypedValue::Float(f) => f.to_string(),
        TypedValue::Str(s) => s.clone(),
        TypedValue::Date(d) => d.format("%d.%m.%Y").to_string(),
        TypedValue::Guid(g) => g.to_string(),
        TypedValue::Enum { name, .. } => name.clone(),
        TypedValue::Flags { name, .. } => name.clone(),
    }
}
