//! Clause segmentation
//!
//! Every text occurrence of every operator token starts one clause. The
//! literal value of a clause is delimited by scanning the span up to the
//! next operator from the right for the substring `and`, then `or`. The
//! scan is positional, not lexical: a field name that itself contains
//! `and` or `or` (e.g. a field literally named `Organization`) can be
//! mis-split. This is a known, documented ambiguity of the grammar and is
//! deliberately not "fixed" here, since token delimiters would change
//! observable parsing of existing inputs.

use crate::errors::{SearchError, SearchResult};
use crate::predicate::{Connective, Operator};

/// One clause extracted from the search string, not yet resolved against
/// the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawClause {
    /// Dot-separated field path text, parens and whitespace stripped
    pub field: String,
    /// The operator that started this clause
    pub operator: Operator,
    /// Literal value text, parens and whitespace stripped
    pub value: String,
    /// Count of literal `(` stripped from before the field name
    pub leading_parens: usize,
    /// Count of literal `)` stripped from after the value
    pub trailing_parens: usize,
}

/// Splits a search string into clauses and connectives.
///
/// Guarantees `clauses.len() == connectives.len() + 1` on success. Fails
/// with a syntax error for unbalanced brackets, a missing connective
/// between clauses, or an input with no recognizable operator.
pub fn segment(input: &str) -> SearchResult<(Vec<RawClause>, Vec<Connective>)> {
    check_brackets(input)?;

    let occurrences = operator_occurrences(input);
    if occurrences.is_empty() {
        return Err(SearchError::syntax(
            format!("no comparison operator in '{}'", input.trim()),
            0,
        ));
    }

    // Field text, value text, and connective per clause. The span between
    // the end of one operator and the start of the next holds the earlier
    // clause's value, the connective, and the next clause's field.
    let mut field_texts: Vec<&str> = vec![&input[..occurrences[0].0]];
    let mut value_texts: Vec<&str> = Vec::with_capacity(occurrences.len());
    let mut connectives: Vec<Connective> = Vec::with_capacity(occurrences.len() - 1);

    for (i, &(position, operator)) in occurrences.iter().enumerate() {
        let value_start = position + operator.token().len();
        match occurrences.get(i + 1) {
            Some(&(next_position, _)) => {
                let span = &input[value_start..next_position];
                let lowered = span.to_ascii_lowercase();
                if let Some(split) = lowered.rfind("and") {
                    value_texts.push(&span[..split]);
                    connectives.push(Connective::And);
                    field_texts.push(&span[split + 3..]);
                } else if let Some(split) = lowered.rfind("or") {
                    value_texts.push(&span[..split]);
                    connectives.push(Connective::Or);
                    field_texts.push(&span[split + 2..]);
                } else {
                    return Err(SearchError::syntax(
                        "missing and/or connective between clauses",
                        value_start,
                    ));
                }
            }
            None => value_texts.push(&input[value_start..]),
        }
    }

    let clauses = field_texts
        .into_iter()
        .zip(value_texts)
        .zip(occurrences)
        .map(|((field_text, value_text), (_, operator))| build_clause(field_text, operator, value_text))
        .collect();

    Ok((clauses, connectives))
}

/// Rewrites a search string so every field path is nested under `prefix`.
///
/// `"a=1 and b=2"` with prefix `"user"` becomes `"user.a=1 and user.b=2"`;
/// grouping parentheses and connectives are preserved. Used to embed a
/// query written against a child type under its parent entity. A blank
/// input is returned unchanged.
pub fn prefix_fields(input: &str, prefix: &str) -> SearchResult<String> {
    if input.trim().is_empty() {
        return Ok(input.to_string());
    }

    let (clauses, connectives) = segment(input)?;

    let mut out = String::new();
    for (index, clause) in clauses.iter().enumerate() {
        if index > 0 {
            out.push(' ');
            out.push_str(connectives[index - 1].as_str());
            out.push(' ');
        }
        for _ in 0..clause.leading_parens {
            out.push('(');
        }
        out.push_str(prefix);
        out.push('.');
        out.push_str(&clause.field);
        if clause.operator.is_word() {
            out.push(' ');
            out.push_str(clause.operator.token());
            if !clause.value.is_empty() {
                out.push(' ');
                out.push_str(&clause.value);
            }
        } else {
            out.push_str(clause.operator.token());
            out.push_str(&clause.value);
        }
        for _ in 0..clause.trailing_parens {
            out.push(')');
        }
    }

    Ok(out)
}

/// Locates all operator occurrences, most specific token first.
///
/// An occurrence at the same or the immediately following position as one
/// already recorded is discarded: the `=` inside an already-recorded `>=`
/// is not a second match. Returned sorted by position.
fn operator_occurrences(input: &str) -> Vec<(usize, Operator)> {
    let mut occurrences: Vec<(usize, Operator)> = Vec::new();

    for operator in Operator::ALL {
        let token = operator.token();
        let mut from = 0;
        while let Some(found) = input[from..].find(token) {
            let position = from + found;
            let shadowed = occurrences
                .iter()
                .any(|&(seen, _)| position == seen || position == seen + 1);
            if !shadowed {
                occurrences.push((position, operator));
            }
            from = position + token.len();
        }
    }

    occurrences.sort_by_key(|&(position, _)| position);
    occurrences
}

fn build_clause(field_text: &str, operator: Operator, value_text: &str) -> RawClause {
    let mut field = field_text.trim();
    let mut leading_parens = 0;
    while let Some(rest) = field.strip_prefix('(') {
        leading_parens += 1;
        field = rest.trim_start();
    }

    let mut value = value_text.trim();
    let mut trailing_parens = 0;
    while let Some(rest) = value.strip_suffix(')') {
        trailing_parens += 1;
        value = rest.trim_end();
    }

    RawClause {
        field: field.to_string(),
        operator,
        value: value.to_string(),
        leading_parens,
        trailing_parens,
    }
}

/// Verifies bracket nesting with a stack: every `)` must match an open
/// `(`, and no opens may be left at end of input.
fn check_brackets(input: &str) -> SearchResult<()> {
    let mut opens: Vec<usize> = Vec::new();

    for (position, c) in input.char_indices() {
        match c {
            '(' => opens.push(position),
            ')' => {
                if opens.pop().is_none() {
                    return Err(SearchError::syntax("unmatched closing bracket", position));
                }
            }
            _ => {}
        }
    }

    match opens.pop() {
        Some(position) => Err(SearchError::syntax("unclosed opening bracket", position)),
        None => Ok(()),
    }
}
