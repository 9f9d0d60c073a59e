//! Predicate AST assembly
//!
//! Folds compiled leaves and connectives into a single AST. Grouping
//! parentheses recorded during segmentation are reattached around the
//! corresponding leaf, then the fold applies conventional boolean
//! precedence: AND binds tighter than OR except where the parens override.

use crate::errors::{SearchError, SearchResult};
use crate::predicate::{Connective, PredicateNode};

#[derive(Debug)]
enum Token {
    Open,
    Close,
    Leaf(PredicateNode),
    And,
    Or,
}

/// Assembles leaves and connectives into one predicate AST.
///
/// `grouping` carries the (leading, trailing) paren counts recorded per
/// clause. Expects `leaves.len() == connectives.len() + 1`; parens that do
/// not pair up across clause boundaries are a syntax error.
pub fn assemble(
    leaves: Vec<PredicateNode>,
    connectives: &[Connective],
    grouping: &[(usize, usize)],
) -> SearchResult<PredicateNode> {
    debug_assert_eq!(leaves.len(), connectives.len() + 1);
    debug_assert_eq!(leaves.len(), grouping.len());

    let mut tokens: Vec<Token> = Vec::new();
    for (index, leaf) in leaves.into_iter().enumerate() {
        let (leading, trailing) = grouping[index];
        for _ in 0..leading {
            tokens.push(Token::Open);
        }
        tokens.push(Token::Leaf(leaf));
        for _ in 0..trailing {
            tokens.push(Token::Close);
        }
        if let Some(connective) = connectives.get(index) {
            tokens.push(match connective {
                Connective::And => Token::And,
                Connective::Or => Token::Or,
            });
        }
    }

    let mut stream = tokens.into_iter().peekable();
    let node = parse_or(&mut stream)?;
    if stream.next().is_some() {
        return Err(SearchError::syntax("misplaced group parentheses", 0));
    }
    Ok(node)
}

type Stream = std::iter::Peekable<std::vec::IntoIter<Token>>;

fn parse_or(stream: &mut Stream) -> SearchResult<PredicateNode> {
    let mut node = parse_and(stream)?;
    while matches!(stream.peek(), Some(Token::Or)) {
        stream.next();
        node = node.or(parse_and(stream)?);
    }
    Ok(node)
}

fn parse_and(stream: &mut Stream) -> SearchResult<PredicateNode> {
    let mut node = parse_primary(stream)?;
    while matches!(stream.peek(), Some(Token::And)) {
        stream.next();
        node = node.and(parse_primary(stream)?);
    }
    Ok(node)
}

fn parse_primary(stream: &mut Stream) -> SearchResult<PredicateNode> {
    match stream.next() {
        Some(Token::Leaf(node)) => Ok(node),
        Some(Token::Open) => {
            let node = parse_or(stream)?;
            match stream.next() {
                Some(Token::Close) => Ok(node),
                _ => Err(SearchError::syntax("misplaced group parentheses", 0)),
            }
        }
        _ => Err(SearchError::syntax("misplaced group parentheses", 0)),
    }
}
