//! Tokenizer/Segmenter subsystem
//!
//! Splits a raw search string into an ordered list of clauses and the
//! AND/OR connectives between them. Bracket nesting is tracked with a
//! stack; operator occurrences are located by specificity so a shorter
//! token never matches inside a longer one at the same position.

mod segmenter;

pub use segmenter::{prefix_fields, segment, RawClause};
