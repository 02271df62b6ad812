//! Line-oriented rule tables.
//!
//! ```text
//! # comment
//! when type = contract and isViewer = true => "title"
//! when state in (1, 2, 3) and role = viewer => "due date", owner
//! ```
//!
//! Each rule starts with `when`, joins conditions with `and`, and lists one or
//! more outputs after `=>`. A condition is `name = value` (or `==`) or
//! `name in (value, ...)`. Values are double-quoted strings or bare tokens.
//! A name may appear only once per rule.

mod error;
mod grammar;

use crate::Rule;

pub use error::ParseError;

/// Parse a rule table into rules with `String` outputs.
///
/// # Errors
///
/// Returns [`ParseError`] if the input is not a valid rule table.
pub fn parse(input: &str) -> Result<Vec<Rule<String>>, ParseError> {
    use winnow::Parser;
    grammar::parse_rules
        .parse(input)
        .map_err(|e| ParseError::new(e.to_string(), e.offset()))
}
