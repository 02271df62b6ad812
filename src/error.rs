use thiserror::Error;

use crate::parse::ParseError;
use crate::{BuildError, PredicateError};

/// Unified error type covering parsing, construction, matching, and I/O.
///
/// Returned by convenience methods like [`RuleStore::from_dsl()`](crate::RuleStore::from_dsl)
/// and [`RuleStore::from_file()`](crate::RuleStore::from_file). Also usable
/// as the error type of [`RuleStore::lookup_each()`](crate::RuleStore::lookup_each)
/// callbacks.
#[derive(Debug, Error)]
pub enum CondvalError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Predicate(#[from] PredicateError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
