use std::error::Error as StdError;

use thiserror::Error;

/// Errors raised while constructing a [`Rule`](super::Rule) or a
/// [`RuleStore`](super::RuleStore).
///
/// Construction is all-or-nothing: on error no partially built value exists
/// and the caller fixes the input batch and builds again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("condition name must not be empty")]
    EmptyConditionName,

    #[error("condition '{name}' declares no acceptable values")]
    EmptyConditionValues { name: String },

    #[error(
        "rule {rule} conflicts on {key}: outputs {outputs} differ from previously declared {existing}"
    )]
    DuplicateRuleConflict {
        rule: String,
        key: String,
        outputs: String,
        existing: String,
    },
}

/// An error raised by an [`EqualityPredicate`](super::EqualityPredicate).
///
/// The engine never creates these itself; it hands back exactly the value the
/// predicate produced.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct PredicateError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl PredicateError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync + 'static>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}
