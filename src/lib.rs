//! Specificity-ranked condition-to-value tables.
//!
//! A [`RuleStore`] holds [`Rule`]s mapping condition values to outputs.
//! Looking up a [`Query`] returns the union of outputs of the most specific
//! matching rules: a rule is dropped when another match declares a strict
//! superset of its condition names. Rules that would give different outputs
//! for the same literal input are rejected when the store is built.
//!
//! ```
//! use condval::{Query, RuleStoreBuilder};
//!
//! let store = RuleStoreBuilder::new()
//!     .rule(|r| r.when("type", "contract").when("isViewer", true).then("title"))
//!     .rule(|r| {
//!         r.when("type", "contract")
//!             .when("state", "draft")
//!             .when("isViewer", true)
//!             .then("due date")
//!     })
//!     .build()
//!     .unwrap();
//!
//! let query = Query::new()
//!     .set("type", "contract")
//!     .set("state", "draft")
//!     .set("isViewer", true);
//! let result = store.lookup(&query).unwrap();
//! assert_eq!(result.iter().collect::<Vec<_>>(), [&"due date"]);
//! ```

mod build;
mod error;
mod lookup;
pub mod parse;
pub mod predicates;
mod types;

pub use error::CondvalError;
pub use predicates::Fallible;
pub use types::{
    BuildError, CaseInsensitive, CaseSensitive, ConditionValue, EqualityPredicate, LookupReport,
    MatchResult, PredicateError, Query, Rule, RuleBuilder, RuleStore, RuleStoreBuilder,
    UniqueConditionKey,
};
