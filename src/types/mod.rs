mod error;
mod key;
mod lookup_report;
mod match_result;
mod predicate;
mod query;
mod rule;
mod store;
mod value;

pub use error::{BuildError, PredicateError};
pub use key::UniqueConditionKey;
pub use lookup_report::LookupReport;
pub use match_result::MatchResult;
pub use predicate::{CaseInsensitive, CaseSensitive, EqualityPredicate};
pub use query::Query;
pub use rule::{Rule, RuleBuilder};
pub use store::{RuleStore, RuleStoreBuilder};
pub use value::ConditionValue;
