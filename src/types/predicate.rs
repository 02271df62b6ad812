use super::error::PredicateError;

/// Decides whether a rule's declared value accepts a query's value.
///
/// Called as `test(name, declared, query)` during matching. Implementations
/// must be pure functions of their arguments. The engine assumes nothing
/// about symmetry, transitivity or reflexivity, so "query is below the
/// declared upper bound" is a valid predicate.
///
/// Any `Fn(&str, &str, &str) -> bool + Send + Sync` closure is a predicate:
///
/// ```
/// use condval::{Query, Rule, RuleStore};
///
/// let store = RuleStore::with_predicate(
///     |_name: &str, declared: &str, query: &str| query.starts_with(declared),
///     [Rule::builder().when("path", "/api").then("api").build().unwrap()],
/// )
/// .unwrap();
///
/// let result = store.lookup(&Query::new().set("path", "/api/users")).unwrap();
/// assert!(result.contains(&"api"));
/// ```
pub trait EqualityPredicate: Send + Sync {
    /// Returns whether `declared` (from the rule) accepts `query`.
    ///
    /// # Errors
    ///
    /// Returns [`PredicateError`] when the values cannot be compared; the
    /// error reaches the caller of the lookup untouched.
    fn test(&self, name: &str, declared: &str, query: &str) -> Result<bool, PredicateError>;
}

impl<F> EqualityPredicate for F
where
    F: Fn(&str, &str, &str) -> bool + Send + Sync,
{
    fn test(&self, name: &str, declared: &str, query: &str) -> Result<bool, PredicateError> {
        Ok(self(name, declared, query))
    }
}

/// Exact, case-sensitive string equality. The default predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaseSensitive;

impl EqualityPredicate for CaseSensitive {
    fn test(&self, _name: &str, declared: &str, query: &str) -> Result<bool, PredicateError> {
        Ok(declared == query)
    }
}

/// String equality ignoring case (Unicode lowercase folding).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaseInsensitive;

impl EqualityPredicate for CaseInsensitive {
    fn test(&self, _name: &str, declared: &str, query: &str) -> Result<bool, PredicateError> {
        if declared.len() == query.len() && declared.eq_ignore_ascii_case(query) {
            return Ok(true);
        }
        Ok(declared.to_lowercase() == query.to_lowercase())
    }
}
