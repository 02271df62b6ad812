use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use super::error::{BuildError, PredicateError};
use super::key::UniqueConditionKey;
use super::lookup_report::LookupReport;
use super::match_result::MatchResult;
use super::predicate::{CaseInsensitive, CaseSensitive, EqualityPredicate};
use super::query::Query;
use super::rule::{Rule, RuleBuilder};

/// Builder for constructing a [`RuleStore`].
///
/// Rules are defined via closures or pushed ready-made, then validated as one
/// batch by [`build()`](Self::build).
///
/// # Example
///
/// ```
/// use condval::{Query, RuleStoreBuilder};
///
/// let store = RuleStoreBuilder::new()
///     .rule(|r| r.when("type", "contract").when("isViewer", true).then("title"))
///     .rule(|r| r.when("type", "contract").when("isEditor", true).then("subject"))
///     .build()
///     .unwrap();
///
/// let query = Query::new().set("type", "contract").set("isViewer", true);
/// let result = store.lookup(&query).unwrap();
/// assert!(result.contains(&"title"));
/// ```
pub struct RuleStoreBuilder<T> {
    rules: Vec<Result<Rule<T>, BuildError>>,
    predicate: Arc<dyn EqualityPredicate>,
}

impl<T> Default for RuleStoreBuilder<T> {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            predicate: Arc::new(CaseSensitive),
        }
    }
}

impl<T: Ord + Clone + fmt::Debug> RuleStoreBuilder<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a rule. Malformed conditions surface from [`build()`](Self::build).
    #[must_use]
    pub fn rule(mut self, f: impl FnOnce(RuleBuilder<T>) -> RuleBuilder<T>) -> Self {
        let builder = f(RuleBuilder::new());
        self.rules.push(builder.build());
        self
    }

    /// Add an already built rule.
    #[must_use]
    pub fn push(mut self, rule: Rule<T>) -> Self {
        self.rules.push(Ok(rule));
        self
    }

    /// Use `predicate` instead of case-sensitive equality.
    #[must_use]
    pub fn predicate(mut self, predicate: impl EqualityPredicate + 'static) -> Self {
        self.predicate = Arc::new(predicate);
        self
    }

    /// Shorthand for `.predicate(CaseInsensitive)`.
    #[must_use]
    pub fn case_insensitive(self) -> Self {
        self.predicate(CaseInsensitive)
    }

    /// Validate the batch and produce an immutable [`RuleStore`].
    ///
    /// # Errors
    ///
    /// Returns the first [`BuildError`] of a malformed rule, or
    /// [`BuildError::DuplicateRuleConflict`] if two rules disagree.
    pub fn build(self) -> Result<RuleStore<T>, BuildError> {
        let rules = self.rules.into_iter().collect::<Result<Vec<_>, _>>()?;
        crate::build::build(rules.into_iter().map(Some), self.predicate)
    }
}

impl<T> fmt::Debug for RuleStoreBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleStoreBuilder")
            .field("rules", &self.rules.len())
            .finish_non_exhaustive()
    }
}

/// A validated, immutable collection of rules. Thread-safe and designed to
/// live behind `Arc`.
pub struct RuleStore<T> {
    pub(crate) rules: Vec<Rule<T>>,
    pub(crate) unique_keys: BTreeSet<UniqueConditionKey>,
    pub(crate) outputs: BTreeSet<T>,
    pub(crate) predicate: Arc<dyn EqualityPredicate>,
}

impl<T: Ord + Clone + fmt::Debug> RuleStore<T> {
    /// Build a store matching with case-sensitive equality. `None` entries
    /// are skipped.
    ///
    /// Validation expands every rule into its [`UniqueConditionKey`]s, so the
    /// cost is the product of each rule's alternatives per condition name.
    /// Rules offering many alternatives on many names dominate build time.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::DuplicateRuleConflict`] when two rules expand to
    /// the same key but declare different outputs.
    pub fn new<I, R>(rules: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = R>,
        R: Into<Option<Rule<T>>>,
    {
        Self::with_shared_predicate(Arc::new(CaseSensitive), rules)
    }

    /// Build a store matching with a custom predicate.
    ///
    /// # Errors
    ///
    /// See [`RuleStore::new`].
    pub fn with_predicate<I, R>(
        predicate: impl EqualityPredicate + 'static,
        rules: I,
    ) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = R>,
        R: Into<Option<Rule<T>>>,
    {
        Self::with_shared_predicate(Arc::new(predicate), rules)
    }

    /// Build a store around a predicate shared with other stores.
    ///
    /// # Errors
    ///
    /// See [`RuleStore::new`].
    pub fn with_shared_predicate<I, R>(
        predicate: Arc<dyn EqualityPredicate>,
        rules: I,
    ) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = R>,
        R: Into<Option<Rule<T>>>,
    {
        crate::build::build(rules.into_iter().map(Into::into), predicate)
    }
}

impl<T: Ord> RuleStore<T> {
    /// Look up the outputs for `query`.
    ///
    /// Returns the union of outputs of the most specific matching rules.
    /// A query no rule matches gives an empty result, not an error.
    ///
    /// # Errors
    ///
    /// Returns whatever [`PredicateError`] the predicate raised.
    pub fn lookup(&self, query: &Query) -> Result<MatchResult<'_, T>, PredicateError> {
        self.lookup_optional(Some(query))
    }

    /// Like [`lookup`](Self::lookup), but an absent query yields an empty
    /// result. An empty query still matches rules without conditions.
    ///
    /// # Errors
    ///
    /// Returns whatever [`PredicateError`] the predicate raised.
    pub fn lookup_optional(
        &self,
        query: Option<&Query>,
    ) -> Result<MatchResult<'_, T>, PredicateError> {
        crate::lookup::lookup(&self.rules, &self.outputs, self.predicate.as_ref(), query)
    }

    /// Look up `query` and call `on_value` once per distinct output.
    ///
    /// The first error, from either the predicate or the callback, is
    /// returned as-is and stops iteration.
    ///
    /// # Errors
    ///
    /// Returns the callback's error, or the predicate's converted via `From`.
    pub fn lookup_each<E, F>(&self, query: &Query, mut on_value: F) -> Result<(), E>
    where
        E: From<PredicateError>,
        F: FnMut(&T) -> Result<(), E>,
    {
        let result = self.lookup(query)?;
        for value in result.iter() {
            on_value(value)?;
        }
        Ok(())
    }

    /// Look up with diagnostics: matched rules before filtering, discarded
    /// rules, and timing.
    ///
    /// # Errors
    ///
    /// Returns whatever [`PredicateError`] the predicate raised.
    pub fn lookup_detailed(&self, query: &Query) -> Result<LookupReport<'_, T>, PredicateError> {
        crate::lookup::lookup_detailed(&self.rules, &self.outputs, self.predicate.as_ref(), query)
    }

    /// Every condition name used by any rule.
    #[must_use]
    pub fn all_condition_names(&self) -> BTreeSet<&str> {
        self.rules.iter().flat_map(|r| r.condition_names()).collect()
    }

    /// Every value any rule accepts for condition `name`. Empty when no rule
    /// uses the name.
    #[must_use]
    pub fn all_condition_values(&self, name: &str) -> BTreeSet<&str> {
        self.rules
            .iter()
            .filter_map(|r| r.values(name))
            .flatten()
            .map(String::as_str)
            .collect()
    }

    /// All distinct keys across all rules.
    #[must_use]
    pub fn all_unique_condition_keys(&self) -> &BTreeSet<UniqueConditionKey> {
        &self.unique_keys
    }

    /// Every output value any rule can produce.
    #[must_use]
    pub fn all_output_values(&self) -> &BTreeSet<T> {
        &self.outputs
    }

    /// Pairs of distinct keys that the store's predicate treats as the same,
    /// such as `{type=Contract}` and `{type=contract}` under
    /// [`CaseInsensitive`]. Quadratic in the number of keys; meant for
    /// authoring tools, not hot paths.
    ///
    /// # Errors
    ///
    /// Returns whatever [`PredicateError`] the predicate raised.
    pub fn predicate_collisions(
        &self,
    ) -> Result<Vec<(&UniqueConditionKey, &UniqueConditionKey)>, PredicateError> {
        let keys: Vec<&UniqueConditionKey> = self.unique_keys.iter().collect();
        let mut collisions = Vec::new();
        for (i, a) in keys.iter().enumerate() {
            for b in &keys[i + 1..] {
                if a.len() == b.len() && a.predicate_same(b, self.predicate.as_ref())? {
                    collisions.push((*a, *b));
                }
            }
        }
        Ok(collisions)
    }

    /// The rules in the order they were supplied.
    #[must_use]
    pub fn rules(&self) -> &[Rule<T>] {
        &self.rules
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The predicate used for matching.
    #[must_use]
    pub fn predicate(&self) -> &dyn EqualityPredicate {
        self.predicate.as_ref()
    }
}

impl RuleStore<String> {
    /// Parse a rule table and build a case-sensitive store from it.
    ///
    /// # Errors
    ///
    /// Returns [`CondvalError`](crate::CondvalError) on parse or build failure.
    pub fn from_dsl(input: &str) -> Result<Self, crate::CondvalError> {
        Self::from_dsl_with(input, CaseSensitive)
    }

    /// Parse a rule table and build a store using `predicate`.
    ///
    /// # Errors
    ///
    /// Returns [`CondvalError`](crate::CondvalError) on parse or build failure.
    pub fn from_dsl_with(
        input: &str,
        predicate: impl EqualityPredicate + 'static,
    ) -> Result<Self, crate::CondvalError> {
        let rules = crate::parse::parse(input)?;
        let store = Self::with_predicate(predicate, rules)?;
        Ok(store)
    }

    /// Read a rule table file and build a case-sensitive store from it.
    ///
    /// # Errors
    ///
    /// Returns [`CondvalError`](crate::CondvalError) on I/O, parse, or build
    /// failure.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::CondvalError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_dsl(&input)
    }
}

impl<T: fmt::Debug> fmt::Debug for RuleStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleStore")
            .field("rules", &self.rules)
            .field("unique_keys", &self.unique_keys.len())
            .field("outputs", &self.outputs)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Display for RuleStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RuleStore({} rules, {} keys, {} outputs)",
            self.rules.len(),
            self.unique_keys.len(),
            self.outputs.len(),
        )
    }
}
