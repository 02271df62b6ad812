use std::collections::BTreeSet;
use std::fmt;

use super::rule::Rule;

/// The outcome of one lookup: the winning rules and the union of their
/// outputs.
///
/// An empty result is a normal outcome for a query no rule matches.
#[derive(Debug, Clone)]
#[must_use]
pub struct MatchResult<'a, T> {
    rules: Vec<&'a Rule<T>>,
    values: BTreeSet<&'a T>,
    universe: &'a BTreeSet<T>,
}

impl<'a, T: Ord> MatchResult<'a, T> {
    pub(crate) fn new(rules: Vec<&'a Rule<T>>, universe: &'a BTreeSet<T>) -> Self {
        let values = rules
            .iter()
            .copied()
            .flat_map(|r: &'a Rule<T>| r.outputs().iter())
            .collect();
        Self {
            rules,
            values,
            universe,
        }
    }

    pub(crate) fn empty(universe: &'a BTreeSet<T>) -> Self {
        Self::new(Vec::new(), universe)
    }

    /// The rules that survived specificity filtering, in store order.
    #[must_use]
    pub fn rules(&self) -> &[&'a Rule<T>] {
        &self.rules
    }

    /// Union of the winning rules' outputs.
    #[must_use]
    pub fn values(&self) -> &BTreeSet<&'a T> {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a T> + '_ {
        self.values.iter().copied()
    }

    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.values.contains(value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether `value` is an output of any rule in the store, matched or not.
    #[must_use]
    pub fn is_known_output(&self, value: &T) -> bool {
        self.universe.contains(value)
    }

    /// Every output value the store can produce.
    #[must_use]
    pub fn all_output_values(&self) -> &'a BTreeSet<T> {
        self.universe
    }

    /// Clone the matched outputs into an owned set.
    #[must_use]
    pub fn to_owned_values(&self) -> BTreeSet<T>
    where
        T: Clone,
    {
        self.values.iter().map(|v| (*v).clone()).collect()
    }
}

impl<T: fmt::Debug> fmt::Display for MatchResult<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rules => {:?}", self.rules.len(), self.values)
    }
}
