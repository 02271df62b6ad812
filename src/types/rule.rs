use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::error::BuildError;
use super::value::ConditionValue;

/// An immutable condition-to-outputs record.
///
/// Each condition name maps to a non-empty set of acceptable values. Values
/// under one name are alternatives (OR); distinct names must all hold (AND).
/// A rule without conditions is the universal rule and matches any query.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(
        serialize = "T: serde::Serialize",
        deserialize = "T: serde::Deserialize<'de> + Ord"
    ))
)]
pub struct Rule<T> {
    conditions: BTreeMap<String, BTreeSet<String>>,
    outputs: BTreeSet<T>,
}

impl<T: Ord> Rule<T> {
    /// Create a rule from a condition map and its outputs. Duplicate outputs
    /// collapse.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::EmptyConditionName`] or
    /// [`BuildError::EmptyConditionValues`] for malformed conditions.
    pub fn new(
        conditions: BTreeMap<String, BTreeSet<String>>,
        outputs: impl IntoIterator<Item = T>,
    ) -> Result<Self, BuildError> {
        let rule = Self {
            conditions,
            outputs: outputs.into_iter().collect(),
        };
        rule.validate()?;
        Ok(rule)
    }

    /// Start building a rule.
    #[must_use]
    pub fn builder() -> RuleBuilder<T> {
        RuleBuilder::default()
    }
}

impl<T> Rule<T> {
    /// Check the condition invariants. Rules built through [`Rule::new`]
    /// always pass; deserialized ones are re-checked by the store.
    pub(crate) fn validate(&self) -> Result<(), BuildError> {
        for (name, values) in &self.conditions {
            if name.is_empty() {
                return Err(BuildError::EmptyConditionName);
            }
            if values.is_empty() {
                return Err(BuildError::EmptyConditionValues { name: name.clone() });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn conditions(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.conditions
    }

    pub fn condition_names(&self) -> impl Iterator<Item = &str> {
        self.conditions.keys().map(String::as_str)
    }

    /// Acceptable values for `name`, or `None` if the rule ignores it.
    #[must_use]
    pub fn values(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.conditions.get(name)
    }

    #[must_use]
    pub fn condition_count(&self) -> usize {
        self.conditions.len()
    }

    #[must_use]
    pub fn outputs(&self) -> &BTreeSet<T> {
        &self.outputs
    }

    /// Whether this rule declares no conditions at all.
    #[must_use]
    pub fn is_universal(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Whether `self` subsumes `other`: every condition name of `other` is
    /// also on `self`, and `self` has strictly more names.
    ///
    /// This is a partial order. Rules with the same name set, or with
    /// overlapping but incomparable name sets, are not more specific than
    /// each other.
    #[must_use]
    pub fn is_more_specific_than<U>(&self, other: &Rule<U>) -> bool {
        self.conditions.len() > other.conditions.len()
            && other
                .conditions
                .keys()
                .all(|name| self.conditions.contains_key(name))
    }
}

impl<T: fmt::Debug> fmt::Display for Rule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, values)) in self.conditions.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}=[")?;
            for (j, value) in values.iter().enumerate() {
                if j > 0 {
                    f.write_str(", ")?;
                }
                f.write_str(value)?;
            }
            f.write_str("]")?;
        }
        write!(f, "}} => {:?}", self.outputs)
    }
}

/// Mutable scratch space for a [`Rule`].
///
/// [`build()`](Self::build) takes a snapshot, so one builder can produce
/// several independent rules.
///
/// ```
/// use condval::Rule;
///
/// let rule = Rule::builder()
///     .when("type", "contract")
///     .when_any("state", ["draft", "review"])
///     .then("due date")
///     .build()
///     .unwrap();
/// assert_eq!(rule.condition_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct RuleBuilder<T> {
    conditions: BTreeMap<String, BTreeSet<String>>,
    outputs: BTreeSet<T>,
}

impl<T> Default for RuleBuilder<T> {
    fn default() -> Self {
        Self {
            conditions: BTreeMap::new(),
            outputs: BTreeSet::new(),
        }
    }
}

impl<T: Ord> RuleBuilder<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `value` for condition `name`. Calling this again for the same
    /// name adds an alternative.
    #[must_use]
    pub fn when(mut self, name: &str, value: impl Into<ConditionValue>) -> Self {
        self.conditions
            .entry(name.to_owned())
            .or_default()
            .insert(value.into().into_string());
        self
    }

    /// Accept any of `values` for condition `name`. An empty iterator makes
    /// [`build()`](Self::build) fail.
    #[must_use]
    pub fn when_any<V>(mut self, name: &str, values: impl IntoIterator<Item = V>) -> Self
    where
        V: Into<ConditionValue>,
    {
        let entry = self.conditions.entry(name.to_owned()).or_default();
        entry.extend(values.into_iter().map(|v| v.into().into_string()));
        self
    }

    /// Add an output value.
    #[must_use]
    pub fn then(mut self, output: T) -> Self {
        self.outputs.insert(output);
        self
    }

    /// Add several output values.
    #[must_use]
    pub fn then_all(mut self, outputs: impl IntoIterator<Item = T>) -> Self {
        self.outputs.extend(outputs);
        self
    }

    /// Snapshot the builder into an immutable [`Rule`].
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if a condition name is empty or has no values.
    pub fn build(&self) -> Result<Rule<T>, BuildError>
    where
        T: Clone,
    {
        Rule::new(self.conditions.clone(), self.outputs.iter().cloned())
    }
}
