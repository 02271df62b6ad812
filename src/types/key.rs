use std::collections::BTreeMap;
use std::fmt;

use super::error::PredicateError;
use super::predicate::EqualityPredicate;
use super::rule::Rule;

/// One fully resolved combination of a rule's conditions: every name is
/// bound to a single value.
///
/// A rule whose condition names offer `{2, 2, 3}` alternatives expands into
/// `2 * 2 * 3 = 12` keys. Keys are used for conflict detection and
/// introspection, never for matching.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct UniqueConditionKey {
    values: BTreeMap<String, String>,
}

impl UniqueConditionKey {
    /// Expand a rule into all of its keys.
    ///
    /// The cartesian product is folded name by name over a growing list of
    /// partial keys, starting from the single empty key. A rule without
    /// conditions yields exactly that empty key.
    #[must_use]
    pub fn expand<T>(rule: &Rule<T>) -> Vec<UniqueConditionKey> {
        let mut keys = vec![UniqueConditionKey::default()];
        for (name, values) in rule.conditions() {
            let mut next = Vec::with_capacity(keys.len().saturating_mul(values.len()));
            for partial in &keys {
                for value in values {
                    let mut key = partial.clone();
                    key.values.insert(name.clone(), value.clone());
                    next.push(key);
                }
            }
            keys = next;
        }
        keys
    }

    /// Number of keys [`expand`](Self::expand) would produce, without
    /// allocating them. Saturates at `usize::MAX`.
    #[must_use]
    pub fn expansion_size<T>(rule: &Rule<T>) -> usize {
        rule.conditions()
            .values()
            .fold(1_usize, |acc, values| acc.saturating_mul(values.len()))
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    #[must_use]
    pub fn into_map(self) -> BTreeMap<String, String> {
        self.values
    }

    /// Whether two keys are the same under `predicate`.
    ///
    /// Every name of each key must be present in the other with a value the
    /// predicate accepts. The predicate need not be symmetric, so each pair is
    /// tested with both keys in the declared position.
    ///
    /// # Errors
    ///
    /// Propagates the predicate's [`PredicateError`].
    pub fn predicate_same(
        &self,
        other: &UniqueConditionKey,
        predicate: &dyn EqualityPredicate,
    ) -> Result<bool, PredicateError> {
        Ok(covers(self, other, predicate)? && covers(other, self, predicate)?)
    }
}

/// Every name in `declared` is present in `query` with an accepted value.
fn covers(
    declared: &UniqueConditionKey,
    query: &UniqueConditionKey,
    predicate: &dyn EqualityPredicate,
) -> Result<bool, PredicateError> {
    for (name, value) in &declared.values {
        let Some(other) = query.values.get(name) else {
            return Ok(false);
        };
        if !predicate.test(name, value, other)? {
            return Ok(false);
        }
    }
    Ok(true)
}

impl From<BTreeMap<String, String>> for UniqueConditionKey {
    fn from(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }
}

impl fmt::Display for UniqueConditionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::{CaseInsensitive, CaseSensitive};

    fn key(pairs: &[(&str, &str)]) -> UniqueConditionKey {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect::<BTreeMap<_, _>>()
            .into()
    }

    #[test]
    fn expand_cartesian_product() {
        let rule = Rule::builder()
            .when_any("a", ["1", "2"])
            .when_any("b", ["x", "y"])
            .when_any("c", ["p", "q", "r"])
            .then("out")
            .build()
            .unwrap();
        let keys = UniqueConditionKey::expand(&rule);
        assert_eq!(keys.len(), 12);
        assert_eq!(UniqueConditionKey::expansion_size(&rule), 12);
        let distinct: BTreeSet<_> = keys.iter().collect();
        assert_eq!(distinct.len(), 12);
        assert!(keys.iter().all(|k| k.len() == 3));
    }

    #[test]
    fn expansion_size_matches_expand_for_wide_rules() {
        let rule = (0..6)
            .fold(Rule::builder(), |b, i| {
                b.when_any(&format!("n{i}"), ["a", "b", "c", "d"])
            })
            .then(0_u8)
            .build()
            .unwrap();
        assert_eq!(UniqueConditionKey::expansion_size(&rule), 4096);
        assert_eq!(UniqueConditionKey::expand(&rule).len(), 4096);
    }

    #[test]
    fn expand_alternatives_of_single_name() {
        let rule = Rule::builder()
            .when_any("state", ["1", "2", "3"])
            .then("s")
            .build()
            .unwrap();
        let keys = UniqueConditionKey::expand(&rule);
        assert_eq!(
            keys,
            vec![
                key(&[("state", "1")]),
                key(&[("state", "2")]),
                key(&[("state", "3")]),
            ]
        );
    }

    #[test]
    fn expand_universal_rule_is_single_empty_key() {
        let rule = Rule::<&str>::builder().then("x").build().unwrap();
        let keys = UniqueConditionKey::expand(&rule);
        assert_eq!(keys, vec![UniqueConditionKey::default()]);
        assert!(keys[0].is_empty());
    }

    #[test]
    fn single_valued_rule_round_trips() {
        let rule = Rule::builder()
            .when("type", "contract")
            .when("state", "draft")
            .then("due date")
            .build()
            .unwrap();
        let keys = UniqueConditionKey::expand(&rule);
        assert_eq!(keys.len(), 1);
        let map = keys.into_iter().next().unwrap().into_map();
        let back: BTreeMap<String, BTreeSet<String>> = map
            .into_iter()
            .map(|(k, v)| (k, BTreeSet::from([v])))
            .collect();
        assert_eq!(&back, rule.conditions());
    }

    #[test]
    fn equality_is_order_independent() {
        let a = key(&[("x", "1"), ("y", "2")]);
        let b = key(&[("y", "2"), ("x", "1")]);
        assert_eq!(a, b);
    }

    #[test]
    fn predicate_same_case_insensitive() {
        let a = key(&[("type", "Contract")]);
        let b = key(&[("type", "contract")]);
        assert!(!a.predicate_same(&b, &CaseSensitive).unwrap());
        assert!(a.predicate_same(&b, &CaseInsensitive).unwrap());
    }

    #[test]
    fn predicate_same_requires_same_names() {
        let a = key(&[("type", "contract")]);
        let b = key(&[("type", "contract"), ("state", "draft")]);
        assert!(!a.predicate_same(&b, &CaseSensitive).unwrap());
        assert!(!b.predicate_same(&a, &CaseSensitive).unwrap());
    }

    #[test]
    fn predicate_same_checks_both_directions() {
        // Declared value must be a prefix of the query value: holds one way only.
        let prefix = |_: &str, declared: &str, query: &str| query.starts_with(declared);
        let short = key(&[("path", "/api")]);
        let long = key(&[("path", "/api/users")]);
        assert!(!short.predicate_same(&long, &prefix).unwrap());
        assert!(!long.predicate_same(&short, &prefix).unwrap());
    }

    #[test]
    fn display() {
        let k = key(&[("type", "contract"), ("state", "draft")]);
        assert_eq!(k.to_string(), "{state=draft, type=contract}");
    }
}
