use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::{BuildError, EqualityPredicate, Rule, RuleStore, UniqueConditionKey};

pub(crate) fn build<T>(
    rules: impl IntoIterator<Item = Option<Rule<T>>>,
    predicate: Arc<dyn EqualityPredicate>,
) -> Result<RuleStore<T>, BuildError>
where
    T: Ord + Clone + fmt::Debug,
{
    let rules: Vec<Rule<T>> = rules.into_iter().flatten().collect();

    for rule in &rules {
        rule.validate()?;
    }

    let unique_keys = check_conflicts(&rules)?;

    let outputs: BTreeSet<T> = rules
        .iter()
        .flat_map(|r| r.outputs().iter().cloned())
        .collect();

    debug!(
        rules = rules.len(),
        keys = unique_keys.len(),
        outputs = outputs.len(),
        "rule store built"
    );

    Ok(RuleStore {
        rules,
        unique_keys,
        outputs,
        predicate,
    })
}

/// Expand every rule and reject keys claimed by rules with different outputs.
///
/// Comparison is exact set equality, independent of the matching predicate.
/// Returns the set of all distinct keys.
fn check_conflicts<T>(rules: &[Rule<T>]) -> Result<BTreeSet<UniqueConditionKey>, BuildError>
where
    T: Ord + fmt::Debug,
{
    let mut seen: BTreeMap<UniqueConditionKey, &BTreeSet<T>> = BTreeMap::new();

    for rule in rules {
        for key in UniqueConditionKey::expand(rule) {
            match seen.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(rule.outputs());
                }
                Entry::Occupied(slot) => {
                    let existing = *slot.get();
                    if !same_outputs(existing, rule.outputs()) {
                        debug!(rule = %rule, key = %slot.key(), "conflicting rule rejected");
                        return Err(BuildError::DuplicateRuleConflict {
                            rule: rule.to_string(),
                            key: slot.key().to_string(),
                            outputs: format!("{:?}", rule.outputs()),
                            existing: format!("{existing:?}"),
                        });
                    }
                }
            }
        }
    }

    Ok(seen.into_keys().collect())
}

/// Mutual containment.
fn same_outputs<T: Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> bool {
    a.is_subset(b) && b.is_subset(a)
}

#[cfg(test)]
mod tests {
    use crate::{BuildError, Rule, RuleStore, RuleStoreBuilder};

    #[test]
    fn build_simple_store() {
        let result = RuleStoreBuilder::new()
            .rule(|r| r.when("type", "contract").then("title"))
            .build();
        assert!(result.is_ok());
        let store = result.unwrap();
        assert_eq!(store.rules.len(), 1);
        assert_eq!(store.unique_keys.len(), 1);
    }

    #[test]
    fn build_empty_store() {
        let store = RuleStore::<String>::new(Vec::<Rule<String>>::new()).unwrap();
        assert!(store.is_empty());
        assert!(store.all_output_values().is_empty());
        assert!(store.all_unique_condition_keys().is_empty());
    }

    #[test]
    fn conflicting_outputs_rejected() {
        let result = RuleStoreBuilder::new()
            .rule(|r| r.when("cond1", "val1").when("cond2", "val2").then("val1"))
            .rule(|r| {
                r.when("cond1", "val1")
                    .when("cond2", "val2")
                    .then("val1")
                    .then("val2")
            })
            .build();
        match result {
            Err(BuildError::DuplicateRuleConflict {
                rule,
                key,
                outputs,
                existing,
            }) => {
                assert_eq!(rule, "{cond1=[val1], cond2=[val2]} => {\"val1\", \"val2\"}");
                assert_eq!(key, "{cond1=val1, cond2=val2}");
                assert_eq!(outputs, "{\"val1\", \"val2\"}");
                assert_eq!(existing, "{\"val1\"}");
            }
            other => panic!("expected DuplicateRuleConflict, got {other:?}"),
        }
    }

    #[test]
    fn identical_outputs_accepted() {
        let store = RuleStoreBuilder::new()
            .rule(|r| r.when("type", "contract").when("state", "draft").then("due date"))
            .rule(|r| r.when("type", "contract").when("state", "draft").then("due date"))
            .build()
            .unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.unique_keys.len(), 1);
    }

    #[test]
    fn overlap_through_alternatives_detected() {
        let result = RuleStoreBuilder::new()
            .rule(|r| r.when_any("state", ["1", "2"]).then("a"))
            .rule(|r| r.when_any("state", ["2", "3"]).then("b"))
            .build();
        assert!(matches!(
            result,
            Err(BuildError::DuplicateRuleConflict { key, .. }) if key == "{state=2}"
        ));
    }

    #[test]
    fn different_name_sets_never_collide() {
        let store = RuleStoreBuilder::new()
            .rule(|r| r.when_any("state", ["1", "2", "3"]).then("a"))
            .rule(|r| r.when_any("state", ["2", "3"]).when("role", "viewer").then("b"))
            .build()
            .unwrap();
        assert_eq!(store.unique_keys.len(), 5);
    }

    #[test]
    fn conflict_check_ignores_predicate() {
        // Case-insensitively these keys are the same, but the literal
        // combinations differ so no conflict is raised.
        let store = RuleStoreBuilder::new()
            .case_insensitive()
            .rule(|r| r.when("type", "Contract").then("a"))
            .rule(|r| r.when("type", "contract").then("b"))
            .build()
            .unwrap();
        assert_eq!(store.unique_keys.len(), 2);
    }

    #[test]
    fn universal_rules_share_the_empty_key() {
        let ok = RuleStoreBuilder::new()
            .rule(|r| r.then("x"))
            .rule(|r| r.then("x"))
            .build();
        assert!(ok.is_ok());

        let conflict = RuleStoreBuilder::new()
            .rule(|r| r.then("x"))
            .rule(|r| r.then("y"))
            .build();
        assert!(matches!(
            conflict,
            Err(BuildError::DuplicateRuleConflict { key, .. }) if key == "{}"
        ));
    }

    #[test]
    fn outputs_universe_is_union() {
        let store = RuleStoreBuilder::new()
            .rule(|r| r.when("a", "1").then("x").then("y"))
            .rule(|r| r.when("b", "1").then("y").then("z"))
            .build()
            .unwrap();
        let outputs: Vec<&str> = store.outputs.iter().copied().collect();
        assert_eq!(outputs, ["x", "y", "z"]);
    }
}
