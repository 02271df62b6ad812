use std::collections::BTreeSet;
use std::time::Instant;

use tracing::trace;

use crate::types::LookupReport;
use crate::{EqualityPredicate, MatchResult, PredicateError, Query, Rule};

pub(crate) fn lookup<'a, T: Ord>(
    rules: &'a [Rule<T>],
    outputs: &'a BTreeSet<T>,
    predicate: &dyn EqualityPredicate,
    query: Option<&Query>,
) -> Result<MatchResult<'a, T>, PredicateError> {
    let Some(query) = query else {
        return Ok(MatchResult::empty(outputs));
    };

    let matched = matching_rules(rules, predicate, query)?;
    let (survivors, _) = most_specific(&matched);

    trace!(
        matched = matched.len(),
        survivors = survivors.len(),
        "lookup"
    );

    Ok(MatchResult::new(survivors, outputs))
}

pub(crate) fn lookup_detailed<'a, T: Ord>(
    rules: &'a [Rule<T>],
    outputs: &'a BTreeSet<T>,
    predicate: &dyn EqualityPredicate,
    query: &Query,
) -> Result<LookupReport<'a, T>, PredicateError> {
    let start = Instant::now();

    let matched = matching_rules(rules, predicate, query)?;
    let (survivors, discarded) = most_specific(&matched);
    let result = MatchResult::new(survivors, outputs);

    let duration = start.elapsed();
    Ok(LookupReport::new(result, matched, discarded, duration))
}

fn matching_rules<'a, T>(
    rules: &'a [Rule<T>],
    predicate: &dyn EqualityPredicate,
    query: &Query,
) -> Result<Vec<&'a Rule<T>>, PredicateError> {
    let mut matched = Vec::new();
    for rule in rules {
        if rule_matches(rule, predicate, query)? {
            matched.push(rule);
        }
    }
    Ok(matched)
}

/// Every condition name on the rule is supplied by the query, and at least
/// one of its accepted values passes the predicate. Names the rule does not
/// mention are ignored.
fn rule_matches<T>(
    rule: &Rule<T>,
    predicate: &dyn EqualityPredicate,
    query: &Query,
) -> Result<bool, PredicateError> {
    for (name, accepted) in rule.conditions() {
        let Some(value) = query.get(name) else {
            return Ok(false);
        };
        if !any_accepts(predicate, name, accepted, value)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn any_accepts(
    predicate: &dyn EqualityPredicate,
    name: &str,
    accepted: &BTreeSet<String>,
    value: &str,
) -> Result<bool, PredicateError> {
    for declared in accepted {
        if predicate.test(name, declared, value)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Split matched rules into the maximal elements of the subsumption order
/// and the rules some other match subsumes. Both keep store order.
fn most_specific<'a, T>(matched: &[&'a Rule<T>]) -> (Vec<&'a Rule<T>>, Vec<&'a Rule<T>>) {
    matched.iter().copied().partition(|rule: &&'a Rule<T>| {
        !matched
            .iter()
            .any(|other| other.is_more_specific_than(*rule))
    })
}
