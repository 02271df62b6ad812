//! Ready-made [`EqualityPredicate`]s and combinators.
//!
//! Every predicate receives `(name, declared, query)`: `declared` comes from
//! the rule, `query` from the lookup. Combinators forward errors from the
//! predicates they wrap.
//!
//! - [`Contains`]: query value contains the declared value
//! - [`Prefix`]: query value starts with the declared value
//! - [`Pattern`]: declared value is a regular expression
//! - [`NumericUpperBound`]: query number is at most the declared number
//! - [`Not`], [`And`], [`Or`], [`Xor`]: logical composition
//! - [`Fallible`]: adapt a closure that can fail

use std::collections::HashMap;
use std::sync::RwLock;

use regex::Regex;

use crate::{EqualityPredicate, PredicateError};

/// Query value contains the declared value.
#[derive(Debug, Clone, Copy, Default)]
pub struct Contains;

impl EqualityPredicate for Contains {
    fn test(&self, _name: &str, declared: &str, query: &str) -> Result<bool, PredicateError> {
        Ok(query.contains(declared))
    }
}

/// Query value starts with the declared value.
#[derive(Debug, Clone, Copy, Default)]
pub struct Prefix;

impl EqualityPredicate for Prefix {
    fn test(&self, _name: &str, declared: &str, query: &str) -> Result<bool, PredicateError> {
        Ok(query.starts_with(declared))
    }
}

/// Declared value is a regular expression (Rust `regex` syntax) searched in
/// the query value.
///
/// Compiled patterns are cached per declared string. An invalid pattern is a
/// [`PredicateError`] raised at lookup time.
///
/// ```
/// use condval::predicates::Pattern;
/// use condval::{Query, RuleStoreBuilder};
///
/// let store = RuleStoreBuilder::new()
///     .predicate(Pattern::new())
///     .rule(|r| r.when("file", r"\.rs$").then("rust"))
///     .build()
///     .unwrap();
/// let result = store.lookup(&Query::new().set("file", "main.rs")).unwrap();
/// assert!(result.contains(&"rust"));
/// ```
#[derive(Debug, Default)]
pub struct Pattern {
    cache: RwLock<HashMap<String, Regex>>,
}

impl Pattern {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn is_match(&self, pattern: &str, haystack: &str) -> Result<bool, PredicateError> {
        if let Ok(cache) = self.cache.read() {
            if let Some(re) = cache.get(pattern) {
                return Ok(re.is_match(haystack));
            }
        }
        let re = Regex::new(pattern).map_err(|e| {
            PredicateError::with_source(format!("invalid pattern '{pattern}'"), e)
        })?;
        let matched = re.is_match(haystack);
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(pattern.to_owned(), re);
        }
        Ok(matched)
    }
}

impl EqualityPredicate for Pattern {
    fn test(&self, _name: &str, declared: &str, query: &str) -> Result<bool, PredicateError> {
        self.is_match(declared, query)
    }
}

/// Query value, read as a number, is less than or equal to the declared
/// number. Non-numeric values are a [`PredicateError`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericUpperBound;

impl EqualityPredicate for NumericUpperBound {
    fn test(&self, name: &str, declared: &str, query: &str) -> Result<bool, PredicateError> {
        let bound = parse_number(name, declared)?;
        let value = parse_number(name, query)?;
        Ok(value <= bound)
    }
}

fn parse_number(name: &str, text: &str) -> Result<f64, PredicateError> {
    text.trim().parse::<f64>().map_err(|e| {
        PredicateError::with_source(format!("condition '{name}': '{text}' is not a number"), e)
    })
}

/// Logical negation of the wrapped predicate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Not<P>(pub P);

impl<P: EqualityPredicate> EqualityPredicate for Not<P> {
    fn test(&self, name: &str, declared: &str, query: &str) -> Result<bool, PredicateError> {
        Ok(!self.0.test(name, declared, query)?)
    }
}

/// Both predicates accept. Short-circuits on the first `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct And<A, B>(pub A, pub B);

impl<A: EqualityPredicate, B: EqualityPredicate> EqualityPredicate for And<A, B> {
    fn test(&self, name: &str, declared: &str, query: &str) -> Result<bool, PredicateError> {
        Ok(self.0.test(name, declared, query)? && self.1.test(name, declared, query)?)
    }
}

/// Either predicate accepts. Short-circuits on the first `true`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Or<A, B>(pub A, pub B);

impl<A: EqualityPredicate, B: EqualityPredicate> EqualityPredicate for Or<A, B> {
    fn test(&self, name: &str, declared: &str, query: &str) -> Result<bool, PredicateError> {
        Ok(self.0.test(name, declared, query)? || self.1.test(name, declared, query)?)
    }
}

/// Exactly one predicate accepts. Always evaluates both.
#[derive(Debug, Clone, Copy, Default)]
pub struct Xor<A, B>(pub A, pub B);

impl<A: EqualityPredicate, B: EqualityPredicate> EqualityPredicate for Xor<A, B> {
    fn test(&self, name: &str, declared: &str, query: &str) -> Result<bool, PredicateError> {
        Ok(self.0.test(name, declared, query)? != self.1.test(name, declared, query)?)
    }
}

/// Adapts a closure returning `Result<bool, PredicateError>`.
#[derive(Debug, Clone, Copy)]
pub struct Fallible<F>(pub F);

impl<F> EqualityPredicate for Fallible<F>
where
    F: Fn(&str, &str, &str) -> Result<bool, PredicateError> + Send + Sync,
{
    fn test(&self, name: &str, declared: &str, query: &str) -> Result<bool, PredicateError> {
        (self.0)(name, declared, query)
    }
}
