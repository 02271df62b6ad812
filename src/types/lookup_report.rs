use std::fmt;
use std::time::Duration;

use super::match_result::MatchResult;
use super::rule::Rule;

/// Detailed lookup diagnostics returned by
/// [`RuleStore::lookup_detailed()`](super::RuleStore::lookup_detailed).
///
/// Records which rules matched before specificity filtering, which of those
/// were discarded as subsumed, and how long the lookup took.
#[derive(Debug, Clone)]
#[must_use]
pub struct LookupReport<'a, T> {
    result: MatchResult<'a, T>,
    matched: Vec<&'a Rule<T>>,
    discarded: Vec<&'a Rule<T>>,
    duration: Duration,
}

impl<'a, T> LookupReport<'a, T> {
    pub(crate) fn new(
        result: MatchResult<'a, T>,
        matched: Vec<&'a Rule<T>>,
        discarded: Vec<&'a Rule<T>>,
        duration: Duration,
    ) -> Self {
        Self {
            result,
            matched,
            discarded,
            duration,
        }
    }

    /// The lookup result, same as [`RuleStore::lookup()`](super::RuleStore::lookup).
    pub fn result(&self) -> &MatchResult<'a, T> {
        &self.result
    }

    pub fn into_result(self) -> MatchResult<'a, T> {
        self.result
    }

    /// Every rule whose conditions held, in store order.
    #[must_use]
    pub fn matched(&self) -> &[&'a Rule<T>] {
        &self.matched
    }

    /// Matched rules dropped because a more specific rule also matched.
    #[must_use]
    pub fn discarded(&self) -> &[&'a Rule<T>] {
        &self.discarded
    }

    /// Wall-clock duration of the lookup.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl<T: fmt::Debug> fmt::Display for LookupReport<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "matched: {}, discarded: {}, result: {}",
            self.matched.len(),
            self.discarded.len(),
            self.result
        )?;
        write!(f, ", duration: {:?}", self.duration)?;
        Ok(())
    }
}
