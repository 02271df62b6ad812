use std::collections::BTreeMap;
use std::fmt;

use super::value::ConditionValue;

/// The condition values supplied to one lookup: each name maps to exactly
/// one value.
///
/// ```
/// use condval::Query;
///
/// let query = Query::new()
///     .set("type", "contract")
///     .set("isViewer", true);
/// assert_eq!(query.get("isViewer"), Some("true"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Query {
    values: BTreeMap<String, String>,
}

impl Query {
    /// Create an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value for `name`, replacing any earlier value.
    #[must_use]
    pub fn set(mut self, name: &str, value: impl Into<ConditionValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert a value (mutable reference version).
    pub fn insert(&mut self, name: &str, value: impl Into<ConditionValue>) {
        self.values
            .insert(name.to_owned(), value.into().into_string());
    }

    /// Look up the value supplied for `name`.
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

    /// Iterate `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Query
where
    K: Into<String>,
    V: Into<ConditionValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let values = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into().into_string()))
            .collect();
        Self { values }
    }
}

impl fmt::Display for Query {
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
