use std::fmt;

/// The textual form of a condition value.
///
/// Rules and queries compare text, so typed values are normalized here once:
/// booleans become `true`/`false`, numbers use their `Display` form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ConditionValue(String);

impl ConditionValue {
    /// Borrow the text form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the owned text form.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for ConditionValue {
    fn from(v: &str) -> Self {
        ConditionValue(v.to_owned())
    }
}

impl From<String> for ConditionValue {
    fn from(v: String) -> Self {
        ConditionValue(v)
    }
}

impl From<&String> for ConditionValue {
    fn from(v: &String) -> Self {
        ConditionValue(v.clone())
    }
}

impl From<bool> for ConditionValue {
    fn from(v: bool) -> Self {
        ConditionValue(v.to_string())
    }
}

impl From<char> for ConditionValue {
    fn from(v: char) -> Self {
        ConditionValue(v.to_string())
    }
}

impl From<i32> for ConditionValue {
    fn from(v: i32) -> Self {
        ConditionValue(v.to_string())
    }
}

impl From<i64> for ConditionValue {
    fn from(v: i64) -> Self {
        ConditionValue(v.to_string())
    }
}

impl From<u32> for ConditionValue {
    fn from(v: u32) -> Self {
        ConditionValue(v.to_string())
    }
}

impl From<u64> for ConditionValue {
    fn from(v: u64) -> Self {
        ConditionValue(v.to_string())
    }
}

impl From<f64> for ConditionValue {
    fn from(v: f64) -> Self {
        ConditionValue(v.to_string())
    }
}

impl From<ConditionValue> for String {
    fn from(v: ConditionValue) -> Self {
        v.0
    }
}

impl fmt::Display for ConditionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str() {
        assert_eq!(ConditionValue::from("draft").as_str(), "draft");
    }

    #[test]
    fn from_bool() {
        assert_eq!(ConditionValue::from(true).as_str(), "true");
        assert_eq!(ConditionValue::from(false).as_str(), "false");
    }

    #[test]
    fn from_integers() {
        assert_eq!(ConditionValue::from(42_i64).as_str(), "42");
        assert_eq!(ConditionValue::from(-7_i32).as_str(), "-7");
        assert_eq!(ConditionValue::from(3_u32).as_str(), "3");
        assert_eq!(ConditionValue::from(u64::MAX).as_str(), "18446744073709551615");
    }

    #[test]
    fn from_float() {
        assert_eq!(ConditionValue::from(3.5_f64).as_str(), "3.5");
        assert_eq!(ConditionValue::from(2.0_f64).as_str(), "2");
    }

    #[test]
    fn display_is_raw_text() {
        assert_eq!(ConditionValue::from("a b").to_string(), "a b");
        assert_eq!(String::from(ConditionValue::from('x')), "x");
    }
}
