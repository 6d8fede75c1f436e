//! Candidate values entered into a rendered field.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A value supplied for a field while filling out a form.
///
/// Absence is modelled with `Option<FieldValue>` at call sites rather than a
/// dedicated variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Bool(bool),
    List(Vec<String>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldValue::List(values.into_iter().map(Into::into).collect())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Empty strings and empty lists count as "nothing entered".
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(value) => value.is_empty(),
            FieldValue::List(values) => values.is_empty(),
            FieldValue::Number(_) | FieldValue::Bool(_) => false,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(value) => f.write_str(value),
            FieldValue::Number(value) => write!(f, "{value}"),
            FieldValue::Bool(value) => write!(f, "{value}"),
            FieldValue::List(values) => f.write_str(&values.join(", ")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untagged_values_keep_their_json_shape() {
        let values: Vec<FieldValue> =
            serde_json::from_str(r#"["abc", 3, true, ["a", "b"]]"#).expect("parse values");
        assert_eq!(values[0], FieldValue::text("abc"));
        assert_eq!(values[1], FieldValue::Number(3.0));
        assert_eq!(values[2], FieldValue::Bool(true));
        assert_eq!(values[3], FieldValue::list(["a", "b"]));
    }

    #[test]
    fn emptiness_only_applies_to_text_and_lists() {
        assert!(FieldValue::text("").is_empty());
        assert!(FieldValue::List(Vec::new()).is_empty());
        assert!(!FieldValue::Number(0.0).is_empty());
        assert!(!FieldValue::Bool(false).is_empty());
    }
}
