//! Validation rules attached to fields.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::Identifiable;

/// Enumerates the supported validation constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleKind {
    Required,
    MinLength,
    MaxLength,
    Min,
    Max,
    Pattern,
    Email,
    Url,
    Tel,
}

impl RuleKind {
    pub const ALL: [RuleKind; 9] = [
        RuleKind::Required,
        RuleKind::MinLength,
        RuleKind::MaxLength,
        RuleKind::Min,
        RuleKind::Max,
        RuleKind::Pattern,
        RuleKind::Email,
        RuleKind::Url,
        RuleKind::Tel,
    ];

    /// Wire name of the rule kind (`minLength`, `tel`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            RuleKind::Required => "required",
            RuleKind::MinLength => "minLength",
            RuleKind::MaxLength => "maxLength",
            RuleKind::Min => "min",
            RuleKind::Max => "max",
            RuleKind::Pattern => "pattern",
            RuleKind::Email => "email",
            RuleKind::Url => "url",
            RuleKind::Tel => "tel",
        }
    }

    /// Parses a rule kind, ignoring case and `-`/`_` separators.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();
        RuleKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().to_ascii_lowercase() == normalized)
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Constraint attached to a rule. Each validator reads the variant it expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl RuleValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RuleValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RuleValue::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for RuleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleValue::Text(value) => f.write_str(value),
            RuleValue::Number(value) => write!(f, "{value}"),
            RuleValue::Bool(value) => write!(f, "{value}"),
        }
    }
}

/// A single validation constraint owned by a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRule {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: RuleKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<RuleValue>,
    #[serde(default)]
    pub message: String,
}

impl ValidationRule {
    pub fn new(kind: RuleKind, value: Option<RuleValue>, message: impl Into<String>) -> Self {
        NewRule::new(kind, value, message).into_rule(Uuid::new_v4())
    }
}

impl Identifiable for ValidationRule {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Rule definition before an identifier has been allocated.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRule {
    pub kind: RuleKind,
    pub value: Option<RuleValue>,
    pub message: String,
}

impl NewRule {
    pub fn new(kind: RuleKind, value: Option<RuleValue>, message: impl Into<String>) -> Self {
        Self {
            kind,
            value,
            message: message.into(),
        }
    }

    pub fn into_rule(self, id: Uuid) -> ValidationRule {
        ValidationRule {
            id,
            kind: self.kind,
            value: self.value,
            message: self.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_kinds_loosely() {
        assert_eq!(RuleKind::parse("minLength"), Some(RuleKind::MinLength));
        assert_eq!(RuleKind::parse("max-length"), Some(RuleKind::MaxLength));
        assert_eq!(RuleKind::parse("TEL"), Some(RuleKind::Tel));
        assert_eq!(RuleKind::parse("zip"), None);
    }

    #[test]
    fn rule_serializes_kind_as_type() {
        let rule = ValidationRule::new(RuleKind::MinLength, Some(RuleValue::Number(3.0)), "");
        let json = serde_json::to_value(&rule).expect("serialize rule");
        assert_eq!(json["type"], "minLength");
        assert_eq!(json["value"], 3.0);
    }
}
