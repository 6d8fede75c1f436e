//! Field-level validation engine.
//!
//! [`validate`] is a pure function: it runs every rule attached to a field, in
//! stored order, against a candidate value and returns the messages of the
//! rules that failed. Rules whose value type does not apply are skipped, never
//! reported as failures, with the exception of `required`.

use std::collections::BTreeMap;

use formwork_domain::{Field, FieldValue, RuleKind, RuleValue, ValidationRule};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

static TEL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+]?[(]?[0-9]{3}[)]?[-\s.]?[0-9]{3}[-\s.]?[0-9]{4,6}$")
        .expect("tel pattern compiles")
});

/// Validates `value` against every rule of `field`.
pub fn validate(field: &Field, value: Option<&FieldValue>) -> Vec<String> {
    field
        .validation_rules
        .iter()
        .filter_map(|rule| check_rule(rule, value))
        .collect()
}

/// Validates a whole set of values keyed by field name. Only fields with at
/// least one message appear in the result.
pub fn validate_values(
    fields: &[Field],
    values: &BTreeMap<String, FieldValue>,
) -> BTreeMap<String, Vec<String>> {
    fields
        .iter()
        .filter_map(|field| {
            let messages = validate(field, values.get(&field.name));
            (!messages.is_empty()).then(|| (field.name.clone(), messages))
        })
        .collect()
}

/// `true` when nothing usable was entered: absent, `""`, or an empty list.
pub fn is_missing(value: Option<&FieldValue>) -> bool {
    value.map_or(true, FieldValue::is_empty)
}

/// Message reported when `rule` fails.
pub fn message_for(rule: &ValidationRule) -> String {
    if !rule.message.trim().is_empty() {
        return rule.message.clone();
    }
    default_message(rule.kind, rule.value.as_ref())
}

/// Built-in message for a rule kind, interpolating the constraint where relevant.
pub fn default_message(kind: RuleKind, constraint: Option<&RuleValue>) -> String {
    let bound = constraint.map(ToString::to_string).unwrap_or_default();
    match kind {
        RuleKind::Required => "This field is required".into(),
        RuleKind::MinLength => format!("Minimum length is {bound} characters"),
        RuleKind::MaxLength => format!("Maximum length is {bound} characters"),
        RuleKind::Min => format!("Minimum value is {bound}"),
        RuleKind::Max => format!("Maximum value is {bound}"),
        RuleKind::Pattern => "Invalid format".into(),
        RuleKind::Email => "Invalid email address".into(),
        RuleKind::Url => "Invalid URL".into(),
        RuleKind::Tel => "Invalid phone number".into(),
    }
}

fn check_rule(rule: &ValidationRule, value: Option<&FieldValue>) -> Option<String> {
    if rule.kind == RuleKind::Required {
        return is_missing(value).then(|| message_for(rule));
    }

    // Emptiness is only ever reported by `required`.
    let value = value.filter(|value| !value.is_empty())?;
    let failed = match rule.kind {
        RuleKind::Required => false,
        RuleKind::MinLength => {
            let limit = numeric_constraint(rule)?;
            (char_len(value.as_str()?) as f64) < limit
        }
        RuleKind::MaxLength => {
            let limit = numeric_constraint(rule)?;
            (char_len(value.as_str()?) as f64) > limit
        }
        RuleKind::Min => value.as_number()? < numeric_constraint(rule)?,
        RuleKind::Max => value.as_number()? > numeric_constraint(rule)?,
        RuleKind::Pattern => {
            let text = value.as_str()?;
            let source = rule.value.as_ref()?.as_text()?;
            if source.is_empty() {
                return None;
            }
            match Regex::new(source) {
                Ok(pattern) => !pattern.is_match(text),
                Err(err) => {
                    tracing::debug!(rule = %rule.id, error = %err, "skipping uncompilable pattern rule");
                    return None;
                }
            }
        }
        RuleKind::Email => !EMAIL_PATTERN.is_match(value.as_str()?),
        RuleKind::Url => Url::parse(value.as_str()?).is_err(),
        RuleKind::Tel => !TEL_PATTERN.is_match(value.as_str()?),
    };

    failed.then(|| message_for(rule))
}

fn numeric_constraint(rule: &ValidationRule) -> Option<f64> {
    match rule.value.as_ref()? {
        RuleValue::Number(value) => Some(*value),
        RuleValue::Text(raw) => raw.trim().parse().ok(),
        RuleValue::Bool(_) => None,
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwork_domain::{FieldType, NewField};

    fn field_with(rules: Vec<ValidationRule>) -> Field {
        let mut field = Field::new(FieldType::Text, "Name", "name");
        field.validation_rules = rules;
        field
    }

    fn rule(kind: RuleKind, value: Option<RuleValue>) -> ValidationRule {
        ValidationRule::new(kind, value, "")
    }

    #[test]
    fn required_catches_absent_empty_and_empty_lists() {
        let field = field_with(vec![rule(RuleKind::Required, Some(RuleValue::Bool(true)))]);
        let required = vec!["This field is required".to_string()];

        assert_eq!(validate(&field, None), required);
        assert_eq!(validate(&field, Some(&FieldValue::text(""))), required);
        assert_eq!(validate(&field, Some(&FieldValue::List(Vec::new()))), required);
        assert!(validate(&field, Some(&FieldValue::text("x"))).is_empty());
    }

    #[test]
    fn min_length_boundary_is_inclusive() {
        let field = field_with(vec![rule(RuleKind::MinLength, Some(RuleValue::Number(3.0)))]);
        assert_eq!(
            validate(&field, Some(&FieldValue::text("ab"))),
            vec!["Minimum length is 3 characters".to_string()]
        );
        assert!(validate(&field, Some(&FieldValue::text("abc"))).is_empty());
    }

    #[test]
    fn max_length_counts_characters_not_bytes() {
        let field = field_with(vec![rule(RuleKind::MaxLength, Some(RuleValue::Number(4.0)))]);
        assert!(validate(&field, Some(&FieldValue::text("ñañá"))).is_empty());
        assert_eq!(validate(&field, Some(&FieldValue::text("ñañáx"))).len(), 1);
    }

    #[test]
    fn length_rules_skip_absent_and_non_text_values() {
        let field = field_with(vec![
            rule(RuleKind::MinLength, Some(RuleValue::Number(3.0))),
            rule(RuleKind::MaxLength, Some(RuleValue::Number(1.0))),
        ]);
        assert!(validate(&field, None).is_empty());
        assert!(validate(&field, Some(&FieldValue::Number(12345.0))).is_empty());
        assert!(validate(&field, Some(&FieldValue::list(["a", "b", "c"]))).is_empty());
    }

    #[test]
    fn numeric_bounds_apply_to_numbers_only() {
        let field = field_with(vec![
            rule(RuleKind::Min, Some(RuleValue::Number(0.0))),
            rule(RuleKind::Max, Some(RuleValue::Number(100.0))),
        ]);
        assert_eq!(
            validate(&field, Some(&FieldValue::Number(-1.0))),
            vec!["Minimum value is 0".to_string()]
        );
        assert_eq!(
            validate(&field, Some(&FieldValue::Number(101.5))),
            vec!["Maximum value is 100".to_string()]
        );
        assert!(validate(&field, Some(&FieldValue::Number(50.0))).is_empty());
        assert!(validate(&field, Some(&FieldValue::text("-1"))).is_empty());
    }

    #[test]
    fn pattern_rule_uses_custom_message() {
        let field = field_with(vec![ValidationRule::new(
            RuleKind::Pattern,
            Some(RuleValue::Text("^[A-Z]{3}$".into())),
            "Use three capital letters",
        )]);
        assert_eq!(
            validate(&field, Some(&FieldValue::text("abc"))),
            vec!["Use three capital letters".to_string()]
        );
        assert!(validate(&field, Some(&FieldValue::text("ABC"))).is_empty());
    }

    #[test]
    fn broken_or_empty_patterns_are_skipped() {
        let field = field_with(vec![
            rule(RuleKind::Pattern, Some(RuleValue::Text("([".into()))),
            rule(RuleKind::Pattern, Some(RuleValue::Text(String::new()))),
            rule(RuleKind::Pattern, Some(RuleValue::Number(3.0))),
        ]);
        assert!(validate(&field, Some(&FieldValue::text("anything"))).is_empty());
    }

    #[test]
    fn email_url_and_tel_formats() {
        let field = field_with(vec![rule(RuleKind::Email, None)]);
        assert!(validate(&field, Some(&FieldValue::text("a@b.co"))).is_empty());
        assert_eq!(validate(&field, Some(&FieldValue::text("a@b"))).len(), 1);
        assert_eq!(validate(&field, Some(&FieldValue::text("a b@c.io"))).len(), 1);

        let field = field_with(vec![rule(RuleKind::Url, None)]);
        assert!(validate(&field, Some(&FieldValue::text("https://example.com/x"))).is_empty());
        assert_eq!(
            validate(&field, Some(&FieldValue::text("example.com"))),
            vec!["Invalid URL".to_string()]
        );

        let field = field_with(vec![rule(RuleKind::Tel, None)]);
        for ok in ["+(555) 123-4567", "555.123.4567", "5551234567", "555-123-456789"] {
            assert!(validate(&field, Some(&FieldValue::text(ok))).is_empty(), "{ok}");
        }
        for bad in ["12-34", "555-123-45", "phone"] {
            assert_eq!(validate(&field, Some(&FieldValue::text(bad))).len(), 1, "{bad}");
        }
    }

    #[test]
    fn messages_follow_rule_order() {
        let field = field_with(vec![
            rule(RuleKind::Pattern, Some(RuleValue::Text("^\\d+$".into()))),
            rule(RuleKind::MinLength, Some(RuleValue::Number(5.0))),
        ]);
        assert_eq!(
            validate(&field, Some(&FieldValue::text("ab"))),
            vec![
                "Invalid format".to_string(),
                "Minimum length is 5 characters".to_string()
            ]
        );
    }

    #[test]
    fn every_rule_tolerates_every_value_shape() {
        let values = [
            None,
            Some(FieldValue::text("")),
            Some(FieldValue::text("text")),
            Some(FieldValue::Number(4.0)),
            Some(FieldValue::Bool(true)),
            Some(FieldValue::list(["a"])),
        ];
        let constraints = [
            None,
            Some(RuleValue::Number(2.0)),
            Some(RuleValue::Text("x".into())),
            Some(RuleValue::Bool(true)),
        ];
        for kind in RuleKind::ALL {
            for constraint in &constraints {
                let field = field_with(vec![rule(kind, constraint.clone())]);
                for value in &values {
                    let _ = validate(&field, value.as_ref());
                }
            }
        }
    }

    #[test]
    fn validate_values_reports_only_failing_fields() {
        let name = NewField::new(FieldType::Text, "Name", "name")
            .with_rule(rule(RuleKind::Required, None))
            .into_field(uuid::Uuid::new_v4());
        let notes = NewField::new(FieldType::Textarea, "Notes", "notes")
            .into_field(uuid::Uuid::new_v4());
        let mut values = BTreeMap::new();
        values.insert("notes".to_string(), FieldValue::text("hello"));

        let errors = validate_values(&[name, notes], &values);
        assert_eq!(errors.len(), 1);
        assert!(errors.contains_key("name"));
    }
}
