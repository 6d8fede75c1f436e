//! Property-editor helpers. Each helper inspects a field and returns the
//! [`FieldPatch`] that `FormStore::update_field` should apply.

use formwork_domain::{Field, FieldOption, FieldPatch, FieldType, NewRule, RuleKind, RuleValue};
use uuid::Uuid;

/// Rule kinds offered for a field type. `required` is always first.
pub fn applicable_rule_kinds(kind: FieldType) -> Vec<RuleKind> {
    let mut kinds = vec![RuleKind::Required];
    let extra: &[RuleKind] = match kind {
        FieldType::Text | FieldType::Textarea | FieldType::Password => {
            &[RuleKind::MinLength, RuleKind::MaxLength, RuleKind::Pattern]
        }
        FieldType::Email => &[RuleKind::MinLength, RuleKind::MaxLength, RuleKind::Email],
        FieldType::Number
        | FieldType::Range
        | FieldType::Date
        | FieldType::Time
        | FieldType::DatetimeLocal => &[RuleKind::Min, RuleKind::Max],
        FieldType::Tel => &[RuleKind::Tel, RuleKind::Pattern],
        FieldType::Url => &[RuleKind::Url],
        _ => &[],
    };
    kinds.extend_from_slice(extra);
    kinds
}

/// Constraint a freshly added rule starts with.
pub fn default_rule_value(kind: RuleKind) -> RuleValue {
    match kind {
        RuleKind::MinLength => RuleValue::Number(3.0),
        RuleKind::MaxLength | RuleKind::Max => RuleValue::Number(100.0),
        RuleKind::Min => RuleValue::Number(0.0),
        RuleKind::Pattern => RuleValue::Text(String::new()),
        RuleKind::Required | RuleKind::Email | RuleKind::Url | RuleKind::Tel => {
            RuleValue::Bool(true)
        }
    }
}

pub fn default_rule_message(kind: RuleKind) -> &'static str {
    match kind {
        RuleKind::Required => "This field is required",
        RuleKind::MinLength => "Minimum length is 3 characters",
        RuleKind::MaxLength => "Maximum length is 100 characters",
        RuleKind::Min => "Minimum value is 0",
        RuleKind::Max => "Maximum value is 100",
        RuleKind::Pattern => "Invalid format",
        RuleKind::Email => "Please enter a valid email address",
        RuleKind::Url => "Please enter a valid URL",
        RuleKind::Tel => "Please enter a valid phone number",
    }
}

pub fn default_rule(kind: RuleKind) -> NewRule {
    NewRule::new(kind, Some(default_rule_value(kind)), default_rule_message(kind))
}

/// Appends a default rule of `kind`; `None` when the field already has one.
pub fn add_rule_of_kind(field: &Field, kind: RuleKind) -> Option<FieldPatch> {
    if field.validation_rules.iter().any(|rule| rule.kind == kind) {
        return None;
    }
    let mut rules = field.validation_rules.clone();
    rules.push(default_rule(kind).into_rule(Uuid::new_v4()));
    Some(FieldPatch {
        validation_rules: Some(rules),
        ..FieldPatch::default()
    })
}

/// Changes to a rule's constraint and/or message. The kind is fixed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleUpdate {
    pub value: Option<Option<RuleValue>>,
    pub message: Option<String>,
}

pub fn update_rule(field: &Field, rule_id: Uuid, update: RuleUpdate) -> Option<FieldPatch> {
    field.rule(rule_id)?;
    let rules = field
        .validation_rules
        .iter()
        .cloned()
        .map(|mut rule| {
            if rule.id == rule_id {
                if let Some(value) = update.value.clone() {
                    rule.value = value;
                }
                if let Some(message) = update.message.clone() {
                    rule.message = message;
                }
            }
            rule
        })
        .collect();
    Some(FieldPatch {
        validation_rules: Some(rules),
        ..FieldPatch::default()
    })
}

/// Appends an option. Both label and value must be non-empty.
pub fn add_option(field: &Field, label: &str, value: &str) -> Option<FieldPatch> {
    if label.is_empty() || value.is_empty() {
        return None;
    }
    let mut options = field.options.clone();
    options.push(FieldOption::new(label, value));
    Some(FieldPatch {
        options: Some(options),
        ..FieldPatch::default()
    })
}

pub fn update_option(
    field: &Field,
    option_id: Uuid,
    label: Option<String>,
    value: Option<String>,
) -> Option<FieldPatch> {
    field.option(option_id)?;
    let options = field
        .options
        .iter()
        .cloned()
        .map(|mut option| {
            if option.id == option_id {
                if let Some(label) = label.clone() {
                    option.label = label;
                }
                if let Some(value) = value.clone() {
                    option.value = value;
                }
            }
            option
        })
        .collect();
    Some(FieldPatch {
        options: Some(options),
        ..FieldPatch::default()
    })
}

pub fn remove_option(field: &Field, option_id: Uuid) -> FieldPatch {
    FieldPatch {
        options: Some(
            field
                .options
                .iter()
                .filter(|option| option.id != option_id)
                .cloned()
                .collect(),
        ),
        ..FieldPatch::default()
    }
}
