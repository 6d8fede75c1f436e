//! Field definitions and partial field updates.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    common::{Displayable, Identifiable, NamedEntity},
    rule::ValidationRule,
    value::FieldValue,
};

/// Closed set of input controls a field can render as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    Text,
    Textarea,
    Number,
    Email,
    Password,
    Tel,
    Url,
    Date,
    Time,
    DatetimeLocal,
    Checkbox,
    Radio,
    Select,
    Multiselect,
    File,
    Range,
    Color,
    Hidden,
}

impl FieldType {
    pub const ALL: [FieldType; 18] = [
        FieldType::Text,
        FieldType::Textarea,
        FieldType::Number,
        FieldType::Email,
        FieldType::Password,
        FieldType::Tel,
        FieldType::Url,
        FieldType::Date,
        FieldType::Time,
        FieldType::DatetimeLocal,
        FieldType::Checkbox,
        FieldType::Radio,
        FieldType::Select,
        FieldType::Multiselect,
        FieldType::File,
        FieldType::Range,
        FieldType::Color,
        FieldType::Hidden,
    ];

    /// Wire name of the type (`datetime-local`, `multiselect`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Number => "number",
            FieldType::Email => "email",
            FieldType::Password => "password",
            FieldType::Tel => "tel",
            FieldType::Url => "url",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::DatetimeLocal => "datetime-local",
            FieldType::Checkbox => "checkbox",
            FieldType::Radio => "radio",
            FieldType::Select => "select",
            FieldType::Multiselect => "multiselect",
            FieldType::File => "file",
            FieldType::Range => "range",
            FieldType::Color => "color",
            FieldType::Hidden => "hidden",
        }
    }

    /// Default human label used when a field of this type is created.
    pub fn label(self) -> &'static str {
        match self {
            FieldType::Text => "Text Field",
            FieldType::Textarea => "Text Area",
            FieldType::Number => "Number",
            FieldType::Email => "Email Address",
            FieldType::Password => "Password",
            FieldType::Tel => "Phone Number",
            FieldType::Url => "Website URL",
            FieldType::Date => "Date",
            FieldType::Time => "Time",
            FieldType::DatetimeLocal => "Date and Time",
            FieldType::Checkbox => "Checkbox",
            FieldType::Radio => "Radio Group",
            FieldType::Select => "Dropdown",
            FieldType::Multiselect => "Multi-Select",
            FieldType::File => "File Upload",
            FieldType::Range => "Range Slider",
            FieldType::Color => "Color Picker",
            FieldType::Hidden => "Hidden Field",
        }
    }

    /// Choice types carry an option list.
    pub fn is_choice(self) -> bool {
        matches!(
            self,
            FieldType::Radio | FieldType::Select | FieldType::Multiselect
        )
    }

    /// Types whose entered value is numeric.
    pub fn is_numeric(self) -> bool {
        matches!(self, FieldType::Number | FieldType::Range)
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace('_', "-");
        FieldType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One selectable choice of a radio/select/multiselect field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub id: Uuid,
    pub label: String,
    pub value: String,
}

impl FieldOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            value: value.into(),
        }
    }
}

/// One input definition within a form document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: FieldType,
    pub label: String,
    /// Submission key. Treated as unique per document by the builder.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    #[serde(default)]
    pub validation_rules: Vec<ValidationRule>,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub is_read_only: bool,
    /// Forwarded verbatim to the rendered control.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl Field {
    pub fn new(kind: FieldType, label: impl Into<String>, name: impl Into<String>) -> Self {
        NewField::new(kind, label, name).into_field(Uuid::new_v4())
    }

    pub fn option(&self, id: Uuid) -> Option<&FieldOption> {
        self.options.iter().find(|option| option.id == id)
    }

    pub fn rule(&self, id: Uuid) -> Option<&ValidationRule> {
        self.validation_rules.iter().find(|rule| rule.id == id)
    }

    /// Applies every property set on `patch`.
    pub fn apply(&mut self, patch: FieldPatch) {
        let FieldPatch {
            kind,
            label,
            name,
            placeholder,
            help_text,
            default_value,
            options,
            validation_rules,
            is_required,
            is_hidden,
            is_read_only,
            attributes,
        } = patch;
        if let Some(kind) = kind {
            self.kind = kind;
        }
        if let Some(label) = label {
            self.label = label;
        }
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(placeholder) = placeholder {
            self.placeholder = placeholder;
        }
        if let Some(help_text) = help_text {
            self.help_text = help_text;
        }
        if let Some(default_value) = default_value {
            self.default_value = default_value;
        }
        if let Some(options) = options {
            self.options = options;
        }
        if let Some(rules) = validation_rules {
            self.validation_rules = rules;
        }
        if let Some(flag) = is_required {
            self.is_required = flag;
        }
        if let Some(flag) = is_hidden {
            self.is_hidden = flag;
        }
        if let Some(flag) = is_read_only {
            self.is_read_only = flag;
        }
        if let Some(attributes) = attributes {
            self.attributes = attributes;
        }
    }
}

impl Identifiable for Field {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Field {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Field {
    fn display_label(&self) -> String {
        format!("{} [{}] ({})", self.label, self.name, self.kind)
    }
}

/// Field definition before an identifier has been allocated.
#[derive(Debug, Clone, PartialEq)]
pub struct NewField {
    pub kind: FieldType,
    pub label: String,
    pub name: String,
    pub placeholder: Option<String>,
    pub help_text: Option<String>,
    pub default_value: Option<FieldValue>,
    pub options: Vec<FieldOption>,
    pub validation_rules: Vec<ValidationRule>,
    pub is_required: bool,
    pub is_hidden: bool,
    pub is_read_only: bool,
    pub attributes: BTreeMap<String, String>,
}

impl NewField {
    pub fn new(kind: FieldType, label: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            name: name.into(),
            placeholder: None,
            help_text: None,
            default_value: None,
            options: Vec::new(),
            validation_rules: Vec::new(),
            is_required: false,
            is_hidden: false,
            is_read_only: false,
            attributes: BTreeMap::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
        self.help_text = Some(help_text.into());
        self
    }

    pub fn with_option(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push(FieldOption::new(label, value));
        self
    }

    pub fn with_rule(mut self, rule: ValidationRule) -> Self {
        self.validation_rules.push(rule);
        self
    }

    pub fn into_field(self, id: Uuid) -> Field {
        Field {
            id,
            kind: self.kind,
            label: self.label,
            name: self.name,
            placeholder: self.placeholder,
            help_text: self.help_text,
            default_value: self.default_value,
            options: self.options,
            validation_rules: self.validation_rules,
            is_required: self.is_required,
            is_hidden: self.is_hidden,
            is_read_only: self.is_read_only,
            attributes: self.attributes,
        }
    }
}

/// Partial update merged into an existing field. `None` leaves a property untouched;
/// nullable properties use an inner `Option` so they can be cleared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldPatch {
    pub kind: Option<FieldType>,
    pub label: Option<String>,
    pub name: Option<String>,
    pub placeholder: Option<Option<String>>,
    pub help_text: Option<Option<String>>,
    pub default_value: Option<Option<FieldValue>>,
    pub options: Option<Vec<FieldOption>>,
    pub validation_rules: Option<Vec<ValidationRule>>,
    pub is_required: Option<bool>,
    pub is_hidden: Option<bool>,
    pub is_read_only: Option<bool>,
    pub attributes: Option<BTreeMap<String, String>>,
}

impl FieldPatch {
    pub fn is_empty(&self) -> bool {
        *self == FieldPatch::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_type_uses_kebab_case_on_the_wire() {
        let json = serde_json::to_string(&FieldType::DatetimeLocal).expect("serialize");
        assert_eq!(json, "\"datetime-local\"");
        assert_eq!(FieldType::parse("datetime_local"), Some(FieldType::DatetimeLocal));
        assert_eq!(FieldType::parse("multiselect"), Some(FieldType::Multiselect));
    }

    #[test]
    fn patch_only_touches_supplied_properties() {
        let mut field = Field::new(FieldType::Text, "Name", "name");
        field.placeholder = Some("Your name".into());
        field.apply(FieldPatch {
            label: Some("Full name".into()),
            help_text: Some(Some("As printed on your ID".into())),
            placeholder: Some(None),
            ..FieldPatch::default()
        });
        assert_eq!(field.label, "Full name");
        assert_eq!(field.name, "name");
        assert_eq!(field.placeholder, None);
        assert_eq!(field.help_text.as_deref(), Some("As printed on your ID"));
    }

    #[test]
    fn field_round_trips_camel_case_keys() {
        let mut field = Field::new(FieldType::Email, "Email", "email");
        field.is_required = true;
        let json = serde_json::to_value(&field).expect("serialize field");
        assert_eq!(json["type"], "email");
        assert_eq!(json["isRequired"], true);
        let back: Field = serde_json::from_value(json).expect("deserialize field");
        assert_eq!(back, field);
    }
}
