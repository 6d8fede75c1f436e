//! Field palette offered by the builder sidebar.

use formwork_domain::{FieldOption, FieldType, NewField};

/// A field type the user can drag or click into a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteEntry {
    pub kind: FieldType,
    pub label: &'static str,
    pub description: &'static str,
}

const PALETTE: [PaletteEntry; 12] = [
    entry(FieldType::Text, "Text", "Single line text input"),
    entry(FieldType::Textarea, "Textarea", "Multi-line text input"),
    entry(FieldType::Number, "Number", "Numeric input"),
    entry(FieldType::Email, "Email", "Email address input"),
    entry(FieldType::Password, "Password", "Password input with masking"),
    entry(FieldType::Select, "Dropdown", "Dropdown select menu"),
    entry(FieldType::Checkbox, "Checkbox", "Single checkbox for boolean values"),
    entry(FieldType::Radio, "Radio Buttons", "Radio button group"),
    entry(FieldType::Date, "Date", "Date picker"),
    entry(FieldType::Time, "Time", "Time picker"),
    entry(FieldType::File, "File Upload", "File upload field"),
    entry(FieldType::Range, "Range Slider", "Range slider input"),
];

const fn entry(kind: FieldType, label: &'static str, description: &'static str) -> PaletteEntry {
    PaletteEntry {
        kind,
        label,
        description,
    }
}

pub fn palette_entries() -> &'static [PaletteEntry] {
    &PALETTE
}

pub fn palette_entry(kind: FieldType) -> Option<&'static PaletteEntry> {
    PALETTE.iter().find(|entry| entry.kind == kind)
}

/// Submission name derived from a label: lowercased, whitespace runs become `_`.
pub fn default_name(label: &str) -> String {
    label
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// The field created when `kind` is dropped from the palette.
pub fn default_field(kind: FieldType) -> NewField {
    let label = kind.label();
    let mut field = NewField::new(kind, label, default_name(label))
        .with_placeholder(format!("Enter {}", label.to_lowercase()));
    if kind.is_choice() {
        field.options = (1..=3)
            .map(|n| FieldOption::new(format!("Option {n}"), format!("option{n}")))
            .collect();
    }
    field
}
