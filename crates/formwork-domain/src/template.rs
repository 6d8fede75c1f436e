//! Immutable blueprints used to seed a document's fields and steps.

use serde::{Deserialize, Serialize};

use crate::{
    common::{Displayable, NamedEntity},
    field::Field,
    form::Step,
};

/// A reusable set of fields (and optionally steps) loaded into a document wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormTemplate {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<Step>>,
}

impl FormTemplate {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            fields: Vec::new(),
            steps: None,
        }
    }

    /// Steps the template supplies, treating an empty list as "none supplied".
    pub fn supplied_steps(&self) -> Option<&[Step]> {
        self.steps
            .as_deref()
            .filter(|steps| !steps.is_empty())
    }
}

impl NamedEntity for FormTemplate {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for FormTemplate {
    fn display_label(&self) -> String {
        match &self.description {
            Some(description) => format!("{} - {}", self.name, description),
            None => self.name.clone(),
        }
    }
}
