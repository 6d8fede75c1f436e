//! Form documents, steps, and document-level settings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    common::{Displayable, Identifiable, NamedEntity},
    field::Field,
};

/// Title given to the step every new document starts with.
pub const DEFAULT_STEP_TITLE: &str = "Step 1";

/// One page of a multi-step form; references fields by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<Uuid>,
}

impl Step {
    pub fn new(title: impl Into<String>, description: Option<String>) -> Self {
        Self::with_id(Uuid::new_v4(), title, description)
    }

    pub fn with_id(id: Uuid, title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description,
            fields: Vec::new(),
        }
    }

    pub fn contains(&self, field_id: Uuid) -> bool {
        self.fields.contains(&field_id)
    }
}

impl Identifiable for Step {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Optional behaviour flags for the published fill-out view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_progress_bar: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_save: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_notifications: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_email: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

/// One form definition: title, fields, steps, and settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDocument {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub steps: Vec<Step>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<FormSettings>,
}

impl FormDocument {
    /// Creates an empty document with a single default step.
    pub fn new(
        id: Uuid,
        title: impl Into<String>,
        description: Option<String>,
        first_step_id: Uuid,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description,
            fields: Vec::new(),
            steps: vec![Step::with_id(first_step_id, DEFAULT_STEP_TITLE, None)],
            created_at: now,
            updated_at: now,
            submit_url: None,
            success_message: None,
            error_message: None,
            settings: None,
        }
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    pub fn field(&self, id: Uuid) -> Option<&Field> {
        self.fields.iter().find(|field| field.id == id)
    }

    pub fn field_mut(&mut self, id: Uuid) -> Option<&mut Field> {
        self.fields.iter_mut().find(|field| field.id == id)
    }

    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn field_ids(&self) -> Vec<Uuid> {
        self.fields.iter().map(|field| field.id).collect()
    }

    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Applies every property set on `patch`. Timestamps are left to the caller.
    pub fn apply(&mut self, patch: FormPatch) {
        let FormPatch {
            title,
            description,
            submit_url,
            success_message,
            error_message,
            settings,
        } = patch;
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(submit_url) = submit_url {
            self.submit_url = submit_url;
        }
        if let Some(message) = success_message {
            self.success_message = message;
        }
        if let Some(message) = error_message {
            self.error_message = message;
        }
        if let Some(settings) = settings {
            self.settings = settings;
        }
    }
}

impl Identifiable for FormDocument {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for FormDocument {
    fn name(&self) -> &str {
        &self.title
    }
}

impl Displayable for FormDocument {
    fn display_label(&self) -> String {
        let fields = self.fields.len();
        let steps = self.steps.len();
        format!(
            "{} ({} {}, {} {})",
            self.title,
            fields,
            if fields == 1 { "field" } else { "fields" },
            steps,
            if steps == 1 { "step" } else { "steps" }
        )
    }
}

/// Shallow partial update for a document's own properties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub submit_url: Option<Option<String>>,
    pub success_message: Option<Option<String>>,
    pub error_message: Option<Option<String>>,
    pub settings: Option<Option<FormSettings>>,
}
