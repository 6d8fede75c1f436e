//! Step-by-step fill-out of a published document.
//!
//! The navigator owns the fill-out session: the current step, the values
//! entered so far (keyed by field name), the per-field errors raised by the
//! last step check, and whether the session has been submitted.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use formwork_domain::{Field, FieldValue, FormDocument, FormSubmission};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{validation, CoreError};

pub const REQUIRED_MESSAGE: &str = "This field is required";

/// Fields shown on step `index`, in document order. Falls back to every
/// field when the step does not exist.
pub fn visible_fields(form: &FormDocument, index: usize) -> Vec<&Field> {
    match form.step(index) {
        Some(step) => form
            .fields
            .iter()
            .filter(|field| step.contains(field.id))
            .collect(),
        None => form.fields.iter().collect(),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepNavigator {
    current_step: usize,
    values: BTreeMap<String, FieldValue>,
    errors: BTreeMap<String, Vec<String>>,
    submitted: bool,
}

impl StepNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn values(&self) -> &BTreeMap<String, FieldValue> {
        &self.values
    }

    /// Errors recorded by the last step check, keyed by field name.
    pub fn errors(&self) -> &BTreeMap<String, Vec<String>> {
        &self.errors
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Stores a value and clears the step errors of that field.
    pub fn set_value(&mut self, name: impl Into<String>, value: FieldValue) -> Result<(), CoreError> {
        self.ensure_open()?;
        let name = name.into();
        self.errors.remove(&name);
        self.values.insert(name, value);
        Ok(())
    }

    pub fn clear_value(&mut self, name: &str) -> Result<(), CoreError> {
        self.ensure_open()?;
        self.errors.remove(name);
        self.values.remove(name);
        Ok(())
    }

    /// Checks the visible fields of the current step and records errors.
    ///
    /// Only the `isRequired` flag is considered here: a value that is absent
    /// or an empty string fails. Validation rules are surfaced live through
    /// [`StepNavigator::messages_for`] but do not block navigation.
    pub fn validate_step(&mut self, form: &FormDocument) -> bool {
        let errors: BTreeMap<String, Vec<String>> = visible_fields(form, self.current_step)
            .into_iter()
            .filter(|field| field.is_required && self.is_blank(&field.name))
            .map(|field| (field.name.clone(), vec![REQUIRED_MESSAGE.to_string()]))
            .collect();
        let valid = errors.is_empty();
        self.errors = errors;
        valid
    }

    /// Advances when the current step is valid and is not the last one.
    /// Returns whether the step changed.
    pub fn next(&mut self, form: &FormDocument) -> bool {
        if self.submitted {
            return false;
        }
        if !self.validate_step(form) {
            debug!(step = self.current_step, errors = self.errors.len(), "step blocked");
            return false;
        }
        if self.current_step + 1 >= form.steps.len() {
            return false;
        }
        self.current_step += 1;
        debug!(step = self.current_step, "advanced");
        true
    }

    /// Goes back one step. Returns whether the step changed.
    pub fn previous(&mut self) -> bool {
        if self.submitted || self.current_step == 0 {
            return false;
        }
        self.current_step -= 1;
        true
    }

    pub fn is_last_step(&self, form: &FormDocument) -> bool {
        self.current_step + 1 >= form.steps.len()
    }

    /// Submits from the last step. The navigator is terminal afterwards.
    pub fn submit(
        &mut self,
        form: &FormDocument,
        now: DateTime<Utc>,
    ) -> Result<FormSubmission, CoreError> {
        self.ensure_open()?;
        if !self.is_last_step(form) {
            return Err(CoreError::InvalidOperation(format!(
                "cannot submit from step {} of {}",
                self.current_step + 1,
                form.steps.len()
            )));
        }
        if !self.validate_step(form) {
            let names: Vec<&str> = self.errors.keys().map(String::as_str).collect();
            return Err(CoreError::Validation(format!(
                "required fields missing: {}",
                names.join(", ")
            )));
        }
        self.submitted = true;
        info!(form = %form.id, values = self.values.len(), "form submitted");
        Ok(FormSubmission {
            id: Uuid::new_v4(),
            form_id: form.id,
            data: self.values.clone(),
            submitted_at: now,
        })
    }

    /// The entered value, or the field's default when nothing was entered.
    pub fn value_for<'a>(&'a self, field: &'a Field) -> Option<&'a FieldValue> {
        self.values
            .get(&field.name)
            .or(field.default_value.as_ref())
    }

    /// Step errors for the field followed by any live rule failures.
    pub fn messages_for(&self, field: &Field) -> Vec<String> {
        let mut messages = self.errors.get(&field.name).cloned().unwrap_or_default();
        if self.values.contains_key(&field.name) {
            for message in validation::validate(field, self.values.get(&field.name)) {
                if !messages.contains(&message) {
                    messages.push(message);
                }
            }
        }
        messages
    }

    /// One-based current step and the total step count.
    pub fn progress(&self, form: &FormDocument) -> (usize, usize) {
        let total = form.steps.len().max(1);
        ((self.current_step + 1).min(total), total)
    }

    fn is_blank(&self, name: &str) -> bool {
        match self.values.get(name) {
            None => true,
            Some(FieldValue::Text(text)) => text.is_empty(),
            Some(_) => false,
        }
    }

    fn ensure_open(&self) -> Result<(), CoreError> {
        if self.submitted {
            return Err(CoreError::InvalidOperation(
                "form has already been submitted".into(),
            ));
        }
        Ok(())
    }
}
