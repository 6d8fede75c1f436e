//! The builder store: explicit application state plus its persistence hook.
//!
//! Every mutation goes through [`FormStore::dispatch`], which runs the pure
//! reducer and, when the command can touch the document mapping, writes the
//! whole mapping back to storage. Storage failures are logged and swallowed
//! so the in-memory session keeps working.

use formwork_domain::{
    DevicePreview, FieldPatch, FieldType, FormDocument, FormPatch, FormTemplate, NewField,
    NewRule,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    command::FormCommand,
    drag::{move_in_order, DropIntent},
    palette::default_field,
    reducer::{check_permutation, reduce},
    state::BuilderState,
    storage::{FormStorage, MemoryFormStorage},
    templates::{builtin_templates, with_fresh_ids},
    time::{Clock, SystemClock},
    CoreError,
};

pub struct FormStore {
    state: BuilderState,
    storage: Box<dyn FormStorage>,
    clock: Box<dyn Clock>,
    user_templates: Vec<FormTemplate>,
}

impl FormStore {
    /// Rehydrates the mapping from `storage`. A read failure starts empty.
    pub fn open(storage: Box<dyn FormStorage>, clock: Box<dyn Clock>) -> Self {
        let forms = match storage.load_forms() {
            Ok(forms) => forms,
            Err(err) => {
                warn!(error = %err, "failed to load saved forms; starting empty");
                Default::default()
            }
        };
        info!(count = forms.len(), "forms loaded");
        Self {
            state: BuilderState::with_forms(forms),
            storage,
            clock,
            user_templates: Vec::new(),
        }
    }

    /// Store backed by memory and the system clock.
    pub fn in_memory() -> Self {
        Self::open(Box::new(MemoryFormStorage::new()), Box::new(SystemClock))
    }

    pub fn state(&self) -> &BuilderState {
        &self.state
    }

    pub fn current_form(&self) -> Option<&FormDocument> {
        self.state.current_form()
    }

    pub fn form(&self, id: Uuid) -> Option<&FormDocument> {
        self.state.forms.get(&id)
    }

    /// All documents, oldest first.
    pub fn forms(&self) -> Vec<&FormDocument> {
        let mut forms: Vec<_> = self.state.forms.values().collect();
        forms.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        forms
    }

    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }

    /// Runs `command` through the reducer and persists when needed.
    pub fn dispatch(&mut self, command: FormCommand) {
        let persist = command.touches_forms();
        let now = self.clock.now();
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, command, now);
        if persist {
            self.persist();
        }
    }

    fn persist(&self) {
        if let Err(err) = self.storage.save_forms(&self.state.forms) {
            warn!(error = %err, "failed to persist forms");
        }
    }

    pub fn create_form(&mut self, title: impl Into<String>, description: Option<String>) -> Uuid {
        let id = Uuid::new_v4();
        let title = title.into();
        info!(form = %id, title = %title, "form created");
        self.dispatch(FormCommand::CreateForm {
            id,
            first_step_id: Uuid::new_v4(),
            title,
            description,
        });
        id
    }

    pub fn update_form(&mut self, patch: FormPatch) {
        self.dispatch(FormCommand::UpdateForm(patch));
    }

    /// Appends a field to the selected document and places it on the first step.
    pub fn add_field(&mut self, field: NewField) -> Option<Uuid> {
        self.current_form()?;
        let id = Uuid::new_v4();
        self.dispatch(FormCommand::AddField { id, field });
        Some(id)
    }

    pub fn add_default_field(&mut self, kind: FieldType) -> Option<Uuid> {
        self.add_field(default_field(kind))
    }

    pub fn update_field(&mut self, id: Uuid, patch: FieldPatch) {
        if patch.is_empty() {
            return;
        }
        self.dispatch(FormCommand::UpdateField { id, patch });
    }

    pub fn remove_field(&mut self, id: Uuid) {
        self.dispatch(FormCommand::RemoveField(id));
    }

    /// Rebuilds the field list in `order`. Ids missing from `order` are lost.
    pub fn reorder_fields(&mut self, order: Vec<Uuid>) {
        self.dispatch(FormCommand::ReorderFields(order));
    }

    /// Like [`FormStore::reorder_fields`] but refuses anything other than an
    /// exact permutation of the current field ids.
    pub fn reorder_fields_strict(&mut self, order: Vec<Uuid>) -> Result<(), CoreError> {
        let form = self.current_form().ok_or(CoreError::FormNotSelected)?;
        check_permutation(form, &order)?;
        self.dispatch(FormCommand::ReorderFields(order));
        Ok(())
    }

    pub fn select_field(&mut self, id: Option<Uuid>) {
        self.dispatch(FormCommand::SelectField(id));
    }

    pub fn add_validation_rule(&mut self, field_id: Uuid, rule: NewRule) -> Option<Uuid> {
        self.current_form()?.field(field_id)?;
        let rule_id = Uuid::new_v4();
        self.dispatch(FormCommand::AddValidationRule {
            field_id,
            rule_id,
            rule,
        });
        Some(rule_id)
    }

    pub fn remove_validation_rule(&mut self, field_id: Uuid, rule_id: Uuid) {
        self.dispatch(FormCommand::RemoveValidationRule { field_id, rule_id });
    }

    pub fn add_form_step(&mut self, title: impl Into<String>, description: Option<String>) -> Option<Uuid> {
        self.current_form()?;
        let id = Uuid::new_v4();
        self.dispatch(FormCommand::AddFormStep {
            id,
            title: title.into(),
            description,
        });
        Some(id)
    }

    pub fn remove_form_step(&mut self, index: usize) {
        self.dispatch(FormCommand::RemoveFormStep(index));
    }

    pub fn reorder_form_steps(&mut self, order: Vec<usize>) {
        self.dispatch(FormCommand::ReorderFormSteps(order));
    }

    /// Replaces the selected document's fields (and steps, when the template
    /// supplies any) with the template's.
    /// Replaces the open form's fields with fresh-id copies of the template's,
    /// so a form never shares field ids with the one a template was saved from.
    pub fn load_template(&mut self, template: FormTemplate) {
        info!(template = %template.id, "template loaded");
        self.dispatch(FormCommand::LoadTemplate(with_fresh_ids(&template)));
    }

    pub fn assign_field_to_step(&mut self, field_id: Uuid, step_index: usize) {
        self.dispatch(FormCommand::AssignFieldToStep {
            field_id,
            step_index,
        });
    }

    /// Selects `id` whether or not a document exists for it.
    pub fn load_form(&mut self, id: Uuid) {
        self.dispatch(FormCommand::LoadForm(id));
    }

    pub fn delete_form(&mut self, id: Uuid) {
        info!(form = %id, "form deleted");
        self.dispatch(FormCommand::DeleteForm(id));
    }

    /// Creates "`<title> (Copy)`" with the same description and selects it.
    pub fn duplicate_form(&mut self, id: Uuid) -> Option<Uuid> {
        let source = self.form(id)?;
        let title = format!("{} (Copy)", source.title);
        let description = source.description.clone();
        Some(self.create_form(title, description))
    }

    pub fn set_device_preview(&mut self, device: DevicePreview) {
        self.dispatch(FormCommand::SetDevicePreview(device));
    }

    /// Handles the outcome of a drag gesture.
    pub fn apply_drop(&mut self, intent: DropIntent) -> Result<Option<Uuid>, CoreError> {
        match intent {
            DropIntent::AddField(kind) => self
                .add_default_field(kind)
                .map(Some)
                .ok_or(CoreError::FormNotSelected),
            DropIntent::MoveField { field_id, to_index } => {
                let form = self.current_form().ok_or(CoreError::FormNotSelected)?;
                let order = move_in_order(&form.field_ids(), field_id, to_index)
                    .ok_or(CoreError::FieldNotFound(field_id))?;
                self.reorder_fields_strict(order)?;
                Ok(None)
            }
        }
    }

    /// Snapshots the selected document's fields and steps as a user template.
    pub fn save_as_template(
        &mut self,
        name: impl Into<String>,
        description: Option<String>,
    ) -> Result<&FormTemplate, CoreError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CoreError::Validation("template name is required".into()));
        }
        let form = self.current_form().ok_or(CoreError::FormNotSelected)?;
        if form.fields.is_empty() {
            return Err(CoreError::InvalidOperation(
                "cannot save a form without fields as a template".into(),
            ));
        }
        let template = FormTemplate {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            fields: form.fields.clone(),
            steps: Some(form.steps.clone()),
        };
        info!(template = %template.id, "template saved");
        self.user_templates.push(template);
        self.user_templates
            .last()
            .ok_or_else(|| CoreError::InvalidOperation("template was not stored".into()))
    }

    pub fn user_templates(&self) -> &[FormTemplate] {
        &self.user_templates
    }

    /// Built-in templates followed by the ones saved this session.
    pub fn templates(&self) -> Vec<FormTemplate> {
        let mut templates = builtin_templates();
        templates.extend(self.user_templates.iter().cloned());
        templates
    }

    pub fn template(&self, id: &str) -> Option<FormTemplate> {
        self.templates().into_iter().find(|template| template.id == id)
    }
}

impl std::fmt::Debug for FormStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormStore")
            .field("state", &self.state)
            .field("user_templates", &self.user_templates.len())
            .finish()
    }
}
