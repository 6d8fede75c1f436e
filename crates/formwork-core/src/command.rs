//! Every mutation the builder understands, as plain data.

use formwork_domain::{DevicePreview, FieldPatch, FormPatch, FormTemplate, NewField, NewRule};
use uuid::Uuid;

/// Tagged union processed by [`crate::reducer::reduce`]. Identifiers are
/// allocated by the caller so the transition stays deterministic.
#[derive(Debug, Clone, PartialEq)]
pub enum FormCommand {
    CreateForm {
        id: Uuid,
        first_step_id: Uuid,
        title: String,
        description: Option<String>,
    },
    UpdateForm(FormPatch),
    AddField {
        id: Uuid,
        field: NewField,
    },
    UpdateField {
        id: Uuid,
        patch: FieldPatch,
    },
    RemoveField(Uuid),
    ReorderFields(Vec<Uuid>),
    SelectField(Option<Uuid>),
    AddValidationRule {
        field_id: Uuid,
        rule_id: Uuid,
        rule: NewRule,
    },
    RemoveValidationRule {
        field_id: Uuid,
        rule_id: Uuid,
    },
    AddFormStep {
        id: Uuid,
        title: String,
        description: Option<String>,
    },
    RemoveFormStep(usize),
    ReorderFormSteps(Vec<usize>),
    LoadTemplate(FormTemplate),
    AssignFieldToStep {
        field_id: Uuid,
        step_index: usize,
    },
    LoadForm(Uuid),
    DeleteForm(Uuid),
    SetDevicePreview(DevicePreview),
}

impl FormCommand {
    /// Whether the command can change the persisted document mapping.
    pub fn touches_forms(&self) -> bool {
        !matches!(
            self,
            FormCommand::SelectField(_)
                | FormCommand::LoadForm(_)
                | FormCommand::SetDevicePreview(_)
        )
    }

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            FormCommand::CreateForm { .. } => "create_form",
            FormCommand::UpdateForm(_) => "update_form",
            FormCommand::AddField { .. } => "add_field",
            FormCommand::UpdateField { .. } => "update_field",
            FormCommand::RemoveField(_) => "remove_field",
            FormCommand::ReorderFields(_) => "reorder_fields",
            FormCommand::SelectField(_) => "select_field",
            FormCommand::AddValidationRule { .. } => "add_validation_rule",
            FormCommand::RemoveValidationRule { .. } => "remove_validation_rule",
            FormCommand::AddFormStep { .. } => "add_form_step",
            FormCommand::RemoveFormStep(_) => "remove_form_step",
            FormCommand::ReorderFormSteps(_) => "reorder_form_steps",
            FormCommand::LoadTemplate(_) => "load_template",
            FormCommand::AssignFieldToStep { .. } => "assign_field_to_step",
            FormCommand::LoadForm(_) => "load_form",
            FormCommand::DeleteForm(_) => "delete_form",
            FormCommand::SetDevicePreview(_) => "set_device_preview",
        }
    }
}
