//! The single pure transition function of the builder.
//!
//! `reduce` never allocates identifiers or reads the clock: both arrive with
//! the command and the `now` argument. Commands that target the selected
//! document are no-ops when no document is selected.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use formwork_domain::{FormDocument, Step};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{command::FormCommand, state::BuilderState, CoreError};

/// Applies `command` to `state` and returns the next state.
pub fn reduce(mut state: BuilderState, command: FormCommand, now: DateTime<Utc>) -> BuilderState {
    debug!(command = command.name(), "reducing");
    match command {
        FormCommand::CreateForm {
            id,
            first_step_id,
            title,
            description,
        } => {
            let document = FormDocument::new(id, title, description, first_step_id, now);
            state.forms.insert(id, document);
            state.current_form_id = Some(id);
            state.selected_field_id = None;
        }
        FormCommand::UpdateForm(patch) => {
            if let Some(form) = state.current_form_mut() {
                form.apply(patch);
                form.touch(now);
            }
        }
        FormCommand::AddField { id, field } => {
            if let Some(form) = state.current_form_mut() {
                form.fields.push(field.into_field(id));
                if let Some(first) = form.steps.first_mut() {
                    first.fields.push(id);
                }
                form.touch(now);
                state.selected_field_id = Some(id);
            }
        }
        FormCommand::UpdateField { id, patch } => {
            if let Some(form) = state.current_form_mut() {
                if let Some(field) = form.field_mut(id) {
                    field.apply(patch);
                    form.touch(now);
                }
            }
        }
        FormCommand::RemoveField(id) => {
            if let Some(form) = state.current_form_mut() {
                let before = form.fields.len();
                form.fields.retain(|field| field.id != id);
                let stripped = strip_from_steps(&mut form.steps, id);
                if before != form.fields.len() || stripped {
                    form.touch(now);
                }
                if state.selected_field_id == Some(id) {
                    state.selected_field_id = None;
                }
            }
        }
        FormCommand::ReorderFields(order) => {
            if let Some(form) = state.current_form_mut() {
                reorder_fields(form, &order);
                form.touch(now);
            }
        }
        FormCommand::SelectField(id) => {
            state.selected_field_id = id;
        }
        FormCommand::AddValidationRule {
            field_id,
            rule_id,
            rule,
        } => {
            if let Some(form) = state.current_form_mut() {
                if let Some(field) = form.field_mut(field_id) {
                    field.validation_rules.push(rule.into_rule(rule_id));
                    form.touch(now);
                }
            }
        }
        FormCommand::RemoveValidationRule { field_id, rule_id } => {
            if let Some(form) = state.current_form_mut() {
                if let Some(field) = form.field_mut(field_id) {
                    field.validation_rules.retain(|rule| rule.id != rule_id);
                    form.touch(now);
                }
            }
        }
        FormCommand::AddFormStep {
            id,
            title,
            description,
        } => {
            if let Some(form) = state.current_form_mut() {
                form.steps.push(Step::with_id(id, title, description));
                form.touch(now);
            }
        }
        FormCommand::RemoveFormStep(index) => {
            if let Some(form) = state.current_form_mut() {
                if form.steps.len() > 1 && index < form.steps.len() {
                    form.steps.remove(index);
                    form.touch(now);
                }
            }
        }
        FormCommand::ReorderFormSteps(order) => {
            if let Some(form) = state.current_form_mut() {
                if reorder_steps(form, &order) {
                    form.touch(now);
                }
            }
        }
        FormCommand::LoadTemplate(template) => {
            let selected = state.selected_field_id;
            if let Some(form) = state.current_form_mut() {
                if let Some(steps) = template.supplied_steps() {
                    form.steps = steps.to_vec();
                }
                form.fields = template.fields;
                form.touch(now);
                let still_present = selected.map_or(false, |id| form.field(id).is_some());
                if !still_present {
                    state.selected_field_id = None;
                }
            }
        }
        FormCommand::AssignFieldToStep {
            field_id,
            step_index,
        } => {
            if let Some(form) = state.current_form_mut() {
                if form.field(field_id).is_some() && step_index < form.steps.len() {
                    strip_from_steps(&mut form.steps, field_id);
                    form.steps[step_index].fields.push(field_id);
                    form.touch(now);
                }
            }
        }
        FormCommand::LoadForm(id) => {
            state.current_form_id = Some(id);
            state.selected_field_id = None;
        }
        FormCommand::DeleteForm(id) => {
            state.forms.remove(&id);
            if state.current_form_id == Some(id) {
                state.current_form_id = None;
                state.selected_field_id = None;
            }
        }
        FormCommand::SetDevicePreview(device) => {
            state.device_preview = device;
        }
    }
    state
}

/// Succeeds only when `order` lists every field of `form` exactly once.
pub fn check_permutation(form: &FormDocument, order: &[Uuid]) -> Result<(), CoreError> {
    let current: HashSet<Uuid> = form.fields.iter().map(|field| field.id).collect();
    let requested: HashSet<Uuid> = order.iter().copied().collect();
    if requested.len() != order.len() {
        return Err(CoreError::InvalidOperation(
            "field order lists an id more than once".into(),
        ));
    }
    if let Some(unknown) = order.iter().find(|id| !current.contains(id)) {
        return Err(CoreError::FieldNotFound(*unknown));
    }
    if requested.len() != current.len() {
        return Err(CoreError::InvalidOperation(format!(
            "field order names {} of {} fields",
            requested.len(),
            current.len()
        )));
    }
    Ok(())
}

fn strip_from_steps(steps: &mut [Step], field_id: Uuid) -> bool {
    let mut stripped = false;
    for step in steps.iter_mut() {
        let before = step.fields.len();
        step.fields.retain(|id| *id != field_id);
        stripped |= before != step.fields.len();
    }
    stripped
}

fn reorder_fields(form: &mut FormDocument, order: &[Uuid]) {
    let mut remaining = std::mem::take(&mut form.fields);
    let mut reordered = Vec::with_capacity(order.len());
    for id in order {
        if let Some(position) = remaining.iter().position(|field| field.id == *id) {
            reordered.push(remaining.remove(position));
        }
    }
    if !remaining.is_empty() {
        let lost: Vec<String> = remaining.iter().map(|field| field.id.to_string()).collect();
        warn!(form = %form.id, lost = ?lost, "field reorder dropped fields missing from the order");
    }
    form.fields = reordered;
}

fn reorder_steps(form: &mut FormDocument, order: &[usize]) -> bool {
    let mut seen = HashSet::new();
    let reordered: Vec<Step> = order
        .iter()
        .filter(|index| **index < form.steps.len() && seen.insert(**index))
        .map(|index| form.steps[*index].clone())
        .collect();
    if reordered.is_empty() {
        return false;
    }
    form.steps = reordered;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwork_domain::{FieldPatch, FieldType, FormPatch, FormTemplate, NewField};

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    fn with_form() -> (BuilderState, Uuid) {
        let id = Uuid::new_v4();
        let state = reduce(
            BuilderState::default(),
            FormCommand::CreateForm {
                id,
                first_step_id: Uuid::new_v4(),
                title: "Intake".into(),
                description: None,
            },
            now(),
        );
        (state, id)
    }

    fn add_field(state: BuilderState, name: &str) -> (BuilderState, Uuid) {
        let id = Uuid::new_v4();
        let state = reduce(
            state,
            FormCommand::AddField {
                id,
                field: NewField::new(FieldType::Text, name, name),
            },
            now(),
        );
        (state, id)
    }

    #[test]
    fn create_selects_new_form_and_clears_field_selection() {
        let (state, id) = with_form();
        let (state, _) = add_field(state, "a");
        let second = Uuid::new_v4();
        let state = reduce(
            state,
            FormCommand::CreateForm {
                id: second,
                first_step_id: Uuid::new_v4(),
                title: "Other".into(),
                description: None,
            },
            now(),
        );
        assert_eq!(state.current_form_id, Some(second));
        assert_eq!(state.selected_field_id, None);
        assert!(state.forms.contains_key(&id));
    }

    #[test]
    fn commands_without_selection_are_noops() {
        let state = BuilderState::default();
        let next = reduce(
            state.clone(),
            FormCommand::UpdateForm(FormPatch {
                title: Some("x".into()),
                ..FormPatch::default()
            }),
            now(),
        );
        assert_eq!(next, state);

        let next = reduce(
            state.clone(),
            FormCommand::AddField {
                id: Uuid::new_v4(),
                field: NewField::new(FieldType::Text, "a", "a"),
            },
            now(),
        );
        assert_eq!(next, state);
    }

    #[test]
    fn update_of_unknown_field_leaves_document_untouched() {
        let (state, id) = with_form();
        let before = state.forms[&id].clone();
        let state = reduce(
            state,
            FormCommand::UpdateField {
                id: Uuid::new_v4(),
                patch: FieldPatch {
                    label: Some("ghost".into()),
                    ..FieldPatch::default()
                },
            },
            now(),
        );
        assert_eq!(state.forms[&id], before);
    }

    #[test]
    fn reorder_with_duplicates_keeps_ids_unique() {
        let (state, form) = with_form();
        let (state, a) = add_field(state, "a");
        let (state, b) = add_field(state, "b");
        let state = reduce(state, FormCommand::ReorderFields(vec![b, a, b]), now());
        assert_eq!(state.forms[&form].field_ids(), vec![b, a]);
    }

    #[test]
    fn permutation_check_rejects_partial_and_unknown_orders() {
        let (state, form) = with_form();
        let (state, a) = add_field(state, "a");
        let (state, b) = add_field(state, "b");
        let doc = &state.forms[&form];

        assert!(check_permutation(doc, &[b, a]).is_ok());
        assert!(matches!(
            check_permutation(doc, &[b]),
            Err(CoreError::InvalidOperation(_))
        ));
        assert!(matches!(
            check_permutation(doc, &[a, a]),
            Err(CoreError::InvalidOperation(_))
        ));
        let stranger = Uuid::new_v4();
        assert!(matches!(
            check_permutation(doc, &[a, stranger]),
            Err(CoreError::FieldNotFound(id)) if id == stranger
        ));
    }

    #[test]
    fn step_reorder_skips_out_of_range_and_ignores_empty_results() {
        let (state, form) = with_form();
        let state = reduce(
            state,
            FormCommand::AddFormStep {
                id: Uuid::new_v4(),
                title: "Two".into(),
                description: None,
            },
            now(),
        );
        let titles = |state: &BuilderState| -> Vec<String> {
            state.forms[&form].steps.iter().map(|s| s.title.clone()).collect()
        };

        let state = reduce(state, FormCommand::ReorderFormSteps(vec![9, 1, 0]), now());
        assert_eq!(titles(&state), vec!["Two", "Step 1"]);

        let state = reduce(state, FormCommand::ReorderFormSteps(vec![7, 8]), now());
        assert_eq!(titles(&state), vec!["Two", "Step 1"]);
    }

    #[test]
    fn assign_moves_field_between_steps() {
        let (state, form) = with_form();
        let state = reduce(
            state,
            FormCommand::AddFormStep {
                id: Uuid::new_v4(),
                title: "Two".into(),
                description: None,
            },
            now(),
        );
        let (state, a) = add_field(state, "a");
        let state = reduce(
            state,
            FormCommand::AssignFieldToStep {
                field_id: a,
                step_index: 1,
            },
            now(),
        );
        let doc = &state.forms[&form];
        assert!(!doc.steps[0].contains(a));
        assert_eq!(doc.steps[1].fields, vec![a]);

        let unchanged = reduce(
            state.clone(),
            FormCommand::AssignFieldToStep {
                field_id: a,
                step_index: 5,
            },
            now(),
        );
        assert_eq!(unchanged, state);
    }

    #[test]
    fn template_with_steps_replaces_both() {
        let (state, form) = with_form();
        let (state, a) = add_field(state, "a");
        let mut template = FormTemplate::new("t", "T");
        let field = formwork_domain::Field::new(FieldType::Email, "Email", "email");
        let mut step = Step::new("Only", None);
        step.fields.push(field.id);
        template.fields.push(field.clone());
        template.steps = Some(vec![step.clone()]);

        let state = reduce(state, FormCommand::LoadTemplate(template), now());
        let doc = &state.forms[&form];
        assert_eq!(doc.fields, vec![field]);
        assert_eq!(doc.steps, vec![step]);
        assert!(doc.field(a).is_none());
        assert_eq!(state.selected_field_id, None);
    }

    #[test]
    fn deleting_current_form_clears_selection() {
        let (state, form) = with_form();
        let (state, _) = add_field(state, "a");
        let state = reduce(state, FormCommand::DeleteForm(form), now());
        assert!(state.forms.is_empty());
        assert_eq!(state.current_form_id, None);
        assert_eq!(state.selected_field_id, None);
    }

    #[test]
    fn load_form_selects_unknown_ids_without_a_document() {
        let (state, _) = with_form();
        let ghost = Uuid::new_v4();
        let state = reduce(state, FormCommand::LoadForm(ghost), now());
        assert_eq!(state.current_form_id, Some(ghost));
        assert!(state.current_form().is_none());
    }
}
