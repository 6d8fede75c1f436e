//! Fill-out flow: the published view of a form, one step at a time.

use formwork_core::{visible_fields, CoreError, StepNavigator};
use formwork_domain::{Field, FieldType, FieldValue, FormDocument};

use crate::cli::commands::form::parse_switch;
use crate::cli::core::{
    resolve_field_in, require_arg, rest, CommandError, CommandResult, ShellContext,
};
use crate::cli::io;
use crate::cli::output::{line, section};
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::FillSession;

const DEFAULT_SUCCESS_MESSAGE: &str = "Form submitted successfully!";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "fill",
            "Start filling out a form",
            "fill [form]",
            cmd_fill,
        ),
        CommandEntry::new(
            "set",
            "Enter a value on the current step (no value clears it)",
            "set <field> [value...]",
            cmd_set,
        ),
        CommandEntry::new("next", "Go to the next step", "next", cmd_next),
        CommandEntry::new("back", "Go to the previous step", "back", cmd_back),
        CommandEntry::new(
            "submit",
            "Submit the form from its last step",
            "submit",
            cmd_submit,
        ),
    ]
}

/// Reads user input into the value shape of `field`.
pub(crate) fn parse_value(field: &Field, raw: &str) -> Result<FieldValue, CommandError> {
    match field.kind {
        FieldType::Number | FieldType::Range => {
            raw.trim().parse::<f64>().map(FieldValue::Number).map_err(|_| {
                CommandError::InvalidArguments(format!("`{}` needs a number.", field.label))
            })
        }
        FieldType::Checkbox => parse_switch(Some(raw)).map(FieldValue::Bool),
        FieldType::Multiselect => raw
            .split(',')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| option_value(field, value))
            .collect::<Result<Vec<_>, _>>()
            .map(FieldValue::List),
        FieldType::Radio | FieldType::Select => {
            option_value(field, raw.trim()).map(FieldValue::Text)
        }
        _ => Ok(FieldValue::text(raw)),
    }
}

/// Maps an option label or value to the stored option value.
fn option_value(field: &Field, raw: &str) -> Result<String, CommandError> {
    if field.options.is_empty() || raw.is_empty() {
        return Ok(raw.to_string());
    }
    field
        .options
        .iter()
        .find(|option| option.value == raw || option.label.eq_ignore_ascii_case(raw))
        .map(|option| option.value.clone())
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "`{raw}` is not an option of `{}`.",
                field.label
            ))
        })
}

fn session_form<'a>(
    context: &'a ShellContext,
    session: &FillSession,
) -> Result<&'a FormDocument, CommandError> {
    context
        .store
        .form(session.form_id)
        .ok_or(CommandError::Core(CoreError::FormNotFound(session.form_id)))
}

fn cmd_fill(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let form_id = match args.first() {
        Some(raw) => context.resolve_form(raw)?,
        None => context.open_form()?.id,
    };
    let session = FillSession {
        form_id,
        navigator: StepNavigator::new(),
    };
    let form = session_form(context, &session)?;
    print_step(form, &session.navigator);
    context.fill = Some(session);
    Ok(())
}

fn cmd_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw_field = require_arg(args, 0, "set <field> [value...]")?;
    let session = context.fill.as_mut().ok_or(CommandError::NotFilling)?;
    let form = context
        .store
        .form(session.form_id)
        .ok_or(CommandError::Core(CoreError::FormNotFound(session.form_id)))?;
    let field_id = resolve_field_in(form, raw_field)?;
    let navigator = &mut session.navigator;
    let Some(field) = visible_fields(form, navigator.current_step())
        .into_iter()
        .find(|field| field.id == field_id)
    else {
        return Err(CommandError::InvalidArguments(format!(
            "`{raw_field}` is not on this step."
        )));
    };

    match rest(args, 1) {
        Some(raw) => navigator.set_value(field.name.clone(), parse_value(field, &raw)?)?,
        None => navigator.clear_value(&field.name)?,
    }
    let messages = navigator.messages_for(field);
    if messages.is_empty() {
        io::print_success(format!(
            "{} = {}",
            field.label,
            navigator
                .value_for(field)
                .map(ToString::to_string)
                .unwrap_or_default()
        ));
    }
    for message in messages {
        io::print_warning(format!("{}: {message}", field.label));
    }
    Ok(())
}

fn cmd_next(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let session = context.fill.as_mut().ok_or(CommandError::NotFilling)?;
    let form = context
        .store
        .form(session.form_id)
        .ok_or(CommandError::Core(CoreError::FormNotFound(session.form_id)))?;
    let navigator = &mut session.navigator;
    if navigator.next(form) {
        print_step(form, navigator);
    } else if !navigator.errors().is_empty() {
        print_errors(form, navigator);
    } else if navigator.is_submitted() {
        io::print_info("The form has already been submitted.");
    } else {
        io::print_info("This is the last step. Use `submit` to finish.");
    }
    Ok(())
}

fn cmd_back(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let session = context.fill.as_mut().ok_or(CommandError::NotFilling)?;
    let form = context
        .store
        .form(session.form_id)
        .ok_or(CommandError::Core(CoreError::FormNotFound(session.form_id)))?;
    if session.navigator.previous() {
        print_step(form, &session.navigator);
    } else {
        io::print_info("Already on the first step.");
    }
    Ok(())
}

fn cmd_submit(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let now = context.store.now();
    let session = context.fill.as_mut().ok_or(CommandError::NotFilling)?;
    let form = context
        .store
        .form(session.form_id)
        .ok_or(CommandError::Core(CoreError::FormNotFound(session.form_id)))?;
    match session.navigator.submit(form, now) {
        Ok(submission) => {
            io::print_success(
                form.success_message
                    .as_deref()
                    .unwrap_or(DEFAULT_SUCCESS_MESSAGE),
            );
            line(serde_json::to_string_pretty(&submission)?);
            Ok(())
        }
        Err(err @ CoreError::Validation(_)) => {
            if let Some(message) = &form.error_message {
                io::print_error(message);
            }
            print_errors(form, &session.navigator);
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}

fn print_errors(form: &FormDocument, navigator: &StepNavigator) {
    for (name, messages) in navigator.errors() {
        let label = form
            .field_by_name(name)
            .map_or(name.as_str(), |field| field.label.as_str());
        io::print_warning(format!("{label}: {}", messages.join("; ")));
    }
}

fn print_step(form: &FormDocument, navigator: &StepNavigator) {
    let (step, total) = navigator.progress(form);
    section(format!("{} - step {step} of {total}", form.title));
    if let Some(current) = form.step(navigator.current_step()) {
        line(format!("  {}", current.title));
        if let Some(description) = &current.description {
            line(format!("  {description}"));
        }
    }
    let show_progress = form
        .settings
        .as_ref()
        .and_then(|settings| settings.show_progress_bar)
        .unwrap_or(false);
    if show_progress {
        line(format!("  {}", progress_bar(step, total)));
    }

    for field in visible_fields(form, navigator.current_step()) {
        if field.is_hidden {
            continue;
        }
        let marker = if field.is_required { " *" } else { "" };
        let value = navigator
            .value_for(field)
            .map(ToString::to_string)
            .unwrap_or_default();
        line(format!("  {}{marker} ({}): {value}", field.label, field.name));
        if let Some(help) = &field.help_text {
            line(format!("      {help}"));
        }
        if !field.options.is_empty() {
            let options: Vec<&str> = field.options.iter().map(|option| option.label.as_str()).collect();
            line(format!("      choices: {}", options.join(", ")));
        }
    }
}

fn progress_bar(step: usize, total: usize) -> String {
    const WIDTH: usize = 20;
    let filled = WIDTH * step / total.max(1);
    format!(
        "[{}{}] {}%",
        "#".repeat(filled),
        "-".repeat(WIDTH - filled),
        100 * step / total.max(1)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwork_domain::FieldOption;

    fn choice(kind: FieldType) -> Field {
        let mut field = Field::new(kind, "Colour", "colour");
        field.options = vec![FieldOption::new("Red", "red"), FieldOption::new("Blue", "blue")];
        field
    }

    #[test]
    fn values_follow_the_field_type() {
        let number = Field::new(FieldType::Number, "Age", "age");
        assert_eq!(parse_value(&number, " 42 ").expect("number"), FieldValue::Number(42.0));
        assert!(parse_value(&number, "old").is_err());

        let checkbox = Field::new(FieldType::Checkbox, "Agree", "agree");
        assert_eq!(parse_value(&checkbox, "yes").expect("bool"), FieldValue::Bool(true));

        let text = Field::new(FieldType::Text, "Name", "name");
        assert_eq!(parse_value(&text, "Ada Lovelace").expect("text"), FieldValue::text("Ada Lovelace"));
    }

    #[test]
    fn choices_accept_labels_and_values() {
        let select = choice(FieldType::Select);
        assert_eq!(parse_value(&select, "Blue").expect("label"), FieldValue::text("blue"));
        assert_eq!(parse_value(&select, "red").expect("value"), FieldValue::text("red"));
        assert!(parse_value(&select, "green").is_err());

        let multi = choice(FieldType::Multiselect);
        assert_eq!(
            parse_value(&multi, "red, Blue").expect("list"),
            FieldValue::list(["red", "blue"])
        );
    }

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(progress_bar(1, 2), "[##########----------] 50%");
        assert_eq!(progress_bar(3, 3), "[####################] 100%");
    }
}
