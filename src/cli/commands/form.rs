use formwork_domain::{Displayable, FormDocument, FormPatch, FormSettings};

use crate::cli::core::{require_arg, rest, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{line, section};
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("forms", "List saved forms", "forms", cmd_forms),
        CommandEntry::new(
            "new-form",
            "Create a form and open it in the builder",
            "new-form <title> [description...]",
            cmd_new_form,
        ),
        CommandEntry::new("open", "Open a form in the builder", "open <form>", cmd_open),
        CommandEntry::new(
            "delete-form",
            "Delete a form",
            "delete-form <form>",
            cmd_delete_form,
        ),
        CommandEntry::new(
            "duplicate-form",
            "Copy a form's title and description into a new form",
            "duplicate-form <form>",
            cmd_duplicate_form,
        ),
        CommandEntry::new(
            "edit-form",
            "Change a property of the open form",
            "edit-form <title|description|submit-url|success-message|error-message|progress-bar|allow-save|redirect-url> [value...]",
            cmd_edit_form,
        ),
        CommandEntry::new("show", "Show the open form", "show", cmd_show),
    ]
}

fn cmd_forms(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let forms = context.store.forms();
    if forms.is_empty() {
        io::print_info("No forms yet. Use `new-form <title>` to create one.");
        return Ok(());
    }
    let current = context.store.state().current_form_id;
    section("Forms");
    for (index, form) in forms.iter().enumerate() {
        let marker = if current == Some(form.id) { "*" } else { " " };
        line(format!(
            "{marker} {:>2}. {}  [{}]",
            index + 1,
            form.display_label(),
            short_id(&form.id.to_string())
        ));
    }
    Ok(())
}

fn cmd_new_form(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let title = require_arg(args, 0, "new-form <title> [description...]")?;
    if title.trim().is_empty() {
        return Err(CommandError::InvalidArguments("A form needs a title.".into()));
    }
    let id = context.store.create_form(title, rest(args, 1));
    context.fill = None;
    context.remember_form(Some(id))?;
    io::print_success(format!("Created form `{title}` ({id})."));
    Ok(())
}

fn cmd_open(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = context.resolve_form(require_arg(args, 0, "open <form>")?)?;
    context.store.load_form(id);
    context.fill = None;
    context.remember_form(Some(id))?;
    let form = context.open_form()?;
    io::print_success(format!("Opened `{}`.", form.title));
    Ok(())
}

fn cmd_delete_form(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = context.resolve_form(require_arg(args, 0, "delete-form <form>")?)?;
    let title = context
        .store
        .form(id)
        .map(|form| form.title.clone())
        .unwrap_or_default();
    if !context.confirm(&format!("Delete form `{title}`?"))? {
        io::print_info("Delete cancelled.");
        return Ok(());
    }
    context.store.delete_form(id);
    if context.fill.as_ref().is_some_and(|session| session.form_id == id) {
        context.fill = None;
    }
    if context.config.last_opened_form == Some(id.to_string()) {
        context.remember_form(None)?;
    }
    io::print_success(format!("Deleted form `{title}`."));
    Ok(())
}

fn cmd_duplicate_form(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = context.resolve_form(require_arg(args, 0, "duplicate-form <form>")?)?;
    let copy = context
        .store
        .duplicate_form(id)
        .ok_or_else(|| CommandError::Message(format!("Form {id} not found.")))?;
    context.remember_form(Some(copy))?;
    let form = context.open_form()?;
    io::print_success(format!("Created `{}` ({copy}).", form.title));
    Ok(())
}

fn cmd_edit_form(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "edit-form <property> [value...]";
    let property = require_arg(args, 0, usage)?;
    let value = rest(args, 1);
    let settings = context.open_form()?.settings.clone();

    let patch = match property {
        "title" => FormPatch {
            title: Some(value.ok_or_else(|| {
                CommandError::InvalidArguments("A form needs a title.".into())
            })?),
            ..FormPatch::default()
        },
        "description" => FormPatch {
            description: Some(value),
            ..FormPatch::default()
        },
        "submit-url" => FormPatch {
            submit_url: Some(value),
            ..FormPatch::default()
        },
        "success-message" => FormPatch {
            success_message: Some(value),
            ..FormPatch::default()
        },
        "error-message" => FormPatch {
            error_message: Some(value),
            ..FormPatch::default()
        },
        "progress-bar" | "allow-save" | "redirect-url" => FormPatch {
            settings: Some(Some(edit_settings(
                settings.unwrap_or_default(),
                property,
                value,
            )?)),
            ..FormPatch::default()
        },
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "Unknown form property `{other}`. Usage: {usage}"
            )))
        }
    };
    context.store.update_form(patch);
    io::print_success(format!("Updated {property}."));
    Ok(())
}

fn edit_settings(
    mut settings: FormSettings,
    property: &str,
    value: Option<String>,
) -> Result<FormSettings, CommandError> {
    match property {
        "progress-bar" => settings.show_progress_bar = Some(parse_switch(value.as_deref())?),
        "allow-save" => settings.allow_save = Some(parse_switch(value.as_deref())?),
        _ => settings.redirect_url = value,
    }
    Ok(settings)
}

/// `on`/`off` style flag. A missing value means on.
pub(crate) fn parse_switch(raw: Option<&str>) -> Result<bool, CommandError> {
    match raw.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
        None | Some("on" | "yes" | "true" | "1") => Ok(true),
        Some("off" | "no" | "false" | "0") => Ok(false),
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "`{other}` is not on/off."
        ))),
    }
}

fn cmd_show(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let form = context.open_form()?;
    let selected = context.store.state().selected_field_id;
    render_form(form, selected);
    line(format!("  Preview: {}", context.store.state().device_preview));
    Ok(())
}

pub(crate) fn render_form(form: &FormDocument, selected: Option<uuid::Uuid>) {
    section(&form.title);
    if let Some(description) = &form.description {
        line(format!("  {description}"));
    }
    line(format!("  Id: {}", form.id));
    line(format!(
        "  Updated: {}",
        form.updated_at.format("%Y-%m-%d %H:%M:%S")
    ));

    line("  Fields:");
    if form.fields.is_empty() {
        line("    (none)");
    }
    for (index, field) in form.fields.iter().enumerate() {
        let marker = if selected == Some(field.id) { ">" } else { " " };
        let mut flags = Vec::new();
        if field.is_required {
            flags.push("required".to_string());
        }
        if field.is_hidden {
            flags.push("hidden".to_string());
        }
        if field.is_read_only {
            flags.push("read-only".to_string());
        }
        flags.extend(
            field
                .validation_rules
                .iter()
                .map(|rule| rule.kind.as_str().to_string()),
        );
        let flags = if flags.is_empty() {
            String::new()
        } else {
            format!("  ({})", flags.join(", "))
        };
        line(format!(
            "  {marker}{:>2}. {} [{}] name={}{flags}",
            index + 1,
            field.label,
            field.kind,
            field.name
        ));
        if !field.options.is_empty() {
            let options: Vec<String> = field
                .options
                .iter()
                .map(|option| format!("{}={}", option.label, option.value))
                .collect();
            line(format!("       options: {}", options.join(", ")));
        }
    }

    line("  Steps:");
    for (index, step) in form.steps.iter().enumerate() {
        let names: Vec<&str> = step
            .fields
            .iter()
            .filter_map(|id| form.field(*id))
            .map(|field| field.name.as_str())
            .collect();
        line(format!(
            "    {}. {} [{}]",
            index + 1,
            step.title,
            names.join(", ")
        ));
    }
}

pub(crate) fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switches_accept_common_spellings() {
        assert!(parse_switch(None).expect("default on"));
        assert!(parse_switch(Some("YES")).expect("yes"));
        assert!(!parse_switch(Some("off")).expect("off"));
        assert!(parse_switch(Some("maybe")).is_err());
    }

    #[test]
    fn settings_edits_keep_other_flags() {
        let settings = FormSettings {
            allow_save: Some(true),
            ..FormSettings::default()
        };
        let edited = edit_settings(settings, "progress-bar", Some("off".into())).expect("edit");
        assert_eq!(edited.show_progress_bar, Some(false));
        assert_eq!(edited.allow_save, Some(true));
    }
}
