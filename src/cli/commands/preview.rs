use std::collections::BTreeMap;

use formwork_core::{
    document_warnings, share_link,
    validation::{validate, validate_values},
};
use formwork_domain::{DevicePreview, FieldValue};

use crate::cli::commands::fill::parse_value;
use crate::cli::core::{field_in, rest, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::line;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "device",
            "Show or set the preview device",
            "device [desktop|tablet|mobile]",
            cmd_device,
        ),
        CommandEntry::new(
            "share",
            "Print the fill-out link of a form",
            "share [form]",
            cmd_share,
        ),
        CommandEntry::new(
            "validate",
            "Check a value against a field's rules",
            "validate <field> [value...]",
            cmd_validate,
        ),
        CommandEntry::new(
            "warnings",
            "List structural problems of the open form",
            "warnings",
            cmd_warnings,
        ),
    ]
}

fn describe(device: DevicePreview) -> String {
    match device.viewport_width() {
        Some(width) => format!("{device} ({width}px)"),
        None => format!("{device} (full width)"),
    }
}

fn cmd_device(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(raw) = args.first() else {
        io::print_info(format!(
            "Preview device: {}",
            describe(context.store.state().device_preview)
        ));
        return Ok(());
    };
    let device = DevicePreview::parse(raw).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "Unknown device `{raw}`. Use desktop, tablet, or mobile."
        ))
    })?;
    context.store.set_device_preview(device);
    io::print_success(format!("Preview device: {}", describe(device)));
    Ok(())
}

fn cmd_share(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = match args.first() {
        Some(raw) => context.resolve_form(raw)?,
        None => context.open_form()?.id,
    };
    let link = share_link(&context.config.share_base_url, id)?;
    line(link);
    Ok(())
}

fn cmd_validate(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "validate <field> [value...]";
    let form = context.open_form()?;
    let Some(raw_field) = args.first() else {
        return Err(CommandError::InvalidArguments(format!("Usage: {usage}")));
    };

    // `validate --defaults` checks every field against its default value.
    if *raw_field == "--defaults" {
        let defaults: BTreeMap<String, FieldValue> = form
            .fields
            .iter()
            .filter_map(|field| Some((field.name.clone(), field.default_value.clone()?)))
            .collect();
        let errors = validate_values(&form.fields, &defaults);
        if errors.is_empty() {
            io::print_success("All defaults pass their rules.");
        }
        for (name, messages) in errors {
            io::print_warning(format!("{name}: {}", messages.join("; ")));
        }
        return Ok(());
    }

    let field_id = context.resolve_field(raw_field)?;
    let field = field_in(form, field_id)?;
    let value = rest(args, 1)
        .map(|raw| parse_value(field, &raw))
        .transpose()?;
    let messages = validate(field, value.as_ref());
    if messages.is_empty() {
        io::print_success(format!("`{}` is valid.", field.label));
    }
    for message in messages {
        io::print_warning(message);
    }
    Ok(())
}

fn cmd_warnings(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let warnings = document_warnings(context.open_form()?);
    if warnings.is_empty() {
        io::print_success("No problems found.");
    }
    for warning in warnings {
        io::print_warning(warning);
    }
    Ok(())
}
