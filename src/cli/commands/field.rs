use formwork_core::{
    editor::{add_option, remove_option, update_option},
    palette::{default_name, palette_entries},
    DragSource, DropTarget,
};
use formwork_domain::{Field, FieldOption, FieldPatch, FieldType};

use crate::cli::commands::fill::parse_value;
use crate::cli::commands::form::parse_switch;
use crate::cli::core::{
    field_in, parse_position, require_arg, rest, CommandError, CommandResult, ShellContext,
};
use crate::cli::io;
use crate::cli::output::{line, section};
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "add-field",
            "Drop a field from the palette onto the open form",
            "add-field <type> [label...]",
            cmd_add_field,
        ),
        CommandEntry::new(
            "edit-field",
            "Change a property of a field",
            "edit-field <field> <label|name|placeholder|help|default|required|hidden|read-only|type> [value...]",
            cmd_edit_field,
        ),
        CommandEntry::new(
            "remove-field",
            "Remove a field and its step placements",
            "remove-field <field>",
            cmd_remove_field,
        ),
        CommandEntry::new(
            "select",
            "Select a field in the builder",
            "select <field|none>",
            cmd_select,
        ),
        CommandEntry::new(
            "move-field",
            "Drag a field to a new position",
            "move-field <field> <position>",
            cmd_move_field,
        ),
        CommandEntry::new(
            "add-option",
            "Add an option to a choice field",
            "add-option <field> <label> [value]",
            cmd_add_option,
        ),
        CommandEntry::new(
            "edit-option",
            "Rename an option and optionally change its value",
            "edit-option <field> <option> <label> [value]",
            cmd_edit_option,
        ),
        CommandEntry::new(
            "remove-option",
            "Remove an option by label, value, or position",
            "remove-option <field> <option>",
            cmd_remove_option,
        ),
    ]
}

fn parse_field_type(raw: &str) -> Result<FieldType, CommandError> {
    FieldType::parse(raw).ok_or_else(|| {
        let known: Vec<&str> = FieldType::ALL.iter().map(|kind| kind.as_str()).collect();
        CommandError::InvalidArguments(format!(
            "Unknown field type `{raw}`. Known types: {}.",
            known.join(", ")
        ))
    })
}

fn cmd_add_field(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "add-field <type> [label...]";
    let Some(raw) = args.first() else {
        section("Palette");
        for entry in palette_entries() {
            line(format!(
                "  {:<12} {:<14} {}",
                entry.kind.as_str(),
                entry.label,
                entry.description
            ));
        }
        io::print_hint(format!("Usage: {usage}"));
        return Ok(());
    };
    let kind = parse_field_type(raw)?;
    let order = context.open_form()?.field_ids();

    context.drag.start(DragSource::Palette(kind));
    context.drag.hover(DropTarget::DropZone);
    let intent = context
        .drag
        .release(&order)
        .ok_or_else(|| CommandError::Message("Nothing was dropped.".into()))?;
    let id = context
        .store
        .apply_drop(intent)?
        .ok_or_else(|| CommandError::Message("The drop did not add a field.".into()))?;

    if let Some(label) = rest(args, 1) {
        context.store.update_field(
            id,
            FieldPatch {
                name: Some(default_name(&label)),
                placeholder: Some(Some(format!("Enter {}", label.to_lowercase()))),
                label: Some(label),
                ..FieldPatch::default()
            },
        );
    }

    let field = field_in(context.open_form()?, id)?;
    io::print_success(format!(
        "Added {} field `{}` (name `{}`).",
        field.kind, field.label, field.name
    ));
    Ok(())
}

fn cmd_edit_field(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "edit-field <field> <property> [value...]";
    let id = context.resolve_field(require_arg(args, 0, usage)?)?;
    let property = require_arg(args, 1, usage)?;
    let value = rest(args, 2);
    let field = field_in(context.open_form()?, id)?;

    let required_value = |value: Option<String>| {
        value.ok_or_else(|| CommandError::InvalidArguments(format!("Usage: {usage}")))
    };
    let patch = match property {
        "label" => FieldPatch {
            label: Some(required_value(value)?),
            ..FieldPatch::default()
        },
        "name" => FieldPatch {
            name: Some(required_value(value)?),
            ..FieldPatch::default()
        },
        "placeholder" => FieldPatch {
            placeholder: Some(value),
            ..FieldPatch::default()
        },
        "help" => FieldPatch {
            help_text: Some(value),
            ..FieldPatch::default()
        },
        "default" => FieldPatch {
            default_value: Some(
                value
                    .map(|raw| parse_value(field, &raw))
                    .transpose()?,
            ),
            ..FieldPatch::default()
        },
        "required" => FieldPatch {
            is_required: Some(parse_switch(value.as_deref())?),
            ..FieldPatch::default()
        },
        "hidden" => FieldPatch {
            is_hidden: Some(parse_switch(value.as_deref())?),
            ..FieldPatch::default()
        },
        "read-only" => FieldPatch {
            is_read_only: Some(parse_switch(value.as_deref())?),
            ..FieldPatch::default()
        },
        "type" => FieldPatch {
            kind: Some(parse_field_type(&required_value(value)?)?),
            ..FieldPatch::default()
        },
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "Unknown field property `{other}`."
            )))
        }
    };
    let label = field.label.clone();
    context.store.update_field(id, patch);
    io::print_success(format!("Updated {property} of `{label}`."));
    Ok(())
}

fn cmd_remove_field(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = context.resolve_field(require_arg(args, 0, "remove-field <field>")?)?;
    let label = field_in(context.open_form()?, id)?.label.clone();
    context.store.remove_field(id);
    io::print_success(format!("Removed `{label}`."));
    Ok(())
}

fn cmd_select(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = require_arg(args, 0, "select <field|none>")?;
    if raw.eq_ignore_ascii_case("none") {
        context.store.select_field(None);
        io::print_info("Selection cleared.");
        return Ok(());
    }
    let id = context.resolve_field(raw)?;
    context.store.select_field(Some(id));
    if let Some(field) = context.store.state().selected_field() {
        io::print_success(format!("Selected `{}`.", field.label));
    }
    Ok(())
}

fn cmd_move_field(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "move-field <field> <position>";
    let field_id = context.resolve_field(require_arg(args, 0, usage)?)?;
    let to = parse_position(require_arg(args, 1, usage)?, "field")?;
    let order = context.open_form()?.field_ids();

    context.drag.start(DragSource::Field(field_id));
    match order.get(to) {
        Some(slot) => context.drag.hover(DropTarget::FieldSlot(*slot)),
        None => context.drag.hover(DropTarget::DropZone),
    }
    match context.drag.release(&order) {
        Some(intent) => {
            context.store.apply_drop(intent)?;
            io::print_success(format!("Moved field to position {}.", to.min(order.len() - 1) + 1));
        }
        None => io::print_info("Field is already at that position."),
    }
    Ok(())
}

fn cmd_add_option(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "add-option <field> <label> [value]";
    let id = context.resolve_field(require_arg(args, 0, usage)?)?;
    let label = require_arg(args, 1, usage)?;
    let value = args
        .get(2)
        .map(|value| value.to_string())
        .unwrap_or_else(|| default_name(label));
    let field = field_in(context.open_form()?, id)?;
    if !field.kind.is_choice() {
        return Err(CommandError::InvalidArguments(format!(
            "{} fields do not take options.",
            field.kind
        )));
    }
    let patch = add_option(field, label, &value).ok_or_else(|| {
        CommandError::InvalidArguments("Options need a label and a value.".into())
    })?;
    context.store.update_field(id, patch);
    io::print_success(format!("Added option `{label}` = `{value}`."));
    Ok(())
}

fn find_option<'a>(field: &'a Field, raw: &str) -> Result<&'a FieldOption, CommandError> {
    field
        .options
        .iter()
        .find(|option| option.label == raw || option.value == raw)
        .or_else(|| {
            parse_position(raw, "option")
                .ok()
                .and_then(|index| field.options.get(index))
        })
        .ok_or_else(|| CommandError::InvalidArguments(format!("No option matches `{raw}`.")))
}

fn cmd_edit_option(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "edit-option <field> <option> <label> [value]";
    let id = context.resolve_field(require_arg(args, 0, usage)?)?;
    let raw = require_arg(args, 1, usage)?;
    let label = require_arg(args, 2, usage)?;
    if label.is_empty() || args.get(3).is_some_and(|value| value.is_empty()) {
        return Err(CommandError::InvalidArguments(
            "Options need a label and a value.".into(),
        ));
    }
    let field = field_in(context.open_form()?, id)?;
    let option = find_option(field, raw)?;
    let patch = update_option(
        field,
        option.id,
        Some(label.to_string()),
        args.get(3).map(|value| value.to_string()),
    )
    .ok_or_else(|| CommandError::InvalidArguments(format!("No option matches `{raw}`.")))?;
    context.store.update_field(id, patch);
    io::print_success(format!("Updated option `{label}`."));
    Ok(())
}

fn cmd_remove_option(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "remove-option <field> <option>";
    let id = context.resolve_field(require_arg(args, 0, usage)?)?;
    let raw = require_arg(args, 1, usage)?;
    let field = field_in(context.open_form()?, id)?;
    let option = find_option(field, raw)?;
    let label = option.label.clone();
    let patch = remove_option(field, option.id);
    context.store.update_field(id, patch);
    io::print_success(format!("Removed option `{label}`."));
    Ok(())
}
