use crate::cli::core::{
    parse_position, require_arg, rest, CommandError, CommandResult, ShellContext,
};
use crate::cli::io;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "add-step",
            "Append an empty step",
            "add-step <title> [description...]",
            cmd_add_step,
        ),
        CommandEntry::new(
            "remove-step",
            "Remove a step (its fields stay on the form)",
            "remove-step <position>",
            cmd_remove_step,
        ),
        CommandEntry::new(
            "reorder-steps",
            "Put the steps in a new order",
            "reorder-steps <position> <position>...",
            cmd_reorder_steps,
        ),
        CommandEntry::new(
            "assign",
            "Move a field onto a step",
            "assign <field> <step>",
            cmd_assign,
        ),
    ]
}

fn cmd_add_step(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let title = require_arg(args, 0, "add-step <title> [description...]")?;
    context.open_form()?;
    context.store.add_form_step(title, rest(args, 1));
    let count = context.open_form()?.steps.len();
    io::print_success(format!("Added step {count}: `{title}`."));
    Ok(())
}

fn cmd_remove_step(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let index = parse_position(require_arg(args, 0, "remove-step <position>")?, "step")?;
    let form = context.open_form()?;
    let title = form
        .step(index)
        .map(|step| step.title.clone())
        .ok_or_else(|| CommandError::InvalidArguments(format!("No step at position {}.", index + 1)))?;
    if form.steps.len() == 1 {
        return Err(CommandError::Message("A form keeps at least one step.".into()));
    }
    context.store.remove_form_step(index);
    io::print_success(format!("Removed step `{title}`."));
    Ok(())
}

fn cmd_reorder_steps(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "reorder-steps <position> <position>...";
    require_arg(args, 0, usage)?;
    let order = args
        .iter()
        .map(|raw| parse_position(raw, "step"))
        .collect::<Result<Vec<_>, _>>()?;
    let count = context.open_form()?.steps.len();
    if let Some(bad) = order.iter().find(|index| **index >= count) {
        return Err(CommandError::InvalidArguments(format!(
            "No step at position {}.",
            bad + 1
        )));
    }
    context.store.reorder_form_steps(order);
    let titles: Vec<String> = context
        .open_form()?
        .steps
        .iter()
        .map(|step| step.title.clone())
        .collect();
    io::print_success(format!("Steps: {}.", titles.join(" > ")));
    if titles.len() < count {
        io::print_warning(format!(
            "{} step(s) were left out of the order and dropped.",
            count - titles.len()
        ));
    }
    Ok(())
}

fn cmd_assign(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "assign <field> <step>";
    let field_id = context.resolve_field(require_arg(args, 0, usage)?)?;
    let index = parse_position(require_arg(args, 1, usage)?, "step")?;
    let form = context.open_form()?;
    let step = form
        .step(index)
        .map(|step| step.title.clone())
        .ok_or_else(|| CommandError::InvalidArguments(format!("No step at position {}.", index + 1)))?;
    context.store.assign_field_to_step(field_id, index);
    io::print_success(format!("Field placed on `{step}`."));
    Ok(())
}
