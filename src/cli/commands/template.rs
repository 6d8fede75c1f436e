use formwork_domain::Displayable;

use crate::cli::core::{require_arg, rest, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{line, section};
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "templates",
            "List built-in and saved templates",
            "templates",
            cmd_templates,
        ),
        CommandEntry::new(
            "use-template",
            "Replace the open form's fields and steps with a template",
            "use-template <template-id>",
            cmd_use_template,
        ),
        CommandEntry::new(
            "save-template",
            "Save the open form's fields and steps as a template",
            "save-template <name> [description...]",
            cmd_save_template,
        ),
    ]
}

fn cmd_templates(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    section("Templates");
    for template in context.store.templates() {
        let steps = template.supplied_steps().map_or(0, <[_]>::len);
        line(format!(
            "  {:<16} {} ({} fields, {} steps)",
            template.id,
            template.display_label(),
            template.fields.len(),
            steps
        ));
    }
    Ok(())
}

fn cmd_use_template(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = require_arg(args, 0, "use-template <template-id>")?;
    let template = context
        .store
        .template(id)
        .ok_or_else(|| CommandError::InvalidArguments(format!("Unknown template `{id}`.")))?;
    let form = context.open_form()?;
    if !form.fields.is_empty()
        && !context.confirm(&format!(
            "Replace the {} field(s) of `{}`?",
            form.fields.len(),
            form.title
        ))?
    {
        io::print_info("Template not applied.");
        return Ok(());
    }
    let name = template.name.clone();
    context.store.load_template(template);
    context.fill = None;
    io::print_success(format!("Applied template `{name}`."));
    Ok(())
}

fn cmd_save_template(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = require_arg(args, 0, "save-template <name> [description...]")?;
    context.open_form()?;
    let template = context.store.save_as_template(name, rest(args, 1))?;
    io::print_success(format!(
        "Saved template `{}` as `{}`.",
        template.name, template.id
    ));
    Ok(())
}
