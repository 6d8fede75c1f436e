use crate::cli::core::{require_arg, rest, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{line, section};
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "backup",
        "Back up, list, or restore the saved forms",
        "backup [note...] | backup list | backup restore <name>",
        cmd_backup,
    )]
}

fn cmd_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().copied() {
        Some("list") => list_backups(context),
        Some("restore") => {
            let name = require_arg(args, 1, "backup restore <name>")?;
            restore_backup(context, name)
        }
        _ => {
            let note = rest(args, 0);
            let info = context.storage.backup(note.as_deref())?;
            io::print_success(format!("Backup written: {}", info.id));
            Ok(())
        }
    }
}

fn list_backups(context: &ShellContext) -> CommandResult {
    let backups = context.storage.list_backups()?;
    if backups.is_empty() {
        io::print_info("No backups yet.");
        return Ok(());
    }
    section("Backups");
    for (index, backup) in backups.iter().enumerate() {
        let created = backup
            .created_at
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "unknown".into());
        line(format!(
            "  {:>2}. {}  {}  {} bytes",
            index + 1,
            backup.id,
            created,
            backup.size_bytes
        ));
    }
    Ok(())
}

fn restore_backup(context: &mut ShellContext, name: &str) -> CommandResult {
    // Accept a 1-based position from `backup list` as well as the file name.
    let id = match name.parse::<usize>() {
        Ok(position) => position
            .checked_sub(1)
            .and_then(|index| context.storage.list_backups().ok()?.into_iter().nth(index))
            .map(|backup| backup.id)
            .ok_or_else(|| {
                CommandError::InvalidArguments(format!("No backup at position {position}."))
            })?,
        Err(_) => name.to_string(),
    };
    if !context.confirm(&format!("Replace all forms with backup `{id}`?"))? {
        io::print_info("Restore cancelled.");
        return Ok(());
    }
    let forms = context.storage.restore_backup(&id)?;
    context.reopen_store();
    io::print_success(format!("Restored {} form(s) from `{id}`.", forms.len()));
    Ok(())
}
