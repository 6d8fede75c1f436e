//! Shell errors, dispatch, and argument helpers shared by the commands.

use std::io;

use formwork_config::ConfigError;
use formwork_core::{CoreError, Route};
use formwork_domain::{Field, FormDocument};
use strsim::levenshtein;
use thiserror::Error;
use uuid::Uuid;

use super::io as cli_io;
pub use crate::cli::shell_context::{CliMode, ShellContext};

/// Errors that stop the shell itself.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Line editor error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

/// Errors raised by a single command. The shell reports them and keeps going.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("No form open. Use `new-form` or `open` first.")]
    FormNotOpen,
    #[error("No fill-out session. Use `fill` first.")]
    NotFilling,
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

impl ShellContext {
    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let mut suggestions: Vec<_> = self
            .registry
            .names()
            .map(|key| (levenshtein(key, input), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit shell?", true).map_err(CliError::from)
    }

    /// Asks before a destructive command. Script mode always proceeds.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, false)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(&message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::FormNotOpen => {
                cli_io::print_error(CommandError::FormNotOpen.to_string());
                cli_io::print_hint("Try `new-form \"Contact us\"` to get started.");
                Ok(())
            }
            other => {
                cli_io::print_error(other.to_string());
                Ok(())
            }
        }
    }

    /// The form open in the builder.
    pub(crate) fn open_form(&self) -> Result<&FormDocument, CommandError> {
        self.store.current_form().ok_or(CommandError::FormNotOpen)
    }

    /// Resolves a form by 1-based position in `forms`, by id prefix, or by a
    /// builder path or share link.
    pub(crate) fn resolve_form(&self, raw: &str) -> Result<Uuid, CommandError> {
        let forms = self.store.forms();
        if raw.contains('/') {
            let id = Route::from_link(raw)
                .and_then(|route| route.form_id())
                .ok_or_else(|| {
                    CommandError::InvalidArguments(format!("`{raw}` does not point at a form."))
                })?;
            return forms
                .iter()
                .find(|form| form.id == id)
                .map(|form| form.id)
                .ok_or_else(|| CommandError::InvalidArguments(format!("No form with id {id}.")));
        }
        if let Ok(position) = raw.parse::<usize>() {
            return position
                .checked_sub(1)
                .and_then(|index| forms.get(index))
                .map(|form| form.id)
                .ok_or_else(|| {
                    CommandError::InvalidArguments(format!("No form at position {position}."))
                });
        }
        unique_match(
            forms.iter().filter(|form| id_matches(form.id, raw)).map(|form| form.id),
            "form",
            raw,
        )
    }

    /// Resolves a field of the open form by name, 1-based position, or id prefix.
    pub(crate) fn resolve_field(&self, raw: &str) -> Result<Uuid, CommandError> {
        let form = self.open_form()?;
        resolve_field_in(form, raw)
    }
}

pub(crate) fn resolve_field_in(form: &FormDocument, raw: &str) -> Result<Uuid, CommandError> {
    if let Some(field) = form.field_by_name(raw) {
        return Ok(field.id);
    }
    if let Ok(position) = raw.parse::<usize>() {
        return position
            .checked_sub(1)
            .and_then(|index| form.fields.get(index))
            .map(|field| field.id)
            .ok_or_else(|| {
                CommandError::InvalidArguments(format!("No field at position {position}."))
            });
    }
    unique_match(
        form.fields
            .iter()
            .filter(|field| id_matches(field.id, raw))
            .map(|field| field.id),
        "field",
        raw,
    )
}

pub(crate) fn field_in<'a>(form: &'a FormDocument, id: Uuid) -> Result<&'a Field, CommandError> {
    form.field(id)
        .ok_or(CommandError::Core(CoreError::FieldNotFound(id)))
}

fn id_matches(id: Uuid, raw: &str) -> bool {
    raw.len() >= 4 && id.to_string().starts_with(&raw.to_ascii_lowercase())
}

fn unique_match(
    mut matches: impl Iterator<Item = Uuid>,
    what: &str,
    raw: &str,
) -> Result<Uuid, CommandError> {
    let first = matches
        .next()
        .ok_or_else(|| CommandError::InvalidArguments(format!("No {what} matches `{raw}`.")))?;
    if matches.next().is_some() {
        return Err(CommandError::InvalidArguments(format!(
            "`{raw}` matches more than one {what}; use a longer id."
        )));
    }
    Ok(first)
}

/// Parses a 1-based position into a 0-based index.
pub(crate) fn parse_position(raw: &str, what: &str) -> Result<usize, CommandError> {
    raw.parse::<usize>()
        .ok()
        .and_then(|position| position.checked_sub(1))
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!("`{raw}` is not a valid {what} position."))
        })
}

pub(crate) fn require_arg<'a>(
    args: &[&'a str],
    index: usize,
    usage: &str,
) -> Result<&'a str, CommandError> {
    args.get(index)
        .copied()
        .ok_or_else(|| CommandError::InvalidArguments(format!("Usage: {usage}")))
}

/// Joins the arguments from `start` into one optional string.
pub(crate) fn rest(args: &[&str], start: usize) -> Option<String> {
    let joined = args.get(start..)?.join(" ");
    (!joined.trim().is_empty()).then_some(joined)
}
