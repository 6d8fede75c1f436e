use std::collections::HashMap;

use crate::cli::core::CommandResult;
use crate::cli::shell_context::ShellContext;

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// One shell command: its name, help text and handler.
pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }
}

/// Commands listed together under one heading in `help`.
struct CommandGroup {
    title: &'static str,
    members: Vec<&'static str>,
}

/// Name lookup plus the heading each command is shown under.
///
/// A name registered twice keeps its first heading; the later entry replaces
/// the handler.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandEntry>,
    groups: Vec<CommandGroup>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_group(&mut self, title: &'static str, entries: Vec<CommandEntry>) {
        let position = match self.groups.iter().position(|group| group.title == title) {
            Some(position) => position,
            None => {
                self.groups.push(CommandGroup {
                    title,
                    members: Vec::new(),
                });
                self.groups.len() - 1
            }
        };
        for entry in entries {
            let name = entry.name;
            if self.commands.insert(name, entry).is_none() {
                self.groups[position].members.push(name);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.commands.get(name)
    }

    /// Headings in registration order, each with its commands.
    pub fn groups(&self) -> impl Iterator<Item = (&'static str, Vec<&CommandEntry>)> + '_ {
        self.groups.iter().map(|group| {
            let entries = group
                .members
                .iter()
                .filter_map(|name| self.commands.get(name))
                .collect();
            (group.title, entries)
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.groups
            .iter()
            .flat_map(|group| group.members.iter().copied())
    }

    pub fn handler(&self, name: &str) -> Option<CommandHandler> {
        self.commands.get(name).map(|entry| entry.handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::core::CommandError;

    fn noop(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
        Ok(())
    }

    fn exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
        Err(CommandError::ExitRequested)
    }

    #[test]
    fn groups_keep_registration_order() {
        let mut registry = CommandRegistry::new();
        registry.register_group(
            "Forms",
            vec![
                CommandEntry::new("forms", "List forms", "forms", noop),
                CommandEntry::new("open", "Open a form", "open <form>", noop),
            ],
        );
        registry.register_group(
            "System",
            vec![CommandEntry::new("exit", "Exit", "exit", exit)],
        );
        registry.register_group(
            "Forms",
            vec![CommandEntry::new("show", "Show the form", "show", noop)],
        );

        let headings: Vec<(&str, Vec<&str>)> = registry
            .groups()
            .map(|(title, entries)| (title, entries.iter().map(|entry| entry.name).collect()))
            .collect();
        assert_eq!(
            headings,
            vec![
                ("Forms", vec!["forms", "open", "show"]),
                ("System", vec!["exit"]),
            ]
        );
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec!["forms", "open", "show", "exit"]
        );
    }

    #[test]
    fn re_registering_a_name_replaces_the_entry_in_place() {
        let mut registry = CommandRegistry::new();
        registry.register_group(
            "System",
            vec![CommandEntry::new("exit", "Exit", "exit", noop)],
        );
        registry.register_group(
            "Other",
            vec![CommandEntry::new("exit", "Leave the shell", "exit", exit)],
        );

        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["exit"]);
        assert_eq!(
            registry.get("exit").map(|entry| entry.description),
            Some("Leave the shell")
        );
        let (title, entries) = registry.groups().nth(1).expect("second heading");
        assert_eq!(title, "Other");
        assert!(entries.is_empty());
        assert!(registry.handler("missing").is_none());
    }
}
