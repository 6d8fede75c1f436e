use crate::cli::io;
use crate::cli::output::{line, section as output_section};
use crate::cli::registry::{CommandEntry, CommandRegistry};

pub fn print_overview(registry: &CommandRegistry) {
    output_section("Available commands");
    for (title, entries) in registry.groups() {
        if entries.is_empty() {
            continue;
        }
        line(format!("{title}:"));
        for entry in entries {
            line(format!("  {:<16} {}", entry.name, entry.description));
        }
    }
    io::print_info("Use `help <command>` for details.");
}

pub fn print_command(entry: &CommandEntry) {
    output_section(format!("Help: {}", entry.name));
    line(format!("  Description: {}", entry.description));
    line(format!("  Usage: {}", entry.usage));
}
