pub mod commands;
pub mod core;
pub mod help;
pub mod io;
pub mod output;
pub mod registry;
pub mod shell;
pub mod shell_context;

use formwork_config::ConfigManager;

pub use shell::run_cli;

/// The `log_filter` stored in the shell configuration, if any.
///
/// Read before tracing is installed, so failures are silent.
pub fn configured_log_filter() -> Option<String> {
    ConfigManager::with_base_dir(shell_context::base_dir())
        .ok()?
        .load()
        .ok()?
        .log_filter
}
