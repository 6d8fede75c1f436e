use std::{env, path::PathBuf};

use dialoguer::theme::ColorfulTheme;
use formwork_config::{Config, ConfigManager};
use formwork_core::{DragCoordinator, FormStore, StepNavigator, SystemClock};
use formwork_domain::DevicePreview;
use formwork_storage_json::JsonFormStorage;
use tracing::{info, warn};
use uuid::Uuid;

use crate::cli::commands;
use crate::cli::core::{CliError, CommandError, CommandResult};
use crate::cli::io as cli_io;
use crate::cli::output::{self, OutputPreferences};
use crate::cli::registry::{CommandEntry, CommandRegistry};

/// Base directory override; config lives in `<home>/config`, forms in `<home>/data`.
pub const HOME_VAR: &str = "FORMWORK_HOME";
/// When set, commands are read line by line from stdin.
pub const SCRIPT_VAR: &str = "FORMWORK_CLI_SCRIPT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// An in-progress fill-out of one form.
#[derive(Debug, Clone)]
pub struct FillSession {
    pub form_id: Uuid,
    pub navigator: StepNavigator,
}

pub struct ShellContext {
    pub(crate) mode: CliMode,
    pub(crate) registry: CommandRegistry,
    pub(crate) store: FormStore,
    pub(crate) storage: JsonFormStorage,
    pub(crate) config_manager: ConfigManager,
    pub(crate) config: Config,
    pub(crate) theme: ColorfulTheme,
    pub(crate) drag: DragCoordinator,
    pub(crate) fill: Option<FillSession>,
    pub(crate) running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let base = base_dir();
        let config_manager = ConfigManager::with_base_dir(base.clone())?;
        let config = config_manager.load()?;
        output::set_preferences(OutputPreferences {
            color_enabled: config.ui_color_enabled && mode == CliMode::Interactive,
            quiet_mode: false,
        });

        let data_dir = data_dir(&base, &config);
        let storage = JsonFormStorage::with_retention(data_dir, config.backup_retention)?;
        let store = FormStore::open(Box::new(storage.clone()), Box::new(SystemClock));
        info!(root = %storage.root().display(), "shell storage ready");

        let mut context = ShellContext {
            mode,
            registry,
            store,
            storage,
            config_manager,
            config,
            theme: ColorfulTheme::default(),
            drag: DragCoordinator::new(),
            fill: None,
            running: true,
        };
        context.apply_default_device();
        context.auto_open_last();
        Ok(context)
    }

    fn apply_default_device(&mut self) {
        match DevicePreview::parse(&self.config.default_device) {
            Some(device) => self.store.set_device_preview(device),
            None => warn!(device = %self.config.default_device, "unknown default device"),
        }
    }

    fn auto_open_last(&mut self) {
        if self.mode != CliMode::Interactive {
            return;
        }
        let Some(id) = self
            .config
            .last_opened_form
            .as_deref()
            .and_then(|raw| Uuid::parse_str(raw).ok())
        else {
            return;
        };
        if let Some(form) = self.store.form(id) {
            let title = form.title.clone();
            self.store.load_form(id);
            cli_io::print_success(format!("Automatically opened last form `{title}`."));
        }
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager
            .save(&self.config)
            .map_err(CommandError::from)
    }

    /// Records the form to reopen on the next interactive start.
    pub(crate) fn remember_form(&mut self, id: Option<Uuid>) -> CommandResult {
        self.config.last_opened_form = id.map(|id| id.to_string());
        self.persist_config()
    }

    /// Rebuilds the store from disk, e.g. after a backup restore.
    pub(crate) fn reopen_store(&mut self) {
        let device = self.store.state().device_preview;
        self.store = FormStore::open(Box::new(self.storage.clone()), Box::new(SystemClock));
        self.store.set_device_preview(device);
        self.fill = None;
        self.drag.cancel();
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn prompt(&self) -> String {
        if let Some(session) = &self.fill {
            if let Some(form) = self.store.form(session.form_id) {
                let (step, total) = session.navigator.progress(form);
                return format!("formwork [{} {step}/{total}]> ", form.title);
            }
        }
        match self.store.current_form() {
            Some(form) => format!("formwork [{}]> ", form.title),
            None => "formwork> ".to_string(),
        }
    }
}

/// `FORMWORK_HOME`, or `<config dir>/formwork`.
pub fn base_dir() -> PathBuf {
    if let Some(home) = env::var_os(HOME_VAR) {
        return PathBuf::from(home);
    }
    dirs::config_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("formwork")
}

fn data_dir(base: &std::path::Path, config: &Config) -> PathBuf {
    if config.data_dir.is_none() && env::var_os(HOME_VAR).is_some() {
        return base.join("data");
    }
    config.resolve_data_dir()
}
