use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Stores user-configurable shell preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Directory holding the forms record. Defaults to `<data dir>/formwork`.
    pub data_dir: Option<PathBuf>,
    #[serde(default = "Config::default_share_base_url")]
    pub share_base_url: String,
    #[serde(default = "Config::default_device_value")]
    pub default_device: String,
    /// Extra tracing directive appended to the default filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_opened_form: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            share_base_url: Self::default_share_base_url(),
            default_device: Self::default_device_value(),
            log_filter: None,
            ui_color_enabled: Self::default_ui_color_enabled(),
            backup_retention: Self::default_backup_retention(),
            last_opened_form: None,
        }
    }
}

impl Config {
    pub fn default_share_base_url() -> String {
        "http://localhost:5173".into()
    }

    pub fn default_device_value() -> String {
        "desktop".into()
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn default_backup_retention() -> usize {
        5
    }

    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(path) = &self.data_dir {
            return path.clone();
        }

        let base = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join("formwork")
    }
}
