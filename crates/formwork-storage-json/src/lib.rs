use std::{
    cmp::Reverse,
    collections::BTreeMap,
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};
use formwork_core::{storage::FormStorage, CoreError};
use formwork_domain::FormDocument;
use uuid::Uuid;

/// File name of the record holding every form document.
pub const FORMS_FILE_NAME: &str = "formBuilder.forms.json";

const BACKUP_EXTENSION: &str = "json";
const BACKUP_PREFIX: &str = "forms";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";
pub const DEFAULT_RETENTION: usize = 5;

pub type FormMap = BTreeMap<Uuid, FormDocument>;

/// Filesystem-backed JSON persistence for the document mapping and its backups.
#[derive(Debug, Clone)]
pub struct JsonFormStorage {
    root: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

/// Describes a backup file of the forms record.
#[derive(Debug, Clone, PartialEq)]
pub struct FormBackupInfo {
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub size_bytes: u64,
    pub path: PathBuf,
}

impl JsonFormStorage {
    pub fn new(root: PathBuf) -> Result<Self, CoreError> {
        Self::with_retention(root, DEFAULT_RETENTION)
    }

    pub fn with_retention(root: PathBuf, retention: usize) -> Result<Self, CoreError> {
        let backups_dir = root.join("backups");
        fs::create_dir_all(&root)?;
        fs::create_dir_all(&backups_dir)?;
        Ok(Self {
            root,
            backups_dir,
            retention: retention.max(1),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn forms_path(&self) -> PathBuf {
        self.root.join(FORMS_FILE_NAME)
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    /// Writes the current record to a new backup file.
    pub fn backup(&self, note: Option<&str>) -> Result<FormBackupInfo, CoreError> {
        let forms = self.load_forms()?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let mut stem = format!("{BACKUP_PREFIX}_{timestamp}");
        if let Some(label) = sanitize_backup_note(note) {
            stem.push('_');
            stem.push_str(&label);
        }
        let file_name = format!("{stem}.{BACKUP_EXTENSION}");
        let path = self.backups_dir.join(&file_name);
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &serialize_forms(&forms)?)?;
        fs::rename(&tmp, &path)?;
        self.prune_backups()?;
        tracing::info!(backup = %file_name, "forms backup written");
        Ok(FormBackupInfo {
            created_at: parse_backup_timestamp(&file_name),
            size_bytes: file_size(&path),
            id: file_name,
            path,
        })
    }

    /// Backups, newest first.
    pub fn list_backups(&self) -> Result<Vec<FormBackupInfo>, CoreError> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(FormBackupInfo {
                    id: file_name.to_string(),
                    created_at: parse_backup_timestamp(file_name),
                    size_bytes: file_size(&path),
                    path: path.clone(),
                });
            }
        }
        entries.sort_by(|a, b| {
            Reverse(a.created_at)
                .cmp(&Reverse(b.created_at))
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(entries)
    }

    /// Replaces the record with the named backup and returns its contents.
    pub fn restore_backup(&self, backup_id: &str) -> Result<FormMap, CoreError> {
        let path = self.backups_dir.join(backup_id);
        if backup_id.contains(['/', '\\']) || !path.is_file() {
            return Err(CoreError::Storage(format!("backup `{backup_id}` not found")));
        }
        let forms = load_forms_from_path(&path)?;
        self.backup_existing_record()?;
        save_forms_to_path(&forms, &self.forms_path())?;
        tracing::info!(backup = %backup_id, count = forms.len(), "forms restored from backup");
        Ok(forms)
    }

    fn backup_existing_record(&self) -> Result<(), CoreError> {
        let path = self.forms_path();
        if !path.exists() {
            return Ok(());
        }
        fs::create_dir_all(&self.backups_dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let file_name = format!("{BACKUP_PREFIX}_{timestamp}.{BACKUP_EXTENSION}");
        fs::copy(&path, self.backups_dir.join(file_name))?;
        self.prune_backups()
    }

    fn prune_backups(&self) -> Result<(), CoreError> {
        for entry in self.list_backups()?.into_iter().skip(self.retention) {
            let _ = fs::remove_file(entry.path);
        }
        Ok(())
    }
}

impl FormStorage for JsonFormStorage {
    fn load_forms(&self) -> Result<FormMap, CoreError> {
        load_forms_from_path(&self.forms_path())
    }

    /// The backup of the previous record is best effort; the new record is
    /// written even when it fails.
    fn save_forms(&self, forms: &FormMap) -> Result<(), CoreError> {
        if let Err(err) = self.backup_existing_record() {
            tracing::warn!(error = %err, "could not back up the previous forms record");
        }
        save_forms_to_path(forms, &self.forms_path())
    }
}

/// Loads a mapping from `path`; a missing file is an empty mapping.
pub fn load_forms_from_path(path: &Path) -> Result<FormMap, CoreError> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(FormMap::new()),
        Err(err) => return Err(err.into()),
    };
    if data.trim().is_empty() {
        return Ok(FormMap::new());
    }
    serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))
}

/// Writes a mapping to `path` through a temporary file and a rename.
pub fn save_forms_to_path(forms: &FormMap, path: &Path) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    write_atomic(&tmp, &serialize_forms(forms)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.' | '_'))
            && !sanitized.is_empty()
            && !last_dash
        {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let rest = name.strip_prefix(&format!("{BACKUP_PREFIX}_"))?;
    let (date, tail) = rest.split_once('_')?;
    let time: String = tail.chars().take_while(char::is_ascii_digit).collect();
    // Older backups were named to the minute.
    let format = match time.len() {
        6 => "%Y%m%d%H%M%S",
        4 => "%Y%m%d%H%M",
        _ => return None,
    };
    if !is_digits(date, 8) {
        return None;
    }
    NaiveDateTime::parse_from_str(&format!("{date}{time}"), format)
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn file_size(path: &Path) -> u64 {
    fs::metadata(path).map(|meta| meta.len()).unwrap_or(0)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

fn serialize_forms(forms: &FormMap) -> Result<String, CoreError> {
    serde_json::to_string_pretty(forms).map_err(|err| CoreError::Serde(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_timestamps_survive_notes() {
        let parsed = parse_backup_timestamp("forms_20240501_0930_before-import.json")
            .expect("timestamp");
        assert_eq!(parsed.format("%Y-%m-%d %H:%M").to_string(), "2024-05-01 09:30");
        let parsed = parse_backup_timestamp("forms_20240501_093015.json").expect("seconds");
        assert_eq!(parsed.format("%H:%M:%S").to_string(), "09:30:15");
        assert!(parse_backup_timestamp("forms_20240501_09301.json").is_none());
        assert!(parse_backup_timestamp("forms_2024.json").is_none());
        assert!(parse_backup_timestamp("other_20240501_0930.json").is_none());
    }

    #[test]
    fn notes_are_slugged() {
        assert_eq!(
            sanitize_backup_note(Some("  Before Big Import! ")).as_deref(),
            Some("before-big-import")
        );
        assert_eq!(sanitize_backup_note(Some("!!!")), None);
        assert_eq!(sanitize_backup_note(None), None);
    }
}
