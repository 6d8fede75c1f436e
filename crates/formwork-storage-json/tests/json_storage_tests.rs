use std::fs;

use chrono::Utc;
use formwork_core::{storage::FormStorage, FormStore, SystemClock};
use formwork_domain::{FieldType, FormDocument, NewField};
use formwork_storage_json::{FormMap, JsonFormStorage, FORMS_FILE_NAME};
use tempfile::tempdir;
use uuid::Uuid;

fn sample_forms() -> FormMap {
    let mut form = FormDocument::new(Uuid::new_v4(), "Stored", None, Uuid::new_v4(), Utc::now());
    let field = NewField::new(FieldType::Email, "Email", "email").into_field(Uuid::new_v4());
    form.steps[0].fields.push(field.id);
    form.fields.push(field);
    let mut forms = FormMap::new();
    forms.insert(form.id, form);
    forms
}

#[test]
fn missing_record_loads_as_empty_mapping() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonFormStorage::new(dir.path().to_path_buf()).expect("create storage");
    assert!(storage.load_forms().expect("load").is_empty());
    assert!(!storage.forms_path().exists());
}

#[test]
fn saves_whole_mapping_under_well_known_name() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonFormStorage::new(dir.path().to_path_buf()).expect("create storage");
    let forms = sample_forms();

    storage.save_forms(&forms).expect("save");
    let path = dir.path().join(FORMS_FILE_NAME);
    assert_eq!(storage.forms_path(), path);

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).expect("read record")).expect("json");
    let (id, form) = forms.iter().next().expect("one form");
    assert_eq!(raw[id.to_string()]["title"], "Stored");
    assert_eq!(raw[id.to_string()]["fields"][0]["type"], "email");
    assert!(raw.get("version").is_none());

    assert_eq!(storage.load_forms().expect("load")[id], *form);
}

#[test]
fn overwriting_the_record_keeps_a_backup() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonFormStorage::new(dir.path().to_path_buf()).expect("create storage");
    storage.save_forms(&sample_forms()).expect("first save");
    assert!(storage.list_backups().expect("list").is_empty());

    storage.save_forms(&FormMap::new()).expect("second save");
    let backups = storage.list_backups().expect("list");
    assert_eq!(backups.len(), 1);
    assert!(backups[0].id.starts_with("forms_"));
}

#[test]
fn backups_can_be_listed_and_restored() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonFormStorage::new(dir.path().to_path_buf()).expect("create storage");
    let forms = sample_forms();
    storage.save_forms(&forms).expect("save");

    let info = storage.backup(Some("Before cleanup")).expect("backup");
    assert!(info.id.ends_with("_before-cleanup.json"));
    assert!(info.created_at.is_some());
    assert!(storage
        .list_backups()
        .expect("list")
        .iter()
        .any(|entry| entry.id == info.id));

    fs::write(storage.forms_path(), "{}").expect("clobber record");
    assert!(storage.load_forms().expect("load").is_empty());

    let restored = storage.restore_backup(&info.id).expect("restore");
    assert_eq!(restored, forms);
    assert_eq!(storage.load_forms().expect("load"), forms);
    assert!(storage.restore_backup("missing.json").is_err());
    assert!(storage.restore_backup("../formBuilder.forms.json").is_err());
}

#[test]
fn retention_limits_backup_count() {
    let dir = tempdir().expect("tempdir");
    let storage =
        JsonFormStorage::with_retention(dir.path().to_path_buf(), 2).expect("create storage");
    storage.save_forms(&sample_forms()).expect("save");
    for note in ["one", "two", "three", "four"] {
        storage.backup(Some(note)).expect("backup");
    }
    assert_eq!(storage.list_backups().expect("list").len(), 2);
}

#[test]
fn corrupt_record_is_a_serde_error_and_store_starts_empty() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonFormStorage::new(dir.path().to_path_buf()).expect("create storage");
    fs::write(storage.forms_path(), "{ not json").expect("write garbage");
    assert!(matches!(
        storage.load_forms(),
        Err(formwork_core::CoreError::Serde(_))
    ));

    let store = FormStore::open(Box::new(storage), Box::new(SystemClock));
    assert!(store.forms().is_empty());
}

#[test]
fn store_round_trips_through_the_file() {
    let dir = tempdir().expect("tempdir");
    let open = || {
        let storage = JsonFormStorage::new(dir.path().to_path_buf()).expect("create storage");
        FormStore::open(Box::new(storage), Box::new(SystemClock))
    };

    let mut store = open();
    let id = store.create_form("Round trip", Some("kept".into()));
    store.add_default_field(FieldType::Radio);
    drop(store);

    let store = open();
    let form = store.form(id).expect("persisted form");
    assert_eq!(form.description.as_deref(), Some("kept"));
    assert_eq!(form.fields[0].options.len(), 3);
    assert_eq!(form.steps[0].fields, vec![form.fields[0].id]);
}

#[test]
fn save_still_writes_when_backups_dir_is_gone() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonFormStorage::new(dir.path().to_path_buf()).expect("create storage");
    storage.save_forms(&sample_forms()).expect("first save");
    fs::remove_dir_all(storage.backups_dir()).expect("remove backups dir");

    let mut forms = sample_forms();
    forms.extend(sample_forms());
    storage.save_forms(&forms).expect("second save");

    assert_eq!(storage.load_forms().expect("load").len(), 2);
    assert_eq!(storage.list_backups().expect("list").len(), 1);
}

#[test]
fn save_still_writes_when_backup_copy_fails() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonFormStorage::new(dir.path().to_path_buf()).expect("create storage");
    storage.save_forms(&sample_forms()).expect("first save");
    // A plain file where the backups directory should be makes every copy fail.
    fs::remove_dir_all(storage.backups_dir()).expect("remove backups dir");
    fs::write(storage.backups_dir(), "not a directory").expect("block backups dir");

    storage.save_forms(&FormMap::new()).expect("second save");
    assert!(storage.load_forms().expect("load").is_empty());
}

#[test]
fn backups_taken_in_the_same_minute_are_kept_apart() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonFormStorage::new(dir.path().to_path_buf()).expect("create storage");
    storage.save_forms(&sample_forms()).expect("first save");
    storage.save_forms(&FormMap::new()).expect("second save");
    std::thread::sleep(std::time::Duration::from_millis(1100));
    storage.save_forms(&sample_forms()).expect("third save");

    let backups = storage.list_backups().expect("list");
    assert_eq!(backups.len(), 2);
    assert_ne!(backups[0].id, backups[1].id);
}
