use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::Mutex,
};

use formwork_domain::FormDocument;
use uuid::Uuid;

use crate::CoreError;

/// Abstraction over persistence backends holding the whole document mapping.
pub trait FormStorage: Send + Sync {
    fn load_forms(&self) -> Result<BTreeMap<Uuid, FormDocument>, CoreError>;
    fn save_forms(&self, forms: &BTreeMap<Uuid, FormDocument>) -> Result<(), CoreError>;
}

/// Keeps the mapping in memory; used by tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryFormStorage {
    forms: Mutex<BTreeMap<Uuid, FormDocument>>,
}

impl MemoryFormStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_forms(forms: BTreeMap<Uuid, FormDocument>) -> Self {
        Self {
            forms: Mutex::new(forms),
        }
    }
}

impl FormStorage for MemoryFormStorage {
    fn load_forms(&self) -> Result<BTreeMap<Uuid, FormDocument>, CoreError> {
        self.forms
            .lock()
            .map(|forms| forms.clone())
            .map_err(|_| CoreError::Storage("memory storage lock poisoned".into()))
    }

    fn save_forms(&self, forms: &BTreeMap<Uuid, FormDocument>) -> Result<(), CoreError> {
        let mut guard = self
            .forms
            .lock()
            .map_err(|_| CoreError::Storage("memory storage lock poisoned".into()))?;
        *guard = forms.clone();
        Ok(())
    }
}

/// Detects referential drift within a document snapshot. Nothing is repaired.
pub fn document_warnings(form: &FormDocument) -> Vec<String> {
    let field_ids: HashSet<_> = form.fields.iter().map(|field| field.id).collect();
    let mut warnings = Vec::new();

    for step in &form.steps {
        for id in &step.fields {
            if !field_ids.contains(id) {
                warnings.push(format!(
                    "step '{}' references missing field {}",
                    step.title, id
                ));
            }
        }
    }

    let mut names: HashMap<&str, usize> = HashMap::new();
    for field in &form.fields {
        *names.entry(field.name.as_str()).or_default() += 1;
    }
    let mut duplicated: Vec<_> = names.into_iter().filter(|(_, count)| *count > 1).collect();
    duplicated.sort();
    for (name, count) in duplicated {
        warnings.push(format!("field name '{name}' is used by {count} fields"));
    }

    for field in &form.fields {
        let mut kinds = HashSet::new();
        for rule in &field.validation_rules {
            if !kinds.insert(rule.kind) {
                warnings.push(format!(
                    "field '{}' has more than one {} rule",
                    field.name, rule.kind
                ));
            }
        }
    }

    let placed: HashSet<_> = form.steps.iter().flat_map(|step| step.fields.iter()).collect();
    for field in &form.fields {
        if !placed.contains(&field.id) {
            warnings.push(format!("field '{}' is not placed on any step", field.name));
        }
    }

    warnings
}
