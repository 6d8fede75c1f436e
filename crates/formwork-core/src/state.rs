use std::collections::BTreeMap;

use formwork_domain::{DevicePreview, Field, FormDocument};
use uuid::Uuid;

/// Application state owned by the composition root.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuilderState {
    pub forms: BTreeMap<Uuid, FormDocument>,
    pub current_form_id: Option<Uuid>,
    pub selected_field_id: Option<Uuid>,
    pub device_preview: DevicePreview,
}

impl BuilderState {
    pub fn with_forms(forms: BTreeMap<Uuid, FormDocument>) -> Self {
        Self {
            forms,
            ..Self::default()
        }
    }

    /// The selected document, or `None` when nothing is selected or the
    /// selected id has no document behind it.
    pub fn current_form(&self) -> Option<&FormDocument> {
        self.current_form_id.and_then(|id| self.forms.get(&id))
    }

    pub fn current_form_mut(&mut self) -> Option<&mut FormDocument> {
        let id = self.current_form_id?;
        self.forms.get_mut(&id)
    }

    pub fn selected_field(&self) -> Option<&Field> {
        let id = self.selected_field_id?;
        self.current_form()?.field(id)
    }
}
