//! Completed fill-out payloads.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value::FieldValue;

/// Values captured by a completed fill-out flow, keyed by field name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSubmission {
    pub id: Uuid,
    pub form_id: Uuid,
    pub data: BTreeMap<String, FieldValue>,
    pub submitted_at: DateTime<Utc>,
}
