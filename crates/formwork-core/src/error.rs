use std::io;

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("No form selected")]
    FormNotSelected,
    #[error("Form not found: {0}")]
    FormNotFound(Uuid),
    #[error("Field not found: {0}")]
    FieldNotFound(Uuid),
    #[error("Step not found at position {0}")]
    StepNotFound(usize),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("Storage error: {0}")]
    Storage(String),
}
