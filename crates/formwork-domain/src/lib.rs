//! formwork-domain
//!
//! Pure form-builder models (FormDocument, Field, Step, ValidationRule, templates, etc.).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod common;
pub mod device;
pub mod field;
pub mod form;
pub mod rule;
pub mod submission;
pub mod template;
pub mod value;

pub use common::*;
pub use device::*;
pub use field::*;
pub use form::*;
pub use rule::*;
pub use submission::*;
pub use template::*;
pub use value::*;
