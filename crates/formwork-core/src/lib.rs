//! formwork-core
//!
//! Builder logic for Formwork: validation, the command reducer and store,
//! drag handling, step navigation, and property-editor helpers.
//! Depends on formwork-domain. No CLI, no terminal I/O, no file access.

pub mod command;
pub mod drag;
pub mod editor;
pub mod error;
pub mod navigator;
pub mod palette;
pub mod reducer;
pub mod routes;
pub mod state;
pub mod storage;
pub mod store;
pub mod templates;
pub mod time;
pub mod validation;

pub use command::FormCommand;
pub use drag::{move_in_order, DragCoordinator, DragSource, DragState, DropIntent, DropTarget};
pub use error::CoreError;
pub use navigator::{visible_fields, StepNavigator};
pub use reducer::reduce;
pub use routes::{share_link, Route};
pub use state::BuilderState;
pub use storage::{document_warnings, FormStorage, MemoryFormStorage};
pub use store::FormStore;
pub use time::{Clock, SteppingClock, SystemClock};
pub use validation::validate;
