#![doc(test(attr(deny(warnings))))]

//! Formwork is a form builder: documents made of typed fields and steps,
//! field validation, drag-style reordering, and a step-by-step fill-out
//! flow, driven from an interactive shell.

pub mod cli;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    init_with_filter(None);
}

/// Initializes tracing with an extra filter directive, usually from the config file.
pub fn init_with_filter(extra: Option<&str>) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing_with(extra);
        tracing::info!("Formwork tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
