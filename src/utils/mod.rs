pub mod build_info;

use std::sync::Once;

use tracing_subscriber::{filter::Directive, fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVE: &str = "formwork=info";

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    init_tracing_with(None);
}

/// Like [`init_tracing`], adding `extra` (e.g. `formwork_core=debug`) when it parses.
pub fn init_tracing_with(extra: Option<&str>) {
    TRACING_INIT.call_once(|| {
        let mut filter = EnvFilter::from_default_env();
        for raw in std::iter::once(DEFAULT_DIRECTIVE).chain(extra) {
            match raw.parse::<Directive>() {
                Ok(directive) => filter = filter.add_directive(directive),
                Err(err) => eprintln!("ignoring log filter `{raw}`: {err}"),
            }
        }

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}
