//! Tracing subscriber setup.
//!
//! In the browser, events go to the developer console through `tracing-web`
//! and panics are reported by `console_error_panic_hook`. Native builds (tests,
//! tools) log to stdout with the plain `fmt` subscriber.

#[cfg(test)]
#[path = "logging_test.rs"]
mod logging_test;

use tracing_subscriber::EnvFilter;

/// Install the global subscriber with `filter` (an `EnvFilter` directive such
/// as `"info"` or `"mapcanvas=debug"`). An unparsable filter falls back to `info`.
///
/// Returns `false` when a subscriber was already installed; the existing one
/// is kept.
#[must_use = "returns whether this call installed the subscriber"]
pub fn init_logging(filter: &str) -> bool {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let installed = install(filter);
    if installed {
        tracing::debug!("logging initialized");
    }
    installed
}

#[cfg(target_arch = "wasm32")]
fn install(filter: EnvFilter) -> bool {
    use tracing_subscriber::Layer;
    use tracing_subscriber::prelude::*;
    use tracing_web::MakeWebConsoleWriter;

    console_error_panic_hook::set_once();

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(MakeWebConsoleWriter::new())
        .with_filter(filter);
    tracing_subscriber::registry().with(fmt_layer).try_init().is_ok()
}

#[cfg(not(target_arch = "wasm32"))]
fn install(filter: EnvFilter) -> bool {
    tracing_subscriber::fmt().with_env_filter(filter).try_init().is_ok()
}

