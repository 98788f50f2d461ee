//! Diagnostic logging.
//!
//! stdout carries the progress lines and frequency table a user reads; the
//! annotation file carries the results. Everything emitted through `tracing`
//! (skipped problems, unreadable traces, malformed trace lines) goes to
//! stderr, so piping stdout never mixes in diagnostics.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset or unparsable.
const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber. Call once, before any command runs.
///
/// `RUST_LOG=annotator=debug` shows per-problem trace loading and skipped
/// trace lines.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}
