/*!
 * Tracing Setup
 * Subscriber installation for the tracing crate
 *
 * Every scheduling event is emitted as a structured `tracing` event; this
 * module only decides where they go.
 */

use tracing::info;
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Set to `1` or `true` for JSON lines instead of human-readable output
pub const ENV_TRACE_JSON: &str = "RAS_TRACE_JSON";

/// Initialize the global subscriber
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - RAS_TRACE_JSON: Enable JSON output (default: false)
///
/// Calling it twice is harmless; the second subscriber is dropped.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let use_json = std::env::var(ENV_TRACE_JSON)
        .map(|v| json_enabled(&v))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .compact(),
            )
            .try_init()
    };

    if installed.is_ok() {
        info!(json = use_json, "tracing initialized");
    }
}

fn json_enabled(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}
