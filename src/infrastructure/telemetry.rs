//! Structured logging setup for the binary.
//!
//! Verbosity comes from `RUST_LOG`; without it the crate logs at info and
//! everything else at warn. The library itself only emits `tracing` events
//! and never installs a subscriber.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "warn,eventcluster=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Compact human-readable logs on stderr.
pub fn init_telemetry() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true)
                .compact(),
        )
        .init();
}

/// JSON logs on stderr, for log aggregation.
pub fn init_telemetry_json() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(std::io::stderr).json())
        .init();
}
