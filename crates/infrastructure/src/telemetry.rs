//! Tracing initialization for hosts and integration tests

use thiserror::Error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Error type for telemetry initialization
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Failed to initialize tracing subscriber
    #[error("Failed to initialize tracing: {0}")]
    Init(String),
}

/// Install a console subscriber honoring `RUST_LOG`
///
/// `default_filter` applies when `RUST_LOG` is unset, e.g. `"chaos=info"`.
/// Initialization is global and can only happen once per process.
///
/// # Errors
///
/// Returns `TelemetryError::Init` when a global subscriber is already
/// installed.
pub fn init_tracing(default_filter: &str) -> Result<(), TelemetryError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| TelemetryError::Init(e.to_string()))
}
