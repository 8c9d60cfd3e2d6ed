//! Structured logging configuration.
//!
//! Log output goes to stderr so command results on stdout stay clean. Records
//! emitted by the library through the `log` facade are bridged into the same
//! subscriber.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset
const DEFAULT_FILTER: &str = "warn,swiss_tournament=info,swiss_cli=info,sqlx=warn";

/// Initialize structured logging
///
/// Log levels are configurable via the `RUST_LOG` env var.
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::debug!("Structured logging initialized");
}

/// Log a finished command with its duration
///
/// # Arguments
///
/// * `command` - Command name
/// * `duration_ms` - Duration in milliseconds
/// * `succeeded` - Whether the command completed without error
pub fn log_command(command: &str, duration_ms: u64, succeeded: bool) {
    if !succeeded {
        tracing::warn!(command = command, duration_ms = duration_ms, "Command failed");
    } else if duration_ms > 1000 {
        tracing::warn!(
            command = command,
            duration_ms = duration_ms,
            "PERFORMANCE: Slow command"
        );
    } else {
        tracing::info!(command = command, duration_ms = duration_ms, "Command completed");
    }
}
