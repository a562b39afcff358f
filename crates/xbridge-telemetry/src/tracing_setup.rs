//! Process-wide `tracing` subscriber setup.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::{TelemetryConfig, TelemetryError};

/// Held for the lifetime of the process. The subscriber itself has no
/// buffered state to flush, so dropping this does nothing but release
/// the binding.
pub struct TracingGuard {
    _private: (),
}

/// Install a global `tracing` subscriber built from `config`.
///
/// Uses `RUST_LOG`/`config.log_level` as an `EnvFilter`, and emits either
/// human-readable or JSON-formatted lines depending on `config.json_logs`.
pub fn init_tracing(config: &TelemetryConfig) -> Result<TracingGuard, TelemetryError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| TelemetryError::Config(e.to_string()))?;

    if config.json_logs {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer)
            .try_init()
            .map_err(|e| TelemetryError::TracerInit(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_ansi(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::TracerInit(e.to_string()))?;
    }

    tracing::info!(service = %config.service_name, "tracing initialized");

    Ok(TracingGuard { _private: () })
}

#[cfg(test)]
mod tests {
    // A global subscriber can only be installed once per process, so
    // init_tracing is exercised by the binaries that call it, not here.
}
