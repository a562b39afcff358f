//! # XBridge Telemetry
//!
//! Structured logging shared by every XBridge process (node, hub, client
//! tooling). Each binary calls [`init_telemetry`] once at startup and holds
//! the returned guard for the process lifetime.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use xbridge_telemetry::{TelemetryConfig, init_telemetry};
//!
//! fn main() {
//!     let config = TelemetryConfig::for_role("hub");
//!     let _guard = init_telemetry(config).expect("failed to init telemetry");
//!     // application code
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `XBRIDGE_SERVICE_NAME` | `xbridge` | Service name attached to every log line |
//! | `XBRIDGE_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `XBRIDGE_JSON_LOGS` | `false` | Emit JSON instead of human-readable lines |

#![warn(missing_docs)]

mod config;
mod logging;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::TracingGuard;

use thiserror::Error;

/// Telemetry initialization errors.
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The `tracing` subscriber failed to install, usually because one was
    /// already set for this process.
    #[error("failed to initialize tracing subscriber: {0}")]
    TracerInit(String),

    /// The configured log level filter could not be parsed.
    #[error("invalid telemetry configuration: {0}")]
    Config(String),
}

/// Initialize process-wide structured logging.
///
/// Returns a guard that should be held for the lifetime of the
/// application; dropping it early does not disable logging, since nothing
/// here buffers output, but keeping it alive documents intent at the call
/// site.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let tracing_guard = tracing_setup::init_tracing(&config)?;

    Ok(TelemetryGuard {
        _tracing: tracing_guard,
    })
}

/// Guard that keeps telemetry active. Drop at process shutdown.
pub struct TelemetryGuard {
    _tracing: TracingGuard,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("telemetry shutting down");
    }
}

/// Convenience macro for creating a span tagged with a role.
///
/// # Example
///
/// ```rust,ignore
/// use xbridge_telemetry::subsystem_span;
///
/// fn handle_join() {
///     let _span = subsystem_span!("handle_join", role = "hub", hub_id = %id);
///     // ... handler logic
/// }
/// ```
#[macro_export]
macro_rules! subsystem_span {
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}
