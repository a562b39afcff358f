//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for process-wide structured logging.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to every log line (`node`, `hub`, ...).
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error).
    pub log_level: String,

    /// Whether to emit JSON-formatted logs instead of human-readable ones.
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "xbridge".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `XBRIDGE_SERVICE_NAME`: service name (default: `xbridge`)
    /// - `XBRIDGE_LOG_LEVEL` or `RUST_LOG`: log level (default: `info`)
    /// - `XBRIDGE_JSON_LOGS`: emit JSON logs (default: `false`)
    pub fn from_env() -> Self {
        Self {
            service_name: env::var("XBRIDGE_SERVICE_NAME")
                .unwrap_or_else(|_| "xbridge".to_string()),

            log_level: env::var("XBRIDGE_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            json_logs: env::var("XBRIDGE_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),
        }
    }

    /// Create configuration for a named role (`hub`, `client`, ...).
    pub fn for_role(role: &str) -> Self {
        let mut config = Self::from_env();
        config.service_name = format!("xbridge-{role}");
        config
    }
}
