//! Wallet RPC error taxonomy.

use thiserror::Error;

/// Errors raised while talking to a coin daemon's JSON-RPC interface.
#[derive(Debug, Error)]
pub enum WalletRpcError {
    /// The underlying HTTP request failed (connection refused, timeout,
    /// TLS error, ...). Treated as `NetworkTransient` by callers.
    #[error("wallet RPC transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The daemon returned a JSON-RPC error object.
    #[error("wallet RPC error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code as returned by the daemon.
        code: i64,
        /// Human-readable error message as returned by the daemon.
        message: String,
    },

    /// The response body could not be parsed as JSON, or was missing the
    /// expected `result` field.
    #[error("malformed wallet RPC response: {0}")]
    Malformed(String),

    /// The daemon reported the wallet holds insufficient funds for a
    /// requested transaction.
    #[error("insufficient funds for requested transaction")]
    InsufficientFunds,
}

impl From<serde_json::Error> for WalletRpcError {
    fn from(e: serde_json::Error) -> Self {
        WalletRpcError::Malformed(e.to_string())
    }
}
