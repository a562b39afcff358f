//! Response shapes for the seven wallet RPC calls this crate drives.
//!
//! Fields beyond the ones actually consumed are ignored by `serde` rather
//! than causing a deserialization failure, since coin daemons differ
//! slightly in which extra fields they attach to each response.

use serde::Deserialize;

/// One entry from `listunspent`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Unspent {
    /// Transaction id holding this output.
    pub txid: String,
    /// Output index within that transaction.
    pub vout: u32,
    /// Value of the output, in whole coin units (not satoshis).
    pub amount: f64,
    /// Owning address, when the daemon reports one.
    #[serde(default)]
    pub address: Option<String>,
    /// Number of confirmations, when the daemon reports one.
    #[serde(default)]
    pub confirmations: Option<i64>,
}

/// Result of `signrawtransaction`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SignedTransaction {
    /// Hex-encoded signed (or partially signed) transaction.
    pub hex: String,
    /// Whether every input has a complete signature.
    pub complete: bool,
}

/// Result of `gettransaction`, trimmed to the fields the swap engine
/// inspects to decide whether a pay/revert tx is confirmed.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TransactionInfo {
    /// Transaction id.
    pub txid: String,
    /// Number of confirmations (negative for a conflicted transaction).
    pub confirmations: i64,
    /// Raw hex, when the daemon includes it.
    #[serde(default)]
    pub hex: Option<String>,
}
