//! Swap-engine error taxonomy.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SwapError {
    /// Wallet RPC call failed or returned a malformed result.
    #[error("wallet rpc failure: {0}")]
    RpcFailure(#[from] xbridge_wallet_rpc::WalletRpcError),

    /// `listunspent` couldn't cover `amount + fee`.
    #[error("insufficient funds: need {need}, have {have}")]
    InsufficientFunds { need: u64, have: u64 },

    /// A state transition was attempted from a state that doesn't match
    /// the expected predecessor.
    #[error("invalid transition: {from:?} does not precede the requested advance")]
    StateViolation { from: String },

    /// `nLockTime` on a transaction the counterparty produced was below
    /// `LOCKTIME_THRESHOLD`, so it isn't a UNIX timestamp.
    #[error("locktime {0} is not a unix timestamp (below threshold)")]
    LockTimeRejected(u32),

    /// The wallet only partially signed a transaction it was asked to sign.
    #[error("wallet left {0} unsigned")]
    SignIncomplete(&'static str),

    /// A peer address used as a transaction output could not be decoded.
    #[error("bad address: {0}")]
    BadAddress(#[from] xbridge_crypto::Base58CheckError),
}
