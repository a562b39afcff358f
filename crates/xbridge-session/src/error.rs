//! Session-layer error taxonomy.

use thiserror::Error;
use xbridge_types::Hash256;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The packet failed to frame or the body didn't match its declared
    /// command code.
    #[error("packet decode failed: {0}")]
    Decode(#[from] xbridge_types::PacketError),

    /// A handler's call into the swap engine failed.
    #[error("swap engine error: {0}")]
    Swap(#[from] xbridge_swap::SwapError),

    /// A client-side command referenced a hub id this session never
    /// registered (no preceding `xbcTransactionInit`).
    #[error("unknown swap leg: {0}")]
    UnknownSwap(UnknownSwapId),
}

/// Wraps a `Hash256` purely so `SessionError` can derive a hex `Display`
/// without `thiserror` needing to format a bare byte array.
#[derive(Debug, Clone, Copy)]
pub struct UnknownSwapId(pub Hash256);

impl std::fmt::Display for UnknownSwapId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl From<Hash256> for UnknownSwapId {
    fn from(hash: Hash256) -> Self {
        Self(hash)
    }
}
