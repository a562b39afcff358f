//! Node-level error taxonomy: everything below `main` that can fail in a
//! way the caller needs to branch on rather than just log and continue.

use thiserror::Error;

use crate::container::ConfigError;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("dht error: {0}")]
    Dht(#[from] xbridge_dht::DhtError),

    #[error("wallet rpc error attaching '{wallet}': {source}")]
    WalletAttach {
        wallet: String,
        #[source]
        source: xbridge_wallet_rpc::WalletRpcError,
    },

    #[error("address '{0}' is not valid base58check")]
    BadWalletAddress(String),
}
