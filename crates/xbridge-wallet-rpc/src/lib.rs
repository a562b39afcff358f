//! # XBridge Wallet RPC
//!
//! Blocking JSON-RPC client for the coin-daemon wallets each swap leg
//! settles against. Exposes exactly the seven calls the swap engine and
//! address-book sweep issue: `listaccounts`, `getaddressesbyaccount`,
//! `listunspent`, `getnewaddress`, `signrawtransaction`,
//! `sendrawtransaction`, `gettransaction`.

mod client;
mod error;
mod transport;
mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use client::{WalletRpc, WalletRpcClient};
pub use error::WalletRpcError;
pub use types::{SignedTransaction, TransactionInfo, Unspent};

#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockWalletRpc;
