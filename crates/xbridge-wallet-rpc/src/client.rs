//! Wallet RPC port and its real (HTTP) implementation.

use std::collections::HashMap;

use crate::error::WalletRpcError;
use crate::transport::Transport;
use crate::types::{SignedTransaction, TransactionInfo, Unspent};

/// The seven wallet RPC operations the swap engine and address-book sweep
/// rely on. Exists as a trait so handler code can be driven against
/// [`MockWalletRpc`](crate::mock::MockWalletRpc) in tests without a coin
/// daemon running.
pub trait WalletRpc {
    /// `listaccounts`: account name → balance.
    fn list_accounts(&self) -> Result<HashMap<String, f64>, WalletRpcError>;

    /// `getaddressesbyaccount`: every address registered under `account`.
    fn get_addresses_by_account(&self, account: &str) -> Result<Vec<String>, WalletRpcError>;

    /// `listunspent`: spendable outputs available for a pay-tx.
    fn list_unspent(&self) -> Result<Vec<Unspent>, WalletRpcError>;

    /// `getnewaddress`: mint a fresh receiving address, optionally under
    /// `account`.
    fn get_new_address(&self, account: Option<&str>) -> Result<String, WalletRpcError>;

    /// `signrawtransaction`: sign whichever inputs this wallet can sign.
    fn sign_raw_transaction(&self, raw_tx_hex: &str) -> Result<SignedTransaction, WalletRpcError>;

    /// `sendrawtransaction`: broadcast a fully signed transaction, returning
    /// its txid.
    fn send_raw_transaction(&self, raw_tx_hex: &str) -> Result<String, WalletRpcError>;

    /// `gettransaction`: look up confirmation status for a previously
    /// broadcast transaction.
    fn get_transaction(&self, txid: &str) -> Result<TransactionInfo, WalletRpcError>;
}

/// HTTP-backed `WalletRpc` for one wallet daemon endpoint.
pub struct WalletRpcClient {
    transport: Transport,
}

impl WalletRpcClient {
    /// Connect to `http://{rpc_ip}:{rpc_port}` with the given credentials.
    pub fn new(rpc_ip: &str, rpc_port: u16, rpc_user: &str, rpc_pass: &str) -> Self {
        Self {
            transport: Transport::new(rpc_ip, rpc_port, rpc_user, rpc_pass),
        }
    }
}

impl WalletRpc for WalletRpcClient {
    fn list_accounts(&self) -> Result<HashMap<String, f64>, WalletRpcError> {
        self.transport.call::<(), _>("listaccounts", &[])
    }

    fn get_addresses_by_account(&self, account: &str) -> Result<Vec<String>, WalletRpcError> {
        self.transport
            .call("getaddressesbyaccount", &[account.to_string()])
    }

    fn list_unspent(&self) -> Result<Vec<Unspent>, WalletRpcError> {
        self.transport.call::<(), _>("listunspent", &[])
    }

    fn get_new_address(&self, account: Option<&str>) -> Result<String, WalletRpcError> {
        match account {
            Some(account) => self.transport.call("getnewaddress", &[account.to_string()]),
            None => self.transport.call::<(), _>("getnewaddress", &[]),
        }
    }

    fn sign_raw_transaction(&self, raw_tx_hex: &str) -> Result<SignedTransaction, WalletRpcError> {
        self.transport
            .call("signrawtransaction", &[raw_tx_hex.to_string()])
    }

    fn send_raw_transaction(&self, raw_tx_hex: &str) -> Result<String, WalletRpcError> {
        self.transport
            .call("sendrawtransaction", &[raw_tx_hex.to_string()])
    }

    fn get_transaction(&self, txid: &str) -> Result<TransactionInfo, WalletRpcError> {
        self.transport.call("gettransaction", &[txid.to_string()])
    }
}
