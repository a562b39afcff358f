//! In-memory `WalletRpc` test double.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::client::WalletRpc;
use crate::error::WalletRpcError;
use crate::types::{SignedTransaction, TransactionInfo, Unspent};

/// Drives handler code through the `WalletRpc` port without a live coin
/// daemon. Every call either returns canned data or `should_fail`'s
/// configured error.
pub struct MockWalletRpc {
    /// account name -> addresses
    pub accounts: Mutex<HashMap<String, Vec<String>>>,
    /// spendable outputs to hand back from `list_unspent`
    pub unspent: Mutex<Vec<Unspent>>,
    /// txids considered broadcast, with their reported confirmation count
    pub confirmations: Mutex<HashMap<String, i64>>,
    /// when true, every call returns a canned RPC error
    pub should_fail: bool,
}

impl Default for MockWalletRpc {
    fn default() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            unspent: Mutex::new(Vec::new()),
            confirmations: Mutex::new(HashMap::new()),
            should_fail: false,
        }
    }
}

impl MockWalletRpc {
    fn fail<T>() -> Result<T, WalletRpcError> {
        Err(WalletRpcError::Rpc {
            code: -1,
            message: "mock wallet configured to fail".into(),
        })
    }
}

impl WalletRpc for MockWalletRpc {
    fn list_accounts(&self) -> Result<HashMap<String, f64>, WalletRpcError> {
        if self.should_fail {
            return Self::fail();
        }
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .keys()
            .map(|name| (name.clone(), 0.0))
            .collect())
    }

    fn get_addresses_by_account(&self, account: &str) -> Result<Vec<String>, WalletRpcError> {
        if self.should_fail {
            return Self::fail();
        }
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .get(account)
            .cloned()
            .unwrap_or_default())
    }

    fn list_unspent(&self) -> Result<Vec<Unspent>, WalletRpcError> {
        if self.should_fail {
            return Self::fail();
        }
        Ok(self.unspent.lock().unwrap().clone())
    }

    fn get_new_address(&self, account: Option<&str>) -> Result<String, WalletRpcError> {
        if self.should_fail {
            return Self::fail();
        }
        let mut accounts = self.accounts.lock().unwrap();
        let key = account.unwrap_or("").to_string();
        let addresses = accounts.entry(key.clone()).or_default();
        // Deterministic but distinct hash160 per mint, base58check-encoded
        // like a real wallet daemon would return.
        let seed = format!("{key}-{}", addresses.len());
        let hash160 = xbridge_crypto::hash160(seed.as_bytes());
        let address = xbridge_crypto::base58check::encode(0x00, &hash160);
        addresses.push(address.clone());
        Ok(address)
    }

    fn sign_raw_transaction(&self, raw_tx_hex: &str) -> Result<SignedTransaction, WalletRpcError> {
        if self.should_fail {
            return Self::fail();
        }
        Ok(SignedTransaction {
            hex: raw_tx_hex.to_string(),
            complete: true,
        })
    }

    fn send_raw_transaction(&self, raw_tx_hex: &str) -> Result<String, WalletRpcError> {
        if self.should_fail {
            return Self::fail();
        }
        let txid = hex::encode(xbridge_crypto::sha256d(raw_tx_hex.as_bytes()));
        self.confirmations.lock().unwrap().insert(txid.clone(), 0);
        Ok(txid)
    }

    fn get_transaction(&self, txid: &str) -> Result<TransactionInfo, WalletRpcError> {
        if self.should_fail {
            return Self::fail();
        }
        let confirmations = *self
            .confirmations
            .lock()
            .unwrap()
            .get(txid)
            .ok_or_else(|| WalletRpcError::Malformed("unknown txid".into()))?;
        Ok(TransactionInfo {
            txid: txid.to_string(),
            confirmations,
            hex: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_new_address_is_deterministic_per_account() {
        let wallet = MockWalletRpc::default();
        let a = wallet.get_new_address(Some("default")).unwrap();
        let b = wallet.get_new_address(Some("default")).unwrap();
        assert_ne!(a, b);
        assert_eq!(
            wallet.get_addresses_by_account("default").unwrap(),
            vec![a, b]
        );
    }

    #[test]
    fn should_fail_propagates_to_every_call() {
        let wallet = MockWalletRpc {
            should_fail: true,
            ..Default::default()
        };
        assert!(wallet.list_unspent().is_err());
        assert!(wallet.get_new_address(None).is_err());
    }

    #[test]
    fn send_then_get_transaction_round_trips() {
        let wallet = MockWalletRpc::default();
        let txid = wallet.send_raw_transaction("deadbeef").unwrap();
        let info = wallet.get_transaction(&txid).unwrap();
        assert_eq!(info.txid, txid);
        assert_eq!(info.confirmations, 0);
    }
}
