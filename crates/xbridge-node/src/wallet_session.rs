//! One attached wallet daemon: its RPC client, the per-leg builder state
//! keyed by hub id, and the startup/timer-tick address poll that keeps
//! the address book current.

use std::collections::HashMap;

use parking_lot::Mutex;

use xbridge_swap::{TransactionDescr, WalletParams};
use xbridge_types::{Address, Command, Currency, Hash256};
use xbridge_wallet_rpc::{WalletRpc, WalletRpcClient};

use crate::container::app_core::ApplicationCore;
use crate::container::config::WalletConfig;
use crate::error::NodeError;

/// A wallet daemon attached to this node: RPC client plus the open
/// client-side legs it's currently building transactions for.
pub struct AttachedWallet {
    pub currency: Currency,
    pub address: Address,
    pub client: WalletRpcClient,
    pub params: WalletParams,
    pub legs: Mutex<HashMap<Hash256, TransactionDescr>>,
}

impl AttachedWallet {
    pub fn connect(config: &WalletConfig) -> Result<Self, NodeError> {
        let (_, hash160) = xbridge_crypto::base58check::decode(&config.address)
            .map_err(|_| NodeError::BadWalletAddress(config.address.clone()))?;
        let client = WalletRpcClient::new(
            &config.rpc_ip,
            config.rpc_port,
            &config.rpc_user,
            &config.rpc_pass,
        );
        Ok(Self {
            currency: Currency::new(&config.currency),
            address: Address::new(hash160),
            client,
            params: WalletParams {
                coin: config.coin,
                min_tx_fee: config.min_tx_fee,
            },
            legs: Mutex::new(HashMap::new()),
        })
    }

    /// Startup/timer poll: `listaccounts` then `getaddressesbyaccount` per
    /// account, registering every address with the application core and
    /// broadcasting it so peers can display the counterparty's name.
    pub fn poll_addresses(&self, core: &ApplicationCore, config: &WalletConfig) -> Result<(), NodeError> {
        let accounts = self
            .client
            .list_accounts()
            .map_err(|source| NodeError::WalletAttach {
                wallet: config.title.clone(),
                source,
            })?;
        for account in accounts.keys() {
            let addresses = self.client.get_addresses_by_account(account).map_err(|source| {
                NodeError::WalletAttach {
                    wallet: config.title.clone(),
                    source,
                }
            })?;
            for address in addresses {
                if let Ok((_, hash160)) = xbridge_crypto::base58check::decode(&address) {
                    core.announce_wallet(config, Address::new(hash160));
                }
            }
        }
        core.announce_wallet(config, self.address);
        Ok(())
    }

    /// Periodically prune legs that never advanced past an hour old; a
    /// real hub drives rollback via `xbcTransactionRollback`, but a leg
    /// that was cancelled server-side with no further message still needs
    /// local cleanup eventually.
    pub fn sweep_stale_legs(&self, now: u64) {
        const MAX_AGE_SECS: u64 = 3600;
        self.legs
            .lock()
            .retain(|_, descr| now.saturating_sub(descr.created_at) < MAX_AGE_SECS);
    }
}

/// Cancel an open leg and broadcast `xbcTransactionCancel`, used when a
/// builder step fails hard enough that the swap can't continue.
pub fn cancel_leg(wallet: &AttachedWallet, hub_id: Hash256, out: &dyn xbridge_swap::Outbound) {
    wallet.legs.lock().remove(&hub_id);
    out.broadcast(Command::TransactionCancel(xbridge_types::IdBody { id: hub_id }));
}
