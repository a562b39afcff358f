//! Client-side command handlers: the source-address leg of a swap,
//! walking a [`TransactionDescr`] through init/create/sign/commit/rollback
//! by calling into `xbridge_swap::domain::client_tx` and replying to the
//! hub.

use std::collections::HashMap;

use xbridge_swap::{
    commit_pay_transaction, rollback_transaction, sign_counterparty_revert, build_pay_and_revert,
};
use xbridge_swap::{ClientState, Outbound, SwapError, TransactionDescr, WalletParams};
use xbridge_types::{
    Address, Command, Hash256, HubIdBody, IdBody, TransactionCommitedBody, TxPairBody, TxSingleBody,
};
use xbridge_wallet_rpc::WalletRpc;

use crate::error::SessionError;

fn tx_hash_of(txid_hex: &str) -> Hash256 {
    let mut out: Hash256 = [0u8; 32];
    if let Ok(bytes) = hex::decode(txid_hex) {
        let n = bytes.len().min(32);
        out[..n].copy_from_slice(&bytes[..n]);
    }
    out
}

/// One attached wallet's side of a client session: the wallet RPC it
/// builds transactions against, and the open legs keyed by hub id.
pub struct ClientHandler<'a> {
    pub wallet: &'a dyn WalletRpc,
    pub out: &'a dyn Outbound,
    pub params: WalletParams,
    pub local_addr: Address,
    pub hub_addr: Address,
    pub legs: &'a mut HashMap<Hash256, TransactionDescr>,
}

impl<'a> ClientHandler<'a> {
    /// A builder step failed: drop the leg and broadcast `xbcTransactionCancel`
    /// so the hub rolls the other side back instead of waiting out the TTL.
    fn cancel(&mut self, hub_id: Hash256, err: SwapError) {
        tracing::warn!(error = %err, "builder step failed, cancelling leg");
        self.legs.remove(&hub_id);
        self.out.broadcast(Command::TransactionCancel(IdBody { id: hub_id }));
    }

    /// Feed one locally-addressed command through the builder.
    pub fn handle(&mut self, command: Command, now: u64) -> Result<(), SessionError> {
        match command {
            Command::TransactionHold(b) => {
                self.out.unicast(
                    self.hub_addr,
                    Command::TransactionHoldApply(HubIdBody {
                        dest: self.hub_addr,
                        hub: self.hub_addr,
                        hub_id: b.hub_id,
                    }),
                );
            }
            Command::TransactionInit(b) => {
                let descr = TransactionDescr::new(
                    b.hub_id,
                    b.from_addr,
                    b.from_currency,
                    b.from_amount,
                    b.to_addr,
                    b.to_currency,
                    b.to_amount,
                    now,
                );
                self.legs.insert(b.hub_id, descr);
                self.out.unicast(
                    self.hub_addr,
                    Command::TransactionInitialized(HubIdBody {
                        dest: self.hub_addr,
                        hub: self.hub_addr,
                        hub_id: b.hub_id,
                    }),
                );
            }
            Command::TransactionCreate(b) => {
                let descr = self
                    .legs
                    .get_mut(&b.hub_id)
                    .ok_or_else(|| SessionError::UnknownSwap(b.hub_id.into()))?;
                let from_amount = descr.from_amount;
                match build_pay_and_revert(
                    self.wallet,
                    &b.counterparty_dest_addr.0,
                    from_amount,
                    b.lock_time_seconds,
                    b.revert_delay_seconds,
                    self.params,
                    now,
                ) {
                    Ok((raw_pay, raw_revert)) => {
                        let descr = self.legs.get_mut(&b.hub_id).expect("checked above");
                        descr.raw_pay = Some(raw_pay.clone());
                        descr.raw_revert = Some(raw_revert.clone());
                        descr.state = ClientState::Created;
                        self.out.unicast(
                            self.hub_addr,
                            Command::TransactionCreated(TxPairBody {
                                dest: self.hub_addr,
                                hub: self.hub_addr,
                                hub_id: b.hub_id,
                                raw_pay,
                                raw_revert,
                            }),
                        );
                    }
                    Err(err) => self.cancel(b.hub_id, err),
                }
            }
            Command::TransactionSign(b) => match sign_counterparty_revert(self.wallet, &b.raw_pay, &b.raw_revert) {
                Ok(signed) => {
                    let descr = self
                        .legs
                        .get_mut(&b.hub_id)
                        .ok_or_else(|| SessionError::UnknownSwap(b.hub_id.into()))?;
                    descr.raw_revert_signed = Some(signed.clone());
                    descr.state = ClientState::Signed;
                    self.out.unicast(
                        self.hub_addr,
                        Command::TransactionSigned(TxSingleBody {
                            dest: self.hub_addr,
                            hub: self.hub_addr,
                            hub_id: b.hub_id,
                            raw_tx: signed,
                        }),
                    );
                }
                Err(err) => self.cancel(b.hub_id, err),
            },
            Command::TransactionCommit(b) => {
                let descr = self
                    .legs
                    .get_mut(&b.hub_id)
                    .ok_or_else(|| SessionError::UnknownSwap(b.hub_id.into()))?;
                let raw_pay = descr
                    .raw_pay
                    .clone()
                    .ok_or_else(|| SessionError::UnknownSwap(b.hub_id.into()))?;
                match commit_pay_transaction(self.wallet, &raw_pay) {
                    Ok(txid) => {
                        let descr = self.legs.get_mut(&b.hub_id).expect("checked above");
                        descr.state = ClientState::Commited;
                        self.out.unicast(
                            self.hub_addr,
                            Command::TransactionCommited(TransactionCommitedBody {
                                dest: self.hub_addr,
                                hub: self.hub_addr,
                                hub_id: b.hub_id,
                                observed_tx_hash: tx_hash_of(&txid),
                            }),
                        );
                    }
                    Err(err) => self.cancel(b.hub_id, err),
                }
            }
            Command::TransactionRollback(b) => {
                if let Some(descr) = self.legs.get_mut(&b.hub_id) {
                    rollback_transaction(self.wallet, descr.raw_revert_signed.as_deref())?;
                    descr.state = ClientState::Rollback;
                }
            }
            Command::TransactionConfirm(_) | Command::TransactionFinished(_) => {
                // Notification-only; the leg has already committed on-chain.
            }
            Command::TransactionCancel(b) => {
                if let Some(descr) = self.legs.get_mut(&b.id) {
                    descr.state = ClientState::Cancelled;
                }
            }
            _ => tracing::trace!("command has no client-side handler"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xbridge_swap::ports::MockOutbound;
    use xbridge_types::{Currency, TransactionInitBody};
    use xbridge_wallet_rpc::MockWalletRpc;

    fn params() -> WalletParams {
        WalletParams {
            coin: 100_000_000,
            min_tx_fee: 10_000,
        }
    }

    #[test]
    fn init_command_registers_a_leg_and_acks() {
        let wallet = MockWalletRpc::default();
        let out = MockOutbound::default();
        let mut legs = HashMap::new();
        let hub_addr = Address::new([9; 20]);
        let local = Address::new([1; 20]);
        let mut handler = ClientHandler {
            wallet: &wallet,
            out: &out,
            params: params(),
            local_addr: local,
            hub_addr,
            legs: &mut legs,
        };
        let body = TransactionInitBody {
            dest: local,
            hub: hub_addr,
            hub_id: [7; 32],
            from_addr: local,
            from_currency: Currency::new("BTC"),
            from_amount: 100,
            to_addr: Address::new([2; 20]),
            to_currency: Currency::new("LTC"),
            to_amount: 200,
        };
        handler.handle(Command::TransactionInit(body), 0).unwrap();
        assert!(legs.contains_key(&[7; 32]));
        assert_eq!(out.unicast_log.lock().len(), 1);
    }

    #[test]
    fn create_without_init_is_rejected() {
        let wallet = MockWalletRpc::default();
        let out = MockOutbound::default();
        let mut legs = HashMap::new();
        let hub_addr = Address::new([9; 20]);
        let mut handler = ClientHandler {
            wallet: &wallet,
            out: &out,
            params: params(),
            local_addr: Address::new([1; 20]),
            hub_addr,
            legs: &mut legs,
        };
        let err = handler
            .handle(
                Command::TransactionCreate(xbridge_types::TransactionCreateBody {
                    dest: Address::new([1; 20]),
                    hub: hub_addr,
                    hub_id: [7; 32],
                    counterparty_dest_addr: Address::new([2; 20]),
                    lock_time_seconds: 300,
                    revert_delay_seconds: 86_400,
                }),
                0,
            )
            .unwrap_err();
        assert!(matches!(err, SessionError::UnknownSwap(_)));
    }

    #[test]
    fn create_failure_broadcasts_cancel_and_drops_the_leg() {
        // No unspent outputs configured: `build_pay_and_revert` fails with
        // `InsufficientFunds` before it ever calls into the locktime checks.
        let wallet = MockWalletRpc::default();
        let out = MockOutbound::default();
        let hub_addr = Address::new([9; 20]);
        let local = Address::new([1; 20]);
        let hub_id = [7; 32];
        let mut legs = HashMap::new();
        legs.insert(
            hub_id,
            TransactionDescr::new(
                hub_id,
                local,
                Currency::new("BTC"),
                100,
                Address::new([2; 20]),
                Currency::new("LTC"),
                200,
                0,
            ),
        );
        let mut handler = ClientHandler {
            wallet: &wallet,
            out: &out,
            params: params(),
            local_addr: local,
            hub_addr,
            legs: &mut legs,
        };
        handler
            .handle(
                Command::TransactionCreate(xbridge_types::TransactionCreateBody {
                    dest: local,
                    hub: hub_addr,
                    hub_id,
                    counterparty_dest_addr: Address::new([2; 20]),
                    lock_time_seconds: 300,
                    revert_delay_seconds: 86_400,
                }),
                0,
            )
            .unwrap();
        assert!(legs.is_empty(), "a failed builder step drops the leg");
        let broadcasts = out.broadcast_log.lock();
        assert_eq!(broadcasts.len(), 1);
        assert!(matches!(broadcasts[0], Command::TransactionCancel(IdBody { id }) if id == hub_id));
    }

    #[test]
    fn sign_with_subthreshold_locktime_broadcasts_cancel() {
        // `lock_time_of` reads the last 4 bytes of the raw tx hex; a pay
        // transaction whose lock time is below `LOCKTIME_THRESHOLD` (i.e.
        // read as a block height, not a unix timestamp) must be rejected
        // rather than signed, per the S2 scenario.
        let wallet = MockWalletRpc::default();
        let out = MockOutbound::default();
        let hub_addr = Address::new([9; 20]);
        let hub_id = [7; 32];
        let mut legs = HashMap::new();
        let mut handler = ClientHandler {
            wallet: &wallet,
            out: &out,
            params: params(),
            local_addr: Address::new([1; 20]),
            hub_addr,
            legs: &mut legs,
        };
        handler
            .handle(
                Command::TransactionSign(xbridge_types::TxPairBody {
                    dest: Address::new([1; 20]),
                    hub: hub_addr,
                    hub_id,
                    raw_pay: "00000000".to_string(),
                    raw_revert: "00000000".to_string(),
                }),
                0,
            )
            .unwrap();
        let broadcasts = out.broadcast_log.lock();
        assert_eq!(broadcasts.len(), 1);
        assert!(matches!(broadcasts[0], Command::TransactionCancel(IdBody { id }) if id == hub_id));
    }
}
