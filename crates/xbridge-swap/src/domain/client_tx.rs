//! Client-side transaction builder: constructs and signs the time-locked
//! pay/revert pair a source address owes once the hub drives it to
//! `Created`, then walks the local descriptor through sign/commit/rollback.

use xbridge_types::{Address, Currency, Hash256};
use xbridge_wallet_rpc::WalletRpc;

use crate::error::SwapError;

use super::rawtx::{p2pkh_script, RawTx, TxIn, TxOut, SEQUENCE_NON_FINAL};

/// Boundary between an `nLockTime` read as a block height and one read as a
/// UNIX timestamp (Bitcoin convention).
pub const LOCKTIME_THRESHOLD: u32 = 500_000_000;

/// Per-wallet constants the builder needs beyond the seven RPC calls:
/// the atomic-unit scale factor and the flat fee every tx pays.
#[derive(Debug, Clone, Copy)]
pub struct WalletParams {
    pub coin: u64,
    pub min_tx_fee: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    Initialized,
    Created,
    Signed,
    Commited,
    Cancelled,
    Rollback,
}

/// The client's own view of an in-flight leg, keyed by the hub id once the
/// hub has matched an order (no local order-id survives past `Initialized`).
#[derive(Debug, Clone)]
pub struct TransactionDescr {
    pub hub_id: Hash256,
    pub from_addr: Address,
    pub from_currency: Currency,
    pub from_amount: u64,
    pub to_addr: Address,
    pub to_currency: Currency,
    pub to_amount: u64,
    pub state: ClientState,
    pub raw_pay: Option<String>,
    pub raw_revert: Option<String>,
    pub raw_revert_signed: Option<String>,
    pub created_at: u64,
}

impl TransactionDescr {
    pub fn new(
        hub_id: Hash256,
        from_addr: Address,
        from_currency: Currency,
        from_amount: u64,
        to_addr: Address,
        to_currency: Currency,
        to_amount: u64,
        now: u64,
    ) -> Self {
        Self {
            hub_id,
            from_addr,
            from_currency,
            from_amount,
            to_addr,
            to_currency,
            to_amount,
            state: ClientState::Initialized,
            raw_pay: None,
            raw_revert: None,
            raw_revert_signed: None,
            created_at: now,
        }
    }
}

fn to_atomic(amount_coin: f64, coin: u64) -> u64 {
    (amount_coin * coin as f64).round() as u64
}

/// Greedily accumulate `listunspent` outputs until their sum covers
/// `target_atomic`. No optimisation beyond first-fit order.
fn select_utxos(
    wallet: &dyn WalletRpc,
    target_atomic: u64,
    params: WalletParams,
) -> Result<(Vec<xbridge_wallet_rpc::Unspent>, u64), SwapError> {
    let unspent = wallet.list_unspent()?;
    let mut selected = Vec::new();
    let mut sum = 0u64;
    for utxo in unspent {
        if sum >= target_atomic {
            break;
        }
        sum += to_atomic(utxo.amount, params.coin);
        selected.push(utxo);
    }
    if sum < target_atomic {
        return Err(SwapError::InsufficientFunds {
            need: target_atomic,
            have: sum,
        });
    }
    Ok((selected, sum))
}

fn txid_bytes(hex_str: &str) -> Result<[u8; 32], SwapError> {
    let bytes = hex::decode(hex_str).map_err(|_| SwapError::SignIncomplete("txid"))?;
    bytes
        .try_into()
        .map_err(|_| SwapError::SignIncomplete("txid"))
}

/// Steps 1-3 of the builder: select inputs, build and sign `tx1` (the pay
/// transaction), then build the unsigned `tx2` (the revert) spending its
/// first output. Called by the source address once the hub sends
/// `xbcTransactionCreate`.
pub fn build_pay_and_revert(
    wallet: &dyn WalletRpc,
    counterparty_dest_hash160: &[u8; 20],
    amount_atomic: u64,
    lock_time_seconds: u32,
    revert_delay_seconds: u32,
    params: WalletParams,
    now: u64,
) -> Result<(String, String), SwapError> {
    let fee = params.min_tx_fee;
    let target = amount_atomic + fee;
    let (selected, sum) = select_utxos(wallet, target, params)?;

    let mut outputs = vec![TxOut {
        value: amount_atomic - fee,
        script_pubkey: p2pkh_script(counterparty_dest_hash160),
    }];
    let change = sum - amount_atomic;
    if change > 0 {
        let change_addr = wallet.get_new_address(None)?;
        let (_, change_hash160) = xbridge_crypto::base58check::decode(&change_addr)?;
        outputs.push(TxOut {
            value: change,
            script_pubkey: p2pkh_script(&change_hash160),
        });
    }

    let pay_tx = RawTx {
        version: 1,
        inputs: selected
            .iter()
            .map(|u| {
                Ok(TxIn {
                    prev_txid: txid_bytes(&u.txid)?,
                    prev_vout: u.vout,
                    sequence: SEQUENCE_NON_FINAL,
                })
            })
            .collect::<Result<Vec<_>, SwapError>>()?,
        outputs,
        lock_time: now as u32 + lock_time_seconds,
    };

    let signed = wallet.sign_raw_transaction(&pay_tx.to_hex())?;
    if !signed.complete {
        return Err(SwapError::SignIncomplete("pay transaction"));
    }

    let pay_txid = xbridge_crypto::sha256d(&hex::decode(&signed.hex).unwrap_or_default());
    let revert_addr = wallet.get_new_address(None)?;
    let (_, revert_hash160) = xbridge_crypto::base58check::decode(&revert_addr)?;
    let revert_tx = RawTx {
        version: 1,
        inputs: vec![TxIn {
            prev_txid: pay_txid,
            prev_vout: 0,
            sequence: SEQUENCE_NON_FINAL,
        }],
        outputs: vec![TxOut {
            value: amount_atomic.saturating_sub(2 * fee),
            script_pubkey: p2pkh_script(&revert_hash160),
        }],
        lock_time: now as u32 + revert_delay_seconds,
    };

    Ok((signed.hex, revert_tx.to_hex()))
}

/// `nLockTime` is the last 4 bytes of a serialized raw tx.
fn lock_time_of(raw_tx_hex: &str) -> Result<u32, SwapError> {
    let bytes = hex::decode(raw_tx_hex).map_err(|_| SwapError::SignIncomplete("raw tx"))?;
    if bytes.len() < 4 {
        return Err(SwapError::SignIncomplete("raw tx"));
    }
    let tail = &bytes[bytes.len() - 4..];
    Ok(u32::from_le_bytes(tail.try_into().unwrap()))
}

/// Handle `xbcTransactionSign{rawPay,rawRevert}`: sanity-check both
/// locktimes are UNIX timestamps, sign the revert, return the signed hex.
pub fn sign_counterparty_revert(
    wallet: &dyn WalletRpc,
    raw_pay: &str,
    raw_revert: &str,
) -> Result<String, SwapError> {
    let pay_lock = lock_time_of(raw_pay)?;
    let revert_lock = lock_time_of(raw_revert)?;
    if pay_lock < LOCKTIME_THRESHOLD {
        return Err(SwapError::LockTimeRejected(pay_lock));
    }
    if revert_lock < LOCKTIME_THRESHOLD {
        return Err(SwapError::LockTimeRejected(revert_lock));
    }
    let signed = wallet.sign_raw_transaction(raw_revert)?;
    if !signed.complete {
        return Err(SwapError::SignIncomplete("revert transaction"));
    }
    Ok(signed.hex)
}

/// Handle `xbcTransactionCommit{rawRevertSigned}`: broadcast the held pay
/// transaction. Returns the broadcast txid.
pub fn commit_pay_transaction(wallet: &dyn WalletRpc, raw_pay: &str) -> Result<String, SwapError> {
    Ok(wallet.send_raw_transaction(raw_pay)?)
}

/// Handle `xbcTransactionRollback`: broadcast the previously-signed revert.
/// No-op (returns `None`) if the revert was never built — the escrow never
/// advanced far enough to need an on-chain rollback.
pub fn rollback_transaction(
    wallet: &dyn WalletRpc,
    raw_revert_signed: Option<&str>,
) -> Result<Option<String>, SwapError> {
    match raw_revert_signed {
        Some(raw) => Ok(Some(wallet.send_raw_transaction(raw)?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xbridge_wallet_rpc::{MockWalletRpc, Unspent};

    fn params() -> WalletParams {
        WalletParams {
            coin: 100_000_000,
            min_tx_fee: 10_000,
        }
    }

    fn seed_unspent(wallet: &MockWalletRpc, txid: &str, vout: u32, amount: f64) {
        wallet.unspent.lock().unwrap().push(Unspent {
            txid: txid.to_string(),
            vout,
            amount,
            address: None,
            confirmations: Some(6),
        });
    }

    #[test]
    fn builds_pay_and_revert_with_asymmetric_locktimes() {
        let wallet = MockWalletRpc::default();
        seed_unspent(&wallet, &"aa".repeat(32), 0, 1.0);
        let now = 1_700_000_000u64;
        let (pay, revert) = build_pay_and_revert(
            &wallet,
            &[0x42; 20],
            50_000_000,
            300,
            86_400,
            params(),
            now,
        )
        .unwrap();
        assert_eq!(lock_time_of(&pay).unwrap(), now as u32 + 300);
        assert_eq!(lock_time_of(&revert).unwrap(), now as u32 + 86_400);
    }

    #[test]
    fn insufficient_funds_is_reported() {
        let wallet = MockWalletRpc::default();
        seed_unspent(&wallet, &"bb".repeat(32), 0, 0.0001);
        let err = build_pay_and_revert(&wallet, &[0x42; 20], 50_000_000, 300, 86_400, params(), 0)
            .unwrap_err();
        assert!(matches!(err, SwapError::InsufficientFunds { .. }));
    }

    #[test]
    fn sign_rejects_sub_threshold_locktime() {
        let wallet = MockWalletRpc::default();
        let low_locktime_tx = RawTx {
            version: 1,
            inputs: vec![],
            outputs: vec![],
            lock_time: 0,
        }
        .to_hex();
        let ok_tx = RawTx {
            version: 1,
            inputs: vec![],
            outputs: vec![],
            lock_time: 1_700_000_000,
        }
        .to_hex();
        let err = sign_counterparty_revert(&wallet, &ok_tx, &low_locktime_tx).unwrap_err();
        assert!(matches!(err, SwapError::LockTimeRejected(0)));
    }
}
