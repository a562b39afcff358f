//! Escrow domain: fingerprint matching, the hub-side state machine, the
//! client-side transaction builder, and the raw-transaction primitives it
//! builds on.

pub mod client_tx;
pub mod fingerprint;
pub mod hub;
pub mod rawtx;

pub use client_tx::{
    build_pay_and_revert, commit_pay_transaction, rollback_transaction, sign_counterparty_revert,
    ClientState, TransactionDescr, WalletParams, LOCKTIME_THRESHOLD,
};
pub use fingerprint::{hash1, hash2, hub_id};
pub use hub::{Exchange, JoinOutcome, Member, Swap, SwapState, DEFAULT_TTL_SECS};
