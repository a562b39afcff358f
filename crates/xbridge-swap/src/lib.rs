//! # XBridge Swap Engine
//!
//! Hub-side escrow/reveal state machine plus the client-side transaction
//! builder: joins complementary orders by mirror fingerprint, shepherds a
//! joined pair through hold/init/create/sign/commit, and drives rollback on
//! cancellation or TTL expiry.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Module Structure
//!
//! ```text
//! xbridge-swap/
//! ├── domain/
//! │   ├── fingerprint  # mirror hashing + hub id derivation
//! │   ├── hub          # Exchange: pending pool, active table, state machine
//! │   ├── client_tx    # pay/revert transaction builder
//! │   └── rawtx        # legacy P2PKH transaction serialization
//! ├── ports            # Outbound, Clock
//! └── error            # SwapError
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod domain;
pub mod error;
pub mod ports;

pub use domain::{
    build_pay_and_revert, commit_pay_transaction, rollback_transaction, sign_counterparty_revert,
    ClientState, Exchange, JoinOutcome, Member, Swap, SwapState, TransactionDescr, WalletParams,
    DEFAULT_TTL_SECS, LOCKTIME_THRESHOLD,
};
pub use error::SwapError;
pub use ports::{Clock, Outbound, SystemClock};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
