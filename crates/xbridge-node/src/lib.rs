//! # XBridge Node
//!
//! Process wiring: loads [`container::NodeConfig`], builds the
//! [`container::ApplicationCore`] (local identity, DHT transport,
//! address book, hub exchange), attaches each configured wallet, and
//! drives the DHT tick loop and the exchange's TTL sweep until shutdown.
//!
//! The actual subsystems — matching, escrow, transaction building, packet
//! dispatch — live in `xbridge-swap` and `xbridge-session`; this crate
//! only wires them to a DHT transport and a clock.

pub mod container;
pub mod error;
pub mod wallet_session;

pub use container::{ApplicationCore, NodeConfig, WalletConfig};
pub use error::NodeError;
pub use wallet_session::AttachedWallet;
