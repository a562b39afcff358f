//! # Node Container
//!
//! Owns the process-wide singletons named in the init order: the
//! Application Core first (node id, address book, dedup cache, DHT
//! transport), the Exchange next (attaches wallets, starts the timer),
//! the worker pool last.

pub mod app_core;
pub mod config;

pub use app_core::ApplicationCore;
pub use config::{ConfigError, NodeConfig, WalletConfig};
