//! # Node Configuration
//!
//! Everything the node needs at startup that isn't a compile-time
//! constant: the overlay port, the bridge TCP port, the bootstrap peer
//! list, and the per-wallet RPC credentials the session layer attaches to
//! the exchange.
//!
//! ## Security Requirements
//!
//! - Wallet RPC passwords MUST NOT be left at the empty-string default in
//!   production.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Complete node configuration, loaded from a TOML file at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Overlay and bridge network configuration.
    pub network: NetworkConfig,
    /// Hub matching-engine configuration.
    pub exchange: ExchangeConfig,
    /// One entry per wallet daemon attached to this node.
    #[serde(default)]
    pub wallets: Vec<WalletConfig>,
}

impl NodeConfig {
    /// Load and parse a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(path.as_ref().display().to_string(), e.to_string()))?;
        toml::from_str(&text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Refuse to run with settings that are fine in calibration but unsafe
    /// in production: a wallet with no RPC password.
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        for wallet in &self.wallets {
            if wallet.rpc_pass.is_empty() {
                return Err(ConfigError::InsecureDefault(format!(
                    "wallet '{}' has an empty rpc_pass",
                    wallet.title
                )));
            }
        }
        Ok(())
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            exchange: ExchangeConfig::default(),
            wallets: Vec::new(),
        }
    }
}

/// Errors loading or validating a [`NodeConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("could not read config file {0}: {1}")]
    Io(String, String),
    /// The file's contents did not parse as the expected TOML shape.
    #[error("invalid config: {0}")]
    Parse(String),
    /// A setting that is tolerable in calibration is unsafe in production.
    #[error("insecure configuration: {0}")]
    InsecureDefault(String),
}

/// DHT overlay and bridge TCP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// UDP port the DHT overlay listens on (both IPv4 and IPv6 sockets).
    pub dht_port: u16,
    /// TCP port the session layer accepts client connections on.
    pub bridge_port: u16,
    /// `host:port` addresses pinged at startup to join the overlay.
    pub bootstrap_peers: Vec<String>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            dht_port: 41412,
            bridge_port: 41413,
            bootstrap_peers: Vec::new(),
        }
    }
}

/// Hub matching-engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    /// Seconds a pending order or stalled swap is allowed to sit idle
    /// before the sweep reclaims it.
    pub ttl_secs: u64,
    /// Currency tickers this hub has enabled for matching. Must have a
    /// corresponding entry in `wallets` for the hub to be able to settle.
    pub enabled_currencies: Vec<String>,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            ttl_secs: xbridge_swap::DEFAULT_TTL_SECS,
            enabled_currencies: Vec::new(),
        }
    }
}

/// One attached wallet daemon: RPC endpoint, credentials, and the
/// constants the client-side transaction builder needs beyond the seven
/// RPC calls themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Display title, e.g. `"Bitcoin"`.
    pub title: String,
    /// 8-byte (at most) ASCII ticker, e.g. `"BTC"`.
    pub currency: String,
    pub rpc_ip: String,
    pub rpc_port: u16,
    pub rpc_user: String,
    pub rpc_pass: String,
    /// Base58Check encoding of the wallet's primary address.
    pub address: String,
    /// Atomic-unit scale factor (e.g. `100_000_000` for 8 decimal places).
    pub coin: u64,
    /// Flat fee, in atomic units, every pay/revert transaction pays.
    pub min_tx_fee: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_no_wallets() {
        let config = NodeConfig::default();
        assert!(config.wallets.is_empty());
        assert_eq!(config.network.dht_port, 41412);
    }

    #[test]
    fn validate_rejects_empty_rpc_password() {
        let mut config = NodeConfig::default();
        config.wallets.push(WalletConfig {
            title: "Bitcoin".into(),
            currency: "BTC".into(),
            rpc_ip: "127.0.0.1".into(),
            rpc_port: 8332,
            rpc_user: "user".into(),
            rpc_pass: String::new(),
            address: "1BoatSLRHtKNngkdXEeobR76b53LETtpyT".into(),
            coin: 100_000_000,
            min_tx_fee: 10_000,
        });
        assert!(matches!(
            config.validate_for_production(),
            Err(ConfigError::InsecureDefault(_))
        ));
    }

    #[test]
    fn validate_accepts_configured_password() {
        let mut config = NodeConfig::default();
        config.wallets.push(WalletConfig {
            title: "Bitcoin".into(),
            currency: "BTC".into(),
            rpc_ip: "127.0.0.1".into(),
            rpc_port: 8332,
            rpc_user: "user".into(),
            rpc_pass: "hunter2".into(),
            address: "1BoatSLRHtKNngkdXEeobR76b53LETtpyT".into(),
            coin: 100_000_000,
            min_tx_fee: 10_000,
        });
        assert!(config.validate_for_production().is_ok());
    }

    #[test]
    fn round_trips_through_toml() {
        let config = NodeConfig::default();
        let text = toml::to_string(&config).unwrap();
        let parsed: NodeConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.network.dht_port, config.network.dht_port);
    }
}
