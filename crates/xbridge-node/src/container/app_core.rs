//! # Application Core
//!
//! The node's one process-wide singleton: local identity, the DHT
//! transport every outbound command is queued through, the address book
//! built from `xbcAddressBookEntry` broadcasts, and the hub-side exchange.
//!
//! Construct once in `main`, pass a borrowed reference through every
//! handler — no hidden globals.

use std::collections::HashMap;
use std::sync::Arc;

use base64::Engine;
use parking_lot::Mutex;

use xbridge_dht::{DhtCommand, DhtTransport};
use xbridge_swap::{Exchange, Outbound};
use xbridge_types::{Address, Command, NodeId};

use super::config::{ExchangeConfig, WalletConfig};

/// Peer address the overlay has seen announce itself, with the display
/// name from its `xbcAddressBookEntry`.
#[derive(Debug, Clone)]
pub struct AddressBookEntry {
    pub currency: String,
    pub name: String,
}

/// Routes `Exchange`/builder output through the DHT command queue instead
/// of holding a transport reference directly, so the swap engine stays
/// transport-agnostic.
pub struct DhtOutbound {
    dht: Arc<DhtTransport>,
}

impl Outbound for DhtOutbound {
    fn unicast(&self, to: Address, command: Command) {
        let packet = xbridge_types::RawPacket::new(command.code() as u32, command.encode_body());
        self.dht.enqueue(DhtCommand::Send {
            to: Some(NodeId::new(to.0)),
            body: packet.encode(),
        });
    }

    fn broadcast(&self, command: Command) {
        let packet = xbridge_types::RawPacket::new(command.code() as u32, command.encode_body());
        self.dht.enqueue(DhtCommand::Send {
            to: None,
            body: packet.encode(),
        });
    }
}

/// Process-wide state: local identity, DHT transport, address book, and
/// the hub's matching engine. Wallet sessions are built on top of this by
/// `main` once attached wallets have been polled.
pub struct ApplicationCore {
    pub local_id: NodeId,
    pub dht: Arc<DhtTransport>,
    pub outbound: DhtOutbound,
    pub exchange: Mutex<Exchange>,
    pub address_book: Mutex<HashMap<Address, AddressBookEntry>>,
}

impl ApplicationCore {
    pub fn new(
        local_id: NodeId,
        hub_address: Address,
        exchange_config: &ExchangeConfig,
        dht: Arc<DhtTransport>,
    ) -> Self {
        let enabled = exchange_config
            .enabled_currencies
            .iter()
            .map(|t| xbridge_types::Currency::new(t));
        let exchange = Exchange::new(hub_address, enabled).with_ttl_secs(exchange_config.ttl_secs);
        Self {
            local_id,
            dht: Arc::clone(&dht),
            outbound: DhtOutbound { dht },
            exchange: Mutex::new(exchange),
            address_book: Mutex::new(HashMap::new()),
        }
    }

    /// Register one attached wallet's addresses in the book and announce
    /// them, mirroring the startup/timer-tick wallet poll.
    pub fn announce_wallet(&self, wallet: &WalletConfig, address: Address) {
        self.address_book.lock().insert(
            address,
            AddressBookEntry {
                currency: wallet.currency.clone(),
                name: wallet.title.clone(),
            },
        );
        self.outbound.broadcast(Command::AddressBookEntry(xbridge_types::AddressBookEntryBody {
            currency: wallet.currency.clone(),
            name: wallet.title.clone(),
            address_base64: base64::engine::general_purpose::STANDARD.encode(address.0),
        }));
    }

    /// Run one maintenance tick: sweep the exchange for TTL expiry and
    /// flush the DHT command queue.
    pub fn tick(&self, now: u64) {
        self.exchange.lock().sweep(now, &self.outbound);
        if let Err(err) = self.dht.pump_commands() {
            tracing::warn!(error = %err, "dht command pump failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use xbridge_dht::adapters::KademliaRoutingTable;

    #[test]
    fn new_core_starts_with_empty_book_and_exchange() {
        let (tx, _rx) = mpsc::channel();
        let engine = Arc::new(KademliaRoutingTable::new(NodeId::new([1; 20]), tx));
        let dht = Arc::new(DhtTransport::new(engine));
        let core = ApplicationCore::new(
            NodeId::new([1; 20]),
            Address::new([1; 20]),
            &ExchangeConfig::default(),
            dht,
        );
        assert!(core.address_book.lock().is_empty());
        assert_eq!(core.exchange.lock().pending_len(), 0);
    }
}
