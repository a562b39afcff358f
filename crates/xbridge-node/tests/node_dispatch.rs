//! End-to-end dispatch test: two `xbcTransaction` orders submitted through
//! the loopback DHT adapter match at the hub and the resulting
//! `xbcPendingTransaction`/`xbcTransactionHold` commands come back out the
//! same `ApplicationCore`.

use std::sync::{mpsc, Arc};

use xbridge_dht::adapters::KademliaRoutingTable;
use xbridge_dht::{DhtEngine, DhtTransport};
use xbridge_node::container::app_core::ApplicationCore;
use xbridge_node::container::config::ExchangeConfig;
use xbridge_session::hub_handler;
use xbridge_types::{Address, Command, Currency, NodeId, TransactionBody};

#[test]
fn two_matching_orders_produce_a_hold_broadcast() {
    let hub = Address::new([0xAA; 20]);
    let local_id = NodeId::new(hub.0);
    let (tx, _rx) = mpsc::channel();
    let engine = Arc::new(KademliaRoutingTable::new(local_id, tx));
    let dht = Arc::new(DhtTransport::new(Arc::clone(&engine) as Arc<dyn DhtEngine>));
    let config = ExchangeConfig {
        enabled_currencies: vec!["BTC".into(), "LTC".into()],
        ..ExchangeConfig::default()
    };
    let core = ApplicationCore::new(local_id, hub, &config, dht);

    let alice = Address::new([1; 20]);
    let bob = Address::new([2; 20]);

    let order_a = Command::Transaction(TransactionBody {
        order_id: [1; 32],
        src_addr: alice,
        src_currency: Currency::new("BTC"),
        src_amount: 100,
        dst_addr: alice,
        dst_currency: Currency::new("LTC"),
        dst_amount: 200,
    });
    let order_b = Command::Transaction(TransactionBody {
        order_id: [2; 32],
        src_addr: bob,
        src_currency: Currency::new("LTC"),
        src_amount: 200,
        dst_addr: bob,
        dst_currency: Currency::new("BTC"),
        dst_amount: 100,
    });

    hub_handler::handle(&mut core.exchange.lock(), alice, order_a, 0, &core.outbound);
    assert_eq!(core.exchange.lock().pending_len(), 1);

    hub_handler::handle(&mut core.exchange.lock(), bob, order_b, 0, &core.outbound);
    assert_eq!(core.exchange.lock().pending_len(), 0, "matched orders leave the pending pool");

    core.dht.pump_commands().unwrap();
    let sent = engine.sent_log();
    let alice_node = NodeId::new(alice.0);
    let bob_node = NodeId::new(bob.0);
    assert!(
        sent.iter().any(|(to, _)| *to == Some(alice_node)),
        "matching installs a swap and unicasts xbcTransactionHold to the first leg"
    );
    assert!(
        sent.iter().any(|(to, _)| *to == Some(bob_node)),
        "matching installs a swap and unicasts xbcTransactionHold to the second leg"
    );
}
