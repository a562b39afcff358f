//! Node entry point: load configuration, attach wallets, bring up the DHT
//! transport, and run the dispatch loop until `Ctrl+C`.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use xbridge_dht::adapters::KademliaRoutingTable;
use xbridge_dht::{DhtEngine, DhtEvent, DhtTransport};
use xbridge_node::container::app_core::ApplicationCore;
use xbridge_node::{AttachedWallet, NodeConfig};
use xbridge_session::{client_handler::ClientHandler, dest_of, hub_handler, Decryptor, IdentityDecryptor};
use xbridge_swap::Outbound;
use xbridge_telemetry::{init_telemetry, TelemetryConfig};
use xbridge_types::{Address, ChecksumPolicy, Command, CommandCode, NodeId, RawPacket};

fn now_unix() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Bridge the reference Kademlia adapter's `std::sync::mpsc` event channel
/// onto the async transport's `tokio::sync::mpsc` channel.
fn bridge_events(
    std_rx: std::sync::mpsc::Receiver<DhtEvent>,
) -> tokio::sync::mpsc::UnboundedReceiver<DhtEvent> {
    let (tokio_tx, tokio_rx) = tokio::sync::mpsc::unbounded_channel();
    std::thread::spawn(move || {
        while let Ok(event) = std_rx.recv() {
            if tokio_tx.send(event).is_err() {
                break;
            }
        }
    });
    tokio_rx
}

#[tokio::main]
async fn main() -> Result<()> {
    let _telemetry =
        init_telemetry(TelemetryConfig::for_role("node")).context("failed to initialize telemetry")?;

    let config_path = std::env::args().nth(1).unwrap_or_else(|| "xbridge.toml".to_string());
    let config = match NodeConfig::load(&config_path) {
        Ok(config) => config,
        Err(err) => {
            warn!(path = %config_path, error = %err, "no usable config found, running with defaults");
            NodeConfig::default()
        }
    };

    let local_id = NodeId::new(rand::random());
    info!(%local_id, "node identity");

    let wallets: Arc<Vec<AttachedWallet>> = Arc::new(
        config
            .wallets
            .iter()
            .filter_map(|w| match AttachedWallet::connect(w) {
                Ok(wallet) => Some(wallet),
                Err(err) => {
                    warn!(wallet = %w.title, error = %err, "failed to attach wallet");
                    None
                }
            })
            .collect(),
    );

    let hub_address = wallets.first().map(|w| w.address).unwrap_or(Address::ZERO);

    let (std_tx, std_rx) = std::sync::mpsc::channel();
    let kademlia = Arc::new(KademliaRoutingTable::new(local_id, std_tx));
    for peer in &config.network.bootstrap_peers {
        info!(peer, "bootstrap peer configured (overlay join is out of scope here)");
    }
    let dht = Arc::new(DhtTransport::new(Arc::clone(&kademlia) as Arc<dyn DhtEngine>));

    let core = Arc::new(ApplicationCore::new(
        local_id,
        hub_address,
        &config.exchange,
        Arc::clone(&dht),
    ));

    let mut local_addresses: HashSet<Address> = HashSet::new();
    local_addresses.insert(hub_address);
    let mut wallets_by_address: HashMap<Address, usize> = HashMap::new();
    for (index, (wallet, wallet_config)) in wallets.iter().zip(config.wallets.iter()).enumerate() {
        local_addresses.insert(wallet.address);
        wallets_by_address.insert(wallet.address, index);
        if let Err(err) = wallet.poll_addresses(&core, wallet_config) {
            warn!(wallet = %wallet_config.title, error = %err, "address poll failed");
        }
    }

    let (inbound_tx, mut inbound_rx) = tokio::sync::mpsc::unbounded_channel();
    let events = bridge_events(std_rx);
    let transport_task = {
        let dht = Arc::clone(&dht);
        tokio::spawn(async move { dht.run(events, inbound_tx).await })
    };

    let dispatch_core = Arc::clone(&core);
    let dispatch_wallets = Arc::clone(&wallets);
    let dispatch_task = tokio::spawn(async move {
        let wallets = dispatch_wallets;
        while let Some((from, body)) = inbound_rx.recv().await {
            let from_addr = Address::new(from.0);
            let plain = IdentityDecryptor.decrypt(&body);
            let packet = match RawPacket::decode(&plain, ChecksumPolicy::Ignore) {
                Ok(packet) => packet,
                Err(err) => {
                    warn!(error = %err, "dropping unframeable packet");
                    continue;
                }
            };
            let Some(code) = CommandCode::from_u32(packet.command) else {
                continue;
            };
            let command = match Command::decode(code, &packet.body) {
                Ok(command) => command,
                Err(err) => {
                    warn!(error = %err, "dropping undecodable command");
                    continue;
                }
            };

            let now = now_unix();
            match dest_of(&command) {
                Some(dest) if !local_addresses.contains(&dest) => {
                    dispatch_core.outbound.unicast(dest, command);
                }
                Some(dest) if dest == hub_address => {
                    hub_handler::handle(&mut dispatch_core.exchange.lock(), from_addr, command, now, &dispatch_core.outbound);
                }
                Some(dest) => {
                    if let Some(&index) = wallets_by_address.get(&dest) {
                        dispatch_to_wallet(&wallets, index, hub_address, &dispatch_core.outbound, command, now);
                    }
                }
                None => {
                    hub_handler::handle(
                        &mut dispatch_core.exchange.lock(),
                        from_addr,
                        command.clone(),
                        now,
                        &dispatch_core.outbound,
                    );
                    for index in 0..wallets.len() {
                        dispatch_to_wallet(&wallets, index, hub_address, &dispatch_core.outbound, command.clone(), now);
                    }
                }
            }
        }
    });

    let timer_core = Arc::clone(&core);
    let timer_wallets = Arc::clone(&wallets);
    let timer_task = tokio::spawn(async move {
        let wallets = timer_wallets;
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(5));
        loop {
            ticker.tick().await;
            let now = now_unix();
            timer_core.tick(now);
            for wallet in wallets.iter() {
                wallet.sweep_stale_legs(now);
            }
        }
    });

    info!("node is running, press ctrl+c to stop");
    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    dht.request_stop();
    timer_task.abort();
    dispatch_task.abort();
    let _ = transport_task.await;

    Ok(())
}

fn dispatch_to_wallet(
    wallets: &[AttachedWallet],
    index: usize,
    hub_address: Address,
    out: &dyn xbridge_swap::Outbound,
    command: Command,
    now: u64,
) {
    let wallet = &wallets[index];
    let mut legs = wallet.legs.lock();
    let mut handler = ClientHandler {
        wallet: &wallet.client,
        out,
        params: wallet.params,
        local_addr: wallet.address,
        hub_addr: hub_address,
        legs: &mut legs,
    };
    if let Err(err) = handler.handle(command, now) {
        warn!(error = %err, "client handler failed");
    }
}
