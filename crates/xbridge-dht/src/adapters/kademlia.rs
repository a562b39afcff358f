//! Reference `DhtEngine` adapter: a single-process Kademlia routing table
//! good enough to drive the transport, command queue, and dedup layers
//! under test without a production network stack.

use std::collections::HashMap;
use std::sync::mpsc::Sender;

use parking_lot::Mutex;
use xbridge_types::NodeId;

use crate::domain::{PeerInfo, RoutingTable};
use crate::error::DhtError;
use crate::ports::{DhtEngine, DhtEvent};

struct Inner {
    table: RoutingTable,
    store: HashMap<NodeId, Vec<u8>>,
    /// Every body handed to `send_message`, recorded for test assertions.
    sent: Vec<(Option<NodeId>, Vec<u8>)>,
}

/// In-process Kademlia stand-in. `search` resolves immediately against the
/// local routing table; `send_message` records the send and, for messages
/// addressed to a peer this adapter knows about, loops them straight back
/// as a `MessageReceived` event so integration tests can exercise the
/// session dispatcher without real sockets.
pub struct KademliaRoutingTable {
    inner: Mutex<Inner>,
    events: Sender<DhtEvent>,
}

impl KademliaRoutingTable {
    pub fn new(local_id: NodeId, events: Sender<DhtEvent>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                table: RoutingTable::new(local_id),
                store: HashMap::new(),
                sent: Vec::new(),
            }),
            events,
        }
    }

    /// Seed a peer directly, bypassing discovery. Used by node bootstrap
    /// and by tests.
    pub fn seed_peer(&self, peer: PeerInfo, now: u64) {
        self.inner.lock().table.insert(peer, now);
    }

    pub fn peer_count(&self) -> usize {
        self.inner.lock().table.total_peers()
    }

    pub fn sent_log(&self) -> Vec<(Option<NodeId>, Vec<u8>)> {
        self.inner.lock().sent.clone()
    }

    /// Test/bootstrap hook: inject an inbound message as if it arrived over
    /// the wire.
    pub fn deliver(&self, from: NodeId, body: Vec<u8>) {
        let _ = self.events.send(DhtEvent::MessageReceived { from, body });
    }
}

impl DhtEngine for KademliaRoutingTable {
    fn init(&self) -> Result<(), DhtError> {
        Ok(())
    }

    fn periodic(&self) {
        // Reference adapter has nothing to republish or refresh.
    }

    fn search(&self, key: NodeId) -> Result<(), DhtError> {
        let found = self.inner.lock().table.contains(&key);
        let event = if found {
            DhtEvent::SearchDone(key)
        } else {
            DhtEvent::NotFound(key)
        };
        self.events.send(event).map_err(|_| DhtError::QueueClosed)
    }

    fn send_message(&self, to: Option<NodeId>, body: Vec<u8>) -> Result<(), DhtError> {
        let mut inner = self.inner.lock();
        inner.sent.push((to, body.clone()));
        if let Some(to) = to {
            if inner.table.contains(&to) {
                drop(inner);
                let local = {
                    let inner = self.inner.lock();
                    inner.table.local_id()
                };
                let _ = self.events.send(DhtEvent::MessageReceived { from: local, body });
            }
        }
        Ok(())
    }

    fn store(&self, key: NodeId, value: Vec<u8>) -> Result<(), DhtError> {
        self.inner.lock().store.insert(key, value);
        Ok(())
    }

    fn uninit(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use std::sync::mpsc::channel;

    fn peer(byte: u8) -> PeerInfo {
        PeerInfo::new(
            NodeId::new([byte; 20]),
            "127.0.0.1:9000".parse::<SocketAddr>().unwrap(),
            0,
        )
    }

    #[test]
    fn search_for_known_peer_reports_done() {
        let (tx, rx) = channel();
        let engine = KademliaRoutingTable::new(NodeId::new([0; 20]), tx);
        engine.seed_peer(peer(1), 0);
        engine.search(NodeId::new([1; 20])).unwrap();
        assert_eq!(rx.try_recv().unwrap(), DhtEvent::SearchDone(NodeId::new([1; 20])));
    }

    #[test]
    fn search_for_unknown_peer_reports_not_found() {
        let (tx, rx) = channel();
        let engine = KademliaRoutingTable::new(NodeId::new([0; 20]), tx);
        engine.search(NodeId::new([7; 20])).unwrap();
        assert_eq!(rx.try_recv().unwrap(), DhtEvent::NotFound(NodeId::new([7; 20])));
    }

    #[test]
    fn send_to_known_peer_loops_back_as_received() {
        let (tx, rx) = channel();
        let engine = KademliaRoutingTable::new(NodeId::new([0; 20]), tx);
        engine.seed_peer(peer(2), 0);
        engine
            .send_message(Some(NodeId::new([2; 20])), b"hello".to_vec())
            .unwrap();
        match rx.try_recv().unwrap() {
            DhtEvent::MessageReceived { body, .. } => assert_eq!(body, b"hello"),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn broadcast_to_empty_to_does_not_loop_back() {
        let (tx, rx) = channel();
        let engine = KademliaRoutingTable::new(NodeId::new([0; 20]), tx);
        engine.send_message(None, b"broadcast".to_vec()).unwrap();
        assert!(rx.try_recv().is_err());
        assert_eq!(engine.sent_log(), vec![(None, b"broadcast".to_vec())]);
    }
}
