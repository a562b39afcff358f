//! Outbound port the rest of the node drives the DHT through.
//!
//! The actual Kademlia network protocol (bootstrap, iterative lookup over
//! UDP) is an external collaborator this crate does not reimplement; it
//! models the seam as `DhtEngine` so the transport, command queue, and
//! dedup logic underneath can be exercised against a reference adapter.

use xbridge_types::NodeId;

use crate::error::DhtError;

/// Outcomes the engine reports back asynchronously, driving the command
/// queue's retry and dispatch logic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DhtEvent {
    /// A `search` completed and found the key.
    SearchDone(NodeId),
    /// A `search` completed without finding the key.
    NotFound(NodeId),
    /// A message addressed to us (or broadcast) arrived from the overlay.
    MessageReceived { from: NodeId, body: Vec<u8> },
}

/// The five operations the transport needs from a Kademlia implementation.
pub trait DhtEngine: Send + Sync {
    fn init(&self) -> Result<(), DhtError>;

    /// Run one maintenance tick (bucket refresh, republish, ...).
    fn periodic(&self);

    /// Look up `key` in the overlay. Completion arrives as a `DhtEvent`.
    fn search(&self, key: NodeId) -> Result<(), DhtError>;

    /// Send `body` to `to`, or broadcast to the whole overlay when `to` is
    /// `None`.
    fn send_message(&self, to: Option<NodeId>, body: Vec<u8>) -> Result<(), DhtError>;

    /// Store a key/value pair in the overlay.
    fn store(&self, key: NodeId, value: Vec<u8>) -> Result<(), DhtError>;

    fn uninit(&self);
}

/// Injectable clock, so tests can drive bucket/eviction timing deterministically.
pub trait TimeSource: Send + Sync {
    fn now_unix(&self) -> u64;
}

/// Wall-clock `TimeSource` for production use.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now_unix(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}
