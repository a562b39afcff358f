//! The application command queue the node driver enqueues work onto.

use xbridge_types::NodeId;

/// One unit of work for the DHT transport to carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DhtCommand {
    /// (Re-)generate our local identity / bootstrap the overlay.
    Generate,
    /// Look up a key. Resolves to `SearchDone`/`NotFound` on the event channel.
    Search(NodeId),
    /// Send `body`. `to: None` broadcasts to the whole overlay.
    Send { to: Option<NodeId>, body: Vec<u8> },
    /// Dump routing table contents (diagnostics).
    Dump,
}

/// A send still waiting on its target to be located.
#[derive(Debug, Clone)]
pub struct PendingSend {
    pub body: Vec<u8>,
    pub retried: bool,
}
