//! Core domain entities for the DHT overlay.

use xbridge_types::NodeId;

/// Everything the routing table tracks about one overlay peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerInfo {
    pub node_id: NodeId,
    pub addr: std::net::SocketAddr,
    /// Unix seconds of the last message received from this peer.
    pub last_seen: u64,
}

impl PeerInfo {
    pub fn new(node_id: NodeId, addr: std::net::SocketAddr, last_seen: u64) -> Self {
        Self {
            node_id,
            addr,
            last_seen,
        }
    }
}
