//! K-bucket: up to `K` peers sharing a distance range from the local node.

use xbridge_types::NodeId;

use super::entities::PeerInfo;

/// Peers held per bucket, mirroring the reference Kademlia parameter.
pub const K: usize = 20;

/// Least-recently-seen-first peer list for one bucket.
///
/// New peers go to the back (most recently seen). `oldest_peer` is the
/// eviction candidate when the bucket is full.
#[derive(Debug, Clone, Default)]
pub struct KBucket {
    peers: Vec<PeerInfo>,
}

impl KBucket {
    pub fn new() -> Self {
        Self { peers: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.peers.len() >= K
    }

    pub fn peers(&self) -> &[PeerInfo] {
        &self.peers
    }

    pub fn contains(&self, node_id: &NodeId) -> bool {
        self.peers.iter().any(|p| &p.node_id == node_id)
    }

    pub fn oldest_peer(&self) -> Option<&PeerInfo> {
        self.peers.first()
    }

    /// Insert `peer` if there's room. Returns `false` if the bucket is full
    /// and the caller should run an eviction check instead.
    pub fn insert(&mut self, peer: PeerInfo) -> bool {
        if self.contains(&peer.node_id) {
            self.touch(&peer.node_id, peer.last_seen);
            return true;
        }
        if self.is_full() {
            return false;
        }
        self.peers.push(peer);
        true
    }

    /// Move a known peer to the back and refresh its `last_seen`.
    pub fn touch(&mut self, node_id: &NodeId, now: u64) -> bool {
        if let Some(pos) = self.peers.iter().position(|p| &p.node_id == node_id) {
            let mut peer = self.peers.remove(pos);
            peer.last_seen = now;
            self.peers.push(peer);
            true
        } else {
            false
        }
    }

    pub fn remove(&mut self, node_id: &NodeId) -> Option<PeerInfo> {
        self.peers
            .iter()
            .position(|p| &p.node_id == node_id)
            .map(|pos| self.peers.remove(pos))
    }

    /// Replace the oldest entry with `candidate`, used once the oldest peer
    /// has been confirmed dead (eviction-on-failure).
    pub fn evict_oldest_for(&mut self, candidate: PeerInfo) {
        if !self.peers.is_empty() {
            self.peers.remove(0);
        }
        self.peers.push(candidate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;

    fn peer(byte: u8) -> PeerInfo {
        PeerInfo::new(
            NodeId::new([byte; 20]),
            "127.0.0.1:9000".parse::<SocketAddr>().unwrap(),
            0,
        )
    }

    #[test]
    fn insert_then_touch_moves_to_back() {
        let mut bucket = KBucket::new();
        bucket.insert(peer(1));
        bucket.insert(peer(2));
        bucket.touch(&NodeId::new([1; 20]), 5);
        assert_eq!(bucket.peers()[1].node_id, NodeId::new([1; 20]));
        assert_eq!(bucket.peers()[1].last_seen, 5);
    }

    #[test]
    fn insert_rejects_once_full() {
        let mut bucket = KBucket::new();
        for i in 0..K {
            assert!(bucket.insert(peer(i as u8)));
        }
        assert!(!bucket.insert(peer(200)));
    }

    #[test]
    fn evict_oldest_replaces_front() {
        let mut bucket = KBucket::new();
        bucket.insert(peer(1));
        bucket.insert(peer(2));
        bucket.evict_oldest_for(peer(3));
        assert!(!bucket.contains(&NodeId::new([1; 20])));
        assert!(bucket.contains(&NodeId::new([3; 20])));
    }
}
