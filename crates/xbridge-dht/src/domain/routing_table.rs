//! Kademlia routing table over 160-bit `NodeId`s.

use xbridge_types::{NodeId, ID_LEN};

use super::bucket::KBucket;
use super::entities::PeerInfo;

/// One bucket per bit of a 160-bit id.
pub const NUM_BUCKETS: usize = ID_LEN * 8;

/// Holds every known peer, bucketed by XOR distance from `local_id`.
#[derive(Debug)]
pub struct RoutingTable {
    local_id: NodeId,
    buckets: Vec<KBucket>,
}

impl RoutingTable {
    pub fn new(local_id: NodeId) -> Self {
        Self {
            local_id,
            buckets: (0..NUM_BUCKETS).map(|_| KBucket::new()).collect(),
        }
    }

    pub fn local_id(&self) -> NodeId {
        self.local_id
    }

    pub fn total_peers(&self) -> usize {
        self.buckets.iter().map(KBucket::len).sum()
    }

    fn bucket_index(&self, node_id: &NodeId) -> Option<usize> {
        self.local_id.bucket_index(node_id)
    }

    pub fn bucket(&self, index: usize) -> Option<&KBucket> {
        self.buckets.get(index)
    }

    pub fn bucket_mut(&mut self, index: usize) -> Option<&mut KBucket> {
        self.buckets.get_mut(index)
    }

    /// Insert or refresh a peer. Returns `Some(oldest)` when the bucket is
    /// full and `oldest` needs a liveness challenge before the candidate can
    /// take its place (see [`Self::replace_if_dead`]).
    pub fn insert(&mut self, peer: PeerInfo, now: u64) -> InsertOutcome {
        let Some(idx) = self.bucket_index(&peer.node_id) else {
            return InsertOutcome::IsSelf;
        };
        let bucket = &mut self.buckets[idx];
        if bucket.touch(&peer.node_id, now) {
            return InsertOutcome::Refreshed;
        }
        if bucket.insert(peer) {
            InsertOutcome::Inserted
        } else {
            let oldest = bucket.oldest_peer().expect("full bucket has an oldest peer").clone();
            InsertOutcome::BucketFull { idx, oldest }
        }
    }

    /// Resolve a pending eviction challenge: if the oldest peer answered,
    /// keep it and drop the candidate; otherwise evict it in the candidate's
    /// favour.
    pub fn replace_if_dead(&mut self, idx: usize, oldest_alive: bool, candidate: PeerInfo) {
        if oldest_alive {
            return;
        }
        if let Some(bucket) = self.buckets.get_mut(idx) {
            bucket.evict_oldest_for(candidate);
        }
    }

    pub fn remove(&mut self, node_id: &NodeId) -> Option<PeerInfo> {
        let idx = self.bucket_index(node_id)?;
        self.buckets[idx].remove(node_id)
    }

    pub fn contains(&self, node_id: &NodeId) -> bool {
        self.bucket_index(node_id)
            .and_then(|idx| self.buckets.get(idx))
            .is_some_and(|b| b.contains(node_id))
    }

    /// `count` peers closest to `target`, sorted nearest-first.
    pub fn closest(&self, target: &NodeId, count: usize) -> Vec<PeerInfo> {
        let mut all: Vec<(NodeId, PeerInfo)> = self
            .buckets
            .iter()
            .flat_map(|b| b.peers().iter().cloned())
            .map(|p| (p.node_id, p))
            .collect();
        all.sort_by_key(|(id, _)| id.distance(target));
        all.into_iter().take(count).map(|(_, p)| p).collect()
    }

    pub fn all_peers(&self) -> Vec<PeerInfo> {
        self.buckets.iter().flat_map(|b| b.peers().to_vec()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    Refreshed,
    IsSelf,
    BucketFull { idx: usize, oldest: PeerInfo },
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
    fn insert_then_closest_sorts_by_xor_distance() {
        let mut table = RoutingTable::new(NodeId::new([0; 20]));
        table.insert(peer(1), 1);
        table.insert(peer(2), 2);
        table.insert(peer(255), 3);
        let closest = table.closest(&NodeId::new([0; 20]), 2);
        assert_eq!(closest[0].node_id, NodeId::new([1; 20]));
        assert_eq!(closest[1].node_id, NodeId::new([2; 20]));
    }

    #[test]
    fn self_insert_is_rejected() {
        let mut table = RoutingTable::new(NodeId::new([9; 20]));
        assert_eq!(table.insert(peer(9), 1), InsertOutcome::IsSelf);
    }

    #[test]
    fn full_bucket_reports_oldest_for_challenge() {
        let local = NodeId::new([0; 20]);
        let mut table = RoutingTable::new(local);
        // All of these share bucket 159 (top bit differs from local's zero).
        for i in 0..super::super::bucket::K as u8 {
            let mut bytes = [0u8; 20];
            bytes[0] = 0b1000_0000;
            bytes[19] = i + 1;
            table.insert(PeerInfo::new(NodeId::new(bytes), "127.0.0.1:1".parse().unwrap(), 0), 0);
        }
        let mut overflow_bytes = [0u8; 20];
        overflow_bytes[0] = 0b1000_0000;
        overflow_bytes[19] = 250;
        let outcome = table.insert(
            PeerInfo::new(NodeId::new(overflow_bytes), "127.0.0.1:1".parse().unwrap(), 0),
            0,
        );
        assert!(matches!(outcome, InsertOutcome::BucketFull { .. }));
    }
}
