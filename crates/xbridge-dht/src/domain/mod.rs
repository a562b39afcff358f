//! Pure Kademlia domain logic: buckets, routing table, peer records.

pub mod bucket;
pub mod entities;
pub mod routing_table;

pub use bucket::{KBucket, K};
pub use entities::PeerInfo;
pub use routing_table::{InsertOutcome, RoutingTable, NUM_BUCKETS};
