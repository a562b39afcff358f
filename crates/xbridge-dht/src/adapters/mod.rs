//! Adapters for the `DhtEngine` outbound port.

pub mod kademlia;

pub use kademlia::KademliaRoutingTable;
