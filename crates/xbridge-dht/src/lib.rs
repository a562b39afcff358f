//! Kademlia-style DHT overlay: routing table, the `DhtEngine` outbound
//! port, and the tick-driven transport that sits in front of it.
//!
//! The actual Kademlia network protocol (bootstrap, iterative lookup over
//! UDP) lives outside this crate; it is modeled as a port so the rest of
//! the node — the command queue, dedup cache, and session dispatch — can
//! be built and tested against the in-process [`adapters::KademliaRoutingTable`]
//! reference implementation.

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use domain::{InsertOutcome, KBucket, PeerInfo, RoutingTable, K, NUM_BUCKETS};
pub use error::DhtError;
pub use ports::{DhtEngine, DhtEvent, SystemTimeSource, TimeSource};
pub use service::{DhtCommand, DhtTransport};
