//! # XBridge Dedup
//!
//! A single data structure: the capacity-bounded cache of recently seen
//! packet-body digests that the DHT driver consults before re-queuing a
//! received command for another relay round.

mod dedup;

pub use dedup::{KnownMessageCache, DEFAULT_CAPACITY};
