//! Command queue and tick-driven transport wiring.

pub mod queue;
pub mod transport;

pub use queue::DhtCommand;
pub use transport::DhtTransport;
