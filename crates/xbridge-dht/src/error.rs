//! DHT error taxonomy.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DhtError {
    #[error("dht engine not initialized")]
    NotInitialized,
    #[error("search for {0:?} timed out without a result")]
    SearchTimedOut(xbridge_types::NodeId),
    #[error("transport io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("command queue closed")]
    QueueClosed,
}
