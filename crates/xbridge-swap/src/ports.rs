//! Outbound port the hub and client builder emit wire commands through,
//! and the injectable clock both use for TTL/locktime math.

use xbridge_types::{Address, Command};

/// Where the exchange/builder hand finished `Command`s off to, without
/// owning a DHT transport or session map directly.
pub trait Outbound: Send + Sync {
    fn unicast(&self, to: Address, command: Command);
    fn broadcast(&self, command: Command);
}

/// Injectable clock so state-machine tests can drive TTL expiry and
/// locktime math deterministically.
pub trait Clock: Send + Sync {
    fn now_unix(&self) -> u64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// Test double recording every command handed to it, with no actual
/// delivery. Mirrors `MockChainClient` in the crate this was adapted from.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockOutbound {
    pub unicast_log: parking_lot::Mutex<Vec<(Address, Command)>>,
    pub broadcast_log: parking_lot::Mutex<Vec<Command>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl Default for MockOutbound {
    fn default() -> Self {
        Self {
            unicast_log: parking_lot::Mutex::new(Vec::new()),
            broadcast_log: parking_lot::Mutex::new(Vec::new()),
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Outbound for MockOutbound {
    fn unicast(&self, to: Address, command: Command) {
        self.unicast_log.lock().push((to, command));
    }

    fn broadcast(&self, command: Command) {
        self.broadcast_log.lock().push(command);
    }
}

/// Fixed-value test clock.
#[cfg(any(test, feature = "test-utils"))]
pub struct FixedClock(pub std::sync::atomic::AtomicU64);

#[cfg(any(test, feature = "test-utils"))]
impl FixedClock {
    pub fn new(now: u64) -> Self {
        Self(std::sync::atomic::AtomicU64::new(now))
    }

    pub fn set(&self, now: u64) {
        self.0.store(now, std::sync::atomic::Ordering::Relaxed);
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Clock for FixedClock {
    fn now_unix(&self) -> u64 {
        self.0.load(std::sync::atomic::Ordering::Relaxed)
    }
}
