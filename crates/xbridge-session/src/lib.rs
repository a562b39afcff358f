//! # XBridge Session
//!
//! The packet dispatcher: decrypt, frame, decide whether a unicast
//! command belongs to this node or needs relaying untouched, and run the
//! hub-side or client-side handler for everything that stays local.
//!
//! Stateless between packets — all state the handlers mutate (the
//! `Exchange` table, the open client legs) is owned by the caller and
//! passed in by reference.
//!
//! ## Module Structure
//!
//! ```text
//! xbridge-session/
//! ├── dispatch        # decrypt + frame + relay-or-local routing
//! ├── hub_handler      # Exchange-facing command handlers
//! ├── client_handler    # client_tx-facing command handlers
//! ├── config           # SessionConfig
//! └── error            # SessionError
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client_handler;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod hub_handler;

pub use client_handler::ClientHandler;
pub use config::SessionConfig;
pub use dispatch::{dest_of, route, Decryptor, IdentityDecryptor, Routed};
pub use error::SessionError;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
