//! Session-layer configuration.

/// Knobs a session dispatcher is built with.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Whether an inbound packet's checksum is verified before decode.
    ///
    /// Defaults to `false`: the wire format leaves the checksum optional
    /// and the reference sender does not always compute it correctly, so
    /// enforcing it by default would drop otherwise-valid traffic.
    pub enforce_checksum: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            enforce_checksum: false,
        }
    }
}
