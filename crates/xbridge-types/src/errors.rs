//! # Wire-Level Error Types
//!
//! Errors raised while framing or parsing packets. These map onto the
//! `WireFormat` branch of the error taxonomy: a bad version, a truncated
//! body, or a malformed command payload always means "drop the packet /
//! close the session", never a retry.

use thiserror::Error;

/// Errors from encoding or decoding a wire packet.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PacketError {
    /// Buffer shorter than the fixed 16-byte header.
    #[error("packet truncated: {len} bytes, need at least 16 for the header")]
    HeaderTruncated {
        /// Bytes actually available.
        len: usize,
    },

    /// `version` field did not match the compiled protocol version.
    #[error("unsupported protocol version: received {received}, expected {expected}")]
    UnsupportedVersion {
        /// Version read from the wire.
        received: u32,
        /// Version this build understands.
        expected: u32,
    },

    /// `body_size` in the header does not match the bytes actually present.
    #[error("body size mismatch: header says {declared}, buffer has {actual}")]
    BodySizeMismatch {
        /// Declared size from the header.
        declared: u32,
        /// Bytes actually following the header.
        actual: usize,
    },

    /// Checksum verification failed (only when enforcement is enabled).
    #[error("checksum mismatch: header says {declared:#010x}, computed {computed:#010x}")]
    ChecksumMismatch {
        /// Checksum read from the header.
        declared: u32,
        /// CRC32 computed over the body.
        computed: u32,
    },

    /// The body could not be interpreted as the claimed command's payload.
    #[error("malformed body for command {command}: {reason}")]
    MalformedBody {
        /// Numeric command discriminant.
        command: u32,
        /// Human-readable reason.
        reason: String,
    },

    /// `command` field did not map to a known `Command` discriminant.
    #[error("unknown command code: {0}")]
    UnknownCommand(u32),
}
