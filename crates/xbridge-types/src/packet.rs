//! # Packet Framing
//!
//! The wire format is a fixed 16-byte header followed by a variable body:
//!
//! ```text
//! u32 version | u32 command | u32 body_size | u32 checksum | body[body_size]
//! ```
//!
//! All integers are little-endian. `version` mismatch is always rejected.
//! `checksum` is a CRC32 of the body; whether a receiver enforces it is a
//! caller-supplied policy (`ChecksumPolicy`), not baked into the codec,
//! since the source protocol leaves it optional.

use crate::errors::PacketError;

/// Header size in bytes (four `u32` fields).
pub const HEADER_LEN: usize = 16;

/// Protocol version this build speaks. Packets with any other version are
/// rejected before the body is even looked at.
pub const PROTOCOL_VERSION: u32 = 1;

/// Whether a receiver should verify the checksum on decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumPolicy {
    /// Accept the packet regardless of what `checksum` says (default).
    Ignore,
    /// Reject the packet if `checksum` doesn't match CRC32(body).
    Enforce,
}

/// A framed packet: header fields plus an opaque body. This is the layer
/// below `Command` — `Command::encode`/`Command::decode` work in terms of
/// `RawPacket` so the framing and the command vocabulary stay independent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPacket {
    /// Protocol version the sender claims to speak.
    pub version: u32,
    /// Numeric command discriminant (see `xbridge_types::command::CommandCode`).
    pub command: u32,
    /// Body bytes.
    pub body: Vec<u8>,
}

impl RawPacket {
    /// Frame a new packet for `command` carrying `body`, stamping the
    /// current protocol version and a CRC32 checksum of the body.
    pub fn new(command: u32, body: Vec<u8>) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            command,
            body,
        }
    }

    fn checksum(&self) -> u32 {
        crc32fast::hash(&self.body)
    }

    /// Serialize to the contiguous wire buffer.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.body.len());
        out.extend_from_slice(&self.version.to_le_bytes());
        out.extend_from_slice(&self.command.to_le_bytes());
        out.extend_from_slice(&(self.body.len() as u32).to_le_bytes());
        out.extend_from_slice(&self.checksum().to_le_bytes());
        out.extend_from_slice(&self.body);
        out
    }

    /// Parse a wire buffer back into header fields plus body, applying
    /// `policy` to decide whether a checksum mismatch is fatal.
    pub fn decode(buf: &[u8], policy: ChecksumPolicy) -> Result<Self, PacketError> {
        if buf.len() < HEADER_LEN {
            return Err(PacketError::HeaderTruncated { len: buf.len() });
        }

        let version = u32::from_le_bytes(buf[0..4].try_into().unwrap());
        if version != PROTOCOL_VERSION {
            return Err(PacketError::UnsupportedVersion {
                received: version,
                expected: PROTOCOL_VERSION,
            });
        }

        let command = u32::from_le_bytes(buf[4..8].try_into().unwrap());
        let body_size = u32::from_le_bytes(buf[8..12].try_into().unwrap());
        let checksum = u32::from_le_bytes(buf[12..16].try_into().unwrap());

        let body = &buf[HEADER_LEN..];
        if body.len() != body_size as usize {
            return Err(PacketError::BodySizeMismatch {
                declared: body_size,
                actual: body.len(),
            });
        }

        if policy == ChecksumPolicy::Enforce {
            let computed = crc32fast::hash(body);
            if computed != checksum {
                return Err(PacketError::ChecksumMismatch {
                    declared: checksum,
                    computed,
                });
            }
        }

        Ok(Self {
            version,
            command,
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let packet = RawPacket::new(6, vec![1, 2, 3, 4, 5]);
        let bytes = packet.encode();
        let decoded = RawPacket::decode(&bytes, ChecksumPolicy::Enforce).unwrap();
        assert_eq!(decoded, packet);
    }

    #[test]
    fn rejects_wrong_version() {
        let mut bytes = RawPacket::new(6, vec![]).encode();
        bytes[0] = 0xFF;
        let err = RawPacket::decode(&bytes, ChecksumPolicy::Ignore).unwrap_err();
        assert!(matches!(err, PacketError::UnsupportedVersion { .. }));
    }

    #[test]
    fn rejects_truncated_header() {
        let err = RawPacket::decode(&[1, 2, 3], ChecksumPolicy::Ignore).unwrap_err();
        assert!(matches!(err, PacketError::HeaderTruncated { len: 3 }));
    }

    #[test]
    fn rejects_body_size_mismatch() {
        let mut bytes = RawPacket::new(6, vec![1, 2, 3]).encode();
        bytes.pop();
        let err = RawPacket::decode(&bytes, ChecksumPolicy::Ignore).unwrap_err();
        assert!(matches!(err, PacketError::BodySizeMismatch { .. }));
    }

    #[test]
    fn checksum_enforced_only_when_requested() {
        let mut bytes = RawPacket::new(6, vec![1, 2, 3]).encode();
        bytes[12] ^= 0xFF;
        assert!(RawPacket::decode(&bytes, ChecksumPolicy::Ignore).is_ok());
        let err = RawPacket::decode(&bytes, ChecksumPolicy::Enforce).unwrap_err();
        assert!(matches!(err, PacketError::ChecksumMismatch { .. }));
    }
}
