//! Decrypt, frame, and relay-or-local the dispatcher's first three steps.
//!
//! Everything downstream of [`route`] is a typed `Command` the caller
//! already knows is addressed to itself; the hub and client handlers never
//! see a packet meant for someone else.

use xbridge_types::{
    Address, ChecksumPolicy, Command, CommandCode, RawPacket,
};

use crate::config::SessionConfig;
use crate::error::SessionError;

/// Decryption hook. Identity by default; a transport that layers
/// encryption over the wire plugs in its own implementation here.
pub trait Decryptor: Send + Sync {
    fn decrypt(&self, body: &[u8]) -> Vec<u8>;
}

/// No-op decryptor: the packet is already plaintext.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityDecryptor;

impl Decryptor for IdentityDecryptor {
    fn decrypt(&self, body: &[u8]) -> Vec<u8> {
        body.to_vec()
    }
}

/// Where a decoded packet ends up once `route` has looked at its
/// destination prefix (unicast bodies only; broadcasts are always local).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routed {
    /// `dest` is local: hand `command` to the hub or client handler.
    Local(Command),
    /// `dest` is a peer: re-queue the identical command for DHT delivery,
    /// no local state touched.
    Relay(Address, Command),
}

/// The destination prefix a unicast command body carries, or `None` for a
/// broadcast command (which has no such prefix and is always local).
pub fn dest_of(command: &Command) -> Option<Address> {
    use Command::*;
    match command {
        AnnounceAddresses(b) => Some(b.dest),
        XChatMessage(b) => Some(b.dest),
        TransactionHold(b) => Some(b.dest),
        TransactionHoldApply(b) => Some(b.dest),
        TransactionInit(b) => Some(b.dest),
        TransactionInitialized(b) => Some(b.dest),
        TransactionCreate(b) => Some(b.dest),
        TransactionCreated(b) => Some(b.dest),
        TransactionSign(b) => Some(b.dest),
        TransactionSigned(b) => Some(b.dest),
        TransactionCommit(b) => Some(b.dest),
        TransactionCommited(b) => Some(b.dest),
        TransactionConfirm(b) => Some(b.dest),
        TransactionRollback(b) => Some(b.dest),
        Invalid
        | AddressBookEntry(_)
        | ExchangeWallets(_)
        | PendingTransaction(_)
        | Transaction(_)
        | TransactionFinished(_)
        | TransactionCancel(_)
        | TransactionDropped(_)
        | ReceivedTransaction(_) => None,
    }
}

/// Decrypt, frame, decode, and decide whether `raw` is ours or a peer's.
/// An unknown command code is logged and dropped (returns `Ok(None)`)
/// rather than surfaced as an error, matching the source protocol's
/// `invalid` catch-all handler.
pub fn route(
    local_id: Address,
    raw: &[u8],
    decryptor: &dyn Decryptor,
    config: &SessionConfig,
) -> Result<Option<Routed>, SessionError> {
    let plain = decryptor.decrypt(raw);
    let policy = if config.enforce_checksum {
        ChecksumPolicy::Enforce
    } else {
        ChecksumPolicy::Ignore
    };
    let packet = RawPacket::decode(&plain, policy)?;

    let Some(code) = CommandCode::from_u32(packet.command) else {
        tracing::warn!(command = packet.command, "dropping unrecognised command code");
        return Ok(None);
    };
    if code == CommandCode::Invalid {
        tracing::debug!("dropping explicit invalid command");
        return Ok(None);
    }

    let command = Command::decode(code, &packet.body)?;
    match dest_of(&command) {
        Some(dest) if dest != local_id => Ok(Some(Routed::Relay(dest, command))),
        _ => Ok(Some(Routed::Local(command))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xbridge_types::{IdBody, TransactionHoldBody};

    fn packet_for(command: Command) -> Vec<u8> {
        RawPacket::new(command.code() as u32, command.encode_body()).encode()
    }

    #[test]
    fn broadcast_command_is_always_local() {
        let local = Address::new([1; 20]);
        let raw = packet_for(Command::TransactionCancel(IdBody { id: [9; 32] }));
        let routed = route(local, &raw, &IdentityDecryptor, &SessionConfig::default())
            .unwrap()
            .unwrap();
        assert!(matches!(routed, Routed::Local(Command::TransactionCancel(_))));
    }

    #[test]
    fn unicast_to_foreign_dest_is_relayed_untouched() {
        let local = Address::new([1; 20]);
        let peer = Address::new([2; 20]);
        let body = TransactionHoldBody {
            dest: peer,
            hub: Address::new([3; 20]),
            old_order_id: [4; 32],
            hub_id: [5; 32],
        };
        let raw = packet_for(Command::TransactionHold(body));
        let routed = route(local, &raw, &IdentityDecryptor, &SessionConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(routed, Routed::Relay(peer, Command::TransactionHold(TransactionHoldBody {
            dest: peer,
            hub: Address::new([3; 20]),
            old_order_id: [4; 32],
            hub_id: [5; 32],
        })));
    }

    #[test]
    fn unicast_to_local_dest_is_handled_locally() {
        let local = Address::new([1; 20]);
        let body = TransactionHoldBody {
            dest: local,
            hub: Address::new([3; 20]),
            old_order_id: [4; 32],
            hub_id: [5; 32],
        };
        let raw = packet_for(Command::TransactionHold(body));
        let routed = route(local, &raw, &IdentityDecryptor, &SessionConfig::default())
            .unwrap()
            .unwrap();
        assert!(matches!(routed, Routed::Local(Command::TransactionHold(_))));
    }

    #[test]
    fn unknown_command_code_is_dropped_not_errored() {
        let mut raw = RawPacket::new(9999, vec![]).encode();
        raw[4..8].copy_from_slice(&9999u32.to_le_bytes());
        let local = Address::new([1; 20]);
        let routed = route(local, &raw, &IdentityDecryptor, &SessionConfig::default()).unwrap();
        assert!(routed.is_none());
    }
}
