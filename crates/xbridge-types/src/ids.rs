//! # 160-bit Identifiers
//!
//! Both the DHT overlay and the wallet layer are addressed by the same
//! 160-bit identifier shape: `NodeId` is a process identity, `Address` is
//! RIPEMD-160(SHA-256(pubkey)) of a wallet-owned address. They are kept as
//! distinct newtypes even though the representation is identical, so a
//! node id can never be accidentally used as a wallet destination.

use std::fmt;

/// Width in bytes of every identifier in this protocol (160 bits).
pub const ID_LEN: usize = 20;

/// Width in bytes of a hub/order id (256 bits, SHA-256 output).
pub const HASH_LEN: usize = 32;

/// A 256-bit hash, used for `LocalId`/`HubId` and tx-hash observations.
pub type Hash256 = [u8; HASH_LEN];

macro_rules! id160 {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub [u8; ID_LEN]);

        impl $name {
            /// All-zero identifier (used as a sentinel, never a real peer).
            pub const ZERO: Self = Self([0u8; ID_LEN]);

            /// Build from a raw 20-byte array.
            pub const fn new(bytes: [u8; ID_LEN]) -> Self {
                Self(bytes)
            }

            /// Borrow the raw bytes.
            pub fn as_bytes(&self) -> &[u8; ID_LEN] {
                &self.0
            }

            /// XOR distance to another identifier, used for Kademlia bucket
            /// selection and closest-peer sorting.
            pub fn distance(&self, other: &Self) -> [u8; ID_LEN] {
                let mut out = [0u8; ID_LEN];
                for i in 0..ID_LEN {
                    out[i] = self.0[i] ^ other.0[i];
                }
                out
            }

            /// Index (0..160) of the highest set bit in the XOR distance to
            /// `other`; this is the Kademlia bucket index. Returns `None`
            /// when the two identifiers are equal.
            pub fn bucket_index(&self, other: &Self) -> Option<usize> {
                let distance = self.distance(other);
                for (byte_index, byte) in distance.iter().enumerate() {
                    if *byte != 0 {
                        let leading = byte.leading_zeros() as usize;
                        return Some((ID_LEN - 1 - byte_index) * 8 + (7 - leading));
                    }
                }
                None
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl From<[u8; ID_LEN]> for $name {
            fn from(bytes: [u8; ID_LEN]) -> Self {
                Self(bytes)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), hex::encode(self.0))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", hex::encode(self.0))
            }
        }
    };
}

id160!(NodeId, "A 160-bit DHT overlay node identifier.");
id160!(
    Address,
    "A 160-bit wallet address, RIPEMD-160(SHA-256(pubkey))."
);
