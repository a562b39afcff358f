//! # XBridge Crypto
//!
//! Satisfies the hashing and randomness interfaces the rest of the
//! workspace treats as external collaborators: RIPEMD-160/SHA-256/MD5 and
//! a CSPRNG, backed by the RustCrypto crates instead of OpenSSL bindings.

pub mod base58check;
pub mod hashing;
pub mod rng;

pub use base58check::Base58CheckError;
pub use hashing::{hash160, md5_to, sha256d};
pub use rng::{random_id20, random_id32};
