//! # Hashing Primitives
//!
//! Three hash functions are consumed across the system, each for a
//! different reason:
//!
//! - `sha256d` — the hub id derivation (`hash(a ++ b)`) and the
//!   known-message dedup key (`SHA256(SHA256(body))`).
//! - `hash160` — deriving a wallet `Address` from a public key.
//! - `md5_to` — the DHT library's pluggable hash hook, which is
//!   documented as "MD5 truncated/padded to the requested output size".

use md5::{Digest as Md5Digest, Md5};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Double SHA-256, the Bitcoin-family convention for hashing anything that
/// ends up referenced on-chain or as a dedup key.
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(data);
    let second = Sha256::digest(first);
    second.into()
}

/// RIPEMD-160(SHA-256(data)) — the transform from a public key to the
/// 160-bit payload of a wallet address.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let sha = Sha256::digest(data);
    let ripe = Ripemd160::digest(sha);
    ripe.into()
}

/// MD5 of `data`, truncated or zero-padded to exactly `out_len` bytes, as
/// the DHT library's hash hook requires. `out_len` is normally 20 (a
/// routing-table key) but the hook is generic over any requested width.
pub fn md5_to(data: &[u8], out_len: usize) -> Vec<u8> {
    let digest = Md5::digest(data);
    let mut out = vec![0u8; out_len];
    let n = out_len.min(digest.len());
    out[..n].copy_from_slice(&digest[..n]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256d_is_stable() {
        let a = sha256d(b"hello");
        let b = sha256d(b"hello");
        assert_eq!(a, b);
        assert_ne!(a, sha256d(b"world"));
    }

    #[test]
    fn hash160_is_20_bytes() {
        let h = hash160(b"a public key");
        assert_eq!(h.len(), 20);
    }

    #[test]
    fn md5_to_truncates() {
        let short = md5_to(b"x", 4);
        assert_eq!(short.len(), 4);
    }

    #[test]
    fn md5_to_pads() {
        let long = md5_to(b"x", 32);
        assert_eq!(long.len(), 32);
        // MD5 digest is 16 bytes; the remaining 16 must be zero padding.
        assert!(long[16..].iter().all(|&b| b == 0));
    }
}
