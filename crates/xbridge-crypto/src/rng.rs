//! # CSPRNG-Backed Identifier Generation
//!
//! Node ids and local order ids must be unpredictable, so both are drawn
//! from the operating system's CSPRNG rather than a seeded PRNG.

use rand::rngs::OsRng;
use rand::RngCore;

/// Fill a fresh 20-byte identifier from the system CSPRNG.
pub fn random_id20() -> [u8; 20] {
    let mut buf = [0u8; 20];
    OsRng.fill_bytes(&mut buf);
    buf
}

/// Fill a fresh 32-byte identifier from the system CSPRNG.
pub fn random_id32() -> [u8; 32] {
    let mut buf = [0u8; 32];
    OsRng.fill_bytes(&mut buf);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_not_trivially_zero() {
        // Not a statistical test, just a sanity check that the RNG ran.
        assert_ne!(random_id20(), [0u8; 20]);
        assert_ne!(random_id32(), [0u8; 32]);
    }

    #[test]
    fn successive_ids_differ() {
        assert_ne!(random_id32(), random_id32());
    }
}
