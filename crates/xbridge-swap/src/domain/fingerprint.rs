//! Mirror fingerprints used to match complementary orders at the pending
//! pool gate, and hub id derivation for joined swaps.

use xbridge_types::{Currency, Hash256};

use xbridge_crypto::sha256d;

/// `H(srcCur, srcAmt, dstCur, dstAmt)` — the pending-pool key a fresh order
/// is installed under.
pub fn hash1(src_cur: Currency, src_amt: u64, dst_cur: Currency, dst_amt: u64) -> Hash256 {
    fingerprint(src_cur, src_amt, dst_cur, dst_amt)
}

/// `H(dstCur, dstAmt, srcCur, srcAmt)` — the mirror of `hash1`; a
/// compatible counter-order's `hash1` equals this order's `hash2`.
pub fn hash2(src_cur: Currency, src_amt: u64, dst_cur: Currency, dst_amt: u64) -> Hash256 {
    fingerprint(dst_cur, dst_amt, src_cur, src_amt)
}

fn fingerprint(cur_a: Currency, amt_a: u64, cur_b: Currency, amt_b: u64) -> Hash256 {
    let mut buf = Vec::with_capacity(8 + 8 + 8 + 8);
    buf.extend_from_slice(&cur_a.as_bytes());
    buf.extend_from_slice(&amt_a.to_le_bytes());
    buf.extend_from_slice(&cur_b.as_bytes());
    buf.extend_from_slice(&amt_b.to_le_bytes());
    sha256d(&buf)
}

/// Hub id for a joined swap: `hash(firstOrderId ++ secondOrderId)`, order
/// dependent (the first party keeps matching priority).
pub fn hub_id(first_order_id: &Hash256, second_order_id: &Hash256) -> Hash256 {
    let mut buf = Vec::with_capacity(64);
    buf.extend_from_slice(first_order_id);
    buf.extend_from_slice(second_order_id);
    sha256d(&buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_symmetry() {
        let a = hash1(Currency::new("BTC"), 100_000_000, Currency::new("LTC"), 5_000_000_000);
        let b = hash2(Currency::new("LTC"), 5_000_000_000, Currency::new("BTC"), 100_000_000);
        assert_eq!(a, b);
    }

    #[test]
    fn hub_id_is_order_dependent() {
        let a = hub_id(&[1u8; 32], &[2u8; 32]);
        let b = hub_id(&[2u8; 32], &[1u8; 32]);
        assert_ne!(a, b);
    }
}
