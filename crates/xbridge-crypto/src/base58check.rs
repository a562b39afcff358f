//! Base58Check encode/decode for Bitcoin-family wallet addresses: a version
//! byte, the 20-byte hash160 payload, and a 4-byte `sha256d` checksum.

use crate::hashing::sha256d;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Base58CheckError {
    #[error("not valid base58: {0}")]
    InvalidAlphabet(String),
    #[error("decoded payload is {0} bytes, expected 25 (1 version + 20 hash + 4 checksum)")]
    WrongLength(usize),
    #[error("checksum mismatch")]
    BadChecksum,
}

/// Decode a base58check address string into its version byte and 20-byte
/// hash160 payload.
pub fn decode(address: &str) -> Result<(u8, [u8; 20]), Base58CheckError> {
    let raw = bs58::decode(address)
        .into_vec()
        .map_err(|e| Base58CheckError::InvalidAlphabet(e.to_string()))?;
    if raw.len() != 25 {
        return Err(Base58CheckError::WrongLength(raw.len()));
    }
    let (body, checksum) = raw.split_at(21);
    let expected = sha256d(body);
    if &expected[..4] != checksum {
        return Err(Base58CheckError::BadChecksum);
    }
    let mut hash = [0u8; 20];
    hash.copy_from_slice(&body[1..]);
    Ok((body[0], hash))
}

/// Encode a version byte and 20-byte hash160 payload as base58check.
pub fn encode(version: u8, hash: &[u8; 20]) -> String {
    let mut body = Vec::with_capacity(25);
    body.push(version);
    body.extend_from_slice(hash);
    let checksum = sha256d(&body);
    body.extend_from_slice(&checksum[..4]);
    bs58::encode(body).into_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let hash = [7u8; 20];
        let encoded = encode(0x00, &hash);
        let (version, decoded) = decode(&encoded).unwrap();
        assert_eq!(version, 0x00);
        assert_eq!(decoded, hash);
    }

    #[test]
    fn rejects_bad_checksum() {
        let mut encoded = encode(0x00, &[1u8; 20]).into_bytes();
        // Flip the last character, which lives in the checksum tail.
        let last = encoded.len() - 1;
        encoded[last] = if encoded[last] == b'1' { b'2' } else { b'1' };
        let s = String::from_utf8(encoded).unwrap();
        assert_eq!(decode(&s), Err(Base58CheckError::BadChecksum));
    }
}
