//! # Currency Codes
//!
//! Currency fields on the wire are 8 ASCII bytes, NUL-padded on the right,
//! case preserved (`"BTC\0\0\0\0\0"`).

use std::fmt;

/// Width in bytes of a currency code on the wire.
pub const CURRENCY_LEN: usize = 8;

/// An 8-byte NUL-padded ASCII currency ticker (e.g. `BTC`, `LTC`).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Currency([u8; CURRENCY_LEN]);

impl Currency {
    /// Build from a ticker string, NUL-padding or truncating to 8 bytes.
    pub fn new(ticker: &str) -> Self {
        let mut bytes = [0u8; CURRENCY_LEN];
        let src = ticker.as_bytes();
        let n = src.len().min(CURRENCY_LEN);
        bytes[..n].copy_from_slice(&src[..n]);
        Self(bytes)
    }

    /// Build from the raw 8-byte wire representation.
    pub const fn from_bytes(bytes: [u8; CURRENCY_LEN]) -> Self {
        Self(bytes)
    }

    /// The raw wire bytes.
    pub const fn as_bytes(&self) -> [u8; CURRENCY_LEN] {
        self.0
    }

    /// The ticker with trailing NUL padding stripped.
    pub fn as_str(&self) -> &str {
        let end = self.0.iter().position(|&b| b == 0).unwrap_or(CURRENCY_LEN);
        std::str::from_utf8(&self.0[..end]).unwrap_or("")
    }
}

impl fmt::Debug for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Currency({:?})", self.as_str())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for Currency {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_and_strips() {
        let c = Currency::new("BTC");
        assert_eq!(c.as_bytes(), *b"BTC\0\0\0\0\0");
        assert_eq!(c.as_str(), "BTC");
    }

    #[test]
    fn truncates_long_tickers() {
        let c = Currency::new("ABCDEFGHIJ");
        assert_eq!(c.as_str(), "ABCDEFGH");
    }

    #[test]
    fn preserves_case() {
        assert_eq!(Currency::new("btc").as_str(), "btc");
    }
}
