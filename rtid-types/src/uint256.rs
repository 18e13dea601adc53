//! 256-bit unsigned integer used for proof-of-work limits and chain work.

use uint::construct_uint;

use crate::error::RtidError;

construct_uint! {
    /// Unsigned 256-bit integer.
    /// Consists of 4x64-bit words.
    pub struct U256(4);
}

impl U256 {
    /// Parse a big-endian hex string. Shorter inputs are treated as numbers,
    /// so `"00"` is zero and `"ff"` is 255.
    pub fn from_hex(s: &str) -> Result<Self, RtidError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        if s.len() > 64 {
            return Err(RtidError::InvalidHex {
                reason: format!("256-bit value has {} hex digits", s.len()),
            });
        }
        let padded = format!("{:0>64}", s);
        let bytes = hex::decode(&padded).map_err(|e| RtidError::InvalidHex {
            reason: format!("'{}': {}", s, e),
        })?;
        Ok(U256::from_big_endian(&bytes))
    }

    /// Big-endian, zero-padded 64-digit hex.
    pub fn to_hex(&self) -> String {
        let mut bytes = [0u8; 32];
        self.to_big_endian(&mut bytes);
        hex::encode(bytes)
    }
}

/// Serde helper that writes a [`U256`] as 64 hex digits.
pub mod serde_u256 {
    use serde::{self, Deserialize, Deserializer, Serializer};

    use super::U256;

    pub fn serialize<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_hex())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<U256, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        U256::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_short_and_full() {
        assert!(U256::from_hex("00").unwrap().is_zero());
        assert_eq!(U256::from_hex("0x11").unwrap(), U256::from(17u64));
        assert_eq!(
            U256::from_hex(&"f".repeat(64)).unwrap(),
            U256::MAX
        );
    }

    #[test]
    fn test_hex_roundtrip_is_padded() {
        let v = U256::from_hex("b63a48c5c1e").unwrap();
        let hex = v.to_hex();
        assert_eq!(hex.len(), 64);
        assert!(hex.ends_with("00000b63a48c5c1e"));
        assert_eq!(U256::from_hex(&hex).unwrap(), v);
    }

    #[test]
    fn test_max_over_limit_ratio() {
        let limit = U256::from_hex(
            "003fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
        )
        .unwrap();
        assert_eq!(U256::MAX / limit, U256::from(1024u64));

        let regtest_limit = U256::from_hex(
            "0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f",
        )
        .unwrap();
        assert_eq!(U256::MAX / regtest_limit, U256::from(17u64));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(U256::from_hex("xyz0").is_err());
        assert!(U256::from_hex(&"1".repeat(65)).is_err());
    }
}
