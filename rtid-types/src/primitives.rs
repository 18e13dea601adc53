use crate::error::RtidError;

/// 32-byte double-SHA256 (or yespower) digest in internal byte order.
///
/// Hashes are displayed and written in configuration with the byte order
/// reversed, so use [`hash_from_hex`] and [`hash_to_hex`] at the edges.
pub type Hash = [u8; 32];

/// Block height.
pub type Height = u32;

/// Unix timestamp in seconds as stored in a block header.
pub type BlockTime = u32;

/// The all-zero hash, used as the predecessor of the genesis block.
pub const ZERO_HASH: Hash = [0u8; 32];

/// Parse a display-order hex string (as printed by block explorers) into a hash.
///
/// Shorter inputs are treated as numbers and left-padded with zeros, so
/// `"00"` parses to [`ZERO_HASH`].
pub fn hash_from_hex(s: &str) -> Result<Hash, RtidError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    if s.len() > 64 {
        return Err(RtidError::InvalidHex {
            reason: format!("hash has {} hex digits, expected at most 64", s.len()),
        });
    }
    let padded = format!("{:0>64}", s);
    let bytes = hex::decode(&padded).map_err(|e| RtidError::InvalidHex {
        reason: format!("'{}': {}", s, e),
    })?;
    let mut hash = ZERO_HASH;
    for (dst, src) in hash.iter_mut().zip(bytes.iter().rev()) {
        *dst = *src;
    }
    Ok(hash)
}

/// Render a hash in display order (byte-reversed hex).
pub fn hash_to_hex(hash: &Hash) -> String {
    let mut reversed = *hash;
    reversed.reverse();
    hex::encode(reversed)
}

/// Serde helper that writes a [`Hash`] as display-order hex.
pub mod serde_hash {
    use serde::{self, Deserialize, Deserializer, Serializer};

    use super::{hash_from_hex, hash_to_hex, Hash};

    pub fn serialize<S>(value: &Hash, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hash_to_hex(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Hash, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        hash_from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Serde helper for byte strings written as plain hex (scripts, prefixes).
pub mod serde_hex {
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S, T>(value: T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: AsRef<[u8]>,
    {
        serializer.serialize_str(&hex::encode(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_hex_is_byte_reversed() {
        let hash = hash_from_hex(
            "000000000019d6689c085ae165831e934ff763ae46a2a6c172b3f1b60a8ce26f",
        )
        .unwrap();
        assert_eq!(hash[31], 0x00);
        assert_eq!(hash[0], 0x6f);
        assert_eq!(
            hash_to_hex(&hash),
            "000000000019d6689c085ae165831e934ff763ae46a2a6c172b3f1b60a8ce26f"
        );
    }

    #[test]
    fn test_short_hex_is_left_padded() {
        assert_eq!(hash_from_hex("00").unwrap(), ZERO_HASH);
        assert_eq!(hash_from_hex("0x00").unwrap(), ZERO_HASH);
        assert_eq!(hash_from_hex("").unwrap(), ZERO_HASH);

        let one = hash_from_hex("01").unwrap();
        assert_eq!(one[0], 1);
        assert!(one[1..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_invalid_hex_rejected() {
        assert!(matches!(
            hash_from_hex("zz"),
            Err(RtidError::InvalidHex { .. })
        ));
        let too_long = "0".repeat(66);
        assert!(hash_from_hex(&too_long).is_err());
    }
}
