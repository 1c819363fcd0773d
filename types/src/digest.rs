//! Fixed-length one-way digest used to anonymize fingerprints and IPs.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A 32-byte (256-bit) digest.
///
/// Human-readable formats (JSON, TOML) carry it as a 64-character lowercase
/// hex string; binary formats carry the raw bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; 32]);

impl Digest {
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex rendering, 64 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            let mut bytes = [0u8; 32];
            hex::decode_to_slice(&s, &mut bytes)
                .map_err(|e| D::Error::custom(format!("expected 64 hex characters: {e}")))?;
            Ok(Self(bytes))
        } else {
            <[u8; 32]>::deserialize(deserializer).map(Self)
        }
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_uses_hex_string() {
        let digest = Digest::new([0xab; 32]);
        let json = serde_json::to_string(&digest).unwrap();
        assert_eq!(json, format!("\"{}\"", "ab".repeat(32)));
        let back: Digest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, digest);
    }

    #[test]
    fn json_rejects_short_hex() {
        assert!(serde_json::from_str::<Digest>("\"abcd\"").is_err());
    }

    #[test]
    fn json_rejects_non_hex_and_overlong() {
        let bad = format!("\"{}\"", "zz".repeat(32));
        assert!(serde_json::from_str::<Digest>(&bad).is_err());
        let long = format!("\"{}\"", "ab".repeat(33));
        assert!(serde_json::from_str::<Digest>(&long).is_err());
    }

    #[test]
    fn json_accepts_uppercase_hex() {
        let upper = format!("\"{}\"", "AB".repeat(32));
        let digest: Digest = serde_json::from_str(&upper).unwrap();
        assert_eq!(digest, Digest::new([0xab; 32]));
        assert_eq!(digest.to_string(), "ab".repeat(32));
    }
}
