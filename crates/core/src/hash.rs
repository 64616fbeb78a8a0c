//! Content digests using SHA-256

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest as _, Sha256};

use crate::error::SyncError;

/// A SHA-256 content digest (256-bit)
///
/// Two manifests are only comparable when their digests come from the same
/// algorithm; everything in modsync uses this type.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; 32]);

impl Digest {
    /// Hash arbitrary bytes
    #[must_use]
    pub fn from_bytes(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }

    /// Get raw bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Canonical lowercase hex rendering
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for Digest {
    type Err = SyncError;

    /// Parse a hex digest; mixed case is accepted, output is always lowercase.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|_| SyncError::InvalidDigest {
            value: s.to_string(),
        })?;
        let raw: [u8; 32] = bytes.try_into().map_err(|_| SyncError::InvalidDigest {
            value: s.to_string(),
        })?;
        Ok(Self(raw))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.to_hex();
        write!(f, "Digest({})", hex.get(..16).unwrap_or(&hex))
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_deterministic() {
        let data = b"hello world";
        let h1 = Digest::from_bytes(data);
        let h2 = Digest::from_bytes(data);
        assert_eq!(h1, h2);
    }

    #[test]
    fn test_digest_different_data() {
        let h1 = Digest::from_bytes(b"hello");
        let h2 = Digest::from_bytes(b"world");
        assert_ne!(h1, h2);
    }

    #[test]
    fn test_digest_known_vector() {
        // sha256("abc")
        let h = Digest::from_bytes(b"abc");
        assert_eq!(
            h.to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        let h = Digest::from_bytes(b"abc");
        let upper = h.to_hex().to_uppercase();
        let parsed: Digest = upper.parse().unwrap();
        assert_eq!(parsed, h);
        assert_eq!(parsed.to_hex(), h.to_hex());
    }

    #[test]
    fn test_parse_rejects_bad_length_and_garbage() {
        assert!("abcd".parse::<Digest>().is_err());
        assert!("zz".repeat(32).parse::<Digest>().is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let h = Digest::from_bytes(b"payload");
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, format!("\"{}\"", h.to_hex()));
        let back: Digest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, h);
    }
}
