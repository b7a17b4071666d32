//! Account and contract addresses.
//!
//! An `Address` identifies a principal or a deployed contract on the hosting
//! ledger. The oracle never interprets address bytes; it only compares them
//! and hands them to its collaborators.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::OracleError;

/// A 20-byte ledger address.
///
/// Rendered as `0x`-prefixed lowercase hex, e.g.
/// `0xffffffffffffffffffffffffffffffffffffffff`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; 20]);

impl Address {
    /// The all-zero address. No contract or principal ever lives here.
    pub const ZERO: Address = Address([0u8; 20]);

    /// The broadcast address the surrounding permission system uses to mean
    /// "any target" when querying an oracle.
    pub const ANY: Address = Address([0xff; 20]);

    /// Construct an address from raw bytes.
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Borrow the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Mint a fresh, unique address.
    ///
    /// Used by the in-memory ledger when registering contracts and accounts,
    /// and by tests that need distinct principals.
    pub fn random() -> Self {
        let mut bytes = [0u8; 20];
        bytes[..16].copy_from_slice(uuid::Uuid::new_v4().as_bytes());
        bytes[16..].copy_from_slice(&uuid::Uuid::new_v4().as_bytes()[..4]);
        Self(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = OracleError;

    /// Parse a `0x`-prefixed (or bare) 40-character hex string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(stripped).map_err(|e| OracleError::Config {
            reason: format!("invalid address '{}': {}", s, e),
        })?;
        let bytes: [u8; 20] = bytes.try_into().map_err(|_| OracleError::Config {
            reason: format!("invalid address '{}': expected 20 bytes", s),
        })?;
        Ok(Self(bytes))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
