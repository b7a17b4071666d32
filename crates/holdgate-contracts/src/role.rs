//! Role identifiers.
//!
//! A role names one protected action. Identifiers are derived by hashing the
//! role's signature string, so any component that knows the signature can
//! recompute the identifier without a shared registry.

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

/// A 32-byte role identifier: SHA-256 of the role signature string.
///
/// Example: `RoleId::from_signature("SET_TOKEN_ROLE")`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoleId([u8; 32]);

impl RoleId {
    /// Derive the identifier for a role signature.
    ///
    /// Deterministic: the same signature always yields the same identifier.
    pub fn from_signature(signature: &str) -> Self {
        let digest = Sha256::digest(signature.as_bytes());
        Self(digest.into())
    }

    /// Construct a role identifier from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Borrow the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for RoleId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RoleId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let stripped = s.strip_prefix("0x").unwrap_or(&s);
        let bytes = hex::decode(stripped).map_err(de::Error::custom)?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| de::Error::custom(format!("role id '{}' is not 32 bytes", s)))?;
        Ok(Self(bytes))
    }
}

/// The role guarding `set_token`.
pub fn set_token_role() -> RoleId {
    RoleId::from_signature("SET_TOKEN_ROLE")
}

/// The role guarding `set_min_balance`.
pub fn set_min_balance_role() -> RoleId {
    RoleId::from_signature("SET_MIN_BALANCE_ROLE")
}
