//! Oracle identity and persisted configuration.
//!
//! `OracleState` is the single configuration record behind every decision:
//! which token to query and the minimum balance a subject must hold. One
//! record exists per oracle instance and it lives for the instance's whole
//! lifetime.

use serde::{Deserialize, Serialize};

use crate::address::Address;

/// Unique identifier for one deployed oracle instance.
///
/// Appears in every structured log line the engine emits, so decisions from
/// different instances in the same process can be told apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OracleId(pub uuid::Uuid);

impl OracleId {
    /// Create a new, unique oracle ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for OracleId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OracleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The persisted oracle configuration.
///
/// The engine holds `Option<OracleState>`: `None` until `initialize`
/// succeeds, `Some` forever after. The presence of the record IS the
/// initialized flag, so the false→true transition happens exactly once by
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleState {
    /// The fungible-token contract whose balances gate decisions.
    ///
    /// Weak reference: proven to be a contract when set, never re-validated.
    pub token: Address,

    /// The stored minimum balance. Unbounded above; zero means every
    /// subject passes.
    pub min_balance: u128,
}
