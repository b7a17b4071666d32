//! In-memory implementation of `Authorizer`.
//!
//! `GrantBook` is the reference stand-in for the external permission
//! system's grant table. The hosting application populates it at wiring
//! time and passes it into each mutator call; the oracle never grants or
//! revokes anything itself.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use holdgate_contracts::{Address, OracleError, OracleResult, RoleId};
use holdgate_core::traits::Authorizer;

/// A per-principal table of granted roles.
#[derive(Debug, Clone, Default)]
pub struct GrantBook {
    grants: HashMap<Address, HashSet<RoleId>>,
}

impl GrantBook {
    /// Create an empty grant table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant `role` to `who`. Idempotent.
    pub fn grant(&mut self, who: Address, role: RoleId) {
        self.grants.entry(who).or_default().insert(role);
    }

    /// Revoke `role` from `who`. A missing grant is a no-op.
    pub fn revoke(&mut self, who: &Address, role: &RoleId) {
        if let Some(roles) = self.grants.get_mut(who) {
            roles.remove(role);
        }
    }

    /// Return true if `who` holds `role`.
    pub fn has(&self, who: &Address, role: &RoleId) -> bool {
        self.grants
            .get(who)
            .map(|roles| roles.contains(role))
            .unwrap_or(false)
    }
}

impl Authorizer for GrantBook {
    fn ensure(&self, who: &Address, role: &RoleId) -> OracleResult<()> {
        if self.has(who, role) {
            Ok(())
        } else {
            warn!(who = %who, role = %role, "grant missing, caller rejected");
            Err(OracleError::Unauthorized {
                who: *who,
                role: *role,
            })
        }
    }
}
