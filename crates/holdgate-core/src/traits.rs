//! Boundary traits for the external collaborators.
//!
//! The oracle touches the outside world through three seams:
//!
//! - `BalanceSource`    — the fungible-token contract (read-only balance query)
//! - `ContractRegistry` — the hosting ledger's code-existence probe
//! - `Authorizer`       — the permission system's capability check, injected
//!                        into each mutator call
//!
//! `PermissionOracle` is the fourth trait: the uniform shape the permission
//! system calls ANY policy oracle through, whatever the oracle inspects.

use holdgate_contracts::{Address, OracleResult, RoleId};

/// The fungible-token collaborator.
///
/// Implementations are read-only from the oracle's perspective: the oracle
/// assumes no side effects from a balance query and never caches the result;
/// every decision reads the balance at query time.
pub trait BalanceSource: Send + Sync {
    /// Return `holder`'s balance of `token`.
    ///
    /// An unknown (token, holder) pair reads as zero.
    fn balance_of(&self, token: &Address, holder: &Address) -> u128;
}

/// Code-existence probe for the hosting ledger.
///
/// Used exactly twice in the oracle's lifetime per token reference: when a
/// token address is installed by `initialize` or replaced by `set_token`.
/// The reference is never re-validated afterward.
pub trait ContractRegistry: Send + Sync {
    /// Return true if a contract is deployed at `address`.
    fn is_contract(&self, address: &Address) -> bool;
}

/// The injected authorization context.
///
/// Role enforcement belongs to the external permission system; the oracle
/// only invokes the context it is handed and propagates the verdict. This
/// keeps the oracle's own code correct independent of how capabilities are
/// granted.
pub trait Authorizer: Send + Sync {
    /// Return `Ok(())` if `who` holds `role`, `Err(Unauthorized)` otherwise.
    fn ensure(&self, who: &Address, role: &RoleId) -> OracleResult<()>;
}

/// The uniform decision interface a permission system delegates to.
///
/// `target` and `role` are part of the call shape so every policy oracle can
/// be invoked identically; an individual oracle is free to ignore them.
pub trait PermissionOracle: Send + Sync {
    /// Decide whether `who` may perform `role` on `target`.
    ///
    /// `Ok(false)` is an ordinary denial; `Err` is reserved for
    /// configuration errors and malformed inputs. Callers treat both as
    /// "do not permit".
    fn can_perform(
        &self,
        balances: &dyn BalanceSource,
        who: &Address,
        target: &Address,
        role: &RoleId,
        params: &[u128],
    ) -> OracleResult<bool>;
}
