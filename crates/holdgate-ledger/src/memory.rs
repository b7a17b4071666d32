//! In-memory implementation of `BalanceSource` and `ContractRegistry`.
//!
//! `InMemoryLedger` is the reference stand-in for the chain the oracle is
//! deployed on: a set of addresses that "have code" plus per-token balance
//! tables. Tests and the demo use it to arrange holdings; the oracle only
//! ever reads from it through the boundary traits.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use holdgate_contracts::{Address, OracleError, OracleResult};
use holdgate_core::traits::{BalanceSource, ContractRegistry};

// ── Internal mutable state ────────────────────────────────────────────────────

/// The mutable interior of an `InMemoryLedger`.
///
/// Kept behind `Arc<Mutex<_>>` so the ledger can be shared across threads by
/// a hosting process while the oracle performs read-only queries.
pub(crate) struct LedgerState {
    /// Addresses with deployed code.
    pub(crate) contracts: HashSet<Address>,

    /// token → holder → balance. Absent entries read as zero.
    pub(crate) balances: HashMap<Address, HashMap<Address, u128>>,
}

// ── Public ledger ─────────────────────────────────────────────────────────────

/// An in-memory ledger of contracts and fungible-token balances.
///
/// # Thread safety
///
/// Every method acquires a `Mutex` internally; clones of the `Arc` may be
/// held by multiple threads without additional synchronization.
pub struct InMemoryLedger {
    state: Arc<Mutex<LedgerState>>,
}

impl InMemoryLedger {
    /// Create an empty ledger: no contracts, no balances.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(LedgerState {
                contracts: HashSet::new(),
                balances: HashMap::new(),
            })),
        }
    }

    /// Register a fresh address as having deployed code.
    pub fn register_contract(&self) -> Address {
        let addr = Address::random();
        let mut state = self.state.lock().expect("ledger state lock poisoned");
        state.contracts.insert(addr);
        debug!(address = %addr, "contract registered");
        addr
    }

    /// Mint a fresh externally-owned account address, one WITHOUT code.
    ///
    /// Useful for exercising the `TokenNotContract` rejection paths.
    pub fn register_account(&self) -> Address {
        Address::random()
    }

    /// Deploy a token contract and credit its entire supply to one holder.
    pub fn deploy_token(&self, initial_holder: &Address, supply: u128) -> Address {
        let token = Address::random();
        let mut state = self.state.lock().expect("ledger state lock poisoned");
        state.contracts.insert(token);
        state
            .balances
            .entry(token)
            .or_default()
            .insert(*initial_holder, supply);

        info!(
            token = %token,
            holder = %initial_holder,
            supply,
            "token deployed"
        );
        token
    }

    /// Move `amount` of `token` from one holder to another.
    ///
    /// Fixture plumbing for tests and the demo; the oracle never transfers.
    pub fn transfer(
        &self,
        token: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> OracleResult<()> {
        let mut state = self.state.lock().expect("ledger state lock poisoned");
        let accounts = state.balances.entry(*token).or_default();

        let from_balance = accounts.get(from).copied().unwrap_or(0);
        if from_balance < amount {
            return Err(OracleError::Ledger {
                reason: format!(
                    "transfer of {} from {} exceeds balance {}",
                    amount, from, from_balance
                ),
            });
        }

        accounts.insert(*from, from_balance - amount);
        *accounts.entry(*to).or_insert(0) += amount;

        debug!(token = %token, from = %from, to = %to, amount, "transfer");
        Ok(())
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

// ── Boundary trait impls ──────────────────────────────────────────────────────

impl BalanceSource for InMemoryLedger {
    /// Current balance at query time; unknown (token, holder) pairs are zero.
    fn balance_of(&self, token: &Address, holder: &Address) -> u128 {
        let state = self.state.lock().expect("ledger state lock poisoned");
        state
            .balances
            .get(token)
            .and_then(|accounts| accounts.get(holder))
            .copied()
            .unwrap_or(0)
    }
}

impl ContractRegistry for InMemoryLedger {
    fn is_contract(&self, address: &Address) -> bool {
        let state = self.state.lock().expect("ledger state lock poisoned");
        state.contracts.contains(address)
    }
}
