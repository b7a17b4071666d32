//! The token-balance decision engine.
//!
//! `TokenBalanceOracle` answers one question for the surrounding permission
//! system: does the acting principal hold at least the required balance of
//! the configured token? Configuration changes go through the guarded
//! mutators; the decision path never writes.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use holdgate_contracts::{
    role, Address, OracleError, OracleId, OracleResult, OracleState, RoleId,
};

use crate::traits::{Authorizer, BalanceSource, ContractRegistry, PermissionOracle};

/// A permission oracle gating actions on a minimum fungible-token balance.
///
/// Lifecycle: constructed empty, populated exactly once by [`initialize`],
/// then mutated field-by-field by the capability-gated setters. Decisions
/// via [`can_perform`] read the current configuration and the live token
/// balance; nothing is cached between calls.
///
/// [`initialize`]: TokenBalanceOracle::initialize
/// [`can_perform`]: TokenBalanceOracle::can_perform
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenBalanceOracle {
    id: OracleId,
    state: Option<OracleState>,
}

impl TokenBalanceOracle {
    /// Create an uninitialized oracle with a fresh instance id.
    pub fn new() -> Self {
        Self::with_id(OracleId::new())
    }

    /// Create an uninitialized oracle with a caller-chosen instance id.
    pub fn with_id(id: OracleId) -> Self {
        Self { id, state: None }
    }

    /// This instance's id, as it appears in log fields.
    pub fn id(&self) -> &OracleId {
        &self.id
    }

    /// True once `initialize` has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// A snapshot of the current configuration, if initialized.
    pub fn state(&self) -> Option<&OracleState> {
        self.state.as_ref()
    }

    /// The configured token reference.
    pub fn token(&self) -> OracleResult<Address> {
        Ok(self.state.as_ref().ok_or(OracleError::NotInitialized)?.token)
    }

    /// The stored minimum balance.
    pub fn min_balance(&self) -> OracleResult<u128> {
        Ok(self
            .state
            .as_ref()
            .ok_or(OracleError::NotInitialized)?
            .min_balance)
    }

    // ── Admin operations ─────────────────────────────────────────────────────

    /// One-time installation of the configuration record.
    ///
    /// Fails with `AlreadyInitialized` on any second call, regardless of
    /// arguments, and with `TokenNotContract` if `token` has no deployed
    /// code. On failure nothing is written.
    pub fn initialize(
        &mut self,
        registry: &dyn ContractRegistry,
        token: Address,
        min_balance: u128,
    ) -> OracleResult<()> {
        if self.state.is_some() {
            return Err(OracleError::AlreadyInitialized);
        }
        if !registry.is_contract(&token) {
            return Err(OracleError::TokenNotContract { address: token });
        }

        info!(
            oracle_id = %self.id,
            token = %token,
            min_balance,
            "oracle initialized"
        );
        self.state = Some(OracleState { token, min_balance });
        Ok(())
    }

    /// Replace the token reference. The minimum balance is untouched.
    ///
    /// Checks run in order (initialized, caller authorization, token code)
    /// and all of them precede the write, so a failed call leaves the
    /// configuration unchanged.
    pub fn set_token(
        &mut self,
        caller: &Address,
        acl: &dyn Authorizer,
        registry: &dyn ContractRegistry,
        new_token: Address,
    ) -> OracleResult<()> {
        let state = self.state.as_mut().ok_or(OracleError::NotInitialized)?;
        acl.ensure(caller, &role::set_token_role())?;
        if !registry.is_contract(&new_token) {
            return Err(OracleError::TokenNotContract { address: new_token });
        }

        info!(
            oracle_id = %self.id,
            old_token = %state.token,
            new_token = %new_token,
            caller = %caller,
            "token reference replaced"
        );
        state.token = new_token;
        Ok(())
    }

    /// Replace the stored minimum balance, unconditionally, including zero.
    pub fn set_min_balance(
        &mut self,
        caller: &Address,
        acl: &dyn Authorizer,
        new_min: u128,
    ) -> OracleResult<()> {
        let state = self.state.as_mut().ok_or(OracleError::NotInitialized)?;
        acl.ensure(caller, &role::set_min_balance_role())?;

        info!(
            oracle_id = %self.id,
            old_min = state.min_balance,
            new_min,
            caller = %caller,
            "minimum balance replaced"
        );
        state.min_balance = new_min;
        Ok(())
    }

    // ── Decision engine ──────────────────────────────────────────────────────

    /// Decide whether `who` holds a sufficient balance.
    ///
    /// 1. Require an installed configuration; fail `NotInitialized`
    ///    otherwise. An uninitialized oracle is a configuration error, never
    ///    a silent denial.
    /// 2. Resolve the effective threshold: the stored minimum, or the single
    ///    call parameter as a call-scoped override. Longer parameter arrays
    ///    fail with `UnsupportedParams`.
    /// 3. Query the token collaborator for `who`'s balance and permit iff
    ///    `balance >= threshold`. Equality permits; a zero threshold permits
    ///    every subject.
    ///
    /// The subject is always the acting principal; parameters never
    /// redirect the decision to another address. `target` and `role` are
    /// accepted for interface conformance and do not affect the outcome.
    ///
    /// Takes `&self` and writes nothing: safe to evaluate from a read-only
    /// context, any number of times. Insufficient balance is `Ok(false)`,
    /// never an error.
    pub fn can_perform(
        &self,
        balances: &dyn BalanceSource,
        who: &Address,
        target: &Address,
        role: &RoleId,
        params: &[u128],
    ) -> OracleResult<bool> {
        let state = self.state.as_ref().ok_or(OracleError::NotInitialized)?;

        let threshold = match params {
            [] => state.min_balance,
            [override_min] => *override_min,
            more => {
                return Err(OracleError::UnsupportedParams { count: more.len() });
            }
        };

        let balance = balances.balance_of(&state.token, who);
        let permitted = balance >= threshold;

        debug!(
            oracle_id = %self.id,
            subject = %who,
            target = %target,
            role = %role,
            token = %state.token,
            balance,
            threshold,
            permitted,
            "balance decision"
        );

        Ok(permitted)
    }
}

impl Default for TokenBalanceOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl PermissionOracle for TokenBalanceOracle {
    fn can_perform(
        &self,
        balances: &dyn BalanceSource,
        who: &Address,
        target: &Address,
        role: &RoleId,
        params: &[u128],
    ) -> OracleResult<bool> {
        TokenBalanceOracle::can_perform(self, balances, who, target, role, params)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use holdgate_contracts::{
        role, Address, OracleError, OracleResult, RoleId,
    };

    use crate::traits::{Authorizer, BalanceSource, ContractRegistry, PermissionOracle};

    use super::TokenBalanceOracle;

    // ── Mock collaborators ───────────────────────────────────────────────────

    /// A minimal chain: a set of deployed contracts plus token balances.
    struct TestChain {
        contracts: HashSet<Address>,
        balances: HashMap<(Address, Address), u128>,
    }

    impl TestChain {
        fn new() -> Self {
            Self {
                contracts: HashSet::new(),
                balances: HashMap::new(),
            }
        }

        fn deploy_contract(&mut self) -> Address {
            let addr = Address::random();
            self.contracts.insert(addr);
            addr
        }

        fn set_balance(&mut self, token: Address, holder: Address, amount: u128) {
            self.balances.insert((token, holder), amount);
        }
    }

    impl ContractRegistry for TestChain {
        fn is_contract(&self, address: &Address) -> bool {
            self.contracts.contains(address)
        }
    }

    impl BalanceSource for TestChain {
        fn balance_of(&self, token: &Address, holder: &Address) -> u128 {
            self.balances.get(&(*token, *holder)).copied().unwrap_or(0)
        }
    }

    /// An authorizer that grants every (who, role) pair.
    struct OpenAcl;

    impl Authorizer for OpenAcl {
        fn ensure(&self, _who: &Address, _role: &RoleId) -> OracleResult<()> {
            Ok(())
        }
    }

    /// An authorizer that rejects every (who, role) pair.
    struct DenyAcl;

    impl Authorizer for DenyAcl {
        fn ensure(&self, who: &Address, role: &RoleId) -> OracleResult<()> {
            Err(OracleError::Unauthorized {
                who: *who,
                role: *role,
            })
        }
    }

    /// An authorizer holding exactly one grant.
    struct SingleGrantAcl {
        who: Address,
        role: RoleId,
    }

    impl Authorizer for SingleGrantAcl {
        fn ensure(&self, who: &Address, role: &RoleId) -> OracleResult<()> {
            if *who == self.who && *role == self.role {
                Ok(())
            } else {
                Err(OracleError::Unauthorized {
                    who: *who,
                    role: *role,
                })
            }
        }
    }

    // ── Fixture ──────────────────────────────────────────────────────────────

    /// Supply 1000 split 900 / 100 / 0 across three holders, mirroring the
    /// acceptance scenarios.
    struct Fixture {
        chain: TestChain,
        oracle: TokenBalanceOracle,
        token: Address,
        rich: Address,
        exact: Address,
        broke: Address,
    }

    fn fixture(min_balance: u128) -> Fixture {
        let mut chain = TestChain::new();
        let token = chain.deploy_contract();

        let rich = Address::random();
        let exact = Address::random();
        let broke = Address::random();
        chain.set_balance(token, rich, 900);
        chain.set_balance(token, exact, 100);

        let mut oracle = TokenBalanceOracle::new();
        oracle
            .initialize(&chain, token, min_balance)
            .expect("fixture initialization");

        Fixture {
            chain,
            oracle,
            token,
            rich,
            exact,
            broke,
        }
    }

    fn decide(f: &Fixture, who: &Address, params: &[u128]) -> bool {
        f.oracle
            .can_perform(&f.chain, who, &Address::ANY, &role::set_token_role(), params)
            .unwrap()
    }

    // ── Initialization ───────────────────────────────────────────────────────

    #[test]
    fn test_initialize_installs_state() {
        let f = fixture(100);

        assert!(f.oracle.is_initialized());
        assert_eq!(f.oracle.token().unwrap(), f.token);
        assert_eq!(f.oracle.min_balance().unwrap(), 100);
    }

    #[test]
    fn test_reinitialize_rejected() {
        let mut f = fixture(100);
        let other_token = f.chain.deploy_contract();

        let result = f.oracle.initialize(&f.chain, other_token, 5);

        assert!(matches!(result, Err(OracleError::AlreadyInitialized)));

        // Neither field changed.
        assert_eq!(f.oracle.token().unwrap(), f.token);
        assert_eq!(f.oracle.min_balance().unwrap(), 100);
    }

    #[test]
    fn test_initialize_requires_contract() {
        let chain = TestChain::new();
        let plain_account = Address::random();

        let mut oracle = TokenBalanceOracle::new();
        let result = oracle.initialize(&chain, plain_account, 100);

        match result {
            Err(OracleError::TokenNotContract { address }) => {
                assert_eq!(address, plain_account);
            }
            other => panic!("expected TokenNotContract, got {:?}", other),
        }
        assert!(!oracle.is_initialized());
    }

    #[test]
    fn test_operations_require_initialization() {
        let mut chain = TestChain::new();
        let token = chain.deploy_contract();
        let caller = Address::random();

        let mut oracle = TokenBalanceOracle::new();

        assert!(matches!(
            oracle.set_token(&caller, &OpenAcl, &chain, token),
            Err(OracleError::NotInitialized)
        ));
        assert!(matches!(
            oracle.set_min_balance(&caller, &OpenAcl, 0),
            Err(OracleError::NotInitialized)
        ));
        assert!(matches!(
            oracle.can_perform(&chain, &caller, &Address::ANY, &role::set_token_role(), &[]),
            Err(OracleError::NotInitialized)
        ));
        assert!(matches!(oracle.token(), Err(OracleError::NotInitialized)));
        assert!(matches!(
            oracle.min_balance(),
            Err(OracleError::NotInitialized)
        ));
    }

    // ── Decisions ────────────────────────────────────────────────────────────

    #[test]
    fn test_decision_tracks_balance_against_stored_minimum() {
        let f = fixture(100);

        assert!(decide(&f, &f.rich, &[]), "900 >= 100");
        assert!(decide(&f, &f.exact, &[]), "100 >= 100, boundary permits");
        assert!(!decide(&f, &f.broke, &[]), "0 < 100");
    }

    #[test]
    fn test_min_balance_monotonicity() {
        let mut f = fixture(100);
        let admin = Address::random();

        // Raise above the rich holder's balance: true flips to false.
        f.oracle.set_min_balance(&admin, &OpenAcl, 901).unwrap();
        assert!(!decide(&f, &f.rich, &[]));

        // Lower to exactly the balance: equality permits again.
        f.oracle.set_min_balance(&admin, &OpenAcl, 900).unwrap();
        assert!(decide(&f, &f.rich, &[]));

        // Lower below: still permitted.
        f.oracle.set_min_balance(&admin, &OpenAcl, 1).unwrap();
        assert!(decide(&f, &f.rich, &[]));
        assert!(decide(&f, &f.exact, &[]));
        assert!(!decide(&f, &f.broke, &[]), "zero balance never meets 1");
    }

    #[test]
    fn test_zero_minimum_permits_everyone() {
        let mut f = fixture(100);
        let admin = Address::random();

        f.oracle.set_min_balance(&admin, &OpenAcl, 0).unwrap();

        assert!(decide(&f, &f.rich, &[]));
        assert!(decide(&f, &f.exact, &[]));
        assert!(decide(&f, &f.broke, &[]), "zero threshold permits zero balance");
    }

    #[test]
    fn test_override_param_is_call_scoped() {
        let f = fixture(1);

        assert!(decide(&f, &f.rich, &[900]), "900 >= 900 override");
        assert!(!decide(&f, &f.exact, &[900]), "100 < 900 override");

        // The override persisted nothing.
        assert_eq!(f.oracle.min_balance().unwrap(), 1);
        assert!(decide(&f, &f.exact, &[]), "stored minimum of 1 still applies");
    }

    #[test]
    fn test_extra_params_rejected() {
        let f = fixture(100);

        let cases: [&[u128]; 2] = [&[900, 100], &[1, 2, 3]];
        for params in cases {
            match f.oracle.can_perform(
                &f.chain,
                &f.rich,
                &Address::ANY,
                &role::set_token_role(),
                params,
            ) {
                Err(OracleError::UnsupportedParams { count }) => {
                    assert_eq!(count, params.len());
                }
                other => panic!("expected UnsupportedParams, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_target_and_role_do_not_affect_decision() {
        let f = fixture(100);
        let targets = [Address::ANY, Address::ZERO, Address::random()];
        let roles = [role::set_token_role(), RoleId::from_signature("ARBITRARY")];

        for target in &targets {
            for role_id in &roles {
                assert!(f
                    .oracle
                    .can_perform(&f.chain, &f.rich, target, role_id, &[])
                    .unwrap());
                assert!(!f
                    .oracle
                    .can_perform(&f.chain, &f.broke, target, role_id, &[])
                    .unwrap());
            }
        }
    }

    #[test]
    fn test_decision_leaves_state_untouched() {
        let f = fixture(100);
        let before = f.oracle.state().cloned();

        for _ in 0..5 {
            decide(&f, &f.rich, &[]);
            decide(&f, &f.broke, &[7]);
        }

        assert_eq!(f.oracle.state().cloned(), before);
    }

    // ── Mutators ─────────────────────────────────────────────────────────────

    #[test]
    fn test_set_token_requires_contract() {
        let mut f = fixture(100);
        let admin = Address::random();
        let plain_account = Address::random();

        let result = f
            .oracle
            .set_token(&admin, &OpenAcl, &f.chain, plain_account);

        assert!(matches!(
            result,
            Err(OracleError::TokenNotContract { .. })
        ));
        assert_eq!(f.oracle.token().unwrap(), f.token, "token unchanged on failure");
    }

    #[test]
    fn test_set_token_redirects_decisions() {
        let mut f = fixture(100);
        let admin = Address::random();

        // A second token where only the previously-broke holder is funded.
        let second = f.chain.deploy_contract();
        f.chain.set_balance(second, f.broke, 500);

        f.oracle.set_token(&admin, &OpenAcl, &f.chain, second).unwrap();

        assert_eq!(f.oracle.token().unwrap(), second);
        assert_eq!(f.oracle.min_balance().unwrap(), 100, "minimum untouched");

        // Future decisions read the new token's balances.
        assert!(!decide(&f, &f.rich, &[]), "rich holds none of the new token");
        assert!(decide(&f, &f.broke, &[]), "broke holds 500 of the new token");
    }

    #[test]
    fn test_mutators_respect_authorizer() {
        let mut f = fixture(100);
        let intruder = Address::random();
        let second = f.chain.deploy_contract();

        let result = f.oracle.set_token(&intruder, &DenyAcl, &f.chain, second);
        match result {
            Err(OracleError::Unauthorized { who, role }) => {
                assert_eq!(who, intruder);
                assert_eq!(role, role::set_token_role());
            }
            other => panic!("expected Unauthorized, got {:?}", other),
        }

        assert!(matches!(
            f.oracle.set_min_balance(&intruder, &DenyAcl, 0),
            Err(OracleError::Unauthorized { .. })
        ));

        // Nothing changed.
        assert_eq!(f.oracle.token().unwrap(), f.token);
        assert_eq!(f.oracle.min_balance().unwrap(), 100);
    }

    #[test]
    fn test_grants_are_per_role() {
        let mut f = fixture(100);
        let token_admin = Address::random();
        let acl = SingleGrantAcl {
            who: token_admin,
            role: role::set_token_role(),
        };

        let second = f.chain.deploy_contract();
        f.oracle
            .set_token(&token_admin, &acl, &f.chain, second)
            .unwrap();

        // The token-role holder cannot touch the minimum balance.
        assert!(matches!(
            f.oracle.set_min_balance(&token_admin, &acl, 0),
            Err(OracleError::Unauthorized { .. })
        ));
    }

    // ── Interface conformance ────────────────────────────────────────────────

    #[test]
    fn test_callable_through_trait_object() {
        let f = fixture(100);
        let oracle: &dyn PermissionOracle = &f.oracle;

        assert!(oracle
            .can_perform(&f.chain, &f.rich, &Address::ANY, &role::set_token_role(), &[])
            .unwrap());
        assert!(!oracle
            .can_perform(&f.chain, &f.broke, &Address::ANY, &role::set_token_role(), &[])
            .unwrap());
    }

    /// The six acceptance scenarios, end to end against one oracle.
    #[test]
    fn test_acceptance_walkthrough() {
        let mut f = fixture(100);
        let admin = Address::random();

        // 1. Stored minimum 100.
        assert!(decide(&f, &f.rich, &[]));
        assert!(decide(&f, &f.exact, &[]));
        assert!(!decide(&f, &f.broke, &[]));

        // 2. Lower the minimum to 1.
        f.oracle.set_min_balance(&admin, &OpenAcl, 1).unwrap();
        assert!(decide(&f, &f.rich, &[]));
        assert!(decide(&f, &f.exact, &[]));
        assert!(!decide(&f, &f.broke, &[]));

        // 3. Call-scoped override of 900.
        assert!(decide(&f, &f.rich, &[900]));
        assert!(!decide(&f, &f.exact, &[900]));
        assert_eq!(f.oracle.min_balance().unwrap(), 1);

        // 4. Rejected token replacement.
        let plain_account = Address::random();
        assert!(matches!(
            f.oracle.set_token(&admin, &OpenAcl, &f.chain, plain_account),
            Err(OracleError::TokenNotContract { .. })
        ));
        assert_eq!(f.oracle.token().unwrap(), f.token);

        // 5. Rejected reinitialization.
        assert!(matches!(
            f.oracle.initialize(&f.chain, f.token, 1000),
            Err(OracleError::AlreadyInitialized)
        ));

        // 6. Zero minimum permits everyone.
        f.oracle.set_min_balance(&admin, &OpenAcl, 0).unwrap();
        assert!(decide(&f, &f.rich, &[]));
        assert!(decide(&f, &f.exact, &[]));
        assert!(decide(&f, &f.broke, &[]));
    }
}
