//! Setup descriptor types and installation.
//!
//! An `OracleSetup` is deserialized from TOML and describes one oracle
//! deployment: the token to watch, the minimum balance, and which
//! principals hold the management roles.
//!
//! Example:
//! ```toml
//! [oracle]
//! token = "0x00112233445566778899aabbccddeeff00112233"
//! min-balance = 100
//!
//! [[grants]]
//! who = "0xffeeddccbbaa99887766554433221100ffeeddcc"
//! role = "SET_TOKEN_ROLE"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use holdgate_contracts::{role, Address, OracleError, OracleResult, RoleId};
use holdgate_core::{traits::ContractRegistry, TokenBalanceOracle};
use holdgate_ledger::GrantBook;

/// The top-level structure deserialized from a TOML setup file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleSetup {
    /// The oracle's initial configuration.
    pub oracle: OracleSection,

    /// Management-role grants to install alongside the oracle.
    #[serde(default)]
    pub grants: Vec<GrantEntry>,
}

/// The `[oracle]` table: what `initialize` is called with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OracleSection {
    /// The fungible-token contract address. Must be a deployed contract at
    /// install time.
    pub token: Address,

    /// The initial minimum balance.
    pub min_balance: u128,
}

/// One `[[grants]]` entry: a principal and the role signature it holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantEntry {
    /// The principal receiving the grant.
    pub who: Address,

    /// The role signature string, e.g. `"SET_TOKEN_ROLE"`.
    pub role: String,
}

impl GrantEntry {
    /// Resolve the role signature to its identifier.
    ///
    /// Only the two management roles are meaningful on this oracle; anything
    /// else is a descriptor mistake.
    pub fn role_id(&self) -> OracleResult<RoleId> {
        match self.role.as_str() {
            "SET_TOKEN_ROLE" => Ok(role::set_token_role()),
            "SET_MIN_BALANCE_ROLE" => Ok(role::set_min_balance_role()),
            other => Err(OracleError::Config {
                reason: format!("unknown role signature '{}'", other),
            }),
        }
    }
}

impl OracleSetup {
    /// Parse `s` as TOML and build an `OracleSetup`.
    ///
    /// Returns `OracleError::Config` if the TOML is malformed or does not
    /// match the descriptor schema.
    pub fn from_toml_str(s: &str) -> OracleResult<Self> {
        toml::from_str(s).map_err(|e| OracleError::Config {
            reason: format!("failed to parse oracle setup TOML: {}", e),
        })
    }

    /// Read the file at `path` and parse it as a setup descriptor.
    pub fn from_file(path: &Path) -> OracleResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| OracleError::Config {
            reason: format!("failed to read setup file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Install the descriptor: initialize a fresh oracle and populate a
    /// grant table.
    ///
    /// Role signatures are resolved before the oracle is touched, so a
    /// descriptor with an unknown role never produces a half-installed
    /// deployment. Initialization failures (`TokenNotContract`) propagate
    /// unchanged.
    pub fn install(
        &self,
        registry: &dyn ContractRegistry,
    ) -> OracleResult<(TokenBalanceOracle, GrantBook)> {
        let mut grants = GrantBook::new();
        for entry in &self.grants {
            grants.grant(entry.who, entry.role_id()?);
        }

        let mut oracle = TokenBalanceOracle::new();
        oracle.initialize(registry, self.oracle.token, self.oracle.min_balance)?;

        info!(
            oracle_id = %oracle.id(),
            token = %self.oracle.token,
            min_balance = self.oracle.min_balance,
            grant_count = self.grants.len(),
            "oracle installed from descriptor"
        );
        Ok((oracle, grants))
    }
}
