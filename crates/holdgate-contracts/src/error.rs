//! Error types for the HOLDGATE oracle.
//!
//! All fallible operations across the workspace return `OracleResult<T>`.
//! Ordinary policy outcomes are NOT errors: an insufficient balance is a
//! normal `Ok(false)` decision. Errors are reserved for configuration
//! mistakes and malformed inputs.

use thiserror::Error;

use crate::address::Address;
use crate::role::RoleId;

/// The unified error type for the HOLDGATE workspace.
#[derive(Debug, Error)]
pub enum OracleError {
    /// A second call to `initialize`, regardless of arguments.
    #[error("oracle is already initialized")]
    AlreadyInitialized,

    /// Any operation invoked before `initialize` has succeeded.
    #[error("oracle is not initialized")]
    NotInitialized,

    /// `initialize` or `set_token` given an address with no deployed code.
    #[error("token address {address} is not a contract")]
    TokenNotContract { address: Address },

    /// The injected authorization context rejected the caller.
    ///
    /// Produced by the external permission system's `Authorizer`, never by
    /// the oracle itself.
    #[error("caller {who} does not hold role {role}")]
    Unauthorized { who: Address, role: RoleId },

    /// `can_perform` given more call parameters than the single defined
    /// threshold-override slot.
    #[error("unsupported parameter count {count}: at most one threshold override is accepted")]
    UnsupportedParams { count: usize },

    /// The reference ledger rejected a fixture operation (e.g. a transfer
    /// exceeding the sender's balance). Never produced by the oracle.
    #[error("ledger error: {reason}")]
    Ledger { reason: String },

    /// A setup descriptor is malformed or unreadable.
    #[error("configuration error: {reason}")]
    Config { reason: String },
}

/// Convenience alias used throughout the HOLDGATE crates.
pub type OracleResult<T> = Result<T, OracleError>;
