//! # holdgate-contracts
//!
//! Shared types and error contracts for the HOLDGATE permission oracle.
//!
//! Every workspace crate imports from here. Only data definitions and the
//! error enum live in this crate; behavior belongs to `holdgate-core`.

pub mod address;
pub mod error;
pub mod role;
pub mod state;

pub use address::Address;
pub use error::{OracleError, OracleResult};
pub use role::{set_min_balance_role, set_token_role, RoleId};
pub use state::{OracleId, OracleState};
