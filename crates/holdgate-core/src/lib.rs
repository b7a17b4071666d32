//! # holdgate-core
//!
//! The decision engine and collaborator boundary of the HOLDGATE permission
//! oracle.
//!
//! This crate provides:
//! - The four boundary traits (`BalanceSource`, `ContractRegistry`,
//!   `Authorizer`, `PermissionOracle`)
//! - The `TokenBalanceOracle` engine: one-time initialization,
//!   capability-gated setters, and the pure `can_perform` decision
//!
//! ## Usage
//!
//! ```rust,ignore
//! use holdgate_core::{TokenBalanceOracle, traits::{BalanceSource, Authorizer}};
//!
//! let mut oracle = TokenBalanceOracle::new();
//! oracle.initialize(&registry, token, 100)?;
//! let permitted = oracle.can_perform(&balances, &who, &target, &role, &[])?;
//! ```

pub mod oracle;
pub mod traits;

pub use oracle::TokenBalanceOracle;
