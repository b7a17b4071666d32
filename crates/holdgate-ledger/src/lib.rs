//! # holdgate-ledger
//!
//! In-memory reference implementations of the HOLDGATE collaborator traits.
//!
//! ## Overview
//!
//! The oracle's external collaborators (the hosting chain's contract
//! registry, the fungible token, and the permission system's grant table)
//! are represented here by two in-memory components:
//!
//! - [`InMemoryLedger`] implements `BalanceSource` + `ContractRegistry`
//! - [`GrantBook`] implements `Authorizer`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use holdgate_ledger::{GrantBook, InMemoryLedger};
//!
//! let ledger = InMemoryLedger::new();
//! let holder = ledger.register_account();
//! let token = ledger.deploy_token(&holder, 1000);
//!
//! let mut grants = GrantBook::new();
//! grants.grant(holder, holdgate_contracts::set_token_role());
//! ```

pub mod grants;
pub mod memory;

pub use grants::GrantBook;
pub use memory::InMemoryLedger;

// ── Tests ─────────────────────────────────────────────────────────────────────
