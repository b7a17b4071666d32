//! # holdgate-config
//!
//! TOML deployment descriptors for the HOLDGATE oracle.
//!
//! ## Overview
//!
//! This crate provides [`OracleSetup`]: a declarative description of one
//! oracle deployment (token address, minimum balance, and management-role
//! grants) loaded from TOML and installed onto a fresh
//! [`TokenBalanceOracle`](holdgate_core::TokenBalanceOracle) plus a
//! [`GrantBook`](holdgate_ledger::GrantBook).
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use holdgate_config::OracleSetup;
//!
//! let setup = OracleSetup::from_file(Path::new("deploy/oracle.toml"))?;
//! let (oracle, grants) = setup.install(&ledger)?;
//! ```

pub mod setup;

pub use setup::{GrantEntry, OracleSection, OracleSetup};

// ── Tests ─────────────────────────────────────────────────────────────────────
