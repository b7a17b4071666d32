//! HOLDGATE — Token-Balance Oracle Demo CLI
//!
//! Deploys an in-memory ledger with a 1000-supply token split 900/100/0
//! across three holders, installs the oracle from a TOML descriptor, and
//! walks the acceptance scenarios: stored-minimum decisions, call-scoped
//! threshold overrides, and the guarded admin operations.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- thresholds
//!   cargo run -p demo -- overrides
//!   cargo run -p demo -- admin

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use holdgate_config::OracleSetup;
use holdgate_contracts::{Address, OracleError, OracleResult, RoleId};
use holdgate_core::TokenBalanceOracle;
use holdgate_ledger::{GrantBook, InMemoryLedger};

// ── CLI definition ────────────────────────────────────────────────────────────

/// HOLDGATE — balance-gated permission oracle demo.
///
/// Each subcommand deploys a fresh fixture and prints every decision and
/// admin outcome for one scenario group.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "HOLDGATE token-balance oracle demo",
    long_about = "Walks the HOLDGATE oracle through its acceptance scenarios:\n\
                  stored-minimum decisions, call-scoped overrides, and the\n\
                  capability-gated admin operations."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all three scenario groups in sequence.
    RunAll,
    /// Decisions against the stored minimum, then after lowering it to 1 and 0.
    Thresholds,
    /// Call-scoped threshold overrides that persist nothing.
    Overrides,
    /// The guarded mutators: reinitialization, bad tokens, missing grants.
    Admin,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Structured logging; set RUST_LOG=debug to watch each balance decision.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result = match cli.command {
        Command::RunAll => run_all(),
        Command::Thresholds => run_thresholds(),
        Command::Overrides => run_overrides(),
        Command::Admin => run_admin(),
    };

    match result {
        Ok(()) => {
            println!("All selected scenarios completed successfully.");
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_all() -> OracleResult<()> {
    run_thresholds()?;
    run_overrides()?;
    run_admin()?;
    Ok(())
}

// ── Fixture ───────────────────────────────────────────────────────────────────

/// One deployed fixture: ledger, oracle, grants, and the named principals.
struct Deployment {
    ledger: InMemoryLedger,
    oracle: TokenBalanceOracle,
    grants: GrantBook,
    manager: Address,
    alice: Address,
    bob: Address,
    carol: Address,
}

impl Deployment {
    /// The role identifier the surrounding permission system would ask
    /// about. This oracle ignores it; any value works.
    fn action_role() -> RoleId {
        RoleId::from_signature("PROTECTED_ACTION")
    }

    fn decide(&self, who: &Address, params: &[u128]) -> OracleResult<bool> {
        self.oracle
            .can_perform(&self.ledger, who, &Address::ANY, &Self::action_role(), params)
    }

    fn print_decision(&self, label: &str, who: &Address, params: &[u128]) -> OracleResult<()> {
        let permitted = self.decide(who, params)?;
        let params_desc = if params.is_empty() {
            String::new()
        } else {
            format!(", params = {:?}", params)
        };
        println!(
            "  can_perform({}{}) = {}",
            label,
            params_desc,
            if permitted { "PERMIT" } else { "DENY" }
        );
        Ok(())
    }
}

/// Deploy the acceptance fixture: supply 1000, held 900/100/0 by
/// alice/bob/carol; the manager holds both management roles; the oracle
/// starts at minimum balance 100.
fn deploy() -> OracleResult<Deployment> {
    let ledger = InMemoryLedger::new();

    let manager = ledger.register_account();
    let alice = ledger.register_account();
    let bob = ledger.register_account();
    let carol = ledger.register_account();

    let token = ledger.deploy_token(&alice, 1000);
    ledger.transfer(&token, &alice, &bob, 100)?;

    let descriptor = format!(
        "[oracle]\n\
         token = \"{token}\"\n\
         min-balance = 100\n\
         \n\
         [[grants]]\n\
         who = \"{manager}\"\n\
         role = \"SET_TOKEN_ROLE\"\n\
         \n\
         [[grants]]\n\
         who = \"{manager}\"\n\
         role = \"SET_MIN_BALANCE_ROLE\"\n"
    );
    let setup = OracleSetup::from_toml_str(&descriptor)?;
    let (oracle, grants) = setup.install(&ledger)?;

    tracing::info!(
        oracle_id = %oracle.id(),
        token = %token,
        "demo fixture deployed"
    );

    Ok(Deployment {
        ledger,
        oracle,
        grants,
        manager,
        alice,
        bob,
        carol,
    })
}

// ── Scenario groups ───────────────────────────────────────────────────────────

fn run_thresholds() -> OracleResult<()> {
    println!("=== Scenario group: stored-minimum thresholds ===");
    println!();
    println!("  Holdings: alice = 900, bob = 100, carol = 0");
    println!();

    let mut d = deploy()?;

    println!("  Stored minimum balance: 100 (bob sits exactly on the boundary)");
    d.print_decision("alice", &d.alice, &[])?;
    d.print_decision("bob", &d.bob, &[])?;
    d.print_decision("carol", &d.carol, &[])?;
    println!();

    println!("  Manager lowers the minimum to 1");
    d.oracle.set_min_balance(&d.manager, &d.grants, 1)?;
    d.print_decision("alice", &d.alice, &[])?;
    d.print_decision("bob", &d.bob, &[])?;
    d.print_decision("carol", &d.carol, &[])?;
    println!();

    println!("  Manager lowers the minimum to 0; every subject passes");
    d.oracle.set_min_balance(&d.manager, &d.grants, 0)?;
    d.print_decision("alice", &d.alice, &[])?;
    d.print_decision("bob", &d.bob, &[])?;
    d.print_decision("carol", &d.carol, &[])?;
    println!();

    Ok(())
}

fn run_overrides() -> OracleResult<()> {
    println!("=== Scenario group: call-scoped threshold overrides ===");
    println!();

    let mut d = deploy()?;
    d.oracle.set_min_balance(&d.manager, &d.grants, 1)?;

    println!("  Stored minimum is 1; a single call parameter overrides it to 900");
    d.print_decision("alice", &d.alice, &[900])?;
    d.print_decision("bob", &d.bob, &[900])?;
    println!();

    println!(
        "  Stored minimum afterwards: {} (the override persisted nothing)",
        d.oracle.min_balance()?
    );
    d.print_decision("bob", &d.bob, &[])?;
    println!();

    println!("  Two or more parameters are not defined for this oracle:");
    match d.decide(&d.alice, &[900, 100]) {
        Err(OracleError::UnsupportedParams { count }) => {
            println!("  can_perform(alice, params = [900, 100]) -> UnsupportedParams ({count})");
        }
        other => println!("  unexpected outcome: {:?}", other),
    }
    println!();

    Ok(())
}

fn run_admin() -> OracleResult<()> {
    println!("=== Scenario group: guarded admin operations ===");
    println!();

    let mut d = deploy()?;

    println!("  Second initialize is rejected regardless of arguments:");
    let token = d.oracle.token()?;
    match d.oracle.initialize(&d.ledger, token, 1) {
        Err(OracleError::AlreadyInitialized) => {
            println!("  initialize(..) -> AlreadyInitialized");
        }
        other => println!("  unexpected outcome: {:?}", other),
    }
    println!();

    println!("  Replacing the token with a codeless account is rejected:");
    let plain_account = d.ledger.register_account();
    match d
        .oracle
        .set_token(&d.manager, &d.grants, &d.ledger, plain_account)
    {
        Err(OracleError::TokenNotContract { address }) => {
            println!("  set_token({address}) -> TokenNotContract");
        }
        other => println!("  unexpected outcome: {:?}", other),
    }
    println!("  token unchanged: {}", d.oracle.token()? == token);
    println!();

    println!("  A caller without the management grant is rejected:");
    match d.oracle.set_min_balance(&d.carol, &d.grants, 0) {
        Err(OracleError::Unauthorized { who, .. }) => {
            println!("  set_min_balance by {who} -> Unauthorized");
        }
        other => println!("  unexpected outcome: {:?}", other),
    }
    println!();

    println!("  The manager swaps in a second token held only by carol:");
    let second = d.ledger.deploy_token(&d.carol, 500);
    d.oracle.set_token(&d.manager, &d.grants, &d.ledger, second)?;
    d.print_decision("alice", &d.alice, &[])?;
    d.print_decision("carol", &d.carol, &[])?;
    println!();

    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("HOLDGATE — Token-Balance Permission Oracle");
    println!("==========================================");
    println!();
    println!("Decision rule per query:");
    println!("  [1] Require an installed configuration (NotInitialized otherwise)");
    println!("  [2] Effective threshold = stored minimum, or the single call parameter");
    println!("  [3] PERMIT iff balance_of(subject) >= threshold (equality permits)");
    println!();
}
