//! rolekit Church Administration Reference — Demo CLI
//!
//! Runs one or all of the role composition scenarios. Each scenario uses the
//! real engine (selection store, projection, hydrator, serializer) and editing
//! session, wired to a mock catalog and an in-memory role directory.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- create-role
//!   cargo run -p demo -- edit-role
//!   cargo run -p demo -- anomalies
//!   cargo run -p demo -- degraded
//!   cargo run -p demo -- check-config path/to/selection.toml

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rolekit_contracts::error::RolekitResult;
use rolekit_ref_ministry::scenarios::{create_role, degraded, edit_role, quirks};
use rolekit_selection::EngineConfig;

// ── CLI definition ────────────────────────────────────────────────────────────

/// rolekit — role permission composition demo.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "rolekit church administration reference demo",
    long_about = "Runs rolekit scenarios showing group and permission selection,\n\
                  tri-state rendering, edit-mode hydration, and the two-tier payload."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all four scenarios in sequence.
    RunAll,
    /// Scenario 1: create a role mixing whole groups and single permissions.
    CreateRole,
    /// Scenario 2: edit stored roles, including one with orphan ids.
    EditRole,
    /// Scenario 3: empty selected groups and stray checked permissions.
    Anomalies,
    /// Scenario 4: catalog and role directory outages.
    Degraded,
    /// Parse an engine config file and print the effective settings.
    CheckConfig {
        /// Path to a TOML engine config.
        path: PathBuf,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug to see every toggle and serialization.
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
        Command::CreateRole => create_role::run_scenario(),
        Command::EditRole => edit_role::run_scenario(),
        Command::Anomalies => quirks::run_scenario(),
        Command::Degraded => degraded::run_scenario(),
        Command::CheckConfig { path } => check_config(path),
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

// ── Dispatch ──────────────────────────────────────────────────────────────────

fn run_all() -> RolekitResult<()> {
    create_role::run_scenario()?;
    edit_role::run_scenario()?;
    quirks::run_scenario()?;
    degraded::run_scenario()?;
    Ok(())
}

fn check_config(path: PathBuf) -> RolekitResult<()> {
    let config = EngineConfig::from_file(&path)?;
    println!("  Config:                 {}", path.display());
    println!("  Stray permissions:      {:?}", config.stray_permissions);
    println!("  Empty groups:           {:?}", config.empty_groups);
    println!("  Bulk needs 2+ perms:    {}", config.bulk_requires_multiple);
    println!();
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("rolekit — Role Permission Composition");
    println!("Church Administration Reference Demo");
    println!("====================================");
    println!();
    println!("Composition pipeline per session:");
    println!("  [1] Catalog fetched once; edit mode also fetches the role");
    println!("  [2] Hydrator seeds the selection from the role's group and permission ids");
    println!("  [3] Toggles: a group toggle checks/unchecks the whole group;");
    println!("      checking a permission opts its group in, unchecking never opts it out");
    println!("  [4] Projection renders each group as checked / indeterminate / unchecked");
    println!("  [5] Serializer sends group ids, plus permission ids only for partial groups");
    println!();
}
