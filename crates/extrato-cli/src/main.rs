//! Extrato CLI - bank statement and invoice importer
//!
//! Usage:
//!   extrato import --file extrato.xls              Review items from a statement
//!   extrato import --file fatura.csv -p invoice    Review items from a card invoice
//!   extrato import --file f.xls --ledger l.json --all --commit
//!                                                  Import suggested items into the ledger
//!   extrato profiles                               List available import profiles

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Import {
            file,
            profile,
            profiles,
            ledger,
            categories,
            all,
            include_duplicates,
            commit,
        } => commands::cmd_import(
            &file,
            &profile,
            profiles.as_deref(),
            ledger.as_deref(),
            categories.as_deref(),
            all,
            include_duplicates,
            commit,
        ),
        Commands::Profiles { profiles } => commands::cmd_profiles(profiles.as_deref()),
    }
}
