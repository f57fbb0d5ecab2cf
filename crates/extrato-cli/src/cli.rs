//! CLI argument definitions using clap
//!
//! This module contains the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Extrato - import bank statements and card invoices into your ledger
#[derive(Parser)]
#[command(name = "extrato")]
#[command(about = "Bank statement and invoice importer", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import transactions from a statement or invoice file
    Import {
        /// Statement file (.xls, .xlsx, .csv, .txt)
        #[arg(short, long)]
        file: PathBuf,

        /// Import profile: statement, invoice, or one defined in the
        /// profiles file
        #[arg(short, long, default_value = "statement")]
        profile: String,

        /// TOML file with user-defined import profiles
        #[arg(long)]
        profiles: Option<PathBuf>,

        /// JSON ledger holding existing transactions; also the commit
        /// target
        #[arg(short, long)]
        ledger: Option<PathBuf>,

        /// JSON file with income categories and expense groups
        #[arg(long)]
        categories: Option<PathBuf>,

        /// Check every item that received a category suggestion
        #[arg(long)]
        all: bool,

        /// With --all, also check items flagged as possible duplicates
        #[arg(long)]
        include_duplicates: bool,

        /// Append confirmed items to the ledger (requires --ledger)
        #[arg(long)]
        commit: bool,
    },

    /// List available import profiles
    Profiles {
        /// TOML file with user-defined import profiles
        #[arg(long)]
        profiles: Option<PathBuf>,
    },
}
