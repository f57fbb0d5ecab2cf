//! File import command: run the pipeline, print the review table, and
//! optionally commit confirmed items to a JSON ledger

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;
use extrato_core::{
    import_bytes, load_profiles, resolve_profile, CategoryRegistry, ExistingTransaction,
    NewTransaction, ReviewSession, TransactionStore, TransactionType,
};

use super::truncate;

/// Flat-file transaction store backed by a JSON array of transactions.
///
/// Each append pushes the new row and rewrites the whole file, so a commit
/// that fails midway leaves every already-appended row on disk.
pub struct JsonLedger {
    path: PathBuf,
    rows: Vec<ExistingTransaction>,
}

impl JsonLedger {
    /// Open a ledger file, treating a missing file as an empty ledger
    pub fn open(path: &Path) -> Result<Self> {
        let rows = load_ledger(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            rows,
        })
    }

    pub fn rows(&self) -> &[ExistingTransaction] {
        &self.rows
    }
}

impl TransactionStore for JsonLedger {
    fn append(&mut self, transaction: &NewTransaction) -> extrato_core::Result<()> {
        self.rows.push(ExistingTransaction {
            date: transaction.date,
            description: transaction.description.clone(),
            amount: transaction.amount,
            kind: transaction.kind,
            group: transaction.group.clone(),
            observation: Some(transaction.observation.clone()),
        });
        let json = serde_json::to_string_pretty(&self.rows)
            .map_err(|e| extrato_core::Error::Append(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| extrato_core::Error::Append(e.to_string()))
    }
}

/// Read an existing-transaction corpus from a JSON ledger file
fn load_ledger(path: &Path) -> Result<Vec<ExistingTransaction>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read ledger file: {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse ledger file as JSON: {}", path.display()))
}

/// Read the category registry, falling back to the built-in defaults
fn load_categories(path: Option<&Path>) -> Result<CategoryRegistry> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read categories file: {}", path.display()))?;
            serde_json::from_str(&json).with_context(|| {
                format!("Failed to parse categories file as JSON: {}", path.display())
            })
        }
        None => Ok(CategoryRegistry::default()),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_import(
    file: &Path,
    profile_name: &str,
    profiles_path: Option<&Path>,
    ledger_path: Option<&Path>,
    categories_path: Option<&Path>,
    all: bool,
    include_duplicates: bool,
    commit: bool,
) -> Result<()> {
    if commit && ledger_path.is_none() {
        anyhow::bail!("--commit requires --ledger so the confirmed items have somewhere to go");
    }

    let user_profiles = match profiles_path {
        Some(path) => load_profiles(path)
            .with_context(|| format!("Failed to load profiles from {}", path.display()))?,
        None => Vec::new(),
    };
    let profile = resolve_profile(profile_name, &user_profiles)?;

    let registry = load_categories(categories_path)?;
    let ledger = match ledger_path {
        Some(path) => Some(JsonLedger::open(path)?),
        None => None,
    };
    let existing = ledger.as_ref().map(|l| l.rows().to_vec()).unwrap_or_default();

    let bytes = fs::read(file)
        .with_context(|| format!("Failed to open file: {}", file.display()))?;

    println!(
        "📥 Importing {} with the '{}' profile...",
        file.display(),
        profile.name
    );

    let items = import_bytes(&bytes, &profile, &existing, &registry)?;
    debug!("Classified {} items against {} existing transactions", items.len(), existing.len());
    println!("   Found {} transactions", items.len());

    let mut session = ReviewSession::new(items);
    if all {
        session.set_all(true);
        if !include_duplicates {
            let duplicate_ids: Vec<String> = session
                .items()
                .iter()
                .filter(|i| i.is_possible_duplicate)
                .map(|i| i.id.clone())
                .collect();
            for id in duplicate_ids {
                session.toggle(&id);
            }
        }
    }

    print_review_table(&session);

    let duplicates = session
        .items()
        .iter()
        .filter(|i| i.is_possible_duplicate)
        .count();
    if duplicates > 0 {
        println!("⚠️  {} possible duplicates flagged (not excluded)", duplicates);
    }
    println!("   Confirmed for import: {}", session.confirmed_count());

    if commit {
        // Checked by the guard at the top
        let Some(mut ledger) = ledger else {
            anyhow::bail!("--commit requires --ledger");
        };

        let outcome = session.commit(&mut ledger);
        match outcome.failed {
            None => println!("✅ Appended {} transactions to the ledger", outcome.appended),
            Some((index, e)) => {
                anyhow::bail!(
                    "Commit stopped at item {}: {} ({} already appended)",
                    index + 1,
                    e,
                    outcome.appended
                );
            }
        }
    } else if session.confirmed_count() > 0 {
        println!("💡 Re-run with --ledger FILE --commit to append the confirmed items");
    }

    Ok(())
}

/// Render the session as a fixed-width review table
fn print_review_table(session: &ReviewSession) {
    println!();
    println!(
        "   {:<3} {:<10} {:<40} {:>12}  {:<30}",
        "", "Date", "Description", "Amount", "Suggestion"
    );

    for item in session.items() {
        let mark = if item.is_checked { "[x]" } else { "[ ]" };
        let signed = match item.kind {
            TransactionType::Income => item.amount,
            TransactionType::Expense => -item.amount,
        };
        let suggestion = if item.selected_category.is_empty() {
            String::new()
        } else if item.selected_group.is_empty() {
            item.selected_category.clone()
        } else {
            format!("{} / {}", item.selected_group, item.selected_category)
        };
        let badge = if item.is_possible_duplicate { " ⚠️" } else { "" };

        println!(
            "   {:<3} {:<10} {:<40} {:>12.2}  {:<30}{}",
            mark,
            item.date.format("%d/%m/%Y"),
            truncate(&item.description, 40),
            signed,
            truncate(&suggestion, 30),
            badge
        );
    }
    println!();
}
