//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use chrono::NaiveDate;
use extrato_core::{ExistingTransaction, NewTransaction, TransactionStore, TransactionType};
use tempfile::tempdir;

use crate::commands::{self, truncate, JsonLedger};

const STATEMENT_CSV: &str = "\
Extrato Conta Corrente\n\
\n\
Data;Histórico;Valor\n\
15/03/2024;PIX RECEBIDO JOAO;150,00\n\
16/03/2024;SUPERMERCADO BOM PRECO;-89,90\n\
17/03/2024;SALDO ANTERIOR;1.000,00\n";

fn write_statement(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("extrato.csv");
    std::fs::write(&path, STATEMENT_CSV).unwrap();
    path
}

fn new_tx(date: &str, description: &str, amount: f64) -> NewTransaction {
    NewTransaction {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        description: description.to_string(),
        amount,
        kind: TransactionType::Expense,
        group: "Alimentação".to_string(),
        observation: format!("Importado: {}", description),
    }
}

// ========== Import Command Tests ==========

#[test]
fn test_cmd_import_review_only() {
    let dir = tempdir().unwrap();
    let file = write_statement(&dir);

    let result = commands::cmd_import(&file, "statement", None, None, None, false, false, false);
    assert!(result.is_ok());
}

#[test]
fn test_cmd_import_unknown_profile() {
    let dir = tempdir().unwrap();
    let file = write_statement(&dir);

    let result = commands::cmd_import(&file, "nope", None, None, None, false, false, false);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("nope"));
}

#[test]
fn test_cmd_import_commit_requires_ledger() {
    let dir = tempdir().unwrap();
    let file = write_statement(&dir);

    let result = commands::cmd_import(&file, "statement", None, None, None, true, false, true);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("--ledger"));
}

#[test]
fn test_cmd_import_commit_appends_suggested_items() {
    let dir = tempdir().unwrap();
    let file = write_statement(&dir);
    let ledger_path = dir.path().join("ledger.json");

    // Seed the ledger with a history entry so SUPERMERCADO gets a
    // suggestion and becomes committable with --all
    let history = vec![ExistingTransaction {
        date: NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
        description: "Mercado".to_string(),
        amount: 120.0,
        kind: TransactionType::Expense,
        group: "Alimentação".to_string(),
        observation: Some("Importado: SUPERMERCADO BOM PRECO".to_string()),
    }];
    std::fs::write(&ledger_path, serde_json::to_string(&history).unwrap()).unwrap();

    let result = commands::cmd_import(
        &file,
        "statement",
        None,
        Some(ledger_path.as_path()),
        None,
        true,
        false,
        true,
    );
    assert!(result.is_ok());

    let rows: Vec<ExistingTransaction> =
        serde_json::from_str(&std::fs::read_to_string(&ledger_path).unwrap()).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].description, "Mercado");
    assert_eq!(rows[1].group, "Alimentação");
    assert_eq!(
        rows[1].observation.as_deref(),
        Some("Importado: SUPERMERCADO BOM PRECO")
    );
}

#[test]
fn test_cmd_import_missing_file() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.csv");

    let result = commands::cmd_import(&missing, "statement", None, None, None, false, false, false);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Failed to open"));
}

#[test]
fn test_cmd_import_with_user_profiles_file() {
    let dir = tempdir().unwrap();
    let file = write_statement(&dir);

    let profiles_path = dir.path().join("profiles.toml");
    std::fs::write(
        &profiles_path,
        "[[profile]]\nname = \"meu-banco\"\nsign_convention = \"negative_is_expense\"\n",
    )
    .unwrap();

    let result = commands::cmd_import(
        &file,
        "meu-banco",
        Some(profiles_path.as_path()),
        None,
        None,
        false,
        false,
        false,
    );
    assert!(result.is_ok());
}

// ========== JsonLedger Tests ==========

#[test]
fn test_json_ledger_missing_file_is_empty() {
    let dir = tempdir().unwrap();
    let ledger = JsonLedger::open(&dir.path().join("new.json")).unwrap();
    assert!(ledger.rows().is_empty());
}

#[test]
fn test_json_ledger_append_persists() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ledger.json");

    let mut ledger = JsonLedger::open(&path).unwrap();
    ledger.append(&new_tx("2024-03-16", "Mercado", 89.90)).unwrap();
    ledger.append(&new_tx("2024-03-17", "Combustível", 200.0)).unwrap();

    // Re-open and verify both rows survived
    let reopened = JsonLedger::open(&path).unwrap();
    assert_eq!(reopened.rows().len(), 2);
    assert_eq!(reopened.rows()[0].description, "Mercado");
    assert_eq!(
        reopened.rows()[0].observation.as_deref(),
        Some("Importado: Mercado")
    );
    assert_eq!(reopened.rows()[1].description, "Combustível");
}

#[test]
fn test_json_ledger_rejects_malformed_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ledger.json");
    std::fs::write(&path, "not json at all").unwrap();

    let result = JsonLedger::open(&path);
    assert!(result.is_err());
}

// ========== Profiles Command Tests ==========

#[test]
fn test_cmd_profiles_builtins_only() {
    let result = commands::cmd_profiles(None);
    assert!(result.is_ok());
}

#[test]
fn test_cmd_profiles_with_user_file() {
    let dir = tempdir().unwrap();
    let profiles_path = dir.path().join("profiles.toml");
    std::fs::write(
        &profiles_path,
        "[[profile]]\nname = \"fatura-xp\"\nsign_convention = \"negative_is_income\"\namount_synonyms = [\"valor em r$\"]\n",
    )
    .unwrap();

    let result = commands::cmd_profiles(Some(profiles_path.as_path()));
    assert!(result.is_ok());
}

#[test]
fn test_cmd_profiles_missing_file() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    let result = commands::cmd_profiles(Some(missing.as_path()));
    assert!(result.is_err());
}

// ========== Helper Function Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a long string that exceeds", 10), "a long ..."); // 7 chars + "..."
    assert_eq!(truncate("exact", 5), "exact");
    assert_eq!(truncate("toolong", 6), "too...");
    // Multi-byte descriptions must not split inside a character
    assert_eq!(truncate("cartão de crédito", 9), "cartão...");
}
