//! End-to-end pipeline tests: file bytes in, reviewable items out

use chrono::NaiveDate;
use extrato_core::{
    import_bytes, CategoryRegistry, Error, ExistingTransaction, ImportProfile, ReviewSession,
    TransactionStore, TransactionType,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn registry() -> CategoryRegistry {
    CategoryRegistry::default()
}

#[test]
fn imports_latin1_semicolon_statement() {
    // "Histórico" and "não" encoded as ISO-8859-1, as banks export them
    let bytes: Vec<u8> = [
        &b"Extrato de Conta Corrente\n"[..],
        &b"Data;Hist\xf3rico;Valor\n"[..],
        &b"15/03/2024;Mercado Central;-120,50\n"[..],
        &b"16/03/2024;Sal\xe1rio;3.500,00\n"[..],
        &b"17/03/2024;SALDO ANTERIOR;900,00\n"[..],
    ]
    .concat();

    let items = import_bytes(&bytes, &ImportProfile::statement(), &[], &registry()).unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].date, date(2024, 3, 15));
    assert_eq!(items[0].description, "Mercado Central");
    assert_eq!(items[0].amount, 120.50);
    assert_eq!(items[0].kind, TransactionType::Expense);

    assert_eq!(items[1].description, "Salário");
    assert_eq!(items[1].amount, 3500.00);
    assert_eq!(items[1].kind, TransactionType::Income);
}

#[test]
fn imports_credit_debit_layout() {
    let bytes = b"Data;Lancamento;Credito;Debito\n\
                  15/03/2024;Deposito;1000,00;\n\
                  15/03/2024;Compra cartao;;45,00\n\
                  15/03/2024;Linha vazia;;\n";

    let items = import_bytes(bytes, &ImportProfile::statement(), &[], &registry()).unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].amount, 1000.00);
    assert_eq!(items[0].kind, TransactionType::Income);
    assert_eq!(items[1].amount, 45.00);
    assert_eq!(items[1].kind, TransactionType::Expense);
}

#[test]
fn multi_card_invoice_concatenates_header_blocks() {
    // Two header blocks, as multi-card invoices export one per card; the
    // later header supersedes the column map for the rows beneath it
    let bytes = b"Cartao final 1111\n\
                  Data;Lancamento;Valor\n\
                  10/03/2024;RESTAURANTE A;80,00\n\
                  Cartao final 2222\n\
                  Data;Lancamento;Credito;Debito\n\
                  11/03/2024;ESTORNO;25,00;\n\
                  12/03/2024;LOJA B;;60,00\n";

    let items = import_bytes(bytes, &ImportProfile::invoice(), &[], &registry()).unwrap();

    assert_eq!(items.len(), 3);
    // First block: single column under the invoice convention
    // (positive = charge = expense)
    assert_eq!(items[0].kind, TransactionType::Expense);
    assert_eq!(items[0].amount, 80.00);
    // Second block: split columns carry their own direction
    assert_eq!(items[1].kind, TransactionType::Income);
    assert_eq!(items[2].kind, TransactionType::Expense);
}

#[test]
fn duplicate_flagged_and_prefilled_from_history() {
    let corpus = vec![ExistingTransaction {
        date: date(2024, 3, 15),
        description: "Mercado".to_string(),
        amount: 120.50,
        kind: TransactionType::Expense,
        group: "Alimentação".to_string(),
        observation: Some("Importado: Mercado Central".to_string()),
    }];
    let bytes = b"Data;Historico;Valor\n15/03/2024;Mercado Central;-120,50\n";

    let items = import_bytes(bytes, &ImportProfile::statement(), &corpus, &registry()).unwrap();

    assert!(items[0].is_possible_duplicate);
    assert!(!items[0].is_checked);
    assert_eq!(items[0].selected_category, "Mercado");
    assert_eq!(items[0].selected_group, "Alimentação");
}

#[test]
fn pipeline_is_idempotent() {
    let corpus = vec![ExistingTransaction {
        date: date(2024, 3, 15),
        description: "Mercado".to_string(),
        amount: 120.50,
        kind: TransactionType::Expense,
        group: "Alimentação".to_string(),
        observation: Some("Importado: Mercado Central".to_string()),
    }];
    let bytes = b"Data;Historico;Valor\n\
                  15/03/2024;Mercado Central;-120,50\n\
                  16/03/2024;PADARIA;-8,00\n";

    let profile = ImportProfile::statement();
    let reg = registry();
    let first = import_bytes(bytes, &profile, &corpus, &reg).unwrap();
    let second = import_bytes(bytes, &profile, &corpus, &reg).unwrap();
    assert_eq!(first, second);
}

#[test]
fn unreadable_spreadsheet_is_a_decode_error() {
    // ZIP magic with garbage content: claims XLSX, cannot be decoded
    let bytes = b"PK\x03\x04not actually a workbook";
    let result = import_bytes(bytes, &ImportProfile::statement(), &[], &registry());
    assert!(matches!(result, Err(Error::FileDecode(_))));
}

#[derive(Default)]
struct Ledger {
    rows: Vec<extrato_core::NewTransaction>,
}

impl TransactionStore for Ledger {
    fn append(&mut self, transaction: &extrato_core::NewTransaction) -> extrato_core::Result<()> {
        self.rows.push(transaction.clone());
        Ok(())
    }
}

#[test]
fn review_and_commit_round_trip() {
    let bytes = b"Data;Historico;Valor\n\
                  15/03/2024;MERCADO CENTRAL;-120,50\n\
                  16/03/2024;POSTO SHELL;-200,00\n";
    let reg = registry();
    let items = import_bytes(bytes, &ImportProfile::statement(), &[], &reg).unwrap();

    let mut session = ReviewSession::new(items);
    let first_id = session.items()[0].id.clone();
    session.set_category(&first_id, "Mercado", &reg);
    // Second item stays unchecked: it must not be committed

    let mut ledger = Ledger::default();
    let outcome = session.commit(&mut ledger);

    assert!(outcome.is_complete());
    assert_eq!(ledger.rows.len(), 1);
    assert_eq!(ledger.rows[0].description, "Mercado");
    assert_eq!(ledger.rows[0].group, "Alimentação");
    assert_eq!(ledger.rows[0].observation, "Importado: MERCADO CENTRAL");
    assert_eq!(ledger.rows[0].date, date(2024, 3, 15));
}
