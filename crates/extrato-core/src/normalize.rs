//! Row normalization: raw cells to candidate transactions
//!
//! Applies, in order: date parsing (native, spreadsheet serial, or text),
//! description assembly with a statement-boilerplate blacklist, amount
//! parsing with locale-aware separator handling, and sign/type resolution.
//! Rows that fail any step are silently dropped; a statement with a few
//! malformed trailer rows should still import the valid majority.

use std::sync::OnceLock;

use chrono::{Datelike, Duration, NaiveDate};
use regex::Regex;
use tracing::debug;

use crate::locate::{AmountSource, HeaderBlock};
use crate::models::{CandidateTransaction, TransactionType};
use crate::profile::{ImportProfile, SignConvention};
use crate::sheet::RawCell;

/// Amounts closer to zero than this carry no financial meaning
const AMOUNT_EPSILON: f64 = 0.005;

/// Spreadsheet serials at or below this are not dates (pre-1954); card
/// exports use tiny serials as placeholder values
const MIN_DATE_SERIAL: f64 = 20000.0;

/// Placeholder when both description columns are empty
const FALLBACK_DESCRIPTION: &str = "Sem descrição";

/// Statement boilerplate phrases; a row whose assembled description
/// contains any of these is not a transaction
const DESCRIPTION_BLACKLIST: &[&str] = &[
    "saldo anterior",
    "saldo atual",
    "saldo final",
    "subtotal",
    "total",
    "limite",
    "resumo",
    "bloqueado",
    "disponível",
    "disponivel",
    "titular",
    "no período desta fatura",
];

static EMPTY_CELL: RawCell = RawCell::Empty;

fn cell(row: &[RawCell], idx: usize) -> &RawCell {
    row.get(idx).unwrap_or(&EMPTY_CELL)
}

fn opt_cell(row: &[RawCell], idx: Option<usize>) -> &RawCell {
    idx.map(|i| cell(row, i)).unwrap_or(&EMPTY_CELL)
}

/// Normalize all data rows below the located headers, preserving original
/// row order. Rows that fail date, description, or amount resolution are
/// dropped, never errored.
pub fn normalize_rows(
    grid: &[Vec<RawCell>],
    blocks: &[HeaderBlock],
    profile: &ImportProfile,
) -> Vec<CandidateTransaction> {
    let mut candidates = Vec::new();

    for (i, block) in blocks.iter().enumerate() {
        let data_start = block.header_row + 1;
        let data_end = blocks
            .get(i + 1)
            .map(|next| next.header_row)
            .unwrap_or(grid.len());

        for row in &grid[data_start..data_end] {
            if row.is_empty() {
                continue;
            }
            let Some(date) = parse_any_date(cell(row, block.columns.date)) else {
                continue;
            };
            let Some(description) = assemble_description(row, block) else {
                continue;
            };
            let Some((amount, kind)) =
                resolve_amount(row, &block.columns.amount, profile.sign_convention)
            else {
                continue;
            };
            candidates.push(CandidateTransaction {
                date,
                description,
                amount,
                kind,
            });
        }
    }

    debug!("Normalized {} candidate rows", candidates.len());
    candidates
}

/// Parse a date out of a raw cell.
///
/// Native date cells are used directly, unless they carry a known
/// placeholder (year 0001, or the zero serial 1899-12-30). Numeric cells
/// are treated as spreadsheet serials only when plausibly a modern date
/// (> 20000, i.e. post-1954), converted against the 1899-12-30 epoch and
/// rounded to the whole day so time-of-day fractions never shift the
/// calendar date. Text is matched DD/MM/YYYY-family first, then
/// YYYY/MM/DD-family. Anything else yields `None`.
pub fn parse_any_date(value: &RawCell) -> Option<NaiveDate> {
    match value {
        RawCell::Date(date) => {
            if is_placeholder_date(*date) {
                None
            } else {
                Some(*date)
            }
        }
        RawCell::Number(serial) => {
            if *serial > MIN_DATE_SERIAL {
                serial_to_date(*serial)
            } else {
                None
            }
        }
        RawCell::Text(text) => parse_text_date(text),
        RawCell::Empty => None,
    }
}

fn is_placeholder_date(date: NaiveDate) -> bool {
    date.year() <= 1 || (date.year() == 1899 && date.month() == 12 && date.day() == 30)
}

fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    let days = serial.round() as i64;
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(days))
}

fn dmy_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Prefix guard keeps the day group from starting inside a 4-digit
        // year ("2024-03-15" must not read as 24/03/2015)
        Regex::new(r"(?:^|[^\d])(\d{1,2})[/\-.](\d{1,2})[/\-.](\d{2,4})\b")
            .expect("valid regex")
    })
}

fn ymd_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:^|[^\d])(\d{4})[/\-.](\d{1,2})[/\-.](\d{1,2})\b")
            .expect("valid regex")
    })
}

fn parse_text_date(text: &str) -> Option<NaiveDate> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| !matches!(c, '\u{200B}'..='\u{200D}' | '\u{FEFF}'))
        .collect();
    if cleaned.is_empty() || cleaned.contains("01/01/0001") {
        return None;
    }

    if let Some(caps) = dmy_regex().captures(&cleaned) {
        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let mut year: i32 = caps[3].parse().ok()?;
        if caps[3].len() == 2 {
            year += 2000;
        }
        if year <= 1 {
            return None;
        }
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = ymd_regex().captures(&cleaned) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        if year <= 1 {
            return None;
        }
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    None
}

/// Concatenate the description and details columns; returns `None` when
/// the assembled text matches statement boilerplate (row must be dropped).
fn assemble_description(row: &[RawCell], block: &HeaderBlock) -> Option<String> {
    let text_of = |c: &RawCell| -> String {
        match c {
            RawCell::Text(s) => s.trim().to_string(),
            RawCell::Number(n) => n.to_string(),
            _ => String::new(),
        }
    };

    let main = text_of(opt_cell(row, block.columns.description));
    let details = text_of(opt_cell(row, block.columns.details));

    let assembled = match (main.is_empty(), details.is_empty()) {
        (false, false) => format!("{} - {}", main, details),
        (false, true) => main,
        (true, false) => details,
        (true, true) => return Some(FALLBACK_DESCRIPTION.to_string()),
    };

    let lower = assembled.to_lowercase();
    if DESCRIPTION_BLACKLIST
        .iter()
        .any(|phrase| lower.contains(phrase))
    {
        return None;
    }

    Some(assembled)
}

/// Parse a monetary value from a raw cell; failures yield 0.0 so the row
/// is later discarded by the zero-amount guard rather than erroring.
pub fn parse_num(value: &RawCell) -> f64 {
    match value {
        RawCell::Number(n) => *n,
        RawCell::Text(s) => parse_text_num(s).unwrap_or(0.0),
        RawCell::Date(_) | RawCell::Empty => 0.0,
    }
}

fn parse_text_num(text: &str) -> Option<f64> {
    let mut s: String = text
        .trim()
        .replace("R$", "")
        .replace(['$', ' ', '\u{a0}'], "")
        // Accounting notation: (100.00) means negative
        .replace('(', "-")
        .replace(')', "");

    let last_comma = s.rfind(',');
    let last_dot = s.rfind('.');
    s = match (last_comma, last_dot) {
        // Both present: whichever appears last is the decimal separator;
        // the other is a thousands marker
        (Some(c), Some(d)) if c > d => s.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => s.replace(',', ""),
        // Lone comma is the decimal separator (pt-BR convention)
        (Some(_), None) => s.replace(',', "."),
        _ => s,
    };

    s.parse::<f64>().ok()
}

/// Resolve the amount and direction for one row.
///
/// Split credit/debit columns carry their own direction. A single signed
/// column needs the profile's sign convention: statements and invoices
/// disagree on what negative means, so the caller always says which.
fn resolve_amount(
    row: &[RawCell],
    source: &AmountSource,
    convention: SignConvention,
) -> Option<(f64, TransactionType)> {
    match source {
        AmountSource::Single(idx) => {
            let raw = parse_num(cell(row, *idx));
            if raw.abs() < AMOUNT_EPSILON {
                return None;
            }
            let kind = match convention {
                SignConvention::NegativeIsExpense => {
                    if raw < 0.0 {
                        TransactionType::Expense
                    } else {
                        TransactionType::Income
                    }
                }
                SignConvention::NegativeIsIncome => {
                    if raw < 0.0 {
                        TransactionType::Income
                    } else {
                        TransactionType::Expense
                    }
                }
            };
            Some((raw.abs(), kind))
        }
        AmountSource::Split { credit, debit } => {
            let credit_val = parse_num(cell(row, *credit));
            if credit_val.abs() >= AMOUNT_EPSILON {
                return Some((credit_val.abs(), TransactionType::Income));
            }
            let debit_val = parse_num(cell(row, *debit));
            if debit_val.abs() >= AMOUNT_EPSILON {
                return Some((debit_val.abs(), TransactionType::Expense));
            }
            None
        }
    }
}
