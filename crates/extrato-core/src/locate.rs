//! Header and column location
//!
//! Bank exports bury the header row under logo banners, account summaries
//! and blank lines, and multi-card invoices repeat the header once per
//! card. The locator scans for rows whose cells match known column-name
//! synonyms and maps each qualifying row to a [`ColumnMap`]. The first
//! header must appear within [`HEADER_SCAN_WINDOW`] rows; later qualifying
//! rows open new header blocks that supersede the previous column map.

use tracing::debug;

use crate::error::{Error, Result};
use crate::profile::ImportProfile;
use crate::sheet::RawCell;

/// Rows scanned before giving up on finding the first header
pub const HEADER_SCAN_WINDOW: usize = 30;

const DATE_SYNONYMS: &[&str] = &["data", "dt.", "vencimento", "date"];
const DESCRIPTION_SYNONYMS: &[&str] = &[
    "descrição",
    "descricao",
    "histórico",
    "historico",
    "lançamento",
    "lancamento",
    "description",
];
const DETAILS_SYNONYMS: &[&str] = &["detalhe", "detalhes"];
const CREDIT_SYNONYMS: &[&str] = &["crédito", "credito", "entrada", "entradas"];
const DEBIT_SYNONYMS: &[&str] = &["débito", "debito", "saída", "saídas", "saida", "saidas"];

/// Where a row's monetary value comes from, resolved once per header block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountSource {
    /// One signed amount column; sign meaning comes from the profile
    Single(usize),
    /// Separate credit and debit columns
    Split { credit: usize, debit: usize },
}

/// Semantic column offsets for one header block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub date: usize,
    pub description: Option<usize>,
    pub details: Option<usize>,
    pub amount: AmountSource,
}

/// A located header row and the column map for the rows beneath it
#[derive(Debug, Clone)]
pub struct HeaderBlock {
    pub header_row: usize,
    pub columns: ColumnMap,
}

/// Scan the grid for header blocks.
///
/// The first qualifying row within the scan window wins; scanning never
/// continues looking for a "better" header. After that, every later
/// qualifying row starts a new block (multi-card invoices repeat headers
/// mid-sheet) whose map applies to the rows below it.
pub fn locate_header_blocks(
    grid: &[Vec<RawCell>],
    profile: &ImportProfile,
) -> Result<Vec<HeaderBlock>> {
    let window = grid.len().min(HEADER_SCAN_WINDOW);

    let first = (0..window)
        .find_map(|i| match_header_row(&grid[i], profile).map(|columns| HeaderBlock {
            header_row: i,
            columns,
        }))
        .ok_or(Error::HeaderNotFound)?;

    debug!("Header located at row {}", first.header_row);

    let mut blocks = vec![first];
    for i in blocks[0].header_row + 1..grid.len() {
        if let Some(columns) = match_header_row(&grid[i], profile) {
            debug!("Additional header block at row {}", i);
            blocks.push(HeaderBlock {
                header_row: i,
                columns,
            });
        }
    }

    Ok(blocks)
}

/// Test one row against the synonym sets. Qualifies as a header when a
/// date column is present together with an amount column or a
/// credit/debit pair.
fn match_header_row(row: &[RawCell], profile: &ImportProfile) -> Option<ColumnMap> {
    let cells: Vec<String> = row.iter().map(|c| c.header_text()).collect();

    let find = |builtin: &[&str], extra: &[String]| -> Option<usize> {
        cells.iter().position(|cell| {
            !cell.is_empty()
                && (builtin.iter().any(|syn| cell.contains(syn))
                    || extra.iter().any(|syn| cell.contains(syn.as_str())))
        })
    };

    let date = find(DATE_SYNONYMS, &profile.date_synonyms)?;

    let description = find(DESCRIPTION_SYNONYMS, &profile.description_synonyms);
    let details = find(DETAILS_SYNONYMS, &profile.details_synonyms);
    let credit = find(CREDIT_SYNONYMS, &profile.credit_synonyms);
    let debit = find(DEBIT_SYNONYMS, &profile.debit_synonyms);

    // Profile-specific amount headers (e.g. "valor (r$)") take precedence
    // over the credit/debit pair, which takes precedence over plain "valor".
    let profile_amount = if profile.amount_synonyms.is_empty() {
        None
    } else {
        cells.iter().position(|cell| {
            profile
                .amount_synonyms
                .iter()
                .any(|syn| cell.contains(syn.as_str()))
        })
    };
    let generic_amount = cells
        .iter()
        .position(|cell| cell.contains("valor") && !cell.contains("saldo"));

    let amount = if let Some(idx) = profile_amount {
        AmountSource::Single(idx)
    } else if let (Some(credit), Some(debit)) = (credit, debit) {
        AmountSource::Split { credit, debit }
    } else if let Some(idx) = generic_amount {
        AmountSource::Single(idx)
    } else {
        return None;
    };

    Some(ColumnMap {
        date,
        description,
        details,
        amount,
    })
}
