//! Raw sheet loading: file bytes to a grid of typed cells
//!
//! Supports binary spreadsheets (XLS/XLSX, first sheet only) and delimited
//! text. Delimited exports from Brazilian banks are typically ISO-8859-1
//! encoded and use `;` or `,` as the separator, chosen per line.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{Error, Result};

/// One cell of the raw grid, with its authoritative interpretation
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Text(String),
    Number(f64),
    /// A cell the decoder marked as date-typed. Plain numeric cells that
    /// happen to hold date serials stay `Number` and are resolved by the
    /// normalizer's serial heuristic.
    Date(NaiveDate),
    Empty,
}

impl RawCell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Lower-cased, trimmed text view of the cell, for header matching
    pub fn header_text(&self) -> String {
        match self {
            Self::Text(s) => s.trim().to_lowercase(),
            Self::Number(n) => n.to_string(),
            Self::Date(d) => d.to_string(),
            Self::Empty => String::new(),
        }
    }
}

/// Physical encoding of the uploaded file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// XLS or XLSX workbook
    Spreadsheet,
    /// `;` or `,` delimited text
    Delimited,
}

/// Sniff the file format from magic bytes.
///
/// XLSX is a ZIP container (`PK\x03\x04`); XLS is an OLE2 compound file
/// (`D0 CF 11 E0`). Anything else is treated as delimited text.
pub fn sniff_format(bytes: &[u8]) -> FileFormat {
    if bytes.starts_with(b"PK\x03\x04") || bytes.starts_with(&[0xD0, 0xCF, 0x11, 0xE0]) {
        FileFormat::Spreadsheet
    } else {
        FileFormat::Delimited
    }
}

/// Decode file bytes into a grid of raw cells
pub fn load_grid(bytes: &[u8], format: FileFormat) -> Result<Vec<Vec<RawCell>>> {
    match format {
        FileFormat::Spreadsheet => load_spreadsheet(bytes),
        FileFormat::Delimited => load_delimited(bytes),
    }
}

fn load_spreadsheet(bytes: &[u8]) -> Result<Vec<Vec<RawCell>>> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook =
        open_workbook_auto_from_rs(cursor).map_err(|e| Error::FileDecode(e.to_string()))?;

    let first_sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| Error::FileDecode("workbook has no sheets".to_string()))?;

    let range = workbook.worksheet_range(&first_sheet)?;

    let grid: Vec<Vec<RawCell>> = range
        .rows()
        .map(|row| row.iter().map(convert_cell).collect())
        .collect();

    debug!("Loaded sheet '{}' with {} rows", first_sheet, grid.len());
    Ok(grid)
}

fn convert_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Empty => RawCell::Empty,
        Data::String(s) => {
            if s.trim().is_empty() {
                RawCell::Empty
            } else {
                RawCell::Text(s.clone())
            }
        }
        Data::Float(f) => RawCell::Number(*f),
        Data::Int(i) => RawCell::Number(*i as f64),
        Data::Bool(b) => RawCell::Text(b.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => RawCell::Date(naive.date()),
            // Out-of-range serial; let the normalizer's heuristic decide
            None => RawCell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => {
            let day_part = s.get(..10).unwrap_or(s.as_str());
            match NaiveDate::parse_from_str(day_part, "%Y-%m-%d") {
                Ok(date) => RawCell::Date(date),
                Err(_) => RawCell::Text(s.clone()),
            }
        }
        Data::DurationIso(s) => RawCell::Text(s.clone()),
        Data::Error(_) => RawCell::Empty,
    }
}

fn load_delimited(bytes: &[u8]) -> Result<Vec<Vec<RawCell>>> {
    let text = decode_latin1_compatible(bytes);
    let mut grid = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        // Separator is chosen per line: `;` when present, `,` otherwise
        let separator = if line.contains(';') { b';' } else { b',' };
        let mut reader = ReaderBuilder::new()
            .delimiter(separator)
            .has_headers(false)
            .flexible(true)
            .from_reader(line.as_bytes());

        match reader.records().next() {
            Some(Ok(record)) => {
                let row: Vec<RawCell> = record
                    .iter()
                    .map(|field| {
                        if field.trim().is_empty() {
                            RawCell::Empty
                        } else {
                            RawCell::Text(field.to_string())
                        }
                    })
                    .collect();
                grid.push(row);
            }
            Some(Err(e)) => {
                // Malformed trailer lines are dropped, not fatal
                debug!("Skipping unparsable line: {}", e);
            }
            None => {}
        }
    }

    debug!("Loaded delimited text with {} rows", grid.len());
    Ok(grid)
}

/// Decode as UTF-8 when valid, otherwise as ISO-8859-1 (each byte is one
/// code point), which recovers accented characters from regional exports.
fn decode_latin1_compatible(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}
