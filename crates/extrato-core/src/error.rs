//! Error types for extrato

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Could not read file: {0}")]
    FileDecode(String),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Profile config error: {0}")]
    ProfileConfig(#[from] toml::de::Error),

    #[error(
        "No header row found. Expected a row with a date column \
         (data, dt., vencimento) and an amount column (valor) or \
         credit/debit columns (crédito, débito)"
    )]
    HeaderNotFound,

    #[error("Header recognized but no valid transaction rows were found")]
    NoTransactionsFound,

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Unknown profile: {0}")]
    UnknownProfile(String),

    #[error("Append failed: {0}")]
    Append(String),
}

pub type Result<T> = std::result::Result<T, Error>;
