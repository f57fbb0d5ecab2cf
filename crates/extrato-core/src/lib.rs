//! Extrato Core Library
//!
//! Bank statement / credit-card invoice import pipeline:
//! - Raw sheet loading (XLS/XLSX via calamine, `;`/`,` delimited text)
//! - Header and column location with synonym matching
//! - Row normalization (dates, locale-aware amounts, boilerplate filters)
//! - Duplicate detection and history-based category suggestions
//! - Review session with a pluggable persistence collaborator
//!
//! Per-source conventions (sign meaning, extra column synonyms) are
//! selected through import profiles rather than hard-coded.

pub mod classify;
pub mod error;
pub mod import;
pub mod locate;
pub mod models;
pub mod normalize;
pub mod profile;
pub mod session;
pub mod sheet;

pub use classify::{classify, clean_description};
pub use error::{Error, Result};
pub use import::import_bytes;
pub use locate::{locate_header_blocks, AmountSource, ColumnMap, HeaderBlock, HEADER_SCAN_WINDOW};
pub use models::{
    CandidateTransaction, CategoryRegistry, CategoryStructure, ExistingTransaction, ImportItem,
    NewTransaction, TransactionType,
};
pub use normalize::{normalize_rows, parse_any_date, parse_num};
pub use profile::{load_profiles, resolve_profile, ImportProfile, SignConvention};
pub use session::{CommitOutcome, ReviewSession, TransactionStore, OBSERVATION_PREFIX};
pub use sheet::{load_grid, sniff_format, FileFormat, RawCell};
