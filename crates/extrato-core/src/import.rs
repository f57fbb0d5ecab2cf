//! Import pipeline entry point
//!
//! Chains the four stages: sheet loading, header location, row
//! normalization, and classification. Data flows strictly forward; the
//! same bytes, profile, and corpus always produce the same items.

use tracing::debug;

use crate::classify::classify;
use crate::error::{Error, Result};
use crate::locate::locate_header_blocks;
use crate::models::{CategoryRegistry, ExistingTransaction, ImportItem};
use crate::normalize::normalize_rows;
use crate::profile::ImportProfile;
use crate::sheet::{load_grid, sniff_format};

/// Run the full import pipeline over uploaded file bytes.
///
/// Errors distinguish an unreadable file ([`Error::FileDecode`]), a sheet
/// with no recognizable header ([`Error::HeaderNotFound`]), and a
/// recognized sheet whose rows were all filtered out
/// ([`Error::NoTransactionsFound`]) so the user learns whether the
/// structure or the content was the problem.
pub fn import_bytes(
    bytes: &[u8],
    profile: &ImportProfile,
    existing: &[ExistingTransaction],
    registry: &CategoryRegistry,
) -> Result<Vec<ImportItem>> {
    let format = sniff_format(bytes);
    debug!("Importing {} bytes as {:?} with profile '{}'", bytes.len(), format, profile.name);

    let grid = load_grid(bytes, format)?;
    let blocks = locate_header_blocks(&grid, profile)?;
    let candidates = normalize_rows(&grid, &blocks, profile);

    if candidates.is_empty() {
        return Err(Error::NoTransactionsFound);
    }

    Ok(classify(&candidates, existing, registry))
}
