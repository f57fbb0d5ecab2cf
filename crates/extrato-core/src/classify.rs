//! Duplicate detection and history-based category suggestion
//!
//! Each candidate is compared against the user's existing transactions:
//! first for probable duplicates (same day, same magnitude, matching
//! text), then for a category suggestion based on how similar
//! descriptions were classified before. Duplicates are flagged and
//! surfaced for review, never silently excluded: a corrected re-export
//! is a legitimate import. This stage is pure; the corpus is never
//! mutated.

use std::sync::OnceLock;

use regex::Regex;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::models::{
    CandidateTransaction, CategoryRegistry, ExistingTransaction, ImportItem,
};

/// Amount tolerance for duplicate matching, in currency units
const DUPLICATE_AMOUNT_TOLERANCE: f64 = 0.01;

/// Shortest fragment accepted for description containment matches
const MIN_DESCRIPTION_FRAGMENT: usize = 3;

/// Shortest fragment accepted when matching against the observation note
const MIN_OBSERVATION_FRAGMENT: usize = 4;

/// Classify candidates against the existing-transaction corpus, producing
/// reviewable import items in the same order.
pub fn classify(
    candidates: &[CandidateTransaction],
    existing: &[ExistingTransaction],
    registry: &CategoryRegistry,
) -> Vec<ImportItem> {
    // Most recent first, so suggestions reflect the latest categorization
    // habits rather than the oldest
    let mut history: Vec<&ExistingTransaction> = existing.iter().collect();
    history.sort_by(|a, b| b.date.cmp(&a.date));

    let items: Vec<ImportItem> = candidates
        .iter()
        .enumerate()
        .map(|(index, candidate)| classify_one(index, candidate, existing, &history, registry))
        .collect();

    let duplicates = items.iter().filter(|i| i.is_possible_duplicate).count();
    debug!(
        "Classified {} items ({} possible duplicates)",
        items.len(),
        duplicates
    );
    items
}

fn classify_one(
    index: usize,
    candidate: &CandidateTransaction,
    existing: &[ExistingTransaction],
    history: &[&ExistingTransaction],
    registry: &CategoryRegistry,
) -> ImportItem {
    let id = item_id(index, candidate);
    let desc_lower = candidate.description.trim().to_lowercase();

    if let Some(dup) = existing.iter().find(|ex| is_duplicate(ex, candidate, &desc_lower)) {
        return ImportItem {
            id,
            date: candidate.date,
            description: candidate.description.clone(),
            amount: candidate.amount,
            kind: candidate.kind,
            selected_group: dup.group.clone(),
            selected_category: dup.description.clone(),
            is_checked: false,
            is_possible_duplicate: true,
        };
    }

    let cleaned = clean_description(&candidate.description);
    if let Some(suggestion) = history.iter().find(|ex| is_history_match(ex, &cleaned)) {
        return ImportItem {
            id,
            date: candidate.date,
            description: candidate.description.clone(),
            amount: candidate.amount,
            kind: candidate.kind,
            selected_group: suggestion.group.clone(),
            selected_category: suggestion.description.clone(),
            is_checked: false,
            is_possible_duplicate: false,
        };
    }

    ImportItem {
        id,
        date: candidate.date,
        description: candidate.description.clone(),
        amount: candidate.amount,
        kind: candidate.kind,
        selected_group: registry.default_group(candidate.kind),
        selected_category: String::new(),
        is_checked: false,
        is_possible_duplicate: false,
    }
}

/// Same calendar day, same magnitude within tolerance, and a textual link:
/// the stored observation note contains the candidate description (either
/// direction), or the stored description equals/contains it.
fn is_duplicate(ex: &ExistingTransaction, candidate: &CandidateTransaction, desc_lower: &str) -> bool {
    if ex.date != candidate.date {
        return false;
    }
    if (ex.amount.abs() - candidate.amount).abs() >= DUPLICATE_AMOUNT_TOLERANCE {
        return false;
    }

    let ex_desc = ex.description.trim().to_lowercase();
    if ex_desc == desc_lower || ex_desc.contains(desc_lower) {
        return true;
    }
    if let Some(obs) = &ex.observation {
        let obs_lower = obs.to_lowercase();
        if obs_lower.contains(desc_lower) || desc_lower.contains(obs_lower.as_str()) {
            return true;
        }
    }
    false
}

/// Fuzzy match between a cleaned candidate description and a historical
/// transaction. Containment only counts when the shorter side is long
/// enough to not match spuriously.
fn is_history_match(ex: &ExistingTransaction, cleaned: &str) -> bool {
    if ex.group.is_empty() || cleaned.is_empty() {
        return false;
    }

    let hist_desc = ex.description.trim().to_lowercase();
    if cleaned == hist_desc {
        return true;
    }
    if cleaned.contains(hist_desc.as_str()) && hist_desc.chars().count() >= MIN_DESCRIPTION_FRAGMENT
    {
        return true;
    }
    if hist_desc.contains(cleaned) && cleaned.chars().count() >= MIN_DESCRIPTION_FRAGMENT {
        return true;
    }
    if let Some(obs) = &ex.observation {
        if obs.to_lowercase().contains(cleaned)
            && cleaned.chars().count() >= MIN_OBSERVATION_FRAGMENT
        {
            return true;
        }
    }
    false
}

fn timestamp_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\d{2}/\d{2}(?:\s\d{2}:\d{2})?").expect("valid regex")
    })
}

/// Strip the embedded `DD/MM` or `DD/MM HH:MM` fragment card networks put
/// inside descriptions, keeping the merchant text that follows it.
pub fn clean_description(description: &str) -> String {
    if let Some(m) = timestamp_regex().find(description) {
        let after = &description[m.end()..];
        return after
            .trim_start_matches(['-', ' '])
            .to_lowercase()
            .trim()
            .to_string();
    }
    description.to_lowercase().trim().to_string()
}

/// Stable per-session identifier: row index plus the candidate's fields
/// hashed together. Bank statements legitimately repeat identical rows,
/// so the index is part of the hash.
fn item_id(index: usize, candidate: &CandidateTransaction) -> String {
    let mut hasher = Sha256::new();
    hasher.update(index.to_be_bytes());
    hasher.update(candidate.date.to_string().as_bytes());
    hasher.update(candidate.description.as_bytes());
    hasher.update(candidate.amount.to_be_bytes());
    hex::encode(hasher.finalize())
}
