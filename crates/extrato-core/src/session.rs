//! Review session over classified import items
//!
//! The session holds its own isolated copy of the items; nothing here is
//! shared or persisted. The user toggles and categorizes items, then the
//! confirmed subset is appended through the [`TransactionStore`]
//! collaborator one at a time: sequential writes guarantee that a partial
//! failure leaves a deterministic prefix of the import applied.

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{CategoryRegistry, ImportItem, NewTransaction, TransactionType};

/// Prefix stored in the observation field so the original bank description
/// survives for future history matching even after the user renames things
pub const OBSERVATION_PREFIX: &str = "Importado: ";

/// External persistence collaborator: appends one confirmed transaction
pub trait TransactionStore {
    fn append(&mut self, transaction: &NewTransaction) -> Result<()>;
}

/// Result of committing a session: how many appends landed, and where the
/// first failure happened if any. Already-appended items are never rolled
/// back; their `Importado:` observation makes them discoverable later.
#[derive(Debug)]
pub struct CommitOutcome {
    pub appended: usize,
    pub failed: Option<(usize, Error)>,
}

impl CommitOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_none()
    }
}

/// A single import review session
#[derive(Debug, Clone)]
pub struct ReviewSession {
    items: Vec<ImportItem>,
}

impl ReviewSession {
    pub fn new(items: Vec<ImportItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[ImportItem] {
        &self.items
    }

    /// Toggle one item's checkbox. Returns false for an unknown id.
    pub fn toggle(&mut self, id: &str) -> bool {
        match self.items.iter_mut().find(|i| i.id == id) {
            Some(item) => {
                item.is_checked = !item.is_checked;
                true
            }
            None => false,
        }
    }

    /// The "select all" toggle
    pub fn set_all(&mut self, checked: bool) {
        for item in &mut self.items {
            item.is_checked = checked;
        }
    }

    /// Choose a category for one item. The group is inferred from the
    /// registry, and picking a non-empty category checks the item as a
    /// convenience; clearing the category leaves the checkbox alone.
    pub fn set_category(&mut self, id: &str, category: &str, registry: &CategoryRegistry) -> bool {
        let Some(item) = self.items.iter_mut().find(|i| i.id == id) else {
            return false;
        };
        item.selected_group = if category.is_empty() {
            match item.kind {
                TransactionType::Income => registry.income_group.clone(),
                TransactionType::Expense => String::new(),
            }
        } else {
            registry.group_for_item(category, item.kind)
        };
        item.selected_category = category.to_string();
        if !category.is_empty() {
            item.is_checked = true;
        }
        true
    }

    /// Items eligible for import: checked with a non-empty category
    pub fn confirmed(&self) -> Vec<&ImportItem> {
        self.items
            .iter()
            .filter(|i| i.is_checked && !i.selected_category.is_empty())
            .collect()
    }

    pub fn confirmed_count(&self) -> usize {
        self.confirmed().len()
    }

    /// Append every confirmed item through the store, sequentially,
    /// stopping at the first failure.
    pub fn commit<S: TransactionStore>(&self, store: &mut S) -> CommitOutcome {
        let confirmed = self.confirmed();
        let mut appended = 0;

        for (index, item) in confirmed.iter().enumerate() {
            match store.append(&to_new_transaction(item)) {
                Ok(()) => appended += 1,
                Err(e) => {
                    warn!("Append failed at item {} of {}: {}", index + 1, confirmed.len(), e);
                    return CommitOutcome {
                        appended,
                        failed: Some((index, e)),
                    };
                }
            }
        }

        debug!("Committed {} transactions", appended);
        CommitOutcome {
            appended,
            failed: None,
        }
    }
}

/// Shape a confirmed item for the persistence collaborator. The persisted
/// description is the chosen category item; the bank's original text moves
/// into the observation with the `Importado:` prefix.
fn to_new_transaction(item: &ImportItem) -> NewTransaction {
    NewTransaction {
        date: item.date,
        description: item.selected_category.clone(),
        amount: item.amount,
        kind: item.kind,
        group: item.selected_group.clone(),
        observation: format!("{}{}", OBSERVATION_PREFIX, item.description),
    }
}
