//! Domain models for extrato

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "INCOME" => Ok(Self::Income),
            "EXPENSE" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A statement row that survived normalization but has not been reviewed yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateTransaction {
    /// Calendar day, no time component, never timezone-converted
    pub date: NaiveDate,
    pub description: String,
    /// Non-negative magnitude; direction lives in `kind`
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
}

/// A candidate transaction augmented with review state
///
/// Created by the classifier, mutated only through the review session,
/// discarded when the session ends. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportItem {
    /// Unique per-session identifier
    pub id: String,
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub selected_group: String,
    pub selected_category: String,
    pub is_checked: bool,
    pub is_possible_duplicate: bool,
}

/// A previously persisted transaction, used read-only as the lookup corpus
/// for duplicate detection and history-based suggestions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExistingTransaction {
    pub date: NaiveDate,
    /// The category item chosen at import/entry time (e.g. "Mercado")
    pub description: String,
    /// May be signed or unsigned depending on the source; comparisons use
    /// absolute values
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub group: String,
    /// Carries "Importado: <original bank description>" for imported rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation: Option<String>,
}

/// A confirmed import item, shaped for the persistence collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub group: String,
    pub observation: String,
}

/// An expense group with its category items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStructure {
    pub name: String,
    pub items: Vec<String>,
}

/// The user's category/group registry
///
/// Ordered income category names plus expense groups. Used to populate
/// classification choices and to infer a group from a chosen item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRegistry {
    pub income_categories: Vec<String>,
    pub expense_groups: Vec<CategoryStructure>,
    /// Group name used for all income items
    #[serde(default = "default_income_group")]
    pub income_group: String,
}

fn default_income_group() -> String {
    "Receitas".to_string()
}

impl CategoryRegistry {
    /// Resolve the group an item belongs to. Income items always map to the
    /// income group; unknown expense items map to an empty group.
    pub fn group_for_item(&self, item: &str, kind: TransactionType) -> String {
        match kind {
            TransactionType::Income => self.income_group.clone(),
            TransactionType::Expense => self
                .expense_groups
                .iter()
                .find(|g| g.items.iter().any(|i| i == item))
                .map(|g| g.name.clone())
                .unwrap_or_default(),
        }
    }

    /// Fallback group for an unclassified candidate
    pub fn default_group(&self, kind: TransactionType) -> String {
        match kind {
            TransactionType::Income => self.income_group.clone(),
            TransactionType::Expense => self
                .expense_groups
                .first()
                .map(|g| g.name.clone())
                .unwrap_or_default(),
        }
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        let group = |name: &str, items: &[&str]| CategoryStructure {
            name: name.to_string(),
            items: items.iter().map(|s| s.to_string()).collect(),
        };
        Self {
            income_categories: ["Salário", "Cartão Alimentação", "Outras Receitas"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            expense_groups: vec![
                group(
                    "Moradia/Fixos",
                    &["Financiamento", "Condomínio", "IPTU", "Energia", "Água", "Internet"],
                ),
                group(
                    "Transporte",
                    &["Combustível", "Uber/99", "Transporte Público", "Manutenção Veículo"],
                ),
                group("Alimentação", &["Mercado", "Restaurantes/iFood"]),
                group("Saúde", &["Plano de Saúde", "Remédios"]),
                group("Lazer", &["Cinema/Teatro", "Passeios", "Viagens"]),
                group(
                    "Outros",
                    &["Presentes", "Cartão de Crédito", "Imprevistos", "Outros"],
                ),
            ],
            income_group: default_income_group(),
        }
    }
}
