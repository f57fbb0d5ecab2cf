//! Import profiles: per-source parsing conventions
//!
//! Bank exports disagree on what a negative single-column amount means.
//! Checking-account statements list debits as negative; credit-card
//! invoices list charges as positive and payments/credits as negative.
//! The profile makes that convention an explicit, selectable parameter
//! instead of a silent assumption, and lets a source declare extra column
//! header synonyms on top of the built-in sets.
//!
//! Profiles can be defined in a TOML file:
//!
//! ```toml
//! [[profile]]
//! name = "meu-banco"
//! sign_convention = "negative_is_expense"
//! amount_synonyms = ["valor (r$)"]
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// What a negative raw value means in a single amount column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignConvention {
    /// Checking-account statements: negative = money out
    NegativeIsExpense,
    /// Credit-card invoices: negative = payment/credit received
    NegativeIsIncome,
}

impl SignConvention {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NegativeIsExpense => "negative_is_expense",
            Self::NegativeIsIncome => "negative_is_income",
        }
    }
}

impl std::str::FromStr for SignConvention {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "negative_is_expense" | "statement" => Ok(Self::NegativeIsExpense),
            "negative_is_income" | "invoice" => Ok(Self::NegativeIsIncome),
            _ => Err(format!("Unknown sign convention: {}", s)),
        }
    }
}

impl std::fmt::Display for SignConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named bundle of per-source parsing conventions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportProfile {
    pub name: String,
    pub sign_convention: SignConvention,
    /// Extra header synonyms, appended to the built-in sets
    #[serde(default)]
    pub date_synonyms: Vec<String>,
    #[serde(default)]
    pub description_synonyms: Vec<String>,
    #[serde(default)]
    pub details_synonyms: Vec<String>,
    #[serde(default)]
    pub amount_synonyms: Vec<String>,
    #[serde(default)]
    pub credit_synonyms: Vec<String>,
    #[serde(default)]
    pub debit_synonyms: Vec<String>,
}

impl ImportProfile {
    /// Checking-account statement convention (negative = expense)
    pub fn statement() -> Self {
        Self {
            name: "statement".to_string(),
            sign_convention: SignConvention::NegativeIsExpense,
            date_synonyms: Vec::new(),
            description_synonyms: Vec::new(),
            details_synonyms: Vec::new(),
            amount_synonyms: Vec::new(),
            credit_synonyms: Vec::new(),
            debit_synonyms: Vec::new(),
        }
    }

    /// Credit-card invoice convention (negative = credit/income), with the
    /// "valor (r$)" header variant card issuers use
    pub fn invoice() -> Self {
        Self {
            name: "invoice".to_string(),
            sign_convention: SignConvention::NegativeIsIncome,
            amount_synonyms: vec!["valor (r$)".to_string(), "valor r$".to_string()],
            ..Self::statement()
        }
    }

    /// The profiles compiled into the library
    pub fn builtins() -> Vec<Self> {
        vec![Self::statement(), Self::invoice()]
    }
}

impl Default for ImportProfile {
    fn default() -> Self {
        Self::statement()
    }
}

/// Shape of a profiles TOML file
#[derive(Debug, Deserialize)]
struct ProfileFile {
    #[serde(default, rename = "profile")]
    profiles: Vec<ImportProfile>,
}

/// Load user-defined profiles from a TOML file
pub fn load_profiles(path: &Path) -> Result<Vec<ImportProfile>> {
    let text = fs::read_to_string(path)?;
    let file: ProfileFile = toml::from_str(&text)?;
    Ok(file.profiles)
}

/// Resolve a profile by name: user-defined profiles first, then built-ins
pub fn resolve_profile(name: &str, user_profiles: &[ImportProfile]) -> Result<ImportProfile> {
    if let Some(p) = user_profiles.iter().find(|p| p.name.eq_ignore_ascii_case(name)) {
        return Ok(p.clone());
    }
    ImportProfile::builtins()
        .into_iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| Error::UnknownProfile(name.to_string()))
}
