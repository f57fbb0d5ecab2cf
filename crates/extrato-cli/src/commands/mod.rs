//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `import` - File import, review table, and ledger commit
//! - `profiles` - Import profile listing

pub mod import;
pub mod profiles;

// Re-export command functions for main.rs
pub use import::*;
pub use profiles::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
