//! Profile listing command

use std::path::Path;

use anyhow::{Context, Result};
use extrato_core::{load_profiles, ImportProfile};

pub fn cmd_profiles(profiles_path: Option<&Path>) -> Result<()> {
    let user_profiles = match profiles_path {
        Some(path) => load_profiles(path)
            .with_context(|| format!("Failed to load profiles from {}", path.display()))?,
        None => Vec::new(),
    };

    println!("Built-in profiles:");
    for profile in ImportProfile::builtins() {
        print_profile(&profile);
    }

    if !user_profiles.is_empty() {
        println!();
        println!("User-defined profiles:");
        for profile in &user_profiles {
            print_profile(profile);
        }
    }

    Ok(())
}

fn print_profile(profile: &ImportProfile) {
    println!("   {:<12} sign: {}", profile.name, profile.sign_convention);
    let extras = profile.date_synonyms.len()
        + profile.description_synonyms.len()
        + profile.details_synonyms.len()
        + profile.amount_synonyms.len()
        + profile.credit_synonyms.len()
        + profile.debit_synonyms.len();
    if extras > 0 {
        println!("                extra header synonyms: {}", extras);
    }
}
