//! The `jagdkurs validate` command.

use std::path::PathBuf;

use anyhow::Result;

use jagdkurs_core::parser::validate_bank;
use jagdkurs_core::SamplerConfig;

pub fn execute(bank: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let (path, bank) = super::open_bank(bank, config_path.as_deref())?;
    println!(
        "Question bank: {} ({} questions, {} subjects)",
        path.display(),
        bank.len(),
        bank.subjects().len()
    );

    let warnings = validate_bank(&bank, &SamplerConfig::default());
    for w in &warnings {
        let prefix = w
            .subject
            .as_ref()
            .map(|s| format!("  [{s}]"))
            .unwrap_or_else(|| "  ".to_string());
        match &w.question {
            Some(q) => println!("{prefix} WARNING: {} ({q})", w.message),
            None => println!("{prefix} WARNING: {}", w.message),
        }
    }

    if warnings.is_empty() {
        println!("Question bank valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
