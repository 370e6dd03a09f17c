//! Subcommand implementations.

use std::path::{Path, PathBuf};

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;

use jagdkurs_core::parser::load_bank;
use jagdkurs_core::QuestionBank;
use jagdkurs_providers::load_config_from;

pub mod evaluate;
pub mod followup;
pub mod generate;
pub mod generate_mc_full;
pub mod init;
pub mod report;
pub mod subjects;
pub mod validate;

/// Load the bank from `--bank`, or from the configured path.
pub(crate) fn open_bank(
    bank: Option<PathBuf>,
    config_path: Option<&Path>,
) -> Result<(PathBuf, QuestionBank)> {
    let path = match bank {
        Some(path) => path,
        None => load_config_from(config_path)?.bank,
    };
    let bank = load_bank(&path)?;
    tracing::debug!(path = %path.display(), questions = bank.len(), "loaded question bank");
    Ok((path, bank))
}

/// Seeded RNG when `--seed` is given, entropy-seeded otherwise.
pub(crate) fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// File-name friendly form of a subject label.
pub(crate) fn slug(subject: &str) -> String {
    let mut out = String::new();
    for c in subject.to_lowercase().chars() {
        let mapped = match c {
            'ä' => "ae".to_string(),
            'ö' => "oe".to_string(),
            'ü' => "ue".to_string(),
            'ß' => "ss".to_string(),
            c if c.is_ascii_alphanumeric() => c.to_string(),
            _ => "-".to_string(),
        };
        if mapped == "-" && (out.is_empty() || out.ends_with('-')) {
            continue;
        }
        out.push_str(&mapped);
    }
    out.trim_end_matches('-').to_string()
}
