//! The `jagdkurs subjects` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use comfy_table::{Cell, Table};

use jagdkurs_core::statistics::bank_stats;
use jagdkurs_core::{ExamGenerator, SamplerConfig, COMBINED_SUBJECT};

pub fn execute(bank: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let (path, bank) = super::open_bank(bank, config_path.as_deref())?;
    let stats = bank_stats(&bank);
    let generator = ExamGenerator::new(Arc::new(bank), SamplerConfig::default());
    let set_size = generator.config().set_size;

    let mut table = Table::new();
    table.set_header(vec![
        "Subject",
        "Questions",
        "Eligible",
        "Unique",
        "MC-style",
        "Open",
        "Alternatives",
        "Duplicates",
        "Set",
    ]);

    for s in &stats.subjects {
        let ready = if s.unique >= set_size { "ok" } else { "short" };
        table.add_row(vec![
            Cell::new(&s.subject),
            Cell::new(s.total),
            Cell::new(s.eligible),
            Cell::new(s.unique),
            Cell::new(s.mc_style),
            Cell::new(s.open),
            Cell::new(s.with_alternatives),
            Cell::new(s.duplicates),
            Cell::new(ready),
        ]);
    }

    println!(
        "Question bank: {} ({} questions)",
        path.display(),
        stats.total_questions
    );
    println!("{table}");
    println!("\nSubjects:");
    for subject in generator.subjects() {
        if subject == COMBINED_SUBJECT {
            println!("  {subject} (combined)");
        } else {
            println!("  {subject}");
        }
    }

    Ok(())
}
