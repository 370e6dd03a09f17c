//! The `jagdkurs generate` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use jagdkurs_core::{ExamGenerator, SamplerConfig};
use jagdkurs_report::{generate_exam_html, write_exam_html, SheetOptions};

use crate::SheetFormat;

#[allow(clippy::too_many_arguments)]
pub fn execute(
    subject: String,
    mc: bool,
    format: SheetFormat,
    output: Option<PathBuf>,
    answer_key: bool,
    seed: Option<u64>,
    bank: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(!subject.trim().is_empty(), "--subject must not be empty");
    anyhow::ensure!(
        !answer_key || format == SheetFormat::Html,
        "--answer-key requires --format html"
    );

    let (_, bank) = super::open_bank(bank, config_path.as_deref())?;
    let generator = ExamGenerator::new(Arc::new(bank), SamplerConfig::default());
    let mut rng = super::make_rng(seed);

    let set = if mc {
        generator.generate_mc_subject(&subject, &mut rng)?
    } else {
        generator.generate(&subject, &mut rng)?
    };
    tracing::info!(
        subject = %set.subject,
        questions = set.questions.len(),
        mc = set.mc_count(),
        "generated exam set"
    );

    let options = SheetOptions {
        with_answer_key: answer_key,
    };
    match (format, output) {
        (SheetFormat::Json, Some(path)) => {
            set.save_json(&path)?;
            eprintln!("Set written to {}", path.display());
        }
        (SheetFormat::Json, None) => {
            let json = serde_json::to_string_pretty(&set).context("failed to serialize set")?;
            println!("{json}");
        }
        (SheetFormat::Html, Some(path)) => {
            write_exam_html(&set, &options, &path)?;
            eprintln!("Exam sheet written to {}", path.display());
        }
        (SheetFormat::Html, None) => println!("{}", generate_exam_html(&set, &options)),
    }

    Ok(())
}
