//! The `jagdkurs generate-mc-full` command.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use jagdkurs_core::{ExamGenerator, SamplerConfig};

pub fn execute(
    output_dir: PathBuf,
    seed: Option<u64>,
    bank: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (_, bank) = super::open_bank(bank, config_path.as_deref())?;
    let generator = ExamGenerator::new(Arc::new(bank), SamplerConfig::default());
    let mut rng = super::make_rng(seed);

    let sets = generator.generate_mc_full(&mut rng)?;

    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;
    let names = file_names(sets.iter().map(|set| set.subject.as_str()));
    for (set, name) in sets.iter().zip(names) {
        let path = output_dir.join(name);
        set.save_json(&path)?;
        println!(
            "{}: {} questions -> {}",
            set.subject,
            set.questions.len(),
            path.display()
        );
    }
    println!("\n{} set(s) written.", sets.len());

    Ok(())
}

/// One `mc-<slug>.json` name per subject; subjects whose slugs collide get
/// a numeric suffix instead of overwriting each other.
fn file_names<'a>(subjects: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut used = HashSet::new();
    subjects
        .into_iter()
        .map(|subject| {
            let base = super::slug(subject);
            let mut slug = base.clone();
            let mut n = 1;
            while !used.insert(slug.clone()) {
                n += 1;
                slug = format!("{base}-{n}");
            }
            format!("mc-{slug}.json")
        })
        .collect()
}
