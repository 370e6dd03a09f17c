//! Generated exam sets with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Question;
use crate::sampler::is_mc_style;

/// An exam set drawn from one subject partition (or the combined subject).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSet {
    pub subject: String,
    pub created_at: DateTime<Utc>,
    pub questions: Vec<Question>,
}

impl GeneratedSet {
    /// Stamp a freshly drawn selection with the current time.
    pub fn new(subject: &str, questions: Vec<Question>) -> Self {
        Self {
            subject: subject.to_string(),
            created_at: Utc::now(),
            questions,
        }
    }

    /// Number of multiple-choice-style questions in the set.
    pub fn mc_count(&self) -> usize {
        self.questions.iter().filter(|q| is_mc_style(q)).count()
    }

    /// Save the set as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize exam set")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write exam set to {}", path.display()))?;
        Ok(())
    }

    /// Load a set from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read exam set from {}", path.display()))?;
        let set: GeneratedSet =
            serde_json::from_str(&content).context("failed to parse exam set JSON")?;
        Ok(set)
    }
}
