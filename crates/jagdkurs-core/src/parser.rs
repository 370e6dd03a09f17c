//! Question bank JSON parser.
//!
//! Loads the bank from its JSON file (original course field names) and
//! validates it for authoring problems.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::bank::QuestionBank;
use crate::dedup::question_key;
use crate::model::{Difficulty, Question};
use crate::sampler::SamplerConfig;

/// Wire representation of a bank record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawQuestion {
    #[serde(rename = "Frage")]
    pub frage: String,
    #[serde(rename = "FrageFreitext", default, skip_serializing_if = "Option::is_none")]
    pub frage_freitext: Option<String>,
    #[serde(rename = "FrageMC", default, skip_serializing_if = "Option::is_none")]
    pub frage_mc: Option<String>,
    #[serde(rename = "Antwort")]
    pub antwort: String,
    #[serde(rename = "FalscheAntwort1")]
    pub falsche_antwort1: String,
    #[serde(rename = "FalscheAntwort2")]
    pub falsche_antwort2: String,
    #[serde(rename = "FalscheAntwort3")]
    pub falsche_antwort3: String,
    #[serde(rename = "Pruefungsfach")]
    pub pruefungsfach: String,
    #[serde(rename = "Difficulty", default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(rename = "Tags", default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(rename = "PdfEligible", default, skip_serializing_if = "Option::is_none")]
    pub pdf_eligible: Option<bool>,
    #[serde(
        rename = "AlternativeAntworten",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub alternative_antworten: Option<Vec<String>>,
}

impl TryFrom<RawQuestion> for Question {
    type Error = String;

    fn try_from(raw: RawQuestion) -> std::result::Result<Self, Self::Error> {
        if raw.pruefungsfach.trim().is_empty() {
            return Err("subject label (Pruefungsfach) is empty".into());
        }
        if raw.antwort.trim().is_empty() {
            return Err("canonical answer (Antwort) is empty".into());
        }

        Ok(Question {
            prompt: raw.frage,
            free_text: raw.frage_freitext,
            mc_text: raw.frage_mc,
            answer: raw.antwort,
            distractors: [
                raw.falsche_antwort1,
                raw.falsche_antwort2,
                raw.falsche_antwort3,
            ],
            subject: raw.pruefungsfach,
            difficulty: raw.difficulty,
            tags: raw.tags.unwrap_or_default(),
            eligible: raw.pdf_eligible.unwrap_or(true),
            alternative_answers: raw.alternative_antworten.unwrap_or_default(),
        })
    }
}

impl From<Question> for RawQuestion {
    fn from(q: Question) -> Self {
        let [falsche_antwort1, falsche_antwort2, falsche_antwort3] = q.distractors;
        RawQuestion {
            frage: q.prompt,
            frage_freitext: q.free_text,
            frage_mc: q.mc_text,
            antwort: q.answer,
            falsche_antwort1,
            falsche_antwort2,
            falsche_antwort3,
            pruefungsfach: q.subject,
            difficulty: q.difficulty,
            tags: (!q.tags.is_empty()).then_some(q.tags),
            pdf_eligible: (!q.eligible).then_some(false),
            alternative_antworten: (!q.alternative_answers.is_empty())
                .then_some(q.alternative_answers),
        }
    }
}

/// Load the question bank from a JSON file.
pub fn load_bank(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank: {}", path.display()))?;

    load_bank_str(&content, path)
}

/// Parse a JSON string into a `QuestionBank` (useful for testing).
pub fn load_bank_str(content: &str, source_path: &Path) -> Result<QuestionBank> {
    let raw: Vec<RawQuestion> = serde_json::from_str(content)
        .with_context(|| format!("failed to parse JSON: {}", source_path.display()))?;

    let questions = raw
        .into_iter()
        .enumerate()
        .map(|(idx, r)| {
            Question::try_from(r).map_err(|e| {
                anyhow::anyhow!("{}: question #{}: {}", source_path.display(), idx, e)
            })
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
        "loaded {} questions from {}",
        questions.len(),
        source_path.display()
    );
    Ok(QuestionBank::new(questions)?)
}

/// A warning from bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The subject the warning belongs to.
    pub subject: Option<String>,
    /// The question text (if the warning is about a single question).
    pub question: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a bank for common authoring issues.
pub fn validate_bank(bank: &QuestionBank, config: &SamplerConfig) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for q in bank.questions() {
        let warn = |message: String| ValidationWarning {
            subject: Some(q.subject.clone()),
            question: Some(q.display_text().to_string()),
            message,
        };

        if q.display_text().trim().is_empty() {
            warnings.push(warn("question text is empty".into()));
        }
        if q.distractors.iter().any(|d| d.trim().is_empty()) {
            warnings.push(warn("one or more distractors are empty".into()));
        }
        if q
            .distractors
            .iter()
            .any(|d| d.trim().eq_ignore_ascii_case(q.answer.trim()))
        {
            warnings.push(warn("canonical answer repeated among distractors".into()));
        }
    }

    // Duplicate stems within a subject
    let mut first_seen: HashMap<(String, String), &Question> = HashMap::new();
    for q in bank.questions() {
        let key = (q.subject.clone(), question_key(q));
        if let Some(first) = first_seen.get(&key) {
            warnings.push(ValidationWarning {
                subject: Some(q.subject.clone()),
                question: Some(q.display_text().to_string()),
                message: format!("duplicate of \"{}\"", first.display_text()),
            });
        } else {
            first_seen.insert(key, q);
        }
    }

    // Subjects that cannot fill a set
    let mut eligible_keys: BTreeMap<&str, std::collections::HashSet<String>> = BTreeMap::new();
    for q in bank.questions().iter().filter(|q| q.eligible) {
        eligible_keys
            .entry(q.subject.as_str())
            .or_default()
            .insert(question_key(q));
    }
    for subject in bank.subjects() {
        let available = eligible_keys.get(subject.as_str()).map_or(0, |k| k.len());
        if available < config.set_size {
            warnings.push(ValidationWarning {
                subject: Some(subject.clone()),
                question: None,
                message: format!(
                    "only {available} eligible unique questions, a set needs {}",
                    config.set_size
                ),
            });
        }
    }

    warnings
}
