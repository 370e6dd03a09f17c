//! Core data model types for jagdkurs.
//!
//! Question records as they live in the bank, and the request/response
//! values exchanged by the evaluation and follow-up operations.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::parser::RawQuestion;

/// A single question of the bank.
///
/// Serialized with the bank's original field names (see [`RawQuestion`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawQuestion", into = "RawQuestion")]
pub struct Question {
    /// Primary prompt text.
    pub prompt: String,
    /// Alternate free-text phrasing.
    pub free_text: Option<String>,
    /// Dedicated multiple-choice phrasing.
    pub mc_text: Option<String>,
    /// Canonical correct answer.
    pub answer: String,
    /// Exactly three wrong answers.
    pub distractors: [String; 3],
    /// Subject label (never empty).
    pub subject: String,
    pub difficulty: Option<Difficulty>,
    pub tags: Vec<String>,
    /// Whether the question may be drawn into exam sets.
    pub eligible: bool,
    /// Additional accepted phrasings of the answer.
    pub alternative_answers: Vec<String>,
}

impl Question {
    /// Text shown to the learner: the free-text phrasing when present,
    /// otherwise the primary prompt.
    pub fn display_text(&self) -> &str {
        match self.free_text.as_deref() {
            Some(text) if !text.trim().is_empty() => text,
            _ => &self.prompt,
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn has_alternatives(&self) -> bool {
        self.alternative_answers.iter().any(|a| !a.trim().is_empty())
    }

    pub fn has_mc_text(&self) -> bool {
        self.mc_text.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    /// Answer options in stored order: canonical answer first, then distractors.
    pub fn options(&self) -> [&str; 4] {
        [
            &self.answer,
            &self.distractors[0],
            &self.distractors[1],
            &self.distractors[2],
        ]
    }
}

/// Optional difficulty tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Score of a learner's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Score {
    Incorrect = 0,
    Partial = 1,
    Correct = 2,
}

impl Score {
    /// Normalize a judge-reported value: only exactly 2 or 1 count,
    /// everything else (out of range, fractional, NaN) is `Incorrect`.
    pub fn from_judge_value(value: f64) -> Self {
        if value == 2.0 {
            Score::Correct
        } else if value == 1.0 {
            Score::Partial
        } else {
            Score::Incorrect
        }
    }

    pub fn points(self) -> u8 {
        self as u8
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> u8 {
        score.points()
    }
}

impl TryFrom<u8> for Score {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Score::Incorrect),
            1 => Ok(Score::Partial),
            2 => Ok(Score::Correct),
            other => Err(format!("score out of range: {other}")),
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.points())
    }
}

/// Which scoring path produced an [`EvaluationResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvalMode {
    /// No judge configured.
    Heuristic,
    /// The remote judge scored the answer.
    Llm,
    /// The judge call failed.
    HeuristicFallback,
    /// The judge answered with output that could not be read.
    HeuristicFallbackParse,
}

impl fmt::Display for EvalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalMode::Heuristic => write!(f, "heuristic"),
            EvalMode::Llm => write!(f, "llm"),
            EvalMode::HeuristicFallback => write!(f, "heuristic-fallback"),
            EvalMode::HeuristicFallbackParse => write!(f, "heuristic-fallback-parse"),
        }
    }
}

/// Request to grade one free-text answer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRequest {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub model_answer: String,
    #[serde(default)]
    pub user_answer: String,
    #[serde(default)]
    pub alternative_answers: Vec<String>,
}

/// Outcome of grading one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub score: Score,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub mode: EvalMode,
}

impl EvaluationResult {
    pub fn heuristic(score: Score) -> Self {
        Self {
            score,
            reason: None,
            mode: EvalMode::Heuristic,
        }
    }
}

/// Request to answer a learner's clarifying question.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowupRequest {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub model_answer: String,
    #[serde(default)]
    pub user_answer: Option<String>,
    #[serde(default)]
    pub followup_question: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FollowupMode {
    Llm,
    Fallback,
}

/// Answer to a follow-up question. Always starts with the caveat sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowupAnswer {
    pub answer: String,
    pub mode: FollowupMode,
}
