//! Token-overlap heuristic scorer.
//!
//! Always available and network-free. It is the default judge when no
//! remote judge is configured and the last resort of every fallback path,
//! so it is total: any pair of strings yields a score.

use crate::model::Score;

/// Tokens of this many characters or fewer are ignored.
pub const MIN_TOKEN_LEN: usize = 3;
/// Hit ratio at or above which an answer counts as correct.
pub const FULL_CREDIT_RATIO: f64 = 0.75;
/// Hit ratio at or above which an answer counts as partially correct.
pub const PARTIAL_CREDIT_RATIO: f64 = 0.3;

/// Tunable thresholds of the heuristic scorer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicConfig {
    pub min_token_len: usize,
    pub full_credit_ratio: f64,
    pub partial_credit_ratio: f64,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            min_token_len: MIN_TOKEN_LEN,
            full_credit_ratio: FULL_CREDIT_RATIO,
            partial_credit_ratio: PARTIAL_CREDIT_RATIO,
        }
    }
}

/// Score `user_answer` against `model_answer` with the default thresholds.
pub fn score(model_answer: &str, user_answer: &str) -> Score {
    score_with(&HeuristicConfig::default(), model_answer, user_answer)
}

/// Score `user_answer` against `model_answer`.
///
/// Only the canonical answer is tokenized; alternative accepted answers
/// are not considered here.
pub fn score_with(config: &HeuristicConfig, model_answer: &str, user_answer: &str) -> Score {
    let model = model_answer.to_lowercase();
    let model = model.trim();
    let user = user_answer.to_lowercase();
    let user = user.trim();

    if user.is_empty() {
        return Score::Incorrect;
    }
    if user == model {
        return Score::Correct;
    }

    let tokens: Vec<&str> = model
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() > config.min_token_len)
        .collect();
    if tokens.is_empty() {
        return Score::Incorrect;
    }

    let ratio = hit_ratio(&tokens, user);
    if ratio >= config.full_credit_ratio {
        Score::Correct
    } else if ratio >= config.partial_credit_ratio {
        Score::Partial
    } else {
        Score::Incorrect
    }
}

/// Fraction of `tokens` occurring as a substring of `haystack`.
fn hit_ratio(tokens: &[&str], haystack: &str) -> f64 {
    let hits = tokens.iter().filter(|t| haystack.contains(*t)).count();
    hits as f64 / tokens.len() as f64
}
