//! Answer evaluation orchestrator.
//!
//! Decides between the heuristic scorer and the remote judge. The judge
//! path is a short pipeline of result-typed steps:
//!
//! 1. `call_judge`: one bounded request/response exchange
//!    (`JudgeError::Unavailable` / `JudgeError::Timeout` on failure)
//! 2. `parse_verdict`: structured object, then the lenient digit scan
//!    (`JudgeError::Unparseable` on failure)
//!
//! Every error is routed back to the heuristic score; the caller only ever
//! sees `ExamError::Validation`.

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use regex::Regex;
use serde_json::Value;

use crate::error::{require, ExamError, JudgeError};
use crate::heuristic::{self, HeuristicConfig};
use crate::model::{EvalMode, EvaluateRequest, EvaluationResult, Score};
use crate::traits::{JudgeRequest, RemoteJudge};

pub const DEFAULT_MODEL: &str = "gpt-5-mini";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

static LENIENT_SCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([012])\b").expect("valid score pattern"));

/// Settings shared by every remote judge exchange.
#[derive(Debug, Clone)]
pub struct JudgeSettings {
    /// Model identifier passed to the judge.
    pub model: String,
    /// Upper bound on one exchange; the call is cancelled afterwards.
    pub timeout: Duration,
    /// Ask for a JSON object when grading.
    pub json_output: bool,
    /// Cap on generated tokens; `None` leaves it to the backend.
    pub max_output_tokens: Option<u32>,
}

impl Default for JudgeSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            json_output: true,
            max_output_tokens: None,
        }
    }
}

/// Run one judge exchange within `settings.timeout`.
pub(crate) async fn call_judge(
    judge: &dyn RemoteJudge,
    settings: &JudgeSettings,
    prompt: String,
    json_output: bool,
) -> Result<String, JudgeError> {
    let request = JudgeRequest {
        model: settings.model.clone(),
        prompt,
        json_output,
        max_output_tokens: settings.max_output_tokens,
    };

    match tokio::time::timeout(settings.timeout, judge.complete(&request)).await {
        Err(_) => Err(JudgeError::Timeout(settings.timeout.as_secs())),
        Ok(Err(e)) => Err(JudgeError::Unavailable(format!("{e:#}"))),
        Ok(Ok(response)) => Ok(response.text.trim().to_string()),
    }
}

/// A score read from the judge's output.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub score: Score,
    pub reason: String,
}

/// Read a verdict from raw judge output.
///
/// A JSON object, either the whole output or embedded in surrounding text,
/// always yields a verdict: its `score` (number or numeric string) is
/// normalized, and a missing or non-numeric score counts as incorrect.
/// Without an object the first standalone 0, 1 or 2 in the text is taken,
/// with the whole text as reason.
pub fn parse_verdict(raw: &str) -> Result<Verdict, JudgeError> {
    let raw = raw.trim();
    let unparseable = || JudgeError::Unparseable {
        raw: raw.to_string(),
    };
    if raw.is_empty() {
        return Err(unparseable());
    }

    if let Some(object) = structured_object(raw) {
        return Ok(verdict_from_object(&object));
    }

    LENIENT_SCORE
        .captures(raw)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .map(|value| Verdict {
            score: Score::from_judge_value(value),
            reason: raw.to_string(),
        })
        .ok_or_else(unparseable)
}

fn structured_object(raw: &str) -> Option<Value> {
    serde_json::from_str::<Value>(raw)
        .ok()
        .filter(Value::is_object)
        .or_else(|| {
            let start = raw.find('{')?;
            let end = raw.rfind('}')?;
            (start < end)
                .then(|| serde_json::from_str::<Value>(&raw[start..=end]).ok())
                .flatten()
                .filter(Value::is_object)
        })
}

fn verdict_from_object(object: &Value) -> Verdict {
    let score = match object.get("score") {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        _ => f64::NAN,
    };
    let reason = object
        .get("reason")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Verdict {
        score: Score::from_judge_value(score),
        reason,
    }
}

/// Build the grading instruction for the remote judge.
pub fn grading_prompt(request: &EvaluateRequest) -> String {
    // canonical answer first, then the extra accepted phrasings
    let accepted = std::iter::once(&request.model_answer)
        .chain(&request.alternative_answers)
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"Bewerte eine Jagdkurs-Prüfungsantwort.

Frage: {question}
Musterantwort: {model}
Weitere akzeptierte Antworten: {accepted}
Nutzerantwort: {user}

Gib ausschließlich JSON zurück mit:
{{"score":0|1|2,"reason":"kurz"}}

Regeln:
- 0 = falsch
- 1 = teilweise richtig
- 2 = Kernaussagen korrekt
- Bei Aufzählungsfragen ("Nennen Sie...", "Was gehört alles..."):
  - 2 nur, wenn alle genannten Punkte korrekt sind.
  - 1, wenn richtige und falsche Punkte gemischt sind.
  - 0, wenn alle genannten Punkte falsch sind.
- Zusätzliche Nennungen, die zur Sache passen und den Kernaussagen nicht widersprechen, führen zu keinem Punktabzug."#,
        question = request.question.trim(),
        model = request.model_answer.trim(),
        user = request.user_answer.trim(),
    )
}

/// Grades learner answers.
///
/// Without a judge every evaluation is heuristic. With a judge, each valid
/// request makes exactly one judge call.
#[derive(Clone)]
pub struct Evaluator {
    judge: Option<Arc<dyn RemoteJudge>>,
    settings: JudgeSettings,
    heuristic: HeuristicConfig,
}

impl Evaluator {
    pub fn new(judge: Option<Arc<dyn RemoteJudge>>, settings: JudgeSettings) -> Self {
        Self {
            judge,
            settings,
            heuristic: HeuristicConfig::default(),
        }
    }

    /// An evaluator that never leaves the process.
    pub fn offline() -> Self {
        Self::new(None, JudgeSettings::default())
    }

    #[must_use]
    pub fn with_heuristic(mut self, heuristic: HeuristicConfig) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn has_judge(&self) -> bool {
        self.judge.is_some()
    }

    /// Grade `request.user_answer`.
    pub async fn evaluate(&self, request: &EvaluateRequest) -> Result<EvaluationResult, ExamError> {
        require("question", &request.question)?;
        require("modelAnswer", &request.model_answer)?;

        let fallback = heuristic::score_with(
            &self.heuristic,
            &request.model_answer,
            &request.user_answer,
        );

        let Some(judge) = &self.judge else {
            tracing::debug!("no remote judge configured, using heuristic");
            return Ok(EvaluationResult::heuristic(fallback));
        };

        let outcome = call_judge(
            judge.as_ref(),
            &self.settings,
            grading_prompt(request),
            self.settings.json_output,
        )
        .await
        .and_then(|raw| parse_verdict(&raw));

        let result = match outcome {
            Ok(verdict) => EvaluationResult {
                score: verdict.score,
                reason: Some(verdict.reason),
                mode: EvalMode::Llm,
            },
            Err(JudgeError::Unparseable { raw }) => {
                tracing::warn!(judge = judge.name(), "judge output unparseable, using heuristic");
                EvaluationResult {
                    score: fallback,
                    reason: Some(raw),
                    mode: EvalMode::HeuristicFallbackParse,
                }
            }
            Err(e) => {
                tracing::warn!(judge = judge.name(), "{e}, using heuristic");
                EvaluationResult {
                    score: fallback,
                    reason: None,
                    mode: EvalMode::HeuristicFallback,
                }
            }
        };
        Ok(result)
    }
}
