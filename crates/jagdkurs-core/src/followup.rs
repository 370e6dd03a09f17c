//! Tutor-style answers to learners' clarifying questions.

use std::sync::Arc;

use crate::engine::{call_judge, JudgeSettings};
use crate::error::{require, ExamError};
use crate::model::{FollowupAnswer, FollowupMode, FollowupRequest};
use crate::traits::RemoteJudge;

/// Every follow-up answer starts with this sentence.
pub const CAVEAT: &str = "Hinweis: Die folgende Antwort ist nicht mit Sicherheit korrekt.";

const NO_JUDGE_ANSWER: &str = "Bitte orientiere dich primär an der Musterlösung.";
const FAILED_ANSWER: &str = "Ich kann die Rückfrage gerade nicht sicher beantworten.";
const EMPTY_ANSWER: &str = "Keine Antwort erhalten.";

fn with_caveat(sentence: &str) -> String {
    format!("{CAVEAT} {sentence}")
}

/// Build the tutor instruction for the remote judge.
pub fn tutor_prompt(request: &FollowupRequest) -> String {
    let user_answer = request
        .user_answer
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or("-");

    format!(
        r#"Du bist Tutor für Jagdkurs-Prüfungsfragen.
Wichtig: Deine Antwort kann unvollständig sein. Formuliere daher vorsichtig.

Originalfrage: {question}
Musterlösung: {model}
Nutzerantwort: {user_answer}
Rückfrage des Nutzers: {followup}

Antworte kurz (max 4 Sätze), sachlich und auf Deutsch.
Beginne zwingend mit: "{CAVEAT}""#,
        question = request.question.trim(),
        model = request.model_answer.trim(),
        followup = request.followup_question.trim(),
    )
}

/// Answers follow-up questions through the remote judge, with fixed
/// caveat-prefixed fallbacks.
#[derive(Clone)]
pub struct FollowupResponder {
    judge: Option<Arc<dyn RemoteJudge>>,
    settings: JudgeSettings,
}

impl FollowupResponder {
    pub fn new(judge: Option<Arc<dyn RemoteJudge>>, settings: JudgeSettings) -> Self {
        Self { judge, settings }
    }

    pub async fn answer_followup(
        &self,
        request: &FollowupRequest,
    ) -> Result<FollowupAnswer, ExamError> {
        require("question", &request.question)?;
        require("modelAnswer", &request.model_answer)?;
        require("followupQuestion", &request.followup_question)?;

        let Some(judge) = &self.judge else {
            return Ok(FollowupAnswer {
                answer: with_caveat(NO_JUDGE_ANSWER),
                mode: FollowupMode::Fallback,
            });
        };

        match call_judge(judge.as_ref(), &self.settings, tutor_prompt(request), false).await {
            Ok(text) if text.is_empty() => Ok(FollowupAnswer {
                answer: with_caveat(EMPTY_ANSWER),
                mode: FollowupMode::Llm,
            }),
            Ok(text) => Ok(FollowupAnswer {
                answer: text,
                mode: FollowupMode::Llm,
            }),
            Err(e) => {
                tracing::warn!(judge = judge.name(), "follow-up failed: {e}");
                Ok(FollowupAnswer {
                    answer: with_caveat(FAILED_ANSWER),
                    mode: FollowupMode::Fallback,
                })
            }
        }
    }
}
