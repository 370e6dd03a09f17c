//! Core trait definition for the remote judge.
//!
//! Implemented by the `jagdkurs-providers` crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A text-completion backend used to grade answers and answer follow-ups.
///
/// Implementations should return `Err` for transport failures and
/// non-success responses alike; callers treat both as "judge unavailable".
#[async_trait]
pub trait RemoteJudge: Send + Sync {
    /// Human-readable judge name (e.g. "openai").
    fn name(&self) -> &str;

    /// Send one instruction and return the judge's raw text output.
    async fn complete(&self, request: &JudgeRequest) -> anyhow::Result<JudgeResponse>;
}

/// One instruction sent to the judge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeRequest {
    /// Model identifier (e.g. "gpt-5-mini").
    pub model: String,
    /// The full instruction text.
    pub prompt: String,
    /// Ask the backend to constrain its output to a JSON object.
    #[serde(default)]
    pub json_output: bool,
    /// Upper bound on generated tokens, if the backend supports one.
    #[serde(default)]
    pub max_output_tokens: Option<u32>,
}

/// The judge's answer to a [`JudgeRequest`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeResponse {
    /// Raw output text.
    pub text: String,
}
