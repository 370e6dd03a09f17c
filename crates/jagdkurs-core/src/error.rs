//! Error types for exam generation and answer evaluation.
//!
//! `ExamError` is surfaced to callers. `JudgeError` never is: the evaluation
//! and follow-up paths recover from every variant locally, and the type
//! exists so each fallback branch is matched explicitly.

use thiserror::Error;

/// Errors that are reported to the caller as-is.
#[derive(Debug, Error)]
pub enum ExamError {
    /// A required input field was missing or empty.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The eligible pool for a subject is smaller than the requested set.
    #[error("not enough questions for {subject}: {available} available, {required} required")]
    InsufficientPool {
        subject: String,
        available: usize,
        required: usize,
    },
}

impl ExamError {
    /// Returns `true` for errors caused by a malformed request (HTTP 400 equivalent).
    pub fn is_validation(&self) -> bool {
        matches!(self, ExamError::Validation(_))
    }
}

/// Failures of a single remote judge exchange.
#[derive(Debug, Error)]
pub enum JudgeError {
    /// Transport failure or a non-success response.
    #[error("remote judge unavailable: {0}")]
    Unavailable(String),

    /// The call did not finish within the configured bound.
    #[error("remote judge timed out after {0}s")]
    Timeout(u64),

    /// The judge answered, but no score could be read from its output.
    #[error("unparseable judge output: {raw}")]
    Unparseable { raw: String },
}

/// Fail with `ExamError::Validation` when a required text field is blank.
pub(crate) fn require(field: &str, value: &str) -> Result<(), ExamError> {
    if value.trim().is_empty() {
        return Err(ExamError::Validation(format!("{field} is required")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_pool_message_names_counts() {
        let err = ExamError::InsufficientPool {
            subject: "Waffenkunde".into(),
            available: 19,
            required: 20,
        };
        let msg = err.to_string();
        assert!(msg.contains("Waffenkunde"));
        assert!(msg.contains("19 available"));
        assert!(!err.is_validation());
    }

    #[test]
    fn require_rejects_whitespace() {
        assert!(require("question", "  \n").unwrap_err().is_validation());
        assert!(require("question", "Was ist ein Keiler?").is_ok());
    }
}
