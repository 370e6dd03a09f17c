//! Provider error types.

use thiserror::Error;

/// Errors that can occur when talking to a remote judge.
///
/// The evaluation pipeline treats all of them alike ("judge unavailable");
/// the variants exist for logs and for callers of the provider directly.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The API returned an error response (rate limits included).
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),
}
