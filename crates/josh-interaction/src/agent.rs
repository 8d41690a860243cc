//! Completion backend abstraction.
//!
//! The conversation chain talks to the completion service through this trait
//! so the rest of the crate can be exercised against an in-memory fake.

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by a completion backend.
///
/// There is no retry policy: a failure is mapped to one of these variants
/// and shown to the user as-is.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The request could not be executed (network down, no credential, ...).
    #[error("completion request failed: {0}")]
    ExecutionFailed(String),

    /// The service answered with an error status.
    #[error("completion service error: {message}")]
    Process {
        status_code: Option<u16>,
        message: String,
    },

    /// The service answered, but the response could not be interpreted.
    #[error("failed to parse completion response: {0}")]
    Parse(String),
}

/// A backend that turns one prompt into one assistant utterance.
#[async_trait]
pub trait CompletionAgent: Send + Sync {
    /// Human-readable description of the backend, for logging.
    fn describe(&self) -> &str;

    /// Executes a single completion call.
    async fn complete(&self, prompt: String) -> Result<String, AgentError>;
}
