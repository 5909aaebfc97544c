//! Completion provider implementations
//!
//! Concrete [`CompletionProvider`](crate::CompletionProvider) backends for
//! hosted language models, plus the error helpers they share.

pub mod openai;

pub use openai::{OpenAIClient, OpenAICompletionProvider};

use milesync_core::{CoachError, LlmError};

pub(crate) fn request_failed(
    provider: &str,
    status: i32,
    message: impl Into<String>,
) -> CoachError {
    CoachError::Llm(LlmError::RequestFailed {
        provider: provider.to_string(),
        status,
        message: message.into(),
    })
}

pub(crate) fn invalid_response(provider: &str, reason: impl Into<String>) -> CoachError {
    CoachError::Llm(LlmError::InvalidResponse {
        provider: provider.to_string(),
        reason: reason.into(),
    })
}

pub(crate) fn rate_limited(provider: &str, retry_after_ms: i64) -> CoachError {
    CoachError::Llm(LlmError::RateLimited {
        provider: provider.to_string(),
        retry_after_ms,
    })
}

pub(crate) fn timed_out(provider: &str) -> CoachError {
    CoachError::Llm(LlmError::Timeout {
        provider: provider.to_string(),
    })
}
