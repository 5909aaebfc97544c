//! MileSync LLM - Completion Capability
//!
//! Provider-agnostic trait for text and JSON completions, prompt lookup and
//! structured-output parsing. Agents only see [`CompletionProvider`]; which
//! backend sits behind it is decided by configuration.

use async_trait::async_trait;
use milesync_core::{CoachConfig, CoachError, CoachResult, LlmError};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub mod prompts;
pub mod providers;
pub mod structured;

pub use prompts::{BuiltinPrompts, InMemoryPromptStore, PromptStore};
pub use providers::{OpenAIClient, OpenAICompletionProvider};
pub use structured::{extract_json_block, parse_json_object};

// ============================================================================
// COMPLETION REQUEST
// ============================================================================

/// Shape of the completion the caller expects back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Free text
    #[default]
    Text,
    /// A single JSON object
    Json,
}

/// A single-shot completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f32,
    pub format: ResponseFormat,
}

impl CompletionRequest {
    pub fn text(
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
        temperature: f32,
    ) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            temperature,
            format: ResponseFormat::Text,
        }
    }

    pub fn json(
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
        temperature: f32,
    ) -> Self {
        Self {
            format: ResponseFormat::Json,
            ..Self::text(system_prompt, user_prompt, temperature)
        }
    }
}

// ============================================================================
// COMPLETION PROVIDER TRAIT
// ============================================================================

/// Trait for completion providers.
/// Implementations must be thread-safe (Send + Sync).
///
/// # Example
/// ```ignore
/// struct LocalModel { /* ... */ }
///
/// #[async_trait]
/// impl CompletionProvider for LocalModel {
///     async fn complete(&self, request: &CompletionRequest) -> CoachResult<String> {
///         // Call the model
///     }
///     fn provider_name(&self) -> &str { "local" }
/// }
/// ```
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Generate a completion.
    ///
    /// # Returns
    /// * `Ok(String)` - Raw completion text (JSON text for `ResponseFormat::Json`)
    /// * `Err(CoachError::Llm)` - Unavailable, transport, status or timeout failure
    async fn complete(&self, request: &CompletionRequest) -> CoachResult<String>;

    /// Short provider name for logs.
    fn provider_name(&self) -> &str;
}

/// Provider used when no backend is configured. Every call fails with
/// `LlmError::NotConfigured`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredProvider;

#[async_trait]
impl CompletionProvider for UnconfiguredProvider {
    async fn complete(&self, _request: &CompletionRequest) -> CoachResult<String> {
        Err(CoachError::Llm(LlmError::NotConfigured))
    }

    fn provider_name(&self) -> &str {
        "unconfigured"
    }
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Builds the completion backend described by a [`CoachConfig`].
pub trait CompletionConfig {
    /// OpenAI provider when an API key is present, else [`UnconfiguredProvider`].
    fn completion_provider(&self) -> CoachResult<Arc<dyn CompletionProvider>>;
}

impl CompletionConfig for CoachConfig {
    fn completion_provider(&self) -> CoachResult<Arc<dyn CompletionProvider>> {
        self.validate()?;
        match self.openai_api_key.as_deref() {
            Some(key) => {
                tracing::info!(model = %self.model, "using OpenAI completion provider");
                Ok(Arc::new(OpenAICompletionProvider::from_config(key, self)?))
            }
            None => {
                tracing::warn!("no completion API key configured; completions are unavailable");
                Ok(Arc::new(UnconfiguredProvider))
            }
        }
    }
}

// ============================================================================
// MOCK PROVIDER
// ============================================================================

/// Mock completion provider for testing.
/// Replays scripted results in order and records every request.
#[derive(Debug, Default)]
pub struct MockCompletionProvider {
    script: Mutex<VecDeque<CoachResult<String>>>,
    /// Returned once the script is exhausted
    fallback: Option<String>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockCompletionProvider {
    /// Mock with an empty script; calls fail once nothing is scripted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock that answers every call with `response`.
    pub fn always(response: impl Into<String>) -> Self {
        Self {
            fallback: Some(response.into()),
            ..Self::default()
        }
    }

    /// Queue a successful completion.
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.push(Ok(response.into()));
        self
    }

    /// Queue a failure.
    pub fn with_error(self, error: LlmError) -> Self {
        self.push(Err(CoachError::Llm(error)));
        self
    }

    /// Queue a JSON value serialized to text.
    pub fn with_json(self, value: serde_json::Value) -> Self {
        self.with_response(value.to_string())
    }

    fn push(&self, result: CoachResult<String>) {
        self.script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(result);
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

#[async_trait]
impl CompletionProvider for MockCompletionProvider {
    async fn complete(&self, request: &CompletionRequest) -> CoachResult<String> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.clone());

        let next = self
            .script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front();

        match (next, &self.fallback) {
            (Some(result), _) => result,
            (None, Some(fallback)) => Ok(fallback.clone()),
            (None, None) => Err(CoachError::Llm(LlmError::InvalidResponse {
                provider: "mock".to_string(),
                reason: "no scripted response left".to_string(),
            })),
        }
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}

// ============================================================================
// UNIT TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_provider_fails_not_configured() {
        let result = UnconfiguredProvider
            .complete(&CompletionRequest::text("s", "u", 0.7))
            .await;
        assert_eq!(result, Err(CoachError::Llm(LlmError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_mock_replays_script_then_fallback() {
        let mock = MockCompletionProvider::always("fallback")
            .with_response("first")
            .with_error(LlmError::Timeout {
                provider: "mock".to_string(),
            });
        let req = CompletionRequest::json("s", "u", 0.3);

        assert_eq!(mock.complete(&req).await.unwrap(), "first");
        assert!(mock.complete(&req).await.is_err());
        assert_eq!(mock.complete(&req).await.unwrap(), "fallback");
        assert_eq!(mock.request_count(), 3);
        assert_eq!(mock.requests()[0].format, ResponseFormat::Json);
    }

    #[tokio::test]
    async fn test_mock_without_script_fails() {
        let mock = MockCompletionProvider::new();
        let result = mock.complete(&CompletionRequest::text("s", "u", 0.7)).await;
        assert!(matches!(
            result,
            Err(CoachError::Llm(LlmError::InvalidResponse { .. }))
        ));
    }

    #[test]
    fn test_request_constructors() {
        let text = CompletionRequest::text("sys", "user", 0.7);
        assert_eq!(text.format, ResponseFormat::Text);
        let json = CompletionRequest::json("sys", "user", 0.3);
        assert_eq!(json.format, ResponseFormat::Json);
        assert_eq!(json.system_prompt, "sys");
        assert_eq!(json.temperature, 0.3);
    }

    #[test]
    fn test_config_without_key_is_unconfigured() {
        let provider = CoachConfig::default().completion_provider().unwrap();
        assert_eq!(provider.provider_name(), "unconfigured");
    }

    #[test]
    fn test_config_with_key_is_openai() {
        let config = CoachConfig {
            openai_api_key: Some("sk-test".to_string()),
            ..CoachConfig::default()
        };
        let provider = config.completion_provider().unwrap();
        assert_eq!(provider.provider_name(), "openai");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = CoachConfig {
            requests_per_minute: 0,
            ..CoachConfig::default()
        };
        assert!(matches!(
            config.completion_provider(),
            Err(CoachError::Config(_))
        ));
    }
}

// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================
