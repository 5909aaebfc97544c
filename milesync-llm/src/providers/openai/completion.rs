//! OpenAI completion provider implementation

use super::client::OpenAIClient;
use super::types::{ChatCompletionRequest, ChatCompletionResponse, Message, ResponseFormatSpec};
use crate::providers::invalid_response;
use crate::{CompletionProvider, CompletionRequest, ResponseFormat};
use async_trait::async_trait;
use milesync_core::{CoachConfig, CoachResult};

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// OpenAI completion provider using chat-completions.
pub struct OpenAICompletionProvider {
    client: OpenAIClient,
    model: String,
}

impl OpenAICompletionProvider {
    /// Create a provider from an existing client.
    ///
    /// # Arguments
    /// * `client` - Rate-limited HTTP client
    /// * `model` - Model name (e.g., "gpt-4o-mini", "gpt-4o")
    pub fn new(client: OpenAIClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Build a provider from configuration and an API key.
    pub fn from_config(api_key: &str, config: &CoachConfig) -> CoachResult<Self> {
        let client = OpenAIClient::new(api_key, config.requests_per_minute, config.request_timeout)?
            .with_base_url(&config.openai_base_url);
        Ok(Self::new(client, &config.model))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, request: &CompletionRequest) -> ChatCompletionRequest {
        let response_format = match request.format {
            ResponseFormat::Json => Some(ResponseFormatSpec::json_object()),
            ResponseFormat::Text => None,
        };

        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                Message::system(&request.system_prompt),
                Message::user(&request.user_prompt),
            ],
            max_tokens: None,
            temperature: Some(request.temperature),
            response_format,
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAICompletionProvider {
    async fn complete(&self, request: &CompletionRequest) -> CoachResult<String> {
        let body = self.build_request(request);
        let response: ChatCompletionResponse =
            self.client.request("chat/completions", body).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| invalid_response("openai", "No completion in response"))
    }

    fn provider_name(&self) -> &str {
        "openai"
    }
}

impl std::fmt::Debug for OpenAICompletionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAICompletionProvider")
            .field("model", &self.model)
            .field("client", &self.client)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> OpenAICompletionProvider {
        let config = CoachConfig::default();
        OpenAICompletionProvider::from_config("sk-test", &config).unwrap()
    }

    #[test]
    fn test_from_config_uses_default_model() {
        let provider = provider();
        assert_eq!(provider.model(), DEFAULT_MODEL);
        assert_eq!(provider.provider_name(), "openai");
    }

    #[test]
    fn test_json_request_sets_response_format() {
        let provider = provider();
        let body = provider.build_request(&CompletionRequest::json("sys", "user", 0.3));
        assert_eq!(body.response_format, Some(ResponseFormatSpec::json_object()));
        assert_eq!(body.temperature, Some(0.3));
        assert_eq!(body.messages.len(), 2);
    }

    #[test]
    fn test_text_request_has_no_response_format() {
        let provider = provider();
        let body = provider.build_request(&CompletionRequest::text("sys", "user", 0.7));
        assert!(body.response_format.is_none());
        assert_eq!(body.messages[1].content.as_deref(), Some("user"));
    }
}
