//! Shared collaborators injected into every agent.

use crate::entropy::{Entropy, ThreadEntropy};
use milesync_core::{AgentContext, Clock, CoachConfig, CoachResult, SystemClock};
use milesync_llm::{
    parse_json_object, BuiltinPrompts, CompletionConfig, CompletionProvider, CompletionRequest,
    PromptStore, UnconfiguredProvider,
};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Completion provider, prompts, clock, entropy and configuration.
#[derive(Clone)]
pub struct AgentServices {
    pub completion: Arc<dyn CompletionProvider>,
    pub prompts: Arc<dyn PromptStore>,
    pub clock: Arc<dyn Clock>,
    pub entropy: Arc<dyn Entropy>,
    pub config: CoachConfig,
}

impl AgentServices {
    /// Services around the given provider, with builtin prompts, the system
    /// clock, thread entropy and default configuration.
    pub fn new(completion: Arc<dyn CompletionProvider>) -> Self {
        Self {
            completion,
            prompts: Arc::new(BuiltinPrompts),
            clock: Arc::new(SystemClock),
            entropy: Arc::new(ThreadEntropy),
            config: CoachConfig::default(),
        }
    }

    /// Services with no completion backend. Heuristic features still work.
    pub fn unconfigured() -> Self {
        Self::new(Arc::new(UnconfiguredProvider))
    }

    /// Services built from configuration (see [`CoachConfig::from_env`]).
    pub fn from_config(config: CoachConfig) -> CoachResult<Self> {
        let completion = config.completion_provider()?;
        Ok(Self::new(completion).with_config(config))
    }

    pub fn with_prompts(mut self, prompts: Arc<dyn PromptStore>) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_entropy(mut self, entropy: Arc<dyn Entropy>) -> Self {
        self.entropy = entropy;
        self
    }

    pub fn with_config(mut self, config: CoachConfig) -> Self {
        self.config = config;
        self
    }

    /// System prompt for `key`, falling back to the agent's builtin text.
    pub fn system_prompt(&self, key: &str, default: &str) -> String {
        self.prompts.get_prompt(key, default)
    }

    /// Free-text reply grounded in the recent conversation.
    pub async fn generate_response(
        &self,
        system_prompt: &str,
        context: &AgentContext,
        instruction: &str,
    ) -> CoachResult<String> {
        let user_prompt = render_conversation_prompt(context, instruction, self.config.history_window);
        let request =
            CompletionRequest::text(system_prompt, user_prompt, self.config.temperatures.conversation);
        let text = self.completion.complete(&request).await?;
        Ok(text.trim().to_string())
    }

    /// JSON-mode completion parsed into an object.
    pub async fn request_structured(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
    ) -> CoachResult<Map<String, Value>> {
        let request = CompletionRequest::json(system_prompt, user_prompt, temperature);
        let text = self.completion.complete(&request).await?;
        parse_json_object(&text)
    }
}

impl std::fmt::Debug for AgentServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentServices")
            .field("completion", &self.completion.provider_name())
            .field("config", &self.config)
            .finish()
    }
}

/// `ROLE: content` lines for the last `window` turns, then the instruction.
fn render_conversation_prompt(context: &AgentContext, instruction: &str, window: usize) -> String {
    let recent = context.recent_messages(window);
    if recent.is_empty() {
        return instruction.to_string();
    }

    let transcript = recent
        .iter()
        .map(|m| format!("{}: {}", m.role.as_str().to_uppercase(), m.content))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Conversation so far:\n{}\n\nRespond to the user's latest message:\n{}",
        transcript, instruction
    )
}
