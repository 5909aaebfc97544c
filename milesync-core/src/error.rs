//! Error types for MileSync coaching operations

use crate::AgentType;
use thiserror::Error;

/// Completion capability errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LlmError {
    #[error("No completion provider configured")]
    NotConfigured,

    #[error("Request to {provider} failed with status {status}: {message}")]
    RequestFailed {
        provider: String,
        status: i32,
        message: String,
    },

    #[error("Rate limited by {provider}, retry after {retry_after_ms}ms")]
    RateLimited {
        provider: String,
        retry_after_ms: i64,
    },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Malformed structured output: {reason}")]
    MalformedOutput { reason: String },

    #[error("Request to {provider} timed out")]
    Timeout { provider: String },
}

impl LlmError {
    /// True when the capability is missing rather than failing.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, LlmError::NotConfigured)
    }
}

/// Agent and coordination errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AgentError {
    #[error("Agent not registered: {agent_type}")]
    NotRegistered { agent_type: AgentType },

    #[error("Agent {agent_type} panicked while processing")]
    Panicked { agent_type: AgentType },

    #[error("Agent {agent_type} failed: {reason}")]
    ProcessingFailed {
        agent_type: AgentType,
        reason: String,
    },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Master error type for all MileSync errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoachError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for MileSync operations.
pub type CoachResult<T> = Result<T, CoachError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_error_display_rate_limited() {
        let err = LlmError::RateLimited {
            provider: "openai".to_string(),
            retry_after_ms: 1500,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Rate limited"));
        assert!(msg.contains("openai"));
        assert!(msg.contains("1500"));
    }

    #[test]
    fn test_llm_error_unavailable() {
        assert!(LlmError::NotConfigured.is_unavailable());
        assert!(!LlmError::Timeout {
            provider: "openai".to_string()
        }
        .is_unavailable());
    }

    #[test]
    fn test_config_error_display_invalid_value() {
        let err = ConfigError::InvalidValue {
            field: "max_handoff_depth".to_string(),
            value: "99".to_string(),
            reason: "must be at most 5".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("max_handoff_depth"));
        assert!(msg.contains("99"));
        assert!(msg.contains("must be at most 5"));
    }

    #[test]
    fn test_agent_error_display_panicked() {
        let err = AgentError::Panicked {
            agent_type: AgentType::Planning,
        };
        assert!(format!("{}", err).contains("planning"));
    }

    #[test]
    fn test_coach_error_from_variants() {
        let llm = CoachError::from(LlmError::NotConfigured);
        assert!(matches!(llm, CoachError::Llm(_)));

        let agent = CoachError::from(AgentError::NotRegistered {
            agent_type: AgentType::Support,
        });
        assert!(matches!(agent, CoachError::Agent(_)));

        let config = CoachError::from(ConfigError::MissingRequired {
            field: "model".to_string(),
        });
        assert!(matches!(config, CoachError::Config(_)));
    }
}
