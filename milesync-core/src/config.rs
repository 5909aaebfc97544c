//! Configuration types

use crate::{CoachError, CoachResult, ConfigError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Upper bound on automatic handoff hops per route call.
pub const MAX_HANDOFF_DEPTH_LIMIT: usize = 5;

/// Sampling temperatures per kind of completion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Temperatures {
    /// Free-text conversational turns
    pub conversation: f32,
    /// Foundation assessment
    pub assessment: f32,
    /// Plan generation
    pub planning: f32,
    /// Resource recommendations
    pub support: f32,
}

impl Default for Temperatures {
    fn default() -> Self {
        Self {
            conversation: 0.7,
            assessment: 0.3,
            planning: 0.4,
            support: 0.5,
        }
    }
}

impl Temperatures {
    fn entries(&self) -> [(&'static str, f32); 4] {
        [
            ("temperatures.conversation", self.conversation),
            ("temperatures.assessment", self.assessment),
            ("temperatures.planning", self.planning),
            ("temperatures.support", self.support),
        ]
    }
}

/// Runtime configuration for the coaching core.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachConfig {
    /// OpenAI API key. `None` means no completion provider is configured.
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub model: String,
    pub requests_per_minute: u32,
    pub request_timeout: Duration,
    /// Automatic handoff hops per route call
    pub max_handoff_depth: usize,
    /// Conversation turns forwarded to free-text completions
    pub history_window: usize,
    pub temperatures: Temperatures,
}

impl fmt::Debug for CoachConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoachConfig")
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("openai_base_url", &self.openai_base_url)
            .field("model", &self.model)
            .field("requests_per_minute", &self.requests_per_minute)
            .field("request_timeout", &self.request_timeout)
            .field("max_handoff_depth", &self.max_handoff_depth)
            .field("history_window", &self.history_window)
            .field("temperatures", &self.temperatures)
            .finish()
    }
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            requests_per_minute: 60,
            request_timeout: Duration::from_secs(60),
            max_handoff_depth: 1,
            history_window: 10,
            temperatures: Temperatures::default(),
        }
    }
}

impl CoachConfig {
    /// Create CoachConfig from environment variables.
    ///
    /// Environment variables:
    /// - `MILESYNC_OPENAI_API_KEY`: API key (unset = no completion provider)
    /// - `MILESYNC_OPENAI_BASE_URL`: API base URL (default: https://api.openai.com/v1)
    /// - `MILESYNC_MODEL`: Chat model (default: gpt-4o-mini)
    /// - `MILESYNC_REQUESTS_PER_MINUTE`: Concurrent request permits (default: 60)
    /// - `MILESYNC_REQUEST_TIMEOUT_SECS`: Per-request timeout (default: 60)
    /// - `MILESYNC_MAX_HANDOFF_DEPTH`: Automatic handoff hops (default: 1)
    /// - `MILESYNC_HISTORY_WINDOW`: Turns sent with free-text prompts (default: 10)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let openai_api_key = std::env::var("MILESYNC_OPENAI_API_KEY")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let openai_base_url = std::env::var("MILESYNC_OPENAI_BASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.openai_base_url);

        let model = std::env::var("MILESYNC_MODEL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.model);

        let requests_per_minute = std::env::var("MILESYNC_REQUESTS_PER_MINUTE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.requests_per_minute);

        let request_timeout = std::env::var("MILESYNC_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        let max_handoff_depth = std::env::var("MILESYNC_MAX_HANDOFF_DEPTH")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_handoff_depth);

        let history_window = std::env::var("MILESYNC_HISTORY_WINDOW")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.history_window);

        Self {
            openai_api_key,
            openai_base_url,
            model,
            requests_per_minute,
            request_timeout,
            max_handoff_depth,
            history_window,
            temperatures: defaults.temperatures,
        }
    }

    /// Validate the configuration.
    ///
    /// Validates:
    /// - model and base URL are non-empty
    /// - requests_per_minute > 0 and request_timeout is positive
    /// - max_handoff_depth <= MAX_HANDOFF_DEPTH_LIMIT
    /// - history_window > 0
    /// - every temperature in [0.0, 2.0]
    pub fn validate(&self) -> CoachResult<()> {
        if self.model.trim().is_empty() {
            return Err(CoachError::Config(ConfigError::MissingRequired {
                field: "model".to_string(),
            }));
        }

        if self.openai_base_url.trim().is_empty() {
            return Err(CoachError::Config(ConfigError::MissingRequired {
                field: "openai_base_url".to_string(),
            }));
        }

        if self.requests_per_minute == 0 {
            return Err(invalid(
                "requests_per_minute",
                self.requests_per_minute.to_string(),
                "requests_per_minute must be greater than 0",
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(invalid(
                "request_timeout",
                format!("{:?}", self.request_timeout),
                "request_timeout must be positive",
            ));
        }

        if self.max_handoff_depth > MAX_HANDOFF_DEPTH_LIMIT {
            return Err(invalid(
                "max_handoff_depth",
                self.max_handoff_depth.to_string(),
                &format!("max_handoff_depth must be at most {MAX_HANDOFF_DEPTH_LIMIT}"),
            ));
        }

        if self.history_window == 0 {
            return Err(invalid(
                "history_window",
                self.history_window.to_string(),
                "history_window must be greater than 0",
            ));
        }

        for (field, value) in self.temperatures.entries() {
            if !(0.0..=2.0).contains(&value) {
                return Err(invalid(
                    field,
                    value.to_string(),
                    "temperature must be between 0.0 and 2.0",
                ));
            }
        }

        Ok(())
    }

    /// True when an API key is present.
    pub fn has_completion_credentials(&self) -> bool {
        self.openai_api_key.is_some()
    }
}

fn invalid(field: &str, value: String, reason: &str) -> CoachError {
    CoachError::Config(ConfigError::InvalidValue {
        field: field.to_string(),
        value,
        reason: reason.to_string(),
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = CoachConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_handoff_depth, 1);
        assert_eq!(config.model, "gpt-4o-mini");
        assert!(!config.has_completion_credentials());
    }

    #[test]
    fn test_validate_rejects_zero_rate() {
        let config = CoachConfig {
            requests_per_minute: 0,
            ..CoachConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            CoachError::Config(ConfigError::InvalidValue { ref field, .. }) if field == "requests_per_minute"
        ));
    }

    #[test]
    fn test_validate_rejects_deep_handoff() {
        let config = CoachConfig {
            max_handoff_depth: MAX_HANDOFF_DEPTH_LIMIT + 1,
            ..CoachConfig::default()
        };
        assert!(config.validate().is_err());

        let zero = CoachConfig {
            max_handoff_depth: 0,
            ..CoachConfig::default()
        };
        assert!(zero.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_temperature() {
        let mut config = CoachConfig::default();
        config.temperatures.planning = 2.5;
        let err = config.validate().unwrap_err();
        assert!(format!("{}", err).contains("temperatures.planning"));
    }

    #[test]
    fn test_validate_rejects_empty_model() {
        let config = CoachConfig {
            model: "  ".to_string(),
            ..CoachConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CoachError::Config(ConfigError::MissingRequired { .. }))
        ));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = CoachConfig {
            openai_api_key: Some("sk-secret".to_string()),
            ..CoachConfig::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
