//! The agent seam.

use async_trait::async_trait;
use milesync_core::{
    AgentContext, AgentDescriptor, AgentResponse, AgentType, CoachError, CoachResult, LlmError,
};

/// A coaching-stage handler.
///
/// Agents borrow the context and never mutate it. Expected failures (missing
/// completion backend, unparsable model output) are turned into
/// `success = false` responses by the agent itself; an `Err` means something
/// the agent could not phrase for the user, and the coordinator converts it.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Static identity.
    fn descriptor(&self) -> AgentDescriptor;

    /// Handle one turn.
    async fn process(&self, context: &AgentContext) -> CoachResult<AgentResponse>;

    fn agent_type(&self) -> AgentType {
        self.descriptor().agent_type
    }
}

/// True for model output that was not the JSON object asked for.
pub(crate) fn is_malformed(error: &CoachError) -> bool {
    matches!(error, CoachError::Llm(LlmError::MalformedOutput { .. }))
}

/// Bulleted markdown list, or a single placeholder bullet when empty.
pub(crate) fn bullet_list(items: &[String], bullet: &str, empty: &str) -> String {
    if items.is_empty() {
        return format!("{} {}", bullet, empty);
    }
    items
        .iter()
        .map(|item| format!("{} {}", bullet, item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Numbered markdown list with the given indent.
pub(crate) fn numbered_list(items: &[String], indent: &str) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}{}. {}", indent, i + 1, item))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullet_list() {
        let items = vec!["a".to_string(), "b".to_string()];
        assert_eq!(bullet_list(&items, "-", "none"), "- a\n- b");
        assert_eq!(bullet_list(&[], "-", "none"), "- none");
    }

    #[test]
    fn test_is_malformed() {
        let malformed = CoachError::Llm(LlmError::MalformedOutput {
            reason: "x".to_string(),
        });
        assert!(is_malformed(&malformed));
        assert!(!is_malformed(&CoachError::Llm(LlmError::NotConfigured)));
    }

    #[test]
    fn test_numbered_list() {
        let items = vec!["x".to_string(), "y".to_string()];
        assert_eq!(numbered_list(&items, "  "), "  1. x\n  2. y");
        assert_eq!(numbered_list(&[], "  "), "");
    }
}
