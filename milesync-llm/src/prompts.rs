//! Prompt lookup
//!
//! Agents ship their own default system prompts. A [`PromptStore`] lets a host
//! override any of them by key without touching the agents.

use std::collections::HashMap;
use std::sync::RwLock;

/// Well-known prompt keys, one per agent.
pub mod keys {
    pub const FOUNDATION: &str = "foundation_system_prompt";
    pub const PLANNING: &str = "planning_system_prompt";
    pub const EXECUTION: &str = "execution_system_prompt";
    pub const PSYCHOLOGICAL: &str = "psychological_system_prompt";
    pub const SUPPORT: &str = "support_system_prompt";
    pub const SUSTAINABILITY: &str = "sustainability_system_prompt";
}

/// Source of system prompts.
pub trait PromptStore: Send + Sync {
    /// Prompt stored under `key`, or `default` when there is none.
    fn get_prompt(&self, key: &str, default: &str) -> String;
}

/// Store with no overrides; always returns the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinPrompts;

impl PromptStore for BuiltinPrompts {
    fn get_prompt(&self, _key: &str, default: &str) -> String {
        default.to_string()
    }
}

/// In-process override table.
/// Thread-safe via RwLock.
#[derive(Default)]
pub struct InMemoryPromptStore {
    prompts: RwLock<HashMap<String, String>>,
}

impl InMemoryPromptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the prompt for `key`.
    pub fn set(&self, key: impl Into<String>, prompt: impl Into<String>) {
        if let Ok(mut prompts) = self.prompts.write() {
            prompts.insert(key.into(), prompt.into());
        }
    }

    /// Drop the override for `key`, returning it.
    pub fn remove(&self, key: &str) -> Option<String> {
        self.prompts.write().ok()?.remove(key)
    }

    /// Drop all overrides.
    pub fn clear(&self) {
        if let Ok(mut prompts) = self.prompts.write() {
            prompts.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.prompts.read().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PromptStore for InMemoryPromptStore {
    fn get_prompt(&self, key: &str, default: &str) -> String {
        self.prompts
            .read()
            .ok()
            .and_then(|p| p.get(key).filter(|s| !s.trim().is_empty()).cloned())
            .unwrap_or_else(|| default.to_string())
    }
}

impl std::fmt::Debug for InMemoryPromptStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryPromptStore")
            .field("overrides", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_returns_default() {
        assert_eq!(BuiltinPrompts.get_prompt(keys::PLANNING, "plan!"), "plan!");
    }

    #[test]
    fn test_in_memory_override_lifecycle() {
        let store = InMemoryPromptStore::new();
        assert!(store.is_empty());
        assert_eq!(store.get_prompt(keys::SUPPORT, "default"), "default");

        store.set(keys::SUPPORT, "custom support prompt");
        assert_eq!(store.get_prompt(keys::SUPPORT, "default"), "custom support prompt");
        assert_eq!(store.get_prompt(keys::PLANNING, "default"), "default");
        assert_eq!(store.len(), 1);

        assert_eq!(store.remove(keys::SUPPORT).as_deref(), Some("custom support prompt"));
        assert_eq!(store.get_prompt(keys::SUPPORT, "default"), "default");

        store.set(keys::FOUNDATION, "a");
        store.set(keys::EXECUTION, "b");
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_blank_override_falls_back() {
        let store = InMemoryPromptStore::new();
        store.set(keys::FOUNDATION, "   ");
        assert_eq!(store.get_prompt(keys::FOUNDATION, "default"), "default");
    }
}
