//! MileSync Context - per-turn agent input
//!
//! An [`AgentContext`] carries everything an agent may look at for one turn:
//! the conversation, the current goal, the task history, a loose side channel
//! of caller hints and, when agents are chained within a turn, the typed
//! output of the previous agent. Agents only ever borrow it.

use crate::time::parse_local_timestamp;
use crate::{AgentType, ChatRole, FoundationOutput, PlanningOutput, TaskStatus};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Recognized keys of [`AgentContext::additional_context`].
pub mod keys {
    /// Operation selector, e.g. "daily_summary"
    pub const REQUEST_TYPE: &str = "request_type";
    /// Explicit agent selector, e.g. "planning"
    pub const AGENT_TYPE: &str = "agent_type";
    /// Foundation override forcing assessment generation
    pub const GENERATE_ASSESSMENT: &str = "generate_assessment";
    /// Task id echoed back on task completion
    pub const TASK_ID: &str = "task_id";
}

// ============================================================================
// CONVERSATION
// ============================================================================

/// One conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }

    pub fn is_user(&self) -> bool {
        self.role == ChatRole::User
    }
}

// ============================================================================
// GOAL AND TASKS
// ============================================================================

/// The goal currently being coached. Read-only for agents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalRecord {
    pub title: Option<String>,
    pub description: Option<String>,
    pub target_date: Option<String>,
    pub category: Option<String>,
}

impl GoalRecord {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }
}

/// A task as stored by the caller. Timestamps stay raw strings and are parsed
/// leniently where a heuristic needs a date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskRecord {
    pub id: Option<String>,
    pub title: String,
    pub status: TaskStatus,
    pub created_at: Option<String>,
    pub completed_at: Option<String>,
}

impl TaskRecord {
    pub fn new(title: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            title: title.into(),
            status,
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_created_at(mut self, raw: impl Into<String>) -> Self {
        self.created_at = Some(raw.into());
        self
    }

    pub fn with_completed_at(mut self, raw: impl Into<String>) -> Self {
        self.completed_at = Some(raw.into());
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status.is_completed()
    }

    /// Completion time on the writer's clock, offset dropped.
    pub fn completed_local(&self) -> Option<NaiveDateTime> {
        self.completed_at.as_deref().and_then(parse_local_timestamp)
    }

    /// Calendar date of completion as the writer saw it, if completed with a
    /// parseable timestamp.
    pub fn completed_on(&self) -> Option<NaiveDate> {
        if !self.is_completed() {
            return None;
        }
        self.completed_local().map(|at| at.date())
    }

    /// Calendar date of creation as the writer saw it, if parseable.
    pub fn created_on(&self) -> Option<NaiveDate> {
        self.created_at
            .as_deref()
            .and_then(parse_local_timestamp)
            .map(|at| at.date())
    }
}

// ============================================================================
// HANDOFF
// ============================================================================

/// Typed output of one agent passed to the next within a single turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", content = "output", rename_all = "snake_case")]
pub enum Handoff {
    Foundation(FoundationOutput),
    Planning(PlanningOutput),
}

impl Handoff {
    /// Agent that produced this handoff.
    pub fn source(&self) -> AgentType {
        match self {
            Handoff::Foundation(_) => AgentType::Foundation,
            Handoff::Planning(_) => AgentType::Planning,
        }
    }

    /// Agent that consumes this handoff.
    pub fn successor(&self) -> AgentType {
        match self {
            Handoff::Foundation(_) => AgentType::Planning,
            Handoff::Planning(_) => AgentType::Execution,
        }
    }

    pub fn foundation(&self) -> Option<&FoundationOutput> {
        match self {
            Handoff::Foundation(out) => Some(out),
            Handoff::Planning(_) => None,
        }
    }
}

// ============================================================================
// AGENT CONTEXT
// ============================================================================

/// Input to every agent call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentContext {
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub goal_id: Option<String>,
    /// Oldest first
    pub messages: Vec<ChatMessage>,
    pub current_goal: Option<GoalRecord>,
    /// Oldest first
    pub task_history: Vec<TaskRecord>,
    pub additional_context: Map<String, Value>,
    pub handoff: Option<Handoff>,
}

impl AgentContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_goal_id(mut self, goal_id: impl Into<String>) -> Self {
        self.goal_id = Some(goal_id.into());
        self
    }

    pub fn with_message(mut self, message: ChatMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_messages(mut self, messages: Vec<ChatMessage>) -> Self {
        self.messages = messages;
        self
    }

    pub fn with_goal(mut self, goal: GoalRecord) -> Self {
        self.current_goal = Some(goal);
        self
    }

    pub fn with_task_history(mut self, tasks: Vec<TaskRecord>) -> Self {
        self.task_history = tasks;
        self
    }

    pub fn with_context_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.additional_context.insert(key.into(), value.into());
        self
    }

    pub fn with_handoff(mut self, handoff: Handoff) -> Self {
        self.handoff = Some(handoff);
        self
    }

    // ------------------------------------------------------------------------
    // Side channel
    // ------------------------------------------------------------------------

    /// String value of a side-channel key. Non-string values read as absent.
    pub fn context_str(&self, key: &str) -> Option<&str> {
        self.additional_context
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Truthiness of a side-channel key: `true`, a non-zero number, or one of
    /// "true", "1", "yes" (any case).
    pub fn flag(&self, key: &str) -> bool {
        match self.additional_context.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
            Some(Value::String(s)) => {
                matches!(s.trim().to_lowercase().as_str(), "true" | "1" | "yes")
            }
            _ => false,
        }
    }

    /// Raw `request_type` selector.
    pub fn request_type_raw(&self) -> Option<&str> {
        self.context_str(keys::REQUEST_TYPE)
    }

    /// Raw `agent_type` selector.
    pub fn agent_type_raw(&self) -> Option<&str> {
        self.context_str(keys::AGENT_TYPE)
    }

    /// `task_id` pass-through; numeric ids are rendered as strings.
    pub fn task_id(&self) -> Option<String> {
        match self.additional_context.get(keys::TASK_ID) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }

    // ------------------------------------------------------------------------
    // Conversation views
    // ------------------------------------------------------------------------

    pub fn user_messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter().filter(|m| m.is_user())
    }

    /// All user turns, lowercased and joined with single spaces.
    pub fn user_text(&self) -> String {
        self.user_messages()
            .map(|m| m.content.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Content of the most recent user turn.
    pub fn last_user_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.is_user())
            .map(|m| m.content.as_str())
    }

    /// The last `n` turns, oldest first.
    pub fn recent_messages(&self, n: usize) -> &[ChatMessage] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    pub fn completed_task_count(&self) -> usize {
        self.task_history.iter().filter(|t| t.is_completed()).count()
    }

    pub fn goal_title(&self) -> Option<&str> {
        self.current_goal
            .as_ref()
            .and_then(|g| g.title.as_deref())
            .filter(|t| !t.trim().is_empty())
    }

    // ------------------------------------------------------------------------
    // Chaining
    // ------------------------------------------------------------------------

    /// Context for the next hop of a chain: same conversation and records,
    /// selectors removed, handoff replaced.
    pub fn chained(&self, handoff: Handoff) -> Self {
        let mut next = self.clone();
        next.additional_context.remove(keys::REQUEST_TYPE);
        next.additional_context.remove(keys::AGENT_TYPE);
        next.additional_context.remove(keys::GENERATE_ASSESSMENT);
        next.handoff = Some(handoff);
        next
    }
}

// ============================================================================
// TESTS
// ============================================================================
