//! Agent responses and descriptors

use crate::{
    AgentType, ExecutionOutput, FoundationOutput, Handoff, PlanningOutput, PsychologicalOutput,
    SupportOutput, SustainabilityOutput, TaskCompletionOutput,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Static identity of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AgentDescriptor {
    pub agent_type: AgentType,
    pub name: &'static str,
    pub description: &'static str,
}

/// Typed structured payload of a response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum AgentPayload {
    /// Failures and turns without structured output
    #[default]
    Empty,
    /// Foundation still collecting goal details
    Intake {
        stage: String,
        ready_for_assessment: bool,
    },
    Foundation(FoundationOutput),
    Planning(PlanningOutput),
    Execution(ExecutionOutput),
    TaskCompletion(TaskCompletionOutput),
    /// Conversational check-in; `fallback` marks the fixed question
    CheckIn { fallback: bool },
    Psychological(PsychologicalOutput),
    Support(SupportOutput),
    Sustainability(SustainabilityOutput),
}

impl AgentPayload {
    pub fn intake() -> Self {
        AgentPayload::Intake {
            stage: "intake".to_string(),
            ready_for_assessment: false,
        }
    }

    /// The payload as a plain JSON mapping. `Empty` renders as `{}`.
    pub fn data(&self) -> Map<String, Value> {
        let value = match self {
            AgentPayload::Empty => return Map::new(),
            AgentPayload::Intake {
                stage,
                ready_for_assessment,
            } => serde_json::json!({
                "stage": stage,
                "ready_for_assessment": ready_for_assessment,
            }),
            AgentPayload::Foundation(out) => to_value(out),
            AgentPayload::Planning(out) => to_value(out),
            AgentPayload::Execution(out) => to_value(out),
            AgentPayload::TaskCompletion(out) => to_value(out),
            AgentPayload::CheckIn { fallback } => serde_json::json!({ "fallback": fallback }),
            AgentPayload::Psychological(out) => to_value(out),
            AgentPayload::Support(out) => to_value(out),
            AgentPayload::Sustainability(out) => to_value(out),
        };
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    /// Handoff for the next agent, for payloads that feed one.
    pub fn to_handoff(&self) -> Option<Handoff> {
        match self {
            AgentPayload::Foundation(out) => Some(Handoff::Foundation(out.clone())),
            AgentPayload::Planning(out) => Some(Handoff::Planning(out.clone())),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, AgentPayload::Empty)
    }
}

fn to_value<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// Result of one agent invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    pub agent_type: AgentType,
    pub success: bool,
    /// Always present and safe to show to the user
    pub message: String,
    pub payload: AgentPayload,
    pub requires_user_input: bool,
    pub next_agent: Option<AgentType>,
    /// Agents that ran earlier in the same route call
    #[serde(default)]
    pub handoff_trail: Vec<AgentType>,
}

impl AgentResponse {
    pub fn success(agent_type: AgentType, message: impl Into<String>, payload: AgentPayload) -> Self {
        Self {
            agent_type,
            success: true,
            message: message.into(),
            payload,
            requires_user_input: false,
            next_agent: None,
            handoff_trail: Vec::new(),
        }
    }

    pub fn failure(agent_type: AgentType, message: impl Into<String>) -> Self {
        Self {
            agent_type,
            success: false,
            message: message.into(),
            payload: AgentPayload::Empty,
            requires_user_input: false,
            next_agent: None,
            handoff_trail: Vec::new(),
        }
    }

    pub fn with_next_agent(mut self, next: AgentType) -> Self {
        self.next_agent = Some(next);
        self
    }

    pub fn awaiting_user(mut self) -> Self {
        self.requires_user_input = true;
        self
    }

    /// JSON mapping of the payload.
    pub fn data(&self) -> Map<String, Value> {
        self.payload.data()
    }

    /// True when the coordinator may chain into `next_agent` this turn.
    pub fn wants_handoff(&self) -> bool {
        self.success && !self.requires_user_input && self.next_agent.is_some()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_payload_data_is_empty_object() {
        assert!(AgentPayload::Empty.data().is_empty());
        let resp = AgentResponse::failure(AgentType::Support, "oops");
        assert!(!resp.success);
        assert!(resp.data().is_empty());
    }

    #[test]
    fn test_intake_payload_data() {
        let data = AgentPayload::intake().data();
        assert_eq!(data["stage"], "intake");
        assert_eq!(data["ready_for_assessment"], false);
    }

    #[test]
    fn test_foundation_payload_renders_fields_and_handoff() {
        let payload = AgentPayload::Foundation(FoundationOutput {
            goal_summary: "Run a 10k".to_string(),
            ..FoundationOutput::default()
        });
        let data = payload.data();
        assert_eq!(data["goal_summary"], "Run a 10k");
        assert_eq!(data["goal_type"], "long_term");
        assert_eq!(
            payload.to_handoff().map(|h| h.successor()),
            Some(AgentType::Planning)
        );
        assert!(AgentPayload::CheckIn { fallback: true }.to_handoff().is_none());
    }

    #[test]
    fn test_wants_handoff() {
        let resp = AgentResponse::success(AgentType::Foundation, "ok", AgentPayload::Empty)
            .with_next_agent(AgentType::Planning);
        assert!(resp.wants_handoff());
        assert!(!resp.clone().awaiting_user().wants_handoff());

        let mut failed = resp;
        failed.success = false;
        assert!(!failed.wants_handoff());
    }
}
