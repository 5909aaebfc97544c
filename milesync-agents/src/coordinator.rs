//! Coordinator: agent selection, invocation, and handoff chaining.
//!
//! `route` is the entry point for a conversational turn. It picks one agent,
//! isolates it (errors and panics become `success = false` responses), and
//! follows typed handoffs for up to `CoachConfig::max_handoff_depth` hops.

use crate::agent::Agent;
use crate::analysis::contains_any;
use crate::execution::ExecutionAgent;
use crate::foundation::FoundationAgent;
use crate::planning::PlanningAgent;
use crate::psychological::PsychologicalAgent;
use crate::services::AgentServices;
use crate::support::SupportAgent;
use crate::sustainability::SustainabilityAgent;
use futures_util::FutureExt;
use milesync_core::{
    AgentContext, AgentDescriptor, AgentError, AgentResponse, AgentType, CoachResult, RequestType,
};
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// Shown when an agent errors or panics.
pub const SAFE_FAILURE_MESSAGE: &str =
    "I'm sorry, something went wrong on my side. Please try again in a moment.";

/// Joins the messages of a chained route call.
pub const CHAIN_SEPARATOR: &str = "\n\n---\n\n";

// ============================================================================
// ROUTING KEYWORDS
// ============================================================================

const DISTRESS_KEYWORDS: &[&str] = &[
    "stressed",
    "anxious",
    "overwhelmed",
    "unmotivated",
    "giving up",
    "give up",
    "worried",
    "panic",
    "discouraged",
    "not good enough",
];

const RESOURCE_KEYWORDS: &[&str] = &[
    "resource",
    "recommend",
    "course",
    "book",
    "tool",
    "community",
    "mentor",
];

const HABIT_KEYWORDS: &[&str] = &[
    "habit",
    "burnout",
    "burn out",
    "burned out",
    "routine",
    "consistency",
    "sustainab",
];

/// Agent suggested by the wording of a user turn, once a goal exists.
pub fn infer_from_message(message: &str) -> AgentType {
    let text = message.to_lowercase();
    if contains_any(&text, DISTRESS_KEYWORDS) {
        AgentType::Psychological
    } else if contains_any(&text, RESOURCE_KEYWORDS) {
        AgentType::Support
    } else if contains_any(&text, HABIT_KEYWORDS) {
        AgentType::Sustainability
    } else {
        AgentType::Execution
    }
}

// ============================================================================
// COORDINATOR
// ============================================================================

/// Registry of agents keyed by type.
pub struct Coordinator {
    agents: HashMap<AgentType, Arc<dyn Agent>>,
    services: AgentServices,
}

impl Coordinator {
    /// Coordinator with the six built-in agents sharing `services`.
    pub fn new(services: AgentServices) -> Self {
        let builtins: [Arc<dyn Agent>; 6] = [
            Arc::new(FoundationAgent::new(services.clone())),
            Arc::new(PlanningAgent::new(services.clone())),
            Arc::new(ExecutionAgent::new(services.clone())),
            Arc::new(PsychologicalAgent::new(services.clone())),
            Arc::new(SupportAgent::new(services.clone())),
            Arc::new(SustainabilityAgent),
        ];

        let agents = builtins
            .into_iter()
            .map(|agent| (agent.agent_type(), agent))
            .collect();

        Self { agents, services }
    }

    /// Replace the agent registered for `agent.agent_type()`.
    pub fn with_agent(mut self, agent: Arc<dyn Agent>) -> Self {
        self.agents.insert(agent.agent_type(), agent);
        self
    }

    pub fn services(&self) -> &AgentServices {
        &self.services
    }

    /// Metadata of the registered agents, in workflow order.
    pub fn descriptors(&self) -> Vec<AgentDescriptor> {
        AgentType::ALL
            .iter()
            .filter_map(|t| self.agents.get(t))
            .map(|agent| agent.descriptor())
            .collect()
    }

    /// Agent that should handle this turn. Deterministic and total.
    pub fn select_agent(&self, context: &AgentContext) -> AgentType {
        if let Some(raw) = context.agent_type_raw() {
            match raw.parse::<AgentType>() {
                Ok(agent_type) => return agent_type,
                Err(e) => tracing::debug!(value = %e.value, "ignoring unknown agent_type selector"),
            }
        }

        if let Some(raw) = context.request_type_raw() {
            if let Ok(request) = raw.parse::<RequestType>() {
                return request.owner();
            }
            match raw.parse::<AgentType>() {
                Ok(agent_type) => return agent_type,
                Err(e) => tracing::debug!(value = %e.value, "ignoring unknown request_type selector"),
            }
        }

        if let Some(handoff) = &context.handoff {
            return handoff.successor();
        }

        if context.current_goal.is_none() {
            return AgentType::Foundation;
        }

        infer_from_message(context.last_user_message().unwrap_or_default())
    }

    /// Handle one turn: select, invoke, then follow handoffs. Never fails.
    pub async fn route(&self, context: &AgentContext) -> AgentResponse {
        let correlation_id = Uuid::now_v7();
        let span = tracing::info_span!(
            "route",
            %correlation_id,
            user_id = ?context.user_id,
            session_id = ?context.session_id
        );
        self.route_chain(context).instrument(span).await
    }

    async fn route_chain(&self, context: &AgentContext) -> AgentResponse {
        let first = self.select_agent(context);
        tracing::debug!(agent = %first, "selected agent");

        let mut response = self.invoke(first, context).await;
        let mut messages = vec![response.message.clone()];
        let mut trail = Vec::new();
        let mut hop_context: Option<AgentContext> = None;

        for _ in 0..self.services.config.max_handoff_depth {
            if !response.wants_handoff() {
                break;
            }
            let (Some(next), Some(handoff)) = (response.next_agent, response.payload.to_handoff())
            else {
                break;
            };

            let next_context = hop_context.as_ref().unwrap_or(context).chained(handoff);
            let next_response = self.invoke(next, &next_context).await;
            if !next_response.success {
                tracing::warn!(
                    from = %response.agent_type,
                    to = %next,
                    message = %next_response.message,
                    "chained agent failed, keeping prior response"
                );
                break;
            }

            trail.push(response.agent_type);
            messages.push(next_response.message.clone());
            response = next_response;
            hop_context = Some(next_context);
        }

        if !trail.is_empty() {
            response.message = messages.join(CHAIN_SEPARATOR);
            response.handoff_trail = trail;
        }
        response
    }

    /// Run one agent without chaining. Errors and panics become a failure
    /// response with a generic message.
    pub async fn invoke(&self, agent_type: AgentType, context: &AgentContext) -> AgentResponse {
        match self.try_invoke(agent_type, context).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(agent = %agent_type, error = %e, "agent call failed");
                AgentResponse::failure(agent_type, SAFE_FAILURE_MESSAGE)
            }
        }
    }

    /// Run one agent, surfacing registry misses, errors and panics.
    pub async fn try_invoke(
        &self,
        agent_type: AgentType,
        context: &AgentContext,
    ) -> CoachResult<AgentResponse> {
        let agent = self
            .agents
            .get(&agent_type)
            .ok_or(AgentError::NotRegistered { agent_type })?;

        match AssertUnwindSafe(agent.process(context)).catch_unwind().await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(agent = %agent_type, "agent panicked");
                Err(AgentError::Panicked { agent_type }.into())
            }
        }
    }
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut registered: Vec<_> = self.agents.keys().copied().collect();
        registered.sort();
        f.debug_struct("Coordinator")
            .field("agents", &registered)
            .field("services", &self.services)
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================
