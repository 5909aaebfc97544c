//! Foundation agent: goal intake and baseline assessment.
//!
//! Runs a clarifying conversation until [`should_generate_assessment`] says
//! the user has described a goal, a timeline and a reason, then asks the
//! model for a structured assessment and hands off to Planning.

use crate::agent::{bullet_list, is_malformed, Agent};
use crate::analysis::should_generate_assessment;
use crate::services::AgentServices;
use async_trait::async_trait;
use milesync_core::{
    clamp_score, AgentContext, AgentDescriptor, AgentPayload, AgentResponse, AgentType,
    ChatMessage, CoachResult, FoundationOutput, GoalType,
};
use milesync_llm::prompts::keys;
use milesync_llm::structured::{int_field, str_field, string_list, string_map};
use serde_json::{Map, Value};

pub const FOUNDATION_SYSTEM_PROMPT: &str = r#"You are the Foundation Agent for MileSync, an AI goal coaching platform.

Your role is to deeply understand the user's goals and create a comprehensive foundation for achievement.

## INTAKE PROTOCOL:

1. **Ask Clarifying Questions** - Understand the FULL context of the goal
2. **Identify the WHY** - Uncover intrinsic motivation behind the goal
3. **Assess Current State** - Understand where the user is now vs where they want to be
4. **Evaluate Resources** - Time, energy, money, and support available
5. **Identify Obstacles** - Proactively spot potential challenges
6. **Classify Goal Type**:
   - SHORT_TERM: <3 months (quick wins, skill building)
   - LONG_TERM: 3-12 months (career changes, major projects)
   - RESOLUTION: Year-long commitments (lifestyle changes, transformations)

## CONVERSATION STYLE:
- Be warm, curious, and encouraging
- Ask one or two questions at a time (don't overwhelm)
- Reflect back what you hear to show understanding
- Celebrate their ambition while being realistic

## WHEN READY TO ASSESS:
After enough conversation, provide a structured assessment. Include:
- Goal summary in clear, concise language
- Goal type classification with reasoning
- Scores (1-10) for motivation, feasibility, and clarity
- Identified obstacles and how to address them
- Success criteria that are observable and measurable
- Any recommended adjustments to make the goal more achievable

Remember: Your job is to set users up for success by creating a solid foundation."#;

const ASSESSMENT_SCHEMA: &str = r#"{
    "goal_summary": "Clear, concise goal statement",
    "goal_type": "SHORT_TERM or LONG_TERM or RESOLUTION",
    "motivation_score": 1-10,
    "feasibility_score": 1-10,
    "clarity_score": 1-10,
    "identified_obstacles": ["obstacle1", "obstacle2"],
    "success_criteria": ["criterion1", "criterion2"],
    "baseline_metrics": {"current_state": "...", "target_state": "..."},
    "user_constraints": {"time": "...", "resources": "..."},
    "recommended_adjustments": ["adjustment1", "adjustment2"]
}"#;

/// Per-turn character limit in the assessment digest.
const DIGEST_TURN_CHARS: usize = 500;

pub const INTAKE_FAILED: &str =
    "I encountered an issue. Let's try again. What goal would you like to work on?";
pub const ASSESSMENT_UNPARSABLE: &str =
    "I had trouble processing the assessment. Let me try again.";
pub const ASSESSMENT_UNAVAILABLE: &str =
    "I couldn't generate your assessment right now. Please try again in a moment.";

pub struct FoundationAgent {
    services: AgentServices,
}

impl FoundationAgent {
    pub fn new(services: AgentServices) -> Self {
        Self { services }
    }

    fn system_prompt(&self) -> String {
        self.services
            .system_prompt(keys::FOUNDATION, FOUNDATION_SYSTEM_PROMPT)
    }

    async fn continue_intake(&self, context: &AgentContext) -> AgentResponse {
        let last = context.last_user_message().unwrap_or_default();
        match self
            .services
            .generate_response(&self.system_prompt(), context, last)
            .await
        {
            Ok(reply) => {
                AgentResponse::success(AgentType::Foundation, reply, AgentPayload::intake())
                    .awaiting_user()
            }
            Err(e) => {
                tracing::warn!(error = %e, "foundation intake completion failed");
                AgentResponse::failure(AgentType::Foundation, INTAKE_FAILED)
            }
        }
    }

    async fn generate_assessment(&self, context: &AgentContext) -> AgentResponse {
        let prompt = format!(
            "Based on this conversation about the user's goal:\n\n{}\n\n\
             Generate a structured assessment in JSON format with these fields:\n{}\n\n\
             Respond with ONLY the JSON, no other text.",
            conversation_digest(&context.messages),
            ASSESSMENT_SCHEMA
        );

        let temperature = self.services.config.temperatures.assessment;
        let fields = match self
            .services
            .request_structured(&self.system_prompt(), &prompt, temperature)
            .await
        {
            Ok(fields) => fields,
            Err(e) if is_malformed(&e) => {
                tracing::warn!(error = %e, "foundation assessment was not valid JSON");
                return AgentResponse::failure(AgentType::Foundation, ASSESSMENT_UNPARSABLE);
            }
            Err(e) => {
                tracing::warn!(error = %e, "foundation assessment completion failed");
                return AgentResponse::failure(AgentType::Foundation, ASSESSMENT_UNAVAILABLE);
            }
        };

        let output = parse_assessment(&fields);
        AgentResponse::success(
            AgentType::Foundation,
            format_assessment(&output),
            AgentPayload::Foundation(output),
        )
        .with_next_agent(AgentType::Planning)
    }
}

#[async_trait]
impl Agent for FoundationAgent {
    fn descriptor(&self) -> AgentDescriptor {
        AgentDescriptor {
            agent_type: AgentType::Foundation,
            name: "Foundation Agent",
            description: "Initial goal intake, user profiling, and baseline establishment",
        }
    }

    async fn process(&self, context: &AgentContext) -> CoachResult<AgentResponse> {
        tracing::info!(user_id = ?context.user_id, agent = "foundation", "processing");

        if should_generate_assessment(context) {
            Ok(self.generate_assessment(context).await)
        } else {
            Ok(self.continue_intake(context).await)
        }
    }
}

/// `ROLE: content` per turn, each truncated.
fn conversation_digest(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|m| {
            let content: String = m.content.chars().take(DIGEST_TURN_CHARS).collect();
            format!("{}: {}", m.role.as_str().to_uppercase(), content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Lenient read of the model's assessment. Missing fields take defaults.
pub fn parse_assessment(fields: &Map<String, Value>) -> FoundationOutput {
    let defaults = FoundationOutput::default();

    let goal_type = match str_field(fields, "goal_type") {
        Some(raw) => raw.parse::<GoalType>().unwrap_or_else(|e| {
            tracing::warn!(value = %e.value, "unknown goal type, using long_term");
            GoalType::LongTerm
        }),
        None => defaults.goal_type,
    };

    let score = |key: &str| {
        int_field(fields, key)
            .map(|v| clamp_score(v, 1, 10))
            .unwrap_or(5)
    };

    FoundationOutput {
        goal_summary: str_field(fields, "goal_summary").unwrap_or_default(),
        goal_type,
        motivation_score: score("motivation_score"),
        feasibility_score: score("feasibility_score"),
        clarity_score: score("clarity_score"),
        identified_obstacles: string_list(fields, "identified_obstacles"),
        success_criteria: string_list(fields, "success_criteria"),
        baseline_metrics: string_map(fields, "baseline_metrics"),
        user_constraints: string_map(fields, "user_constraints"),
        recommended_adjustments: string_list(fields, "recommended_adjustments"),
    }
}

pub fn format_assessment(output: &FoundationOutput) -> String {
    format!(
        "## Goal Foundation Assessment\n\n\
         **Your Goal:** {}\n\n\
         **Goal Type:** {}\n\n\
         ### Scores\n\
         - 🎯 Motivation: {}/10\n\
         - ✅ Feasibility: {}/10\n\
         - 💡 Clarity: {}/10\n\n\
         ### Potential Challenges\n{}\n\n\
         ### Success Looks Like\n{}\n\n\
         I'm now ready to help you create a detailed action plan!",
        output.goal_summary,
        output.goal_type.label(),
        output.motivation_score,
        output.feasibility_score,
        output.clarity_score,
        bullet_list(&output.identified_obstacles, "-", "None identified yet"),
        bullet_list(&output.success_criteria, "-", "To be defined"),
    )
}
