//! Support agent: resource curation.
//!
//! Never fails. Any completion or parse problem falls back to a small
//! built-in list so the user always gets something actionable.

use crate::agent::Agent;
use crate::services::AgentServices;
use async_trait::async_trait;
use milesync_core::{
    AgentContext, AgentDescriptor, AgentPayload, AgentResponse, AgentType, CoachResult,
    Resource, ResourceType, SupportOutput,
};
use milesync_llm::prompts::keys;
use milesync_llm::structured::{array_field, float_field, str_field, string_list};
use serde_json::{Map, Value};

pub const SUPPORT_SYSTEM_PROMPT: &str = r#"You are the Support Agent for MileSync, an AI goal coaching platform.

Your role is to provide comprehensive support resources and connections to help users succeed.

## SUPPORT PROTOCOL:

1. **Analyze Goal Requirements** - Understand what resources would help
2. **Identify Resource Gaps** - What knowledge/tools are missing
3. **Curate Relevant Materials** - Find the best-fit resources
4. **Match to Learning Style** - Consider how the user learns best
5. **Prioritize Accessibility** - Free/freemium first

## RESOURCE CATEGORIES:

1. **Educational Resources**
   - Online courses (Coursera, Udemy, YouTube)
   - Books and audiobooks
   - Tutorials and guides
   - Podcasts

2. **Productivity Tools**
   - Task management apps
   - Time tracking tools
   - Note-taking systems
   - Automation tools

3. **Community Support**
   - Online communities
   - Accountability groups
   - Forums and Discord servers
   - Local meetups

4. **Professional Help**
   - Coaches and mentors
   - Subject matter experts
   - Therapists (for wellness goals)
   - Trainers (for fitness goals)

## RECOMMENDATION CRITERIA:
- High relevance to specific goal
- Matches user's time availability
- Within budget constraints
- Appropriate skill level
- Good reviews/reputation

Always explain WHY each resource is recommended."#;

const RECOMMENDATION_SCHEMA: &str = r#"{
    "recommended_resources": [
        {
            "type": "COURSE|BOOK|TOOL|COMMUNITY|EXPERT",
            "name": "Resource name",
            "url": "URL if available, or null",
            "relevance_score": 0.0-1.0,
            "time_commitment": "e.g., 2 hours/week",
            "cost": "Free|$XX|Subscription",
            "why": "Brief explanation of why this helps"
        }
    ],
    "integration_suggestions": ["Tool integrations that could help"],
    "community_matches": ["Relevant communities to join"],
    "expert_recommendations": ["Types of experts that could help"]
}"#;

const RECOMMENDATION_RULES: &str = "Rules:
- Recommend 3-5 resources total
- Prioritize free options
- Match to goal category
- Explain relevance";

const RECENT_TURNS: usize = 3;
const DEFAULT_RELEVANCE: f64 = 0.5;

pub struct SupportAgent {
    services: AgentServices,
}

impl SupportAgent {
    pub fn new(services: AgentServices) -> Self {
        Self { services }
    }

    async fn recommend(&self, context: &AgentContext) -> Option<SupportOutput> {
        let prompt = format!(
            "Based on this goal information, recommend helpful resources:\n\n{}\n\n\
             Provide recommendations in JSON format:\n{}\n\n{}\n\n\
             Respond with ONLY valid JSON.",
            goal_digest(context),
            RECOMMENDATION_SCHEMA,
            RECOMMENDATION_RULES
        );
        let system = self
            .services
            .system_prompt(keys::SUPPORT, SUPPORT_SYSTEM_PROMPT);
        let temperature = self.services.config.temperatures.support;

        match self
            .services
            .request_structured(&system, &prompt, temperature)
            .await
        {
            Ok(fields) => {
                let output = parse_recommendations(&fields);
                if output.recommended_resources.is_empty() {
                    tracing::warn!("recommendations had no usable resources, using fallback");
                    None
                } else {
                    Some(output)
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "recommendation completion failed, using fallback");
                None
            }
        }
    }
}

#[async_trait]
impl Agent for SupportAgent {
    fn descriptor(&self) -> AgentDescriptor {
        AgentDescriptor {
            agent_type: AgentType::Support,
            name: "Support Agent",
            description: "Resource curation, tool recommendations, and support connections",
        }
    }

    async fn process(&self, context: &AgentContext) -> CoachResult<AgentResponse> {
        tracing::info!(user_id = ?context.user_id, agent = "support", "processing");

        let output = match self.recommend(context).await {
            Some(output) => output,
            None => fallback_recommendations(),
        };

        Ok(AgentResponse::success(
            AgentType::Support,
            format_recommendations(&output),
            AgentPayload::Support(output),
        ))
    }
}

fn goal_digest(context: &AgentContext) -> String {
    let mut parts = Vec::new();

    if let Some(goal) = &context.current_goal {
        parts.push(format!(
            "Goal: {}",
            goal.title.as_deref().unwrap_or("Not specified")
        ));
        parts.push(format!(
            "Category: {}",
            goal.category.as_deref().unwrap_or("general")
        ));
        parts.push(format!(
            "Description: {}",
            goal.description.as_deref().unwrap_or_default()
        ));
    }

    for message in context.recent_messages(RECENT_TURNS) {
        if message.is_user() {
            parts.push(format!("User said: {}", message.content));
        }
    }

    if parts.is_empty() {
        "General goal support needed".to_string()
    } else {
        parts.join("\n")
    }
}

/// Lenient read of the model's recommendations.
pub fn parse_recommendations(fields: &Map<String, Value>) -> SupportOutput {
    let mut resources: Vec<Resource> = array_field(fields, "recommended_resources")
        .iter()
        .filter_map(Value::as_object)
        .filter_map(parse_resource)
        .collect();
    resources.truncate(SupportOutput::MAX_RESOURCES);

    SupportOutput {
        recommended_resources: resources,
        integration_suggestions: string_list(fields, "integration_suggestions"),
        community_matches: string_list(fields, "community_matches"),
        expert_recommendations: string_list(fields, "expert_recommendations"),
    }
}

/// A resource needs at least a name.
fn parse_resource(fields: &Map<String, Value>) -> Option<Resource> {
    let name = str_field(fields, "name")?;

    let kind = match str_field(fields, "type") {
        Some(raw) => raw.parse::<ResourceType>().unwrap_or_else(|e| {
            tracing::warn!(value = %e.value, "unknown resource type, using tool");
            ResourceType::Tool
        }),
        None => ResourceType::Tool,
    };

    let relevance_score = float_field(fields, "relevance_score")
        .filter(|r| r.is_finite())
        .unwrap_or(DEFAULT_RELEVANCE)
        .clamp(0.0, 1.0);

    Some(Resource {
        kind,
        name,
        url: str_field(fields, "url").filter(|u| u != "null"),
        relevance_score,
        time_commitment: str_field(fields, "time_commitment"),
        cost: str_field(fields, "cost").unwrap_or_else(|| "Free".to_string()),
        why: str_field(fields, "why"),
    })
}

/// Generic recommendations used whenever curation fails.
pub fn fallback_recommendations() -> SupportOutput {
    SupportOutput {
        recommended_resources: vec![
            Resource {
                kind: ResourceType::Tool,
                name: "Google Calendar".to_string(),
                url: Some("https://calendar.google.com".to_string()),
                relevance_score: 0.8,
                time_commitment: Some("Setup: 30 min".to_string()),
                cost: "Free".to_string(),
                why: None,
            },
            Resource {
                kind: ResourceType::Community,
                name: "Reddit Goal Setting".to_string(),
                url: Some("https://reddit.com/r/getdisciplined".to_string()),
                relevance_score: 0.7,
                time_commitment: Some("As needed".to_string()),
                cost: "Free".to_string(),
                why: None,
            },
        ],
        integration_suggestions: vec!["Sync with calendar for reminders".to_string()],
        community_matches: vec!["Online accountability groups".to_string()],
        expert_recommendations: Vec::new(),
    }
}

pub fn format_recommendations(output: &SupportOutput) -> String {
    let resources = if output.recommended_resources.is_empty() {
        "  • No specific resources recommended yet".to_string()
    } else {
        output
            .recommended_resources
            .iter()
            .map(|r| {
                format!(
                    "  • **{}** ({}) - {}\n    {}",
                    r.name,
                    r.kind.label(),
                    r.cost,
                    r.url.as_deref().unwrap_or("Search online")
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let communities = if output.community_matches.is_empty() {
        "None suggested".to_string()
    } else {
        output.community_matches.join(", ")
    };

    let integrations = if output.integration_suggestions.is_empty() {
        "  • None yet".to_string()
    } else {
        output
            .integration_suggestions
            .iter()
            .map(|s| format!("  • {}", s))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "## Recommended Resources\n\n\
         ### Tools & Learning\n{}\n\n\
         ### Communities\n{}\n\n\
         ### Integration Ideas\n{}\n\n\
         💡 These resources are curated based on your specific goal!",
        resources, communities, integrations
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use milesync_core::{ChatMessage, GoalRecord, LlmError};
    use milesync_llm::MockCompletionProvider;
    use serde_json::json;
    use std::sync::Arc;

    fn agent(mock: MockCompletionProvider) -> (SupportAgent, Arc<MockCompletionProvider>) {
        let mock = Arc::new(mock);
        (SupportAgent::new(AgentServices::new(mock.clone())), mock)
    }

    #[test]
    fn test_parse_coerces_and_truncates() {
        let resources: Vec<Value> = (0..7)
            .map(|i| json!({"type": "PODCAST", "name": format!("R{i}"), "relevance_score": 3.2}))
            .collect();
        let fields = json!({
            "recommended_resources": resources,
            "community_matches": ["r/running"],
        });
        let out = parse_recommendations(fields.as_object().unwrap());

        assert_eq!(out.recommended_resources.len(), 5);
        let first = &out.recommended_resources[0];
        assert_eq!(first.kind, ResourceType::Tool);
        assert_eq!(first.relevance_score, 1.0);
        assert_eq!(first.cost, "Free");
        assert_eq!(out.community_matches, vec!["r/running"]);
    }

    #[test]
    fn test_parse_defaults_relevance_and_skips_nameless() {
        let fields = json!({
            "recommended_resources": [
                {"type": "BOOK", "name": "Atomic Habits", "cost": "$15"},
                {"type": "COURSE"}
            ]
        });
        let out = parse_recommendations(fields.as_object().unwrap());
        assert_eq!(out.recommended_resources.len(), 1);
        assert_eq!(out.recommended_resources[0].kind, ResourceType::Book);
        assert_eq!(out.recommended_resources[0].relevance_score, 0.5);
        assert_eq!(out.recommended_resources[0].cost, "$15");
    }

    #[test]
    fn test_goal_digest() {
        assert_eq!(goal_digest(&AgentContext::new()), "General goal support needed");

        let ctx = AgentContext::new()
            .with_goal(GoalRecord::titled("Learn Spanish"))
            .with_message(ChatMessage::user("old"))
            .with_message(ChatMessage::user("any apps?"))
            .with_message(ChatMessage::assistant("sure"))
            .with_message(ChatMessage::user("free ones"));
        let digest = goal_digest(&ctx);
        assert!(digest.contains("Goal: Learn Spanish"));
        assert!(digest.contains("Category: general"));
        assert!(digest.contains("User said: any apps?"));
        assert!(digest.contains("User said: free ones"));
        assert!(!digest.contains("old"));
    }

    #[tokio::test]
    async fn test_recommendations_from_model() {
        let (agent, mock) = agent(MockCompletionProvider::new().with_json(json!({
            "recommended_resources": [
                {"type": "APP", "name": "Duolingo", "url": "https://duolingo.com", "relevance_score": 0.9}
            ],
            "integration_suggestions": ["Daily reminder"],
        })));

        let resp = agent.process(&AgentContext::new()).await.unwrap();
        assert!(resp.success);
        assert!(resp.message.contains("  • **Duolingo** (Tool) - Free\n    https://duolingo.com"));
        assert!(resp.message.contains("### Communities\nNone suggested"));
        assert!(resp.message.contains("  • Daily reminder"));
        assert_eq!(mock.requests()[0].temperature, 0.5);
    }

    #[tokio::test]
    async fn test_failures_fall_back() {
        let (agent, _) = agent(
            MockCompletionProvider::new()
                .with_error(LlmError::NotConfigured)
                .with_response("not json")
                .with_json(json!({"recommended_resources": []})),
        );

        for _ in 0..3 {
            let resp = agent.process(&AgentContext::new()).await.unwrap();
            assert!(resp.success);
            assert_eq!(resp.payload, AgentPayload::Support(fallback_recommendations()));
            assert!(resp.message.contains("**Google Calendar** (Tool) - Free"));
            assert!(resp.message.contains("https://reddit.com/r/getdisciplined"));
        }
    }
}
