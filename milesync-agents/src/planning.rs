//! Planning agent: SMART goal, milestones and a bounded task schedule.

use crate::agent::{is_malformed, Agent};
use crate::services::AgentServices;
use async_trait::async_trait;
use milesync_core::{
    AgentContext, AgentDescriptor, AgentPayload, AgentResponse, AgentType, CoachResult,
    FoundationOutput, Milestone, PlannedTask, PlanningOutput, SmartGoal, TaskDependency,
    TaskFrequency, TaskPriority, TaskSchedule,
};
use milesync_llm::prompts::keys;
use milesync_llm::structured::{
    array_field, float_field, int_field, object_field, str_field, string_list,
};
use serde_json::{Map, Value};

pub const PLANNING_SYSTEM_PROMPT: &str = r#"You are the Planning Agent for MileSync, an AI goal coaching platform.

Your role is to transform user goals into actionable, measurable plans with precise task breakdowns.

## PLANNING PROTOCOL:

1. **SMART Conversion** - Refine the goal to be:
   - Specific: Clear, unambiguous goal statement
   - Measurable: Quantifiable success metrics
   - Achievable: Realistic given constraints
   - Relevant: Aligned with user's values and priorities
   - Time-bound: Clear deadline and milestones

2. **Work Breakdown Structure (WBS)**
   - Break goal into 3-5 major milestones
   - Each milestone has clear deliverables
   - Milestones are sequenced logically

3. **Task Generation**
   - DAILY tasks: Max 3 items, <30 min each (micro-habits, quick wins)
   - WEEKLY tasks: Max 5 items, clear deliverables (major work blocks)
   - MONTHLY tasks: Major milestones, measurable outcomes

4. **Time Allocation**
   - Estimate realistic time for each task
   - Add 20% buffer for unexpected delays
   - Consider user's available time constraints

5. **Dependency Mapping**
   - Identify which tasks depend on others
   - Create logical sequencing
   - Flag critical path items

## OUTPUT FORMAT:
Always provide structured plans that are:
- Immediately actionable
- Not overwhelming (progressive difficulty)
- Balanced between challenge and achievability
- Front-loaded with quick wins for momentum"#;

const PLAN_SCHEMA: &str = r#"{
    "smart_goal": {
        "specific": "What exactly will be accomplished",
        "measurable": "How progress will be measured",
        "achievable": "Why this is realistic",
        "relevant": "Why this matters to the user",
        "time_bound": "When this will be completed"
    },
    "milestones": [
        {
            "id": "M1",
            "title": "Milestone title",
            "description": "What this milestone achieves",
            "deadline": "YYYY-MM-DD",
            "success_criteria": ["criterion1", "criterion2"],
            "tasks": [
                {
                    "title": "Task title",
                    "description": "Brief description",
                    "frequency": "daily|weekly|monthly|one_time",
                    "estimated_minutes": 30,
                    "priority": "high|medium|low"
                }
            ]
        }
    ],
    "task_schedule": {
        "daily": [
            {"title": "...", "frequency": "daily", "estimated_minutes": 15, "priority": "high"}
        ],
        "weekly": [
            {"title": "...", "frequency": "weekly", "estimated_minutes": 60, "priority": "medium"}
        ],
        "monthly": [
            {"title": "...", "frequency": "monthly", "estimated_minutes": 120, "priority": "high"}
        ]
    },
    "dependencies": [
        {"task": "Task A", "depends_on": "Task B"}
    ],
    "total_estimated_hours": 50,
    "critical_path": ["M1", "M2", "M3"]
}"#;

const PLAN_RULES: &str = "Rules:
- Daily tasks: Max 3, under 30 min each
- Weekly tasks: Max 5, focused on major work
- Monthly tasks: Major checkpoints
- Include realistic time estimates
- Sequence milestones logically
- Front-load with quick wins";

const RECENT_TURNS: usize = 5;
const DEFAULT_TASK_MINUTES: u32 = 30;

pub const PLAN_UNPARSABLE: &str = "I had trouble creating the plan structure. Let me try again.";
pub const PLAN_UNAVAILABLE: &str =
    "I couldn't build your plan right now. Please try again in a moment.";

pub struct PlanningAgent {
    services: AgentServices,
}

impl PlanningAgent {
    pub fn new(services: AgentServices) -> Self {
        Self { services }
    }
}

#[async_trait]
impl Agent for PlanningAgent {
    fn descriptor(&self) -> AgentDescriptor {
        AgentDescriptor {
            agent_type: AgentType::Planning,
            name: "Planning Agent",
            description: "SMART goal conversion, task breakdown, and schedule generation",
        }
    }

    async fn process(&self, context: &AgentContext) -> CoachResult<AgentResponse> {
        tracing::info!(user_id = ?context.user_id, agent = "planning", "processing");

        let prompt = format!(
            "Create a detailed action plan for this goal:\n\n{}\n\n\
             Generate a structured plan in JSON format:\n{}\n\n{}\n\n\
             Respond with ONLY valid JSON.",
            goal_digest(context),
            PLAN_SCHEMA,
            PLAN_RULES
        );

        let system = self
            .services
            .system_prompt(keys::PLANNING, PLANNING_SYSTEM_PROMPT);
        let temperature = self.services.config.temperatures.planning;

        let fields = match self
            .services
            .request_structured(&system, &prompt, temperature)
            .await
        {
            Ok(fields) => fields,
            Err(e) if is_malformed(&e) => {
                tracing::warn!(error = %e, "plan was not valid JSON");
                return Ok(AgentResponse::failure(AgentType::Planning, PLAN_UNPARSABLE));
            }
            Err(e) => {
                tracing::warn!(error = %e, "plan completion failed");
                return Ok(AgentResponse::failure(AgentType::Planning, PLAN_UNAVAILABLE));
            }
        };

        let output = parse_plan(&fields);
        Ok(AgentResponse::success(
            AgentType::Planning,
            format_plan(&output),
            AgentPayload::Planning(output),
        )
        .with_next_agent(AgentType::Execution))
    }
}

/// Everything known about the goal, as prompt lines.
fn goal_digest(context: &AgentContext) -> String {
    let mut parts = Vec::new();

    if let Some(foundation) = context.handoff.as_ref().and_then(|h| h.foundation()) {
        push_foundation(&mut parts, foundation);
    }

    if let Some(goal) = &context.current_goal {
        parts.push(format!(
            "Existing Goal: {}",
            goal.title.as_deref().unwrap_or("Untitled")
        ));
        parts.push(format!(
            "Description: {}",
            goal.description.as_deref().unwrap_or("No description")
        ));
        parts.push(format!(
            "Target Date: {}",
            goal.target_date.as_deref().unwrap_or("Not set")
        ));
    }

    let recent = context.recent_messages(RECENT_TURNS);
    if !recent.is_empty() {
        let conversation = recent
            .iter()
            .map(|m| format!("{}: {}", m.role.as_str().to_uppercase(), m.content))
            .collect::<Vec<_>>()
            .join("\n");
        parts.push(format!("\nRecent Conversation:\n{}", conversation));
    }

    parts.join("\n")
}

fn push_foundation(parts: &mut Vec<String>, foundation: &FoundationOutput) {
    let summary = if foundation.goal_summary.is_empty() {
        "Not specified"
    } else {
        foundation.goal_summary.as_str()
    };
    parts.push(format!("Goal Summary: {}", summary));
    parts.push(format!("Goal Type: {}", foundation.goal_type.as_str()));
    parts.push(format!("Motivation Score: {}/10", foundation.motivation_score));
    parts.push(format!("Feasibility Score: {}/10", foundation.feasibility_score));

    if !foundation.identified_obstacles.is_empty() {
        parts.push(format!(
            "Obstacles to Address: {}",
            foundation.identified_obstacles.join(", ")
        ));
    }
    if !foundation.user_constraints.is_empty() {
        let constraints =
            serde_json::to_string(&foundation.user_constraints).unwrap_or_default();
        parts.push(format!("Constraints: {}", constraints));
    }
}

// ============================================================================
// PARSING
// ============================================================================

/// Lenient read of the model's plan. Schedule caps are applied here.
pub fn parse_plan(fields: &Map<String, Value>) -> PlanningOutput {
    let smart_goal = object_field(fields, "smart_goal")
        .map(|smart| SmartGoal {
            specific: str_field(smart, "specific").unwrap_or_default(),
            measurable: str_field(smart, "measurable").unwrap_or_default(),
            achievable: str_field(smart, "achievable").unwrap_or_default(),
            relevant: str_field(smart, "relevant").unwrap_or_default(),
            time_bound: str_field(smart, "time_bound").unwrap_or_default(),
        })
        .unwrap_or_default();

    let milestones = array_field(fields, "milestones")
        .iter()
        .filter_map(Value::as_object)
        .map(parse_milestone)
        .collect();

    let task_schedule = match object_field(fields, "task_schedule") {
        Some(schedule) => TaskSchedule::bounded(
            parse_tasks(array_field(schedule, "daily")),
            parse_tasks(array_field(schedule, "weekly")),
            parse_tasks(array_field(schedule, "monthly")),
        ),
        None => TaskSchedule::default(),
    };

    let dependencies = array_field(fields, "dependencies")
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|dep| {
            Some(TaskDependency {
                task: str_field(dep, "task")?,
                depends_on: str_field(dep, "depends_on")?,
            })
        })
        .collect();

    PlanningOutput {
        smart_goal,
        milestones,
        task_schedule,
        dependencies,
        total_estimated_hours: float_field(fields, "total_estimated_hours")
            .filter(|h| h.is_finite())
            .unwrap_or(0.0)
            .max(0.0),
        critical_path: string_list(fields, "critical_path"),
    }
}

fn parse_milestone(fields: &Map<String, Value>) -> Milestone {
    Milestone {
        id: str_field(fields, "id").unwrap_or_default(),
        title: str_field(fields, "title").unwrap_or_default(),
        description: str_field(fields, "description"),
        deadline: str_field(fields, "deadline"),
        success_criteria: string_list(fields, "success_criteria"),
        tasks: parse_tasks(array_field(fields, "tasks")),
    }
}

fn parse_tasks(items: &[Value]) -> Vec<PlannedTask> {
    items
        .iter()
        .filter_map(Value::as_object)
        .map(parse_task)
        .collect()
}

fn parse_task(fields: &Map<String, Value>) -> PlannedTask {
    let frequency = match str_field(fields, "frequency") {
        Some(raw) => raw.parse::<TaskFrequency>().unwrap_or_else(|e| {
            tracing::warn!(value = %e.value, "unknown task frequency, using one_time");
            TaskFrequency::OneTime
        }),
        None => TaskFrequency::OneTime,
    };

    let priority = match str_field(fields, "priority") {
        Some(raw) => raw.parse::<TaskPriority>().unwrap_or_else(|e| {
            tracing::warn!(value = %e.value, "unknown task priority, using medium");
            TaskPriority::Medium
        }),
        None => TaskPriority::Medium,
    };

    PlannedTask {
        title: str_field(fields, "title").unwrap_or_default(),
        description: str_field(fields, "description"),
        frequency,
        estimated_minutes: int_field(fields, "estimated_minutes")
            .map(|m| m.clamp(0, u32::MAX as i64) as u32)
            .unwrap_or(DEFAULT_TASK_MINUTES),
        priority,
    }
}

pub fn format_plan(output: &PlanningOutput) -> String {
    let milestones = output
        .milestones
        .iter()
        .enumerate()
        .map(|(i, m)| {
            format!(
                "  {}. **{}** - {}",
                i + 1,
                m.title,
                m.deadline.as_deref().unwrap_or("No deadline")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let daily = if output.task_schedule.daily.is_empty() {
        "  - None scheduled".to_string()
    } else {
        output
            .task_schedule
            .daily
            .iter()
            .map(|t| format!("  - {} ({}min)", t.title, t.estimated_minutes))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let smart = &output.smart_goal;
    format!(
        "## Your Action Plan\n\n\
         ### SMART Goal\n\
         - **Specific:** {}\n\
         - **Measurable:** {}\n\
         - **Time-bound:** {}\n\n\
         ### Milestones\n{}\n\n\
         ### Daily Habits\n{}\n\n\
         **Estimated Total Time:** {} hours\n\n\
         Ready to start tracking your progress!",
        smart.specific,
        smart.measurable,
        smart.time_bound,
        milestones,
        daily,
        output.total_estimated_hours,
    )
}
