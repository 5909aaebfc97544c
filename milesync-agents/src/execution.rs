//! Execution agent: daily progress, task completion and check-ins.

use crate::agent::Agent;
use crate::analysis::current_streak;
use crate::services::AgentServices;
use async_trait::async_trait;
use chrono::NaiveDate;
use milesync_core::{
    AgentContext, AgentDescriptor, AgentPayload, AgentResponse, AgentType, CoachResult,
    DailySummary, ExecutionOutput, RequestType, TaskCompletionOutput, TaskRecord,
};
use milesync_llm::prompts::keys;

pub const EXECUTION_SYSTEM_PROMPT: &str = r#"You are the Execution Agent for MileSync, an AI goal coaching platform.

Your role is to actively manage task execution and maintain user momentum.

## EXECUTION PROTOCOL:

1. **Monitor Progress** - Track task completion status in real-time
2. **Smart Reminders** - Send contextual, non-annoying reminders
3. **Streak Tracking** - Celebrate consistency and streaks
4. **Pattern Detection** - Identify patterns in missed tasks
5. **Schedule Adjustments** - Propose adjustments proactively
6. **Progress Logging** - Record all progress with timestamps

## ADJUSTMENT CRITERIA:
- Completion rate <60%: Reduce daily task count
- Completion rate >90%: Consider adding stretch tasks
- Pattern of evening failures: Suggest morning shift
- 3+ consecutive misses: Recommend plan revision

## REMINDER INTELLIGENCE:
- Consider time of day preferences
- Adjust frequency based on completion history
- Use motivational framing when needed
- Include progress context

## COMMUNICATION STYLE:
- Action-oriented and clear
- Celebrate wins (big and small)
- Non-judgmental about misses
- Solution-focused for challenges"#;

pub const CHECK_IN_FALLBACK: &str =
    "How is your progress going today? Any blockers I can help with?";

const REDUCE_LOAD: &str = "Consider reducing daily tasks to 2 for better consistency";
const STRETCH_GOAL: &str = "Great progress! Ready for a stretch goal?";
const MAX_NEXT_ACTIONS: usize = 3;

pub struct ExecutionAgent {
    services: AgentServices,
}

impl ExecutionAgent {
    pub fn new(services: AgentServices) -> Self {
        Self { services }
    }

    fn daily_summary(&self, context: &AgentContext) -> AgentResponse {
        let today = self.services.clock.today();
        let output = summarize_day(&context.task_history, today);
        AgentResponse::success(
            AgentType::Execution,
            format_summary(&output),
            AgentPayload::Execution(output),
        )
    }

    fn task_completed(&self, context: &AgentContext) -> AgentResponse {
        let streak = current_streak(&context.task_history, self.services.clock.today());
        let pool = celebrations(streak);
        let mut message = pool[self.services.entropy.pick(pool.len()) % pool.len()].clone();

        if streak > 0 && streak % 7 == 0 {
            message.push_str(&format!(
                "\n🏆 Wow! A full week streak! That's {} days!",
                streak
            ));
        }

        AgentResponse::success(
            AgentType::Execution,
            message,
            AgentPayload::TaskCompletion(TaskCompletionOutput {
                task_id: context.task_id(),
                streak_count: streak,
                action: "completed".to_string(),
            }),
        )
    }

    async fn check_in(&self, context: &AgentContext) -> AgentResponse {
        let system = self
            .services
            .system_prompt(keys::EXECUTION, EXECUTION_SYSTEM_PROMPT);
        let last = context.last_user_message().unwrap_or_default();

        let (message, fallback) = match self.services.generate_response(&system, context, last).await {
            Ok(reply) => (reply, false),
            Err(e) => {
                tracing::warn!(error = %e, "check-in completion failed, asking the fixed question");
                (CHECK_IN_FALLBACK.to_string(), true)
            }
        };

        AgentResponse::success(
            AgentType::Execution,
            message,
            AgentPayload::CheckIn { fallback },
        )
        .awaiting_user()
    }
}

#[async_trait]
impl Agent for ExecutionAgent {
    fn descriptor(&self) -> AgentDescriptor {
        AgentDescriptor {
            agent_type: AgentType::Execution,
            name: "Execution Agent",
            description: "Task scheduling, progress tracking, and real-time adjustments",
        }
    }

    async fn process(&self, context: &AgentContext) -> CoachResult<AgentResponse> {
        tracing::info!(user_id = ?context.user_id, agent = "execution", "processing");

        let request = context
            .request_type_raw()
            .and_then(|raw| raw.parse::<RequestType>().ok());

        Ok(match request {
            Some(RequestType::DailySummary) => self.daily_summary(context),
            Some(RequestType::TaskComplete) => self.task_completed(context),
            _ => self.check_in(context).await,
        })
    }
}

/// Celebration messages; one of them carries the streak.
fn celebrations(streak: u32) -> [String; 4] {
    [
        "✅ Task completed! Great job!".to_string(),
        format!("🔥 {} day streak! You're on fire!", streak),
        "💯 Another one done! Keep the momentum going!".to_string(),
        "⭐ Excellent work! Every task brings you closer.".to_string(),
    ]
}

/// Progress for tasks created on `today`.
pub fn summarize_day(history: &[TaskRecord], today: NaiveDate) -> ExecutionOutput {
    let todays: Vec<&TaskRecord> = history
        .iter()
        .filter(|t| t.created_on() == Some(today))
        .collect();

    let completed = todays.iter().filter(|t| t.is_completed()).count();
    let pending = todays.len() - completed;
    let rate = if todays.is_empty() {
        0.0
    } else {
        completed as f64 / todays.len() as f64
    };

    let mut adjustments = Vec::new();
    if rate < 0.6 && todays.len() > 2 {
        adjustments.push(REDUCE_LOAD.to_string());
    }
    if rate > 0.9 {
        adjustments.push(STRETCH_GOAL.to_string());
    }

    let next_actions = todays
        .iter()
        .filter(|t| !t.is_completed())
        .take(MAX_NEXT_ACTIONS)
        .map(|t| {
            let title = t.title.trim();
            if title.is_empty() {
                "Unnamed task".to_string()
            } else {
                title.to_string()
            }
        })
        .collect();

    ExecutionOutput {
        daily_summary: DailySummary {
            tasks_completed: completed as u32,
            tasks_pending: pending as u32,
            streak_count: current_streak(history, today),
            completion_rate: (rate * 100.0).round() / 100.0,
        },
        adjustments_recommended: adjustments,
        blockers_identified: Vec::new(),
        next_actions,
        motivational_message: motivational_message(rate).to_string(),
    }
}

pub fn motivational_message(rate: f64) -> &'static str {
    if rate >= 0.8 {
        "🎉 You're crushing it! Keep up the amazing work!"
    } else if rate >= 0.5 {
        "💪 Good progress! Let's finish strong today."
    } else {
        "🌟 Every step counts. What's one thing you can do right now?"
    }
}

pub fn format_summary(output: &ExecutionOutput) -> String {
    let summary = &output.daily_summary;
    let emoji = if summary.completion_rate >= 0.8 {
        "🎉"
    } else if summary.completion_rate >= 0.5 {
        "💪"
    } else {
        "🌱"
    };

    let next = if output.next_actions.is_empty() {
        "  • All caught up!".to_string()
    } else {
        output
            .next_actions
            .iter()
            .map(|a| format!("  • {}", a))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "## Daily Progress {}\n\n\
         **Today's Stats:**\n\
         - ✅ Completed: {}\n\
         - ⏳ Pending: {}\n\
         - 🔥 Streak: {} days\n\
         - 📊 Completion: {}%\n\n\
         **Up Next:**\n{}\n\n{}",
        emoji,
        summary.tasks_completed,
        summary.tasks_pending,
        summary.streak_count,
        (summary.completion_rate * 100.0) as u32,
        next,
        output.motivational_message,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::FixedEntropy;
    use chrono::Duration;
    use milesync_core::{keys as ctx_keys, ChatMessage, FixedClock, LlmError, TaskStatus};
    use milesync_llm::MockCompletionProvider;
    use std::sync::Arc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn services(mock: MockCompletionProvider) -> AgentServices {
        AgentServices::new(Arc::new(mock)).with_clock(Arc::new(FixedClock::at_date(today())))
    }

    fn created_today(title: &str, status: TaskStatus) -> TaskRecord {
        TaskRecord::new(title, status).with_created_at(format!("{}T08:00:00Z", today()))
    }

    fn done_days_ago(days: i64) -> TaskRecord {
        TaskRecord::new("walk", TaskStatus::Completed)
            .with_completed_at(format!("{}T18:00:00Z", today() - Duration::days(days)))
    }

    #[test]
    fn test_summary_without_tasks_is_zero() {
        let out = summarize_day(&[], today());
        assert_eq!(out.daily_summary.completion_rate, 0.0);
        assert!(out.adjustments_recommended.is_empty());
        assert!(out.motivational_message.starts_with("🌟"));
        assert!(format_summary(&out).contains("  • All caught up!"));
    }

    #[test]
    fn test_summary_low_rate_suggests_fewer_tasks() {
        let history = vec![
            created_today("Stretch", TaskStatus::Completed),
            created_today("Read", TaskStatus::Pending),
            created_today("  ", TaskStatus::Pending),
            created_today("Journal", TaskStatus::Skipped),
            created_today("Walk", TaskStatus::Pending),
            TaskRecord::new("Old", TaskStatus::Pending).with_created_at("2026-10-01T08:00:00Z"),
        ];
        let out = summarize_day(&history, today());

        assert_eq!(out.daily_summary.tasks_completed, 1);
        assert_eq!(out.daily_summary.tasks_pending, 4);
        assert_eq!(out.daily_summary.completion_rate, 0.2);
        assert_eq!(out.adjustments_recommended, vec![REDUCE_LOAD]);
        assert_eq!(out.next_actions, vec!["Read", "Unnamed task", "Journal"]);
        assert!(format_summary(&out).contains("📊 Completion: 20%"));
    }

    #[test]
    fn test_summary_full_rate_suggests_stretch() {
        let history = vec![
            created_today("a", TaskStatus::Completed),
            created_today("b", TaskStatus::Completed),
        ];
        let out = summarize_day(&history, today());
        assert_eq!(out.daily_summary.completion_rate, 1.0);
        assert_eq!(out.adjustments_recommended, vec![STRETCH_GOAL]);
        assert!(format_summary(&out).starts_with("## Daily Progress 🎉"));
    }

    #[test]
    fn test_summary_rounds_rate() {
        let history = vec![
            created_today("a", TaskStatus::Completed),
            created_today("b", TaskStatus::Completed),
            created_today("c", TaskStatus::Pending),
        ];
        let out = summarize_day(&history, today());
        assert_eq!(out.daily_summary.completion_rate, 0.67);
        assert!(out.motivational_message.starts_with("💪"));
    }

    #[tokio::test]
    async fn test_task_complete_week_bonus() {
        let history: Vec<TaskRecord> = (0..7).map(done_days_ago).collect();
        let agent = ExecutionAgent::new(
            services(MockCompletionProvider::new()).with_entropy(Arc::new(FixedEntropy(1))),
        );
        let ctx = AgentContext::new()
            .with_task_history(history)
            .with_context_value(ctx_keys::REQUEST_TYPE, "task_complete")
            .with_context_value(ctx_keys::TASK_ID, 42);

        let resp = agent.process(&ctx).await.unwrap();
        assert!(resp.success);
        assert!(resp.message.starts_with("🔥 7 day streak!"));
        assert!(resp.message.contains("A full week streak! That's 7 days!"));
        assert_eq!(
            resp.payload,
            AgentPayload::TaskCompletion(TaskCompletionOutput {
                task_id: Some("42".to_string()),
                streak_count: 7,
                action: "completed".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_task_complete_without_streak_has_no_bonus() {
        let agent = ExecutionAgent::new(
            services(MockCompletionProvider::new()).with_entropy(Arc::new(FixedEntropy(0))),
        );
        let ctx = AgentContext::new().with_context_value(ctx_keys::REQUEST_TYPE, "task_complete");

        let resp = agent.process(&ctx).await.unwrap();
        assert_eq!(resp.message, "✅ Task completed! Great job!");
        assert!(resp.data()["task_id"].is_null());
    }

    #[tokio::test]
    async fn test_check_in_replies_and_waits() {
        let mock = MockCompletionProvider::new().with_response("What's blocking you?");
        let agent = ExecutionAgent::new(services(mock));
        let ctx = AgentContext::new().with_message(ChatMessage::user("Slow day"));

        let resp = agent.process(&ctx).await.unwrap();
        assert!(resp.success);
        assert!(resp.requires_user_input);
        assert_eq!(resp.message, "What's blocking you?");
        assert_eq!(resp.payload, AgentPayload::CheckIn { fallback: false });
    }

    #[tokio::test]
    async fn test_check_in_falls_back_on_failure() {
        let mock = MockCompletionProvider::new().with_error(LlmError::NotConfigured);
        let agent = ExecutionAgent::new(services(mock));

        let resp = agent.process(&AgentContext::new()).await.unwrap();
        assert!(resp.success);
        assert!(resp.requires_user_input);
        assert_eq!(resp.message, CHECK_IN_FALLBACK);
        assert_eq!(resp.payload, AgentPayload::CheckIn { fallback: true });
    }

    #[tokio::test]
    async fn test_daily_summary_request() {
        let agent = ExecutionAgent::new(services(MockCompletionProvider::new()));
        let ctx = AgentContext::new()
            .with_task_history(vec![created_today("a", TaskStatus::Completed), done_days_ago(0)])
            .with_context_value(ctx_keys::REQUEST_TYPE, "daily_summary");

        let resp = agent.process(&ctx).await.unwrap();
        let AgentPayload::Execution(out) = &resp.payload else {
            panic!("expected execution payload");
        };
        assert_eq!(out.daily_summary.streak_count, 1);
        assert!(resp.message.contains("🔥 Streak: 1 days"));
    }
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use milesync_core::TaskStatus;
    use proptest::prelude::*;

    fn status() -> impl Strategy<Value = TaskStatus> {
        prop_oneof![
            Just(TaskStatus::Pending),
            Just(TaskStatus::InProgress),
            Just(TaskStatus::Completed),
            Just(TaskStatus::Skipped),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_completion_rate_in_unit_interval(
            tasks in prop::collection::vec((status(), 0u32..3), 0..20),
        ) {
            let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
            let history: Vec<TaskRecord> = tasks
                .into_iter()
                .map(|(s, day)| {
                    TaskRecord::new("t", s).with_created_at(format!("2026-10-{}T09:00:00Z", 16 + day))
                })
                .collect();
            let out = summarize_day(&history, today);
            let rate = out.daily_summary.completion_rate;
            prop_assert!((0.0..=1.0).contains(&rate));
            prop_assert!(out.next_actions.len() <= MAX_NEXT_ACTIONS);
        }
    }
}
