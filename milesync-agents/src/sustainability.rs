//! Sustainability agent: habit formation, patterns and burnout risk.
//!
//! Entirely heuristic; the completion capability is not used.

use crate::agent::{numbered_list, Agent};
use crate::analysis::{analyze_habits, assess_burnout, detect_patterns, sustainability_score};
use async_trait::async_trait;
use milesync_core::{
    AgentContext, AgentDescriptor, AgentPayload, AgentResponse, AgentType, BurnoutRisk,
    CoachResult, HabitAnalysis, PatternInsights, SustainabilityOutput,
};

pub const SUSTAINABILITY_SYSTEM_PROMPT: &str = r#"You are the Sustainability Agent for MileSync, an AI goal coaching platform.

Your role is to ensure long-term success through habit formation and pattern optimization.

## SUSTAINABILITY PROTOCOL:

1. **Habit Loop Design** - For each recurring task:
   - CUE: Environmental or time-based triggers
   - ROUTINE: The actual behavior/task
   - REWARD: Immediate gratification element

2. **Pattern Analysis** - Detect:
   - Best performing days and times
   - Common failure patterns
   - Energy correlation
   - Environmental factors

3. **Burnout Prevention** - Monitor for:
   - Declining completion rates
   - Increasing task load
   - Stress indicators in communication
   - Overwhelm signals

4. **Habit Milestones**:
   - 21 days: Initial habit forming
   - 66 days: Habit solidifying
   - 90 days: Habit fully established

## INTERVENTION TRIGGERS:
- Completion rate drop >15% week-over-week
- 3+ consecutive missed daily tasks
- User language indicating overwhelm
- Burnout risk score >70%

## RECOMMENDATIONS STYLE:
- Science-backed suggestions
- Practical, immediately implementable
- Consider user's energy patterns
- Build on existing routines"#;

const MAX_RECOMMENDATIONS: usize = 4;

#[derive(Debug, Clone, Copy, Default)]
pub struct SustainabilityAgent;

#[async_trait]
impl Agent for SustainabilityAgent {
    fn descriptor(&self) -> AgentDescriptor {
        AgentDescriptor {
            agent_type: AgentType::Sustainability,
            name: "Sustainability Agent",
            description: "Habit formation, pattern detection, and burnout prevention",
        }
    }

    async fn process(&self, context: &AgentContext) -> CoachResult<AgentResponse> {
        tracing::info!(user_id = ?context.user_id, agent = "sustainability", "processing");

        let output = analyze(context);
        Ok(AgentResponse::success(
            AgentType::Sustainability,
            format_analysis(&output),
            AgentPayload::Sustainability(output),
        ))
    }
}

/// Full sustainability read of the context.
pub fn analyze(context: &AgentContext) -> SustainabilityOutput {
    let habit_analysis = analyze_habits(&context.task_history);
    let pattern_insights = detect_patterns(&context.task_history);
    let burnout = assess_burnout(&context.task_history, &context.messages);

    SustainabilityOutput {
        sustainability_score: sustainability_score(habit_analysis.habit_score, burnout.score),
        recommendations: recommendations(&habit_analysis, &pattern_insights, burnout.risk),
        habit_analysis,
        pattern_insights,
        burnout_risk: burnout.risk,
        burnout_score: burnout.score,
    }
}

pub fn recommendations(
    habits: &HabitAnalysis,
    patterns: &PatternInsights,
    risk: BurnoutRisk,
) -> Vec<String> {
    let mut out = Vec::new();

    if habits.habit_score < 30 {
        out.push("Focus on building one consistent daily habit before adding more".to_string());
    } else if habits.habit_score < 60 {
        out.push("You're building momentum! Add a small reward after completing tasks".to_string());
    }

    if let Some(best_time) = patterns.best_times.first() {
        out.push(format!(
            "Your {} sessions are most productive - schedule important tasks then",
            best_time.to_lowercase()
        ));
    }

    match risk {
        BurnoutRisk::High => {
            out.push("⚠️ Take a strategic rest day - sustainable progress beats burnout".to_string());
            out.push("Consider reducing daily tasks by 30% this week".to_string());
        }
        BurnoutRisk::Medium => {
            out.push("Build in buffer time between tasks to prevent overwhelm".to_string());
        }
        BurnoutRisk::Low => {}
    }

    out.truncate(MAX_RECOMMENDATIONS);
    out
}

fn join_or(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        empty.to_string()
    } else {
        items.join(", ")
    }
}

pub fn format_analysis(output: &SustainabilityOutput) -> String {
    let risk_emoji = match output.burnout_risk {
        BurnoutRisk::Low => "🟢",
        BurnoutRisk::Medium => "🟡",
        BurnoutRisk::High => "🔴",
    };

    let loops = if output.habit_analysis.habit_loops.is_empty() {
        "  • Still building your first habits".to_string()
    } else {
        output
            .habit_analysis
            .habit_loops
            .iter()
            .map(|h| format!("  • **{}** - Cue: {}", h.routine, h.cue))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let recommendations = if output.recommendations.is_empty() {
        "  Keep up the great work!".to_string()
    } else {
        numbered_list(&output.recommendations, "  ")
    };

    format!(
        "## Sustainability Analysis\n\n\
         **Overall Score:** {}/100\n\
         **Burnout Risk:** {} {}\n\
         **Days Consistent:** {}\n\n\
         ### Your Habit Loops\n{}\n\n\
         ### Best Performance Times\n\
         - 📅 Best days: {}\n\
         - ⏰ Best times: {}\n\n\
         ### Recommendations\n{}",
        output.sustainability_score,
        risk_emoji,
        output.burnout_risk,
        output.habit_analysis.days_consistent,
        loops,
        join_or(&output.pattern_insights.best_days, "Analyzing..."),
        join_or(&output.pattern_insights.best_times, "Analyzing..."),
        recommendations,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use milesync_core::{ChatMessage, TaskRecord, TaskStatus};

    fn daily_run(days: u32) -> Vec<TaskRecord> {
        (1..=days)
            .map(|d| {
                TaskRecord::new("Run", TaskStatus::Completed)
                    .with_completed_at(format!("2026-09-{:02}T07:00:00Z", d))
            })
            .collect()
    }

    #[test]
    fn test_empty_context() {
        let out = analyze(&AgentContext::new());
        assert_eq!(out.burnout_score, 50);
        assert_eq!(out.burnout_risk, BurnoutRisk::Medium);
        // 0.6 * 0 + 0.4 * 50
        assert_eq!(out.sustainability_score, 20);
        assert_eq!(
            out.recommendations,
            vec![
                "Focus on building one consistent daily habit before adding more",
                "Build in buffer time between tasks to prevent overwhelm",
            ]
        );

        let message = format_analysis(&out);
        assert!(message.contains("**Burnout Risk:** 🟡 MEDIUM"));
        assert!(message.contains("  • Still building your first habits"));
        assert!(message.contains("- 📅 Best days: Analyzing..."));
    }

    #[test]
    fn test_consistent_runner() {
        let ctx = AgentContext::new().with_task_history(daily_run(30));
        let out = analyze(&ctx);

        assert_eq!(out.habit_analysis.days_consistent, 30);
        // round(100 * 30 / 90)
        assert_eq!(out.habit_analysis.habit_score, 33);
        assert_eq!(out.pattern_insights.best_times, vec!["Morning"]);
        assert!(out
            .recommendations
            .contains(&"Your morning sessions are most productive - schedule important tasks then".to_string()));
        assert!(format_analysis(&out).contains("  • **Run** - Cue: Scheduled time for Run"));
    }

    #[test]
    fn test_high_risk_caps_recommendations() {
        let habits = HabitAnalysis::default();
        let patterns = PatternInsights {
            best_times: vec!["Evening".to_string()],
            ..PatternInsights::default()
        };
        let recs = recommendations(&habits, &patterns, BurnoutRisk::High);
        assert_eq!(recs.len(), 4);
        assert!(recs[2].starts_with("⚠️ Take a strategic rest day"));
        assert_eq!(recs[3], "Consider reducing daily tasks by 30% this week");
    }

    #[test]
    fn test_stressed_decline_is_high_risk() {
        let mut history: Vec<TaskRecord> = (0..7)
            .map(|_| TaskRecord::new("Read", TaskStatus::Completed))
            .collect();
        history.extend((0..7).map(|_| TaskRecord::new("Read", TaskStatus::Skipped)));
        let ctx = AgentContext::new()
            .with_task_history(history)
            .with_message(ChatMessage::user("I'm overwhelmed"));

        let out = analyze(&ctx);
        assert_eq!(out.burnout_risk, BurnoutRisk::High);
        assert!(format_analysis(&out).contains("🔴 HIGH"));
    }
}
