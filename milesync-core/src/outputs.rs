//! Structured outputs produced by each coaching agent.
//!
//! These are plain data types. Bounds that the rest of the system relies on
//! (score ranges, schedule bucket caps) are enforced by the constructors here
//! so every producer gets them for free.

use crate::{BurnoutRisk, GoalType, ResourceType, TaskFrequency, TaskPriority};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Clamp an integer score into an inclusive range.
pub fn clamp_score(value: i64, min: u8, max: u8) -> u8 {
    value.clamp(min as i64, max as i64) as u8
}

// ============================================================================
// FOUNDATION
// ============================================================================

/// Baseline goal assessment from the intake conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoundationOutput {
    pub goal_summary: String,
    pub goal_type: GoalType,
    /// 1-10
    pub motivation_score: u8,
    /// 1-10
    pub feasibility_score: u8,
    /// 1-10
    pub clarity_score: u8,
    pub identified_obstacles: Vec<String>,
    pub success_criteria: Vec<String>,
    pub baseline_metrics: BTreeMap<String, String>,
    pub user_constraints: BTreeMap<String, String>,
    pub recommended_adjustments: Vec<String>,
}

impl Default for FoundationOutput {
    fn default() -> Self {
        Self {
            goal_summary: String::new(),
            goal_type: GoalType::LongTerm,
            motivation_score: 5,
            feasibility_score: 5,
            clarity_score: 5,
            identified_obstacles: Vec::new(),
            success_criteria: Vec::new(),
            baseline_metrics: BTreeMap::new(),
            user_constraints: BTreeMap::new(),
            recommended_adjustments: Vec::new(),
        }
    }
}

// ============================================================================
// PLANNING
// ============================================================================

/// SMART refinement of the goal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmartGoal {
    pub specific: String,
    pub measurable: String,
    pub achievable: String,
    pub relevant: String,
    pub time_bound: String,
}

/// One task inside a milestone or a schedule bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedTask {
    pub title: String,
    pub description: Option<String>,
    pub frequency: TaskFrequency,
    pub estimated_minutes: u32,
    pub priority: TaskPriority,
}

/// A plan milestone with its ordered tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub deadline: Option<String>,
    pub success_criteria: Vec<String>,
    pub tasks: Vec<PlannedTask>,
}

/// Recurring task schedule. Bucket caps hold for every value built through
/// [`TaskSchedule::bounded`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSchedule {
    pub daily: Vec<PlannedTask>,
    pub weekly: Vec<PlannedTask>,
    pub monthly: Vec<PlannedTask>,
}

impl TaskSchedule {
    /// Maximum number of daily tasks.
    pub const DAILY_CAP: usize = 3;
    /// Maximum minutes for a single daily task.
    pub const DAILY_MAX_MINUTES: u32 = 30;
    /// Maximum number of weekly tasks.
    pub const WEEKLY_CAP: usize = 5;

    /// Build a schedule, truncating the daily and weekly buckets to their caps
    /// and capping each daily task's duration. Monthly is unrestricted.
    pub fn bounded(
        mut daily: Vec<PlannedTask>,
        mut weekly: Vec<PlannedTask>,
        monthly: Vec<PlannedTask>,
    ) -> Self {
        daily.truncate(Self::DAILY_CAP);
        for task in &mut daily {
            task.estimated_minutes = task.estimated_minutes.min(Self::DAILY_MAX_MINUTES);
        }
        weekly.truncate(Self::WEEKLY_CAP);
        Self {
            daily,
            weekly,
            monthly,
        }
    }
}

/// "task depends on depends_on" edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDependency {
    pub task: String,
    pub depends_on: String,
}

/// Complete action plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanningOutput {
    pub smart_goal: SmartGoal,
    pub milestones: Vec<Milestone>,
    pub task_schedule: TaskSchedule,
    pub dependencies: Vec<TaskDependency>,
    pub total_estimated_hours: f64,
    /// Ordered milestone ids
    pub critical_path: Vec<String>,
}

// ============================================================================
// EXECUTION
// ============================================================================

/// Today's progress snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub tasks_completed: u32,
    pub tasks_pending: u32,
    pub streak_count: u32,
    /// 0.0-1.0, two decimals
    pub completion_rate: f64,
}

/// Daily summary with recommendations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionOutput {
    pub daily_summary: DailySummary,
    pub adjustments_recommended: Vec<String>,
    pub blockers_identified: Vec<String>,
    /// At most three titles
    pub next_actions: Vec<String>,
    pub motivational_message: String,
}

/// Acknowledgement of a completed task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCompletionOutput {
    pub task_id: Option<String>,
    pub streak_count: u32,
    pub action: String,
}

// ============================================================================
// PSYCHOLOGICAL
// ============================================================================

/// Lexicon-based reading of the user's emotional state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionalAssessment {
    /// 1-10
    pub motivation_level: u8,
    /// 1-10
    pub stress_level: u8,
    /// 1-10
    pub confidence_level: u8,
    /// At most three cognitive-distortion labels
    pub detected_patterns: Vec<String>,
}

impl Default for EmotionalAssessment {
    fn default() -> Self {
        Self {
            motivation_level: 5,
            stress_level: 5,
            confidence_level: 5,
            detected_patterns: Vec::new(),
        }
    }
}

/// Kind of psychological intervention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterventionType {
    StressManagement,
    MotivationBoost,
    ConfidenceBuilding,
    CognitiveReframing,
    GeneralSupport,
}

/// A static, technique-based intervention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intervention {
    #[serde(rename = "type")]
    pub kind: InterventionType,
    pub technique: String,
    pub message: String,
    /// Ordered exercise steps
    pub exercises: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PsychologicalOutput {
    pub emotional_assessment: EmotionalAssessment,
    pub intervention: Option<Intervention>,
    pub affirmations: Vec<String>,
    pub progress_celebration: String,
}

// ============================================================================
// SUPPORT
// ============================================================================

/// A recommended external resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "type")]
    pub kind: ResourceType,
    pub name: String,
    pub url: Option<String>,
    /// 0.0-1.0
    pub relevance_score: f64,
    pub time_commitment: Option<String>,
    pub cost: String,
    pub why: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupportOutput {
    /// At most five resources
    pub recommended_resources: Vec<Resource>,
    pub integration_suggestions: Vec<String>,
    pub community_matches: Vec<String>,
    pub expert_recommendations: Vec<String>,
}

impl SupportOutput {
    pub const MAX_RESOURCES: usize = 5;
}

// ============================================================================
// SUSTAINABILITY
// ============================================================================

/// Cue / routine / reward triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitLoop {
    pub cue: String,
    pub routine: String,
    pub reward: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitAnalysis {
    /// 0-100
    pub habit_score: u8,
    pub days_consistent: u32,
    /// At most three loops
    pub habit_loops: Vec<HabitLoop>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternInsights {
    pub best_days: Vec<String>,
    pub best_times: Vec<String>,
    pub failure_patterns: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SustainabilityOutput {
    pub habit_analysis: HabitAnalysis,
    pub pattern_insights: PatternInsights,
    /// 0-100
    pub sustainability_score: u8,
    pub burnout_risk: BurnoutRisk,
    /// 0-100
    pub burnout_score: u8,
    /// At most four recommendations
    pub recommendations: Vec<String>,
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    fn task(minutes: u32) -> PlannedTask {
        PlannedTask {
            title: "t".to_string(),
            description: None,
            frequency: TaskFrequency::Daily,
            estimated_minutes: minutes,
            priority: TaskPriority::Medium,
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_clamp_score_in_range(value in any::<i64>()) {
            let score = clamp_score(value, 1, 10);
            prop_assert!((1..=10).contains(&score));
        }

        #[test]
        fn prop_bounded_schedule_respects_caps(
            daily in prop::collection::vec(0u32..240, 0..10),
            weekly in 0usize..10,
            monthly in 0usize..10,
        ) {
            let schedule = TaskSchedule::bounded(
                daily.iter().map(|m| task(*m)).collect(),
                (0..weekly).map(|_| task(60)).collect(),
                (0..monthly).map(|_| task(60)).collect(),
            );
            prop_assert_eq!(schedule.daily.len(), daily.len().min(TaskSchedule::DAILY_CAP));
            prop_assert_eq!(schedule.weekly.len(), weekly.min(TaskSchedule::WEEKLY_CAP));
            prop_assert_eq!(schedule.monthly.len(), monthly);
            prop_assert!(schedule
                .daily
                .iter()
                .all(|t| t.estimated_minutes <= TaskSchedule::DAILY_MAX_MINUTES));
        }
    }
}
