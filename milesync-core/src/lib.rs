//! MileSync Core - Coaching Data Types
//!
//! Pure data structures shared by every other crate: the per-turn agent
//! context, agent responses and structured outputs, error types,
//! configuration and the clock. No I/O lives here.

use chrono::{DateTime, Utc};

pub mod config;
pub mod context;
pub mod enums;
pub mod error;
pub mod outputs;
pub mod response;
pub mod time;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

pub use config::{CoachConfig, Temperatures, MAX_HANDOFF_DEPTH_LIMIT};
pub use context::{keys, AgentContext, ChatMessage, GoalRecord, Handoff, TaskRecord};
pub use enums::{
    AgentType, BurnoutRisk, ChatRole, EnumParseError, GoalType, RequestType, ResourceType,
    TaskFrequency, TaskPriority, TaskStatus,
};
pub use error::{AgentError, CoachError, CoachResult, ConfigError, LlmError};
pub use outputs::{
    clamp_score, DailySummary, EmotionalAssessment, ExecutionOutput, FoundationOutput,
    HabitAnalysis, HabitLoop, Intervention, InterventionType, Milestone, PatternInsights,
    PlannedTask, PlanningOutput, PsychologicalOutput, Resource, SmartGoal, SupportOutput,
    SustainabilityOutput, TaskCompletionOutput, TaskDependency, TaskSchedule,
};
pub use response::{AgentDescriptor, AgentPayload, AgentResponse};
pub use time::{parse_local_timestamp, parse_timestamp, Clock, FixedClock, SystemClock};
