//! Enum types for MileSync coaching entities

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// PARSE ERROR
// ============================================================================

/// Error when parsing an enum from an unrecognized string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumParseError {
    /// Name of the enum being parsed
    pub kind: &'static str,
    /// The rejected input
    pub value: String,
}

impl EnumParseError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for EnumParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid {}: {}", self.kind, self.value)
    }
}

impl std::error::Error for EnumParseError {}

/// Lowercase and fold separators so "SHORT_TERM", "short-term" and
/// "Short Term" compare equal.
fn normalize(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .collect()
}

// ============================================================================
// AGENT TYPE
// ============================================================================

/// The six coaching-stage agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    /// Goal intake and baseline assessment
    Foundation,
    /// SMART conversion and task breakdown
    Planning,
    /// Progress tracking and check-ins
    Execution,
    /// Motivation and mindset coaching
    Psychological,
    /// Resource curation
    Support,
    /// Habit formation and burnout prevention
    Sustainability,
}

impl AgentType {
    /// All agent types in workflow order.
    pub const ALL: [AgentType; 6] = [
        AgentType::Foundation,
        AgentType::Planning,
        AgentType::Execution,
        AgentType::Psychological,
        AgentType::Support,
        AgentType::Sustainability,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::Foundation => "foundation",
            AgentType::Planning => "planning",
            AgentType::Execution => "execution",
            AgentType::Psychological => "psychological",
            AgentType::Support => "support",
            AgentType::Sustainability => "sustainability",
        }
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentType {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize(s);
        let key = key.strip_suffix("agent").unwrap_or(&key);
        AgentType::ALL
            .into_iter()
            .find(|t| t.as_str() == key)
            .ok_or_else(|| EnumParseError::new("agent type", s))
    }
}

// ============================================================================
// REQUEST TYPE
// ============================================================================

/// Explicit operation selector carried in `additional_context.request_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    DailySummary,
    TaskComplete,
    CheckIn,
    /// Continue the intake conversation.
    Intake,
    /// Produce the assessment now, whatever the intake gates say.
    Assessment,
    Plan,
    Resources,
    Mindset,
    Sustainability,
}

impl RequestType {
    /// The agent that owns this operation.
    pub fn owner(&self) -> AgentType {
        match self {
            RequestType::DailySummary | RequestType::TaskComplete | RequestType::CheckIn => {
                AgentType::Execution
            }
            RequestType::Intake | RequestType::Assessment => AgentType::Foundation,
            RequestType::Plan => AgentType::Planning,
            RequestType::Resources => AgentType::Support,
            RequestType::Mindset => AgentType::Psychological,
            RequestType::Sustainability => AgentType::Sustainability,
        }
    }
}

impl FromStr for RequestType {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "dailysummary" => Ok(RequestType::DailySummary),
            "taskcomplete" | "taskcompleted" => Ok(RequestType::TaskComplete),
            "checkin" => Ok(RequestType::CheckIn),
            "intake" => Ok(RequestType::Intake),
            "assessment" | "generateassessment" => Ok(RequestType::Assessment),
            "plan" | "planning" => Ok(RequestType::Plan),
            "resources" | "support" => Ok(RequestType::Resources),
            "mindset" | "motivation" | "psychological" => Ok(RequestType::Mindset),
            "sustainability" | "habitanalysis" | "burnoutcheck" => {
                Ok(RequestType::Sustainability)
            }
            _ => Err(EnumParseError::new("request type", s)),
        }
    }
}

// ============================================================================
// CONVERSATION AND TASK ENUMS
// ============================================================================

/// Role of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    System,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
            ChatRole::System => "system",
        }
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a task record supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Skipped,
    /// Any status string this core does not interpret
    #[serde(other)]
    Other,
}

impl TaskStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, TaskStatus::Completed)
    }
}

// ============================================================================
// AGENT OUTPUT ENUMS
// ============================================================================

/// Goal horizon classification produced by the Foundation agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    /// Under three months
    ShortTerm,
    /// Three to twelve months
    #[default]
    LongTerm,
    /// Year-long commitment
    Resolution,
}

impl GoalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalType::ShortTerm => "short_term",
            GoalType::LongTerm => "long_term",
            GoalType::Resolution => "resolution",
        }
    }

    /// Human-readable label, e.g. "Short Term".
    pub fn label(&self) -> &'static str {
        match self {
            GoalType::ShortTerm => "Short Term",
            GoalType::LongTerm => "Long Term",
            GoalType::Resolution => "Resolution",
        }
    }
}

impl FromStr for GoalType {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "shortterm" => Ok(GoalType::ShortTerm),
            "longterm" => Ok(GoalType::LongTerm),
            "resolution" => Ok(GoalType::Resolution),
            _ => Err(EnumParseError::new("goal type", s)),
        }
    }
}

/// How often a planned task recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskFrequency {
    Daily,
    Weekly,
    Monthly,
    #[default]
    OneTime,
}

impl FromStr for TaskFrequency {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "daily" => Ok(TaskFrequency::Daily),
            "weekly" => Ok(TaskFrequency::Weekly),
            "monthly" => Ok(TaskFrequency::Monthly),
            "onetime" | "once" => Ok(TaskFrequency::OneTime),
            _ => Err(EnumParseError::new("task frequency", s)),
        }
    }
}

/// Planned task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    High,
    #[default]
    Medium,
    Low,
}

impl FromStr for TaskPriority {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "high" => Ok(TaskPriority::High),
            "medium" => Ok(TaskPriority::Medium),
            "low" => Ok(TaskPriority::Low),
            _ => Err(EnumParseError::new("task priority", s)),
        }
    }
}

/// Category of a recommended support resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Course,
    Book,
    #[default]
    Tool,
    Community,
    Expert,
}

impl ResourceType {
    pub fn label(&self) -> &'static str {
        match self {
            ResourceType::Course => "Course",
            ResourceType::Book => "Book",
            ResourceType::Tool => "Tool",
            ResourceType::Community => "Community",
            ResourceType::Expert => "Expert",
        }
    }
}

impl FromStr for ResourceType {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "course" => Ok(ResourceType::Course),
            "book" => Ok(ResourceType::Book),
            "tool" => Ok(ResourceType::Tool),
            "community" => Ok(ResourceType::Community),
            "expert" => Ok(ResourceType::Expert),
            _ => Err(EnumParseError::new("resource type", s)),
        }
    }
}

/// Burnout risk band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BurnoutRisk {
    #[default]
    Low,
    Medium,
    High,
}

impl BurnoutRisk {
    /// Band for a 0-100 burnout score.
    pub fn from_score(score: i32) -> Self {
        if score >= 70 {
            BurnoutRisk::High
        } else if score >= 40 {
            BurnoutRisk::Medium
        } else {
            BurnoutRisk::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BurnoutRisk::Low => "LOW",
            BurnoutRisk::Medium => "MEDIUM",
            BurnoutRisk::High => "HIGH",
        }
    }
}

impl fmt::Display for BurnoutRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TESTS
// ============================================================================
