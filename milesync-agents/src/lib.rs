//! MileSync Agents - Goal Coaching Agents and Coordination
//!
//! Six agents, each owning one stage of the coaching workflow:
//! - Foundation: goal intake and baseline assessment
//! - Planning: SMART conversion and task breakdown
//! - Execution: check-ins, daily summaries, task completion
//! - Psychological: motivation and mindset coaching
//! - Support: resource recommendations
//! - Sustainability: habit formation and burnout prevention
//!
//! The [`Coordinator`] selects an agent per turn, isolates failures, and
//! chains typed handoffs (Foundation into Planning, Planning into Execution).

pub mod agent;
pub mod analysis;
pub mod coordinator;
pub mod entropy;
pub mod execution;
pub mod foundation;
pub mod planning;
pub mod psychological;
pub mod services;
pub mod support;
pub mod sustainability;

pub use agent::Agent;
pub use coordinator::{infer_from_message, Coordinator, CHAIN_SEPARATOR, SAFE_FAILURE_MESSAGE};
pub use entropy::{Entropy, FixedEntropy, SeededEntropy, ThreadEntropy};
pub use execution::ExecutionAgent;
pub use foundation::FoundationAgent;
pub use planning::PlanningAgent;
pub use psychological::PsychologicalAgent;
pub use services::AgentServices;
pub use support::SupportAgent;
pub use sustainability::SustainabilityAgent;

pub use milesync_core::{AgentContext, AgentPayload, AgentResponse, AgentType, CoachConfig};
