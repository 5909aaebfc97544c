//! MileSync Test Utilities
//!
//! Shared test infrastructure for the MileSync workspace:
//! - Proptest generators for contexts, turns and task history
//! - Fixtures for common coaching scenarios
//! - Custom assertions on agent responses
//! - Tracing setup for tests

pub use milesync_core::{
    keys, AgentContext, AgentPayload, AgentResponse, AgentType, ChatMessage, ChatRole,
    CoachConfig, CoachError, CoachResult, FixedClock, GoalRecord, Handoff, TaskRecord,
    TaskStatus,
};
pub use milesync_llm::MockCompletionProvider;

use chrono::{Duration, NaiveDate};

/// Install a fmt subscriber writing to the test output.
///
/// Filter comes from `RUST_LOG`, defaulting to `warn`. Safe to call from
/// every test; only the first call installs.
pub fn init_test_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for coaching inputs.

    use super::*;
    use proptest::prelude::*;
    use serde_json::{Map, Value};

    pub fn arb_agent_type() -> impl Strategy<Value = AgentType> {
        prop::sample::select(AgentType::ALL.to_vec())
    }

    pub fn arb_task_status() -> impl Strategy<Value = TaskStatus> {
        prop_oneof![
            Just(TaskStatus::Pending),
            Just(TaskStatus::InProgress),
            Just(TaskStatus::Completed),
            Just(TaskStatus::Skipped),
            Just(TaskStatus::Other),
        ]
    }

    /// Free text mixing plain words with coaching keywords.
    pub fn arb_message_text() -> impl Strategy<Value = String> {
        let words = prop::sample::select(vec![
            "I", "want", "to", "run", "a", "marathon", "by", "next", "year", "because",
            "stressed", "overwhelmed", "habit", "book", "recommend", "routine", "should",
            "always", "never", "excited", "can't", "deadline", "month", "motivated",
        ]);
        prop::collection::vec(words, 0..30).prop_map(|w| w.join(" "))
    }

    pub fn arb_chat_message() -> impl Strategy<Value = ChatMessage> {
        (
            prop_oneof![
                Just(ChatRole::User),
                Just(ChatRole::Assistant),
                Just(ChatRole::System)
            ],
            arb_message_text(),
        )
            .prop_map(|(role, content)| ChatMessage::new(role, content))
    }

    /// Raw timestamp strings, including ones the lenient parser rejects.
    pub fn arb_raw_timestamp() -> impl Strategy<Value = Option<String>> {
        prop_oneof![
            Just(None),
            Just(Some("not a date".to_string())),
            (0i64..120, 0u32..24).prop_map(|(day, hour)| {
                let date = base_date() + Duration::days(day);
                Some(format!("{}T{:02}:15:00Z", date, hour))
            }),
            (0i64..120).prop_map(|day| Some((base_date() + Duration::days(day)).to_string())),
        ]
    }

    pub fn arb_task_record() -> impl Strategy<Value = TaskRecord> {
        (
            prop::sample::select(vec!["Run", "Read", "Stretch", "", "Journal"]),
            arb_task_status(),
            arb_raw_timestamp(),
            arb_raw_timestamp(),
        )
            .prop_map(|(title, status, created_at, completed_at)| TaskRecord {
                id: None,
                title: title.to_string(),
                status,
                created_at,
                completed_at,
            })
    }

    pub fn arb_task_history() -> impl Strategy<Value = Vec<TaskRecord>> {
        prop::collection::vec(arb_task_record(), 0..40)
    }

    /// Selector values, valid and not.
    pub fn arb_selector() -> impl Strategy<Value = Value> {
        prop_oneof![
            prop::sample::select(vec![
                "daily_summary",
                "task_complete",
                "checkin",
                "assessment",
                "plan",
                "resources",
                "mindset",
                "sustainability",
                "foundation",
                "teleport",
                "",
            ])
            .prop_map(Value::from),
            any::<i64>().prop_map(Value::from),
            any::<bool>().prop_map(Value::from),
            Just(Value::Null),
        ]
    }

    /// Any context a caller could plausibly send, malformed parts included.
    pub fn arb_context() -> impl Strategy<Value = AgentContext> {
        (
            prop::collection::vec(arb_chat_message(), 0..8),
            prop::option::of(prop::sample::select(vec!["Run a marathon", "", "Learn Rust"])),
            arb_task_history(),
            prop::option::of(arb_selector()),
            prop::option::of(arb_selector()),
            any::<bool>(),
        )
            .prop_map(|(messages, goal, history, request_type, agent_type, assess)| {
                let mut extra = Map::new();
                if let Some(v) = request_type {
                    extra.insert(keys::REQUEST_TYPE.to_string(), v);
                }
                if let Some(v) = agent_type {
                    extra.insert(keys::AGENT_TYPE.to_string(), v);
                }
                if assess {
                    extra.insert(keys::GENERATE_ASSESSMENT.to_string(), Value::Bool(true));
                }
                AgentContext {
                    messages,
                    current_goal: goal.map(GoalRecord::titled),
                    task_history: history,
                    additional_context: extra,
                    ..AgentContext::default()
                }
            })
    }

    fn base_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, 1).unwrap_or_default()
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built contexts and histories for common scenarios.

    use super::*;
    use serde_json::Value;

    /// Date used by fixtures that need a fixed "today".
    pub fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap_or_default()
    }

    pub fn fixed_clock() -> FixedClock {
        FixedClock::at_date(today())
    }

    /// One completed task per day, ending on `last` and going back `days` days.
    pub fn daily_completions(title: &str, last: NaiveDate, days: u32) -> Vec<TaskRecord> {
        (0..days)
            .rev()
            .map(|offset| {
                let date = last - Duration::days(i64::from(offset));
                TaskRecord::new(title, TaskStatus::Completed)
                    .with_id(format!("{}-{}", title.to_lowercase(), date))
                    .with_created_at(format!("{}T06:00:00Z", date))
                    .with_completed_at(format!("{}T07:30:00Z", date))
            })
            .collect()
    }

    /// A task created on `date` and not yet done.
    pub fn pending_on(title: &str, date: NaiveDate) -> TaskRecord {
        TaskRecord::new(title, TaskStatus::Pending).with_created_at(format!("{}T06:00:00Z", date))
    }

    /// Fluent builder for [`AgentContext`] in tests.
    #[derive(Debug, Clone, Default)]
    pub struct ContextBuilder {
        context: AgentContext,
    }

    impl ContextBuilder {
        pub fn new() -> Self {
            Self::default()
        }

        /// Builder for a signed-in user.
        pub fn for_user(user_id: &str) -> Self {
            Self::new()
                .user_id(user_id)
                .session_id(&format!("{}-session", user_id))
        }

        pub fn user_id(mut self, user_id: &str) -> Self {
            self.context.user_id = Some(user_id.to_string());
            self
        }

        pub fn session_id(mut self, session_id: &str) -> Self {
            self.context.session_id = Some(session_id.to_string());
            self
        }

        pub fn user(mut self, content: &str) -> Self {
            self.context.messages.push(ChatMessage::user(content));
            self
        }

        pub fn assistant(mut self, content: &str) -> Self {
            self.context.messages.push(ChatMessage::assistant(content));
            self
        }

        pub fn goal(mut self, title: &str) -> Self {
            self.context.current_goal = Some(GoalRecord::titled(title));
            self
        }

        pub fn tasks(mut self, tasks: impl IntoIterator<Item = TaskRecord>) -> Self {
            self.context.task_history.extend(tasks);
            self
        }

        pub fn request_type(self, value: &str) -> Self {
            self.value(keys::REQUEST_TYPE, value)
        }

        pub fn agent_type(self, value: &str) -> Self {
            self.value(keys::AGENT_TYPE, value)
        }

        pub fn generate_assessment(self) -> Self {
            self.value(keys::GENERATE_ASSESSMENT, true)
        }

        pub fn task_id(self, id: &str) -> Self {
            self.value(keys::TASK_ID, id)
        }

        pub fn value(mut self, key: &str, value: impl Into<Value>) -> Self {
            self.context
                .additional_context
                .insert(key.to_string(), value.into());
            self
        }

        pub fn handoff(mut self, handoff: Handoff) -> Self {
            self.context.handoff = Some(handoff);
            self
        }

        pub fn build(self) -> AgentContext {
            self.context
        }
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions on agent responses.

    use super::*;

    #[track_caller]
    pub fn assert_success(response: &AgentResponse) {
        assert!(
            response.success,
            "Expected success from {}, got failure: {}",
            response.agent_type, response.message
        );
    }

    /// A failure that still carries a message and no structured data.
    #[track_caller]
    pub fn assert_safe_failure(response: &AgentResponse) {
        assert!(!response.success, "Expected failure, got success: {:?}", response);
        assert!(!response.message.trim().is_empty(), "Failure message is empty");
        assert!(
            response.data().is_empty(),
            "Failure carried data: {:?}",
            response.data()
        );
    }

    #[track_caller]
    pub fn assert_handled_by(response: &AgentResponse, agent_type: AgentType) {
        assert_eq!(
            response.agent_type, agent_type,
            "Wrong agent handled the turn: {}",
            response.message
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================
