//! Intake readiness: has the conversation said enough to assess the goal?

use super::contains_any;
use milesync_core::{keys, AgentContext, RequestType};

/// Minimum conversation turns before the content gates are checked.
pub const MIN_MESSAGES: usize = 4;
/// User text must be longer than this many characters.
pub const MIN_USER_TEXT_CHARS: usize = 200;

pub const TIMELINE_KEYWORDS: &[&str] = &["month", "week", "year", "by", "until", "before", "deadline"];
pub const MOTIVATION_KEYWORDS: &[&str] = &[
    "because", "want to", "need to", "hoping", "goal is", "dream",
];

/// True when the Foundation agent should produce its assessment this turn.
///
/// The `generate_assessment` flag and a `request_type` naming the assessment
/// win outright. Otherwise the conversation
/// needs at least [`MIN_MESSAGES`] turns, and the joined user text must
/// mention a timeline and a motivation and be longer than
/// [`MIN_USER_TEXT_CHARS`].
pub fn should_generate_assessment(context: &AgentContext) -> bool {
    if context.flag(keys::GENERATE_ASSESSMENT) || assessment_requested(context) {
        return true;
    }

    if context.messages.len() < MIN_MESSAGES {
        return false;
    }

    let text = context.user_text();
    contains_any(&text, TIMELINE_KEYWORDS)
        && contains_any(&text, MOTIVATION_KEYWORDS)
        && text.chars().count() > MIN_USER_TEXT_CHARS
}

fn assessment_requested(context: &AgentContext) -> bool {
    context
        .request_type_raw()
        .and_then(|raw| raw.parse::<RequestType>().ok())
        == Some(RequestType::Assessment)
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use milesync_core::ChatMessage;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_short_conversations_need_override(texts in prop::collection::vec(".{0,400}", 0..4)) {
            let messages: Vec<ChatMessage> = texts.into_iter().map(ChatMessage::user).collect();
            let ctx = AgentContext::new().with_messages(messages);
            prop_assert!(!should_generate_assessment(&ctx));

            let forced = ctx.with_context_value(keys::GENERATE_ASSESSMENT, true);
            prop_assert!(should_generate_assessment(&forced));
        }
    }
}
