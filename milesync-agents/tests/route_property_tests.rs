//! Property tests for coordinator routing.
//!
//! For any context a caller could send, `route` returns a response and never
//! panics, whatever the completion backend does. Failures always carry a
//! message and no data.

use milesync_agents::{AgentServices, Coordinator, SeededEntropy};
use milesync_core::AgentType;
use milesync_test_utils::generators::{arb_agent_type, arb_context};
use milesync_test_utils::{fixtures, keys, MockCompletionProvider};
use proptest::prelude::*;
use std::sync::Arc;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn coordinator(reply: &str, seed: u64) -> Coordinator {
    let services = AgentServices::new(Arc::new(MockCompletionProvider::always(reply)))
        .with_clock(Arc::new(fixtures::fixed_clock()))
        .with_entropy(Arc::new(SeededEntropy::new(seed)));
    Coordinator::new(services)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_route_always_answers(
        ctx in arb_context(),
        reply in prop_oneof![
            Just(String::new()),
            Just("not json".to_string()),
            Just("{\"goal_summary\": 3, \"milestones\": \"x\"}".to_string()),
            Just("```json\n{\"resources\": []}\n```".to_string()),
            "[a-z {}\":,]{0,40}",
        ],
        seed in any::<u64>(),
    ) {
        let coord = coordinator(&reply, seed);
        let resp = runtime().block_on(coord.route(&ctx));

        if !resp.success {
            prop_assert!(!resp.message.trim().is_empty());
            prop_assert!(resp.data().is_empty());
        }
        prop_assert!(resp.handoff_trail.len() <= 1);
    }

    #[test]
    fn prop_selection_is_deterministic(ctx in arb_context()) {
        let coord = Coordinator::new(AgentServices::unconfigured());
        prop_assert_eq!(coord.select_agent(&ctx), coord.select_agent(&ctx));
    }

    #[test]
    fn prop_explicit_agent_type_wins(ctx in arb_context(), agent in arb_agent_type()) {
        let coord = Coordinator::new(AgentServices::unconfigured());
        let ctx = ctx.with_context_value(keys::AGENT_TYPE, agent.as_str());
        prop_assert_eq!(coord.select_agent(&ctx), agent);
    }

    #[test]
    fn prop_no_goal_no_selector_is_foundation(ctx in arb_context()) {
        let mut ctx = ctx;
        ctx.current_goal = None;
        ctx.handoff = None;
        ctx.additional_context.remove(keys::AGENT_TYPE);
        ctx.additional_context.remove(keys::REQUEST_TYPE);

        let coord = Coordinator::new(AgentServices::unconfigured());
        prop_assert_eq!(coord.select_agent(&ctx), AgentType::Foundation);
    }
}
