//! Psychological agent: mindset check-ins and evidence-based interventions.
//!
//! The emotional read is lexicon-based (see [`crate::analysis::emotion`]).
//! Interventions and affirmations are static content selected by pure
//! functions; only the no-intervention path calls the model.

use crate::agent::{numbered_list, Agent};
use crate::analysis::{assess_emotions, needs_intervention};
use crate::services::AgentServices;
use async_trait::async_trait;
use milesync_core::{
    AgentContext, AgentDescriptor, AgentPayload, AgentResponse, AgentType, CoachResult,
    EmotionalAssessment, Intervention, InterventionType, PsychologicalOutput,
};
use milesync_llm::prompts::keys;

pub const PSYCHOLOGICAL_SYSTEM_PROMPT: &str = r#"You are the Psychological Agent for MileSync, an AI goal coaching platform.

Your role is to support users' mental and emotional wellbeing throughout their goal journey.

## PSYCHOLOGICAL PROTOCOL:

1. **Monitor Emotional Tone** - Detect mood from communication
2. **Assess Motivation** - Track motivation fluctuations
3. **Identify Patterns** - Spot cognitive distortions
4. **Provide Reframing** - Offer perspective shifts
5. **Offer Interventions** - Evidence-based techniques
6. **Celebrate Progress** - Build self-efficacy

## INTERVENTION TOOLKIT:

**Motivational Boosters:**
- Progress visualization
- Past success reminders
- Future self visualization
- Small wins celebration

**Reframing Techniques:**
- Cognitive restructuring
- Perspective shifts
- All-or-nothing thinking correction
- Catastrophizing reduction

**Anxiety Management:**
- Deep breathing exercises
- Worry time scheduling
- Progressive relaxation
- Grounding techniques

**Procrastination Busters:**
- 2-minute rule
- Temptation bundling
- Implementation intentions
- Environment design

**Self-Compassion:**
- Normalize setbacks
- Growth mindset reinforcement
- Self-kindness prompts
- Common humanity reminders

## COMMUNICATION STYLE:
- Warm and empathetic
- Non-judgmental
- Solution-focused
- Evidence-based
- Empowering, not dependency-creating

## WHEN TO ESCALATE:
If user shows signs of clinical depression, anxiety disorders, or crisis,
gently recommend professional support while being supportive."#;

pub const ENCOURAGEMENT_FALLBACK: &str = "You're doing great! Even small steps count. Keep going!";
const KEEP_MOVING: &str = "Keep moving forward!";

pub struct PsychologicalAgent {
    services: AgentServices,
}

impl PsychologicalAgent {
    pub fn new(services: AgentServices) -> Self {
        Self { services }
    }

    fn intervene(&self, context: &AgentContext, assessment: EmotionalAssessment) -> AgentResponse {
        let completed = context.completed_task_count();
        let progress_celebration = if completed > 0 {
            format!(
                "✨ Remember: You've already completed {} tasks. That's real progress!",
                completed
            )
        } else {
            String::new()
        };

        let output = PsychologicalOutput {
            intervention: Some(select_intervention(&assessment)),
            affirmations: affirmations(&assessment),
            emotional_assessment: assessment,
            progress_celebration,
        };

        AgentResponse::success(
            AgentType::Psychological,
            format_support(&output),
            AgentPayload::Psychological(output),
        )
    }

    async fn encourage(
        &self,
        context: &AgentContext,
        assessment: EmotionalAssessment,
    ) -> AgentResponse {
        let instruction = format!(
            "Analyze the user's current state:\n\
             Motivation: {}/10\n\
             Stress: {}/10\n\
             Confidence: {}/10\n\n\
             Provide a warm, encouraging response that acknowledges this state.\n\
             Focus on their progress and potential.",
            assessment.motivation_level, assessment.stress_level, assessment.confidence_level
        );
        let system = self
            .services
            .system_prompt(keys::PSYCHOLOGICAL, PSYCHOLOGICAL_SYSTEM_PROMPT);

        let message = match self
            .services
            .generate_response(&system, context, &instruction)
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, "encouragement completion failed");
                ENCOURAGEMENT_FALLBACK.to_string()
            }
        };

        let affirmations = affirmations(&assessment);
        let output = PsychologicalOutput {
            emotional_assessment: assessment,
            intervention: None,
            affirmations,
            progress_celebration: KEEP_MOVING.to_string(),
        };

        AgentResponse::success(
            AgentType::Psychological,
            message,
            AgentPayload::Psychological(output),
        )
    }
}

#[async_trait]
impl Agent for PsychologicalAgent {
    fn descriptor(&self) -> AgentDescriptor {
        AgentDescriptor {
            agent_type: AgentType::Psychological,
            name: "Psychological Agent",
            description: "Motivation, mindset coaching, and behavioral science support",
        }
    }

    async fn process(&self, context: &AgentContext) -> CoachResult<AgentResponse> {
        tracing::info!(user_id = ?context.user_id, agent = "psychological", "processing");

        let assessment = assess_emotions(&context.user_text());
        tracing::debug!(
            motivation = assessment.motivation_level,
            stress = assessment.stress_level,
            confidence = assessment.confidence_level,
            patterns = assessment.detected_patterns.len(),
            "emotional assessment"
        );

        if needs_intervention(&assessment) {
            Ok(self.intervene(context, assessment))
        } else {
            Ok(self.encourage(context, assessment).await)
        }
    }
}

// ============================================================================
// INTERVENTIONS
// ============================================================================

fn intervention(
    kind: InterventionType,
    technique: &str,
    message: String,
    exercises: [&str; 4],
) -> Intervention {
    Intervention {
        kind,
        technique: technique.to_string(),
        message,
        exercises: exercises.iter().map(|e| e.to_string()).collect(),
    }
}

/// Fixed reframe for a distortion label.
pub fn reframe_for(pattern: &str) -> &'static str {
    match pattern {
        "All-or-nothing thinking" => {
            "Replace 'always/never' with 'sometimes/often'. Progress isn't all-or-nothing."
        }
        "Should statements" => {
            "Replace 'should' with 'could' or 'want to'. You have choices, not obligations."
        }
        "Catastrophizing" => {
            "Ask: What's the realistic worst case? Usually it's more manageable than we fear."
        }
        "Personalization" => {
            "Remember: Many factors affect outcomes. Not everything is within your control."
        }
        _ => "Consider an alternative perspective",
    }
}

/// Highest-priority intervention for the assessment: stress, then
/// motivation, then confidence, then the first distortion.
pub fn select_intervention(assessment: &EmotionalAssessment) -> Intervention {
    if assessment.stress_level > 7 {
        return intervention(
            InterventionType::StressManagement,
            "4-7-8 Breathing",
            "I notice you might be feeling stressed. Let's take a moment to breathe.".to_string(),
            [
                "Breathe in through your nose for 4 counts",
                "Hold your breath for 7 counts",
                "Exhale slowly through your mouth for 8 counts",
                "Repeat 3-4 times",
            ],
        );
    }

    if assessment.motivation_level < 4 {
        return intervention(
            InterventionType::MotivationBoost,
            "2-Minute Rule",
            "Feeling unmotivated? Let's use a proven technique to get started.".to_string(),
            [
                "Pick the smallest possible version of your task",
                "Commit to just 2 minutes of work",
                "Often, starting is the hardest part",
                "Once you start, you'll likely want to continue",
            ],
        );
    }

    if assessment.confidence_level < 4 {
        return intervention(
            InterventionType::ConfidenceBuilding,
            "Past Wins Reflection",
            "Let's remind ourselves of what you've already accomplished.".to_string(),
            [
                "Think of 3 challenges you've overcome before",
                "Remember how you felt after succeeding",
                "Recognize that those same skills apply here",
                "You've done hard things before - you can do this too",
            ],
        );
    }

    if let Some(pattern) = assessment.detected_patterns.first() {
        return intervention(
            InterventionType::CognitiveReframing,
            "Thought Challenging",
            format!("I noticed a pattern: {}. Let's reframe this.", pattern),
            [
                reframe_for(pattern),
                "Write down the thought",
                "Ask: Is this thought helpful?",
                "Create a more balanced alternative",
            ],
        );
    }

    intervention(
        InterventionType::GeneralSupport,
        "Self-Compassion",
        "Remember to be kind to yourself on this journey.".to_string(),
        [
            "Acknowledge that this is challenging",
            "Remind yourself that struggle is part of growth",
            "Treat yourself as you would a good friend",
            "Take one small step forward today",
        ],
    )
}

/// One affirmation per low or stressed dimension, or a generic one.
pub fn affirmations(assessment: &EmotionalAssessment) -> Vec<String> {
    let mut out = Vec::new();
    if assessment.motivation_level < 5 {
        out.push("Your small efforts today create big results tomorrow.".to_string());
    }
    if assessment.stress_level > 5 {
        out.push("You are capable of handling whatever comes your way.".to_string());
    }
    if assessment.confidence_level < 5 {
        out.push("You have already proven you can do hard things.".to_string());
    }
    if out.is_empty() {
        out.push("You are making progress, even when it doesn't feel like it.".to_string());
    }
    out
}

pub fn format_support(output: &PsychologicalOutput) -> String {
    let assessment = &output.emotional_assessment;
    let (technique, message, exercises) = match &output.intervention {
        Some(i) => (
            i.technique.as_str(),
            i.message.as_str(),
            numbered_list(&i.exercises, "  "),
        ),
        None => ("Support", "You are doing well!", String::new()),
    };
    let affirmations = output
        .affirmations
        .iter()
        .map(|a| format!("  💫 {}", a))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "## Mindset Check-In\n\n\
         **How You're Doing:**\n\
         - 🎯 Motivation: {}/10\n\
         - 😌 Stress: {}/10\n\
         - 💪 Confidence: {}/10\n\n\
         ### {}\n{}\n\n\
         **Try This:**\n{}\n\n\
         ### Affirmations\n{}\n\n{}",
        assessment.motivation_level,
        assessment.stress_level,
        assessment.confidence_level,
        technique,
        message,
        exercises,
        affirmations,
        output.progress_celebration,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use milesync_core::{ChatMessage, LlmError, TaskRecord, TaskStatus};
    use milesync_llm::MockCompletionProvider;
    use std::sync::Arc;

    fn assessment(motivation: u8, stress: u8, confidence: u8, patterns: &[&str]) -> EmotionalAssessment {
        EmotionalAssessment {
            motivation_level: motivation,
            stress_level: stress,
            confidence_level: confidence,
            detected_patterns: patterns.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn test_stress_wins_priority() {
        let i = select_intervention(&assessment(6, 8, 6, &[]));
        assert_eq!(i.kind, InterventionType::StressManagement);
        assert_eq!(i.technique, "4-7-8 Breathing");

        let i = select_intervention(&assessment(2, 8, 2, &["Catastrophizing"]));
        assert_eq!(i.kind, InterventionType::StressManagement);
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(
            select_intervention(&assessment(3, 5, 3, &[])).kind,
            InterventionType::MotivationBoost
        );
        assert_eq!(
            select_intervention(&assessment(5, 5, 3, &[])).kind,
            InterventionType::ConfidenceBuilding
        );
        assert_eq!(
            select_intervention(&assessment(5, 5, 5, &[])).kind,
            InterventionType::GeneralSupport
        );
    }

    #[test]
    fn test_reframing_uses_first_pattern() {
        let i = select_intervention(&assessment(5, 5, 5, &["Should statements", "Catastrophizing"]));
        assert_eq!(i.kind, InterventionType::CognitiveReframing);
        assert_eq!(i.message, "I noticed a pattern: Should statements. Let's reframe this.");
        assert!(i.exercises[0].starts_with("Replace 'should'"));
        assert_eq!(i.exercises.len(), 4);
        assert_eq!(reframe_for("unknown"), "Consider an alternative perspective");
    }

    #[test]
    fn test_affirmations() {
        assert_eq!(affirmations(&assessment(3, 6, 3, &[])).len(), 3);
        let generic = affirmations(&assessment(5, 5, 5, &[]));
        assert_eq!(generic, vec!["You are making progress, even when it doesn't feel like it."]);
    }

    #[tokio::test]
    async fn test_distress_gets_intervention_without_completion() {
        let mock = Arc::new(MockCompletionProvider::new());
        let agent = PsychologicalAgent::new(AgentServices::new(mock.clone()));
        let ctx = AgentContext::new()
            .with_message(ChatMessage::user("I'm stressed, anxious, overwhelmed and worried"))
            .with_task_history(vec![
                TaskRecord::new("a", TaskStatus::Completed),
                TaskRecord::new("b", TaskStatus::Completed),
            ]);

        let resp = agent.process(&ctx).await.unwrap();
        assert!(resp.success);
        assert_eq!(mock.request_count(), 0);
        assert!(resp.message.contains("### 4-7-8 Breathing"));
        assert!(resp.message.contains("  1. Breathe in through your nose for 4 counts"));
        assert!(resp.message.contains("You've already completed 2 tasks"));
    }

    #[tokio::test]
    async fn test_balanced_state_gets_encouragement() {
        let mock = Arc::new(MockCompletionProvider::new().with_response("Proud of you!"));
        let agent = PsychologicalAgent::new(AgentServices::new(mock.clone()));
        let ctx = AgentContext::new().with_message(ChatMessage::user("Feeling okay today"));

        let resp = agent.process(&ctx).await.unwrap();
        assert_eq!(resp.message, "Proud of you!");
        let AgentPayload::Psychological(out) = &resp.payload else {
            panic!("expected psychological payload");
        };
        assert!(out.intervention.is_none());
        assert!(!out.affirmations.is_empty());
        assert_eq!(out.progress_celebration, KEEP_MOVING);
        assert!(mock.requests()[0].user_prompt.contains("Stress: 5/10"));
    }

    #[tokio::test]
    async fn test_encouragement_fallback() {
        let mock = MockCompletionProvider::new().with_error(LlmError::NotConfigured);
        let agent = PsychologicalAgent::new(AgentServices::new(Arc::new(mock)));

        let resp = agent.process(&AgentContext::new()).await.unwrap();
        assert!(resp.success);
        assert_eq!(resp.message, ENCOURAGEMENT_FALLBACK);
    }
}
