//! Lexicon-based emotional assessment.

use super::{contains_any, count_matches};
use milesync_core::{clamp_score, EmotionalAssessment};

const BASELINE: i64 = 5;
const MAX_PATTERNS: usize = 3;

pub const LOW_MOTIVATION: &[&str] = &["can't", "won't", "tired", "exhausted", "giving up", "quit"];
pub const HIGH_MOTIVATION: &[&str] = &["excited", "eager", "ready", "motivated", "pumped"];
pub const STRESS: &[&str] = &["stressed", "anxious", "overwhelmed", "panic", "worried"];
pub const LOW_CONFIDENCE: &[&str] = &["stupid", "can't do", "not good enough", "failure", "imposter"];
pub const HIGH_CONFIDENCE: &[&str] = &["confident", "capable", "proud", "achieved", "succeeded"];

/// Cognitive distortions: label and the substrings that flag it.
const DISTORTIONS: &[(&str, &[&str])] = &[
    ("All-or-nothing thinking", &["always", "never"]),
    ("Should statements", &["should", "must"]),
    ("Catastrophizing", &["worst", "terrible"]),
    ("Personalization", &["my fault", "blame myself"]),
];

/// Score the user's state from `user_text` (already lowercased and joined).
///
/// Each distinct keyword moves its score by one; scores are clamped to
/// 1-10 and at most three distortion labels are kept.
pub fn assess_emotions(user_text: &str) -> EmotionalAssessment {
    let text = user_text.to_lowercase();

    let motivation = BASELINE - count_matches(&text, LOW_MOTIVATION) + count_matches(&text, HIGH_MOTIVATION);
    let stress = BASELINE + count_matches(&text, STRESS);
    let confidence = BASELINE - count_matches(&text, LOW_CONFIDENCE) + count_matches(&text, HIGH_CONFIDENCE);

    let detected_patterns = DISTORTIONS
        .iter()
        .filter(|(_, triggers)| contains_any(&text, triggers))
        .map(|(label, _)| label.to_string())
        .take(MAX_PATTERNS)
        .collect();

    EmotionalAssessment {
        motivation_level: clamp_score(motivation, 1, 10),
        stress_level: clamp_score(stress, 1, 10),
        confidence_level: clamp_score(confidence, 1, 10),
        detected_patterns,
    }
}

/// Low motivation, high stress, low confidence or any distortion.
pub fn needs_intervention(assessment: &EmotionalAssessment) -> bool {
    assessment.motivation_level < 4
        || assessment.stress_level > 7
        || assessment.confidence_level < 4
        || !assessment.detected_patterns.is_empty()
}
