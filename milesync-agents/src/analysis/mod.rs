//! Heuristic analyzers.
//!
//! Pure functions over the caller-supplied history and conversation. Keyword
//! checks are plain substring scans over lowercased text, so "by" also
//! matches inside "baby" and "should" inside "shoulder".

pub mod burnout;
pub mod emotion;
pub mod habits;
pub mod patterns;
pub mod readiness;
pub mod streak;

pub use burnout::{assess_burnout, sustainability_score, BurnoutAssessment};
pub use emotion::{assess_emotions, needs_intervention};
pub use habits::analyze_habits;
pub use patterns::detect_patterns;
pub use readiness::should_generate_assessment;
pub use streak::current_streak;

/// True if any keyword occurs in `text`.
pub(crate) fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// Number of distinct keywords occurring in `text`.
pub(crate) fn count_matches(text: &str, keywords: &[&str]) -> i64 {
    keywords.iter().filter(|k| text.contains(*k)).count() as i64
}
