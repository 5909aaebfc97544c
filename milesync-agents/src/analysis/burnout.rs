//! Burnout risk and overall sustainability.

use super::contains_any;
use milesync_core::{BurnoutRisk, ChatMessage, TaskRecord};

const NEUTRAL: i32 = 50;
const WINDOW: usize = 7;
const STRESS_LOOKBACK: usize = 5;
/// A recent completion rate this far below the prior one counts as a decline.
const DECLINE_MARGIN: f64 = 0.15;

pub const STRESS_WORDS: &[&str] = &["stressed", "overwhelmed", "tired", "exhausted", "can't", "failing"];

/// Burnout band and its 0-100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BurnoutAssessment {
    pub risk: BurnoutRisk,
    pub score: u8,
}

fn completion_rate(records: &[TaskRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let done = records.iter().filter(|t| t.is_completed()).count();
    done as f64 / records.len() as f64
}

/// Score burnout from the completion trend and recent stress language.
///
/// The recent window is the last seven records and the prior window the
/// seven before it. The trend counts only when both windows are full;
/// shorter histories are flat.
pub fn assess_burnout(history: &[TaskRecord], messages: &[ChatMessage]) -> BurnoutAssessment {
    let mut score = NEUTRAL;

    if history.len() >= 2 * WINDOW {
        let split = history.len() - WINDOW;
        let recent_rate = completion_rate(&history[split..]);
        let prior_rate = completion_rate(&history[split - WINDOW..split]);

        if recent_rate < prior_rate - DECLINE_MARGIN {
            score += 20;
        } else if recent_rate > prior_rate {
            score -= 10;
        }
    }

    let start = messages.len().saturating_sub(STRESS_LOOKBACK);
    if messages[start..]
        .iter()
        .any(|m| contains_any(&m.content.to_lowercase(), STRESS_WORDS))
    {
        score += 15;
    }

    let score = score.clamp(0, 100);
    BurnoutAssessment {
        risk: BurnoutRisk::from_score(score),
        score: score as u8,
    }
}

/// Weighted blend: 60% habit strength, 40% burnout headroom.
pub fn sustainability_score(habit_score: u8, burnout_score: u8) -> u8 {
    let habit = u32::from(habit_score.min(100));
    let headroom = 100 - u32::from(burnout_score.min(100));
    ((6 * habit + 4 * headroom) / 10) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use milesync_core::TaskStatus;

    fn records(statuses: &[bool]) -> Vec<TaskRecord> {
        statuses
            .iter()
            .map(|done| {
                let status = if *done { TaskStatus::Completed } else { TaskStatus::Pending };
                TaskRecord::new("t", status)
            })
            .collect()
    }

    #[test]
    fn test_empty_inputs_are_neutral() {
        let a = assess_burnout(&[], &[]);
        assert_eq!(a.score, 50);
        assert_eq!(a.risk, BurnoutRisk::Medium);
    }

    #[test]
    fn test_short_history_has_flat_trend() {
        let a = assess_burnout(&records(&[true, false, true]), &[]);
        assert_eq!(a.score, 50);
    }

    #[test]
    fn test_declining_rate_and_stress_is_high() {
        let mut statuses = vec![true; 7];
        statuses.extend([false; 7]);
        let messages = vec![ChatMessage::user("I'm so exhausted lately")];
        let a = assess_burnout(&records(&statuses), &messages);
        assert_eq!(a.score, 85);
        assert_eq!(a.risk, BurnoutRisk::High);
    }

    #[test]
    fn test_improving_rate_lowers_score() {
        let mut statuses = vec![false; 7];
        statuses.extend([true; 7]);
        let a = assess_burnout(&records(&statuses), &[]);
        assert_eq!(a.score, 40);
        assert_eq!(a.risk, BurnoutRisk::Medium);
    }

    #[test]
    fn test_partial_prior_window_is_flat() {
        let mut statuses = vec![true];
        statuses.extend([false; 7]);
        let a = assess_burnout(&records(&statuses), &[]);
        assert_eq!(a.score, 50);
        assert_eq!(a.risk, BurnoutRisk::Medium);

        let mut thirteen = vec![true; 6];
        thirteen.extend([false; 7]);
        assert_eq!(assess_burnout(&records(&thirteen), &[]).score, 50);
    }

    #[test]
    fn test_stress_counted_once_and_only_recent() {
        let many = vec![
            ChatMessage::user("stressed"),
            ChatMessage::user("overwhelmed"),
            ChatMessage::user("tired"),
        ];
        assert_eq!(assess_burnout(&[], &many).score, 65);

        let mut old = vec![ChatMessage::user("failing at everything")];
        old.extend((0..5).map(|_| ChatMessage::user("fine")));
        assert_eq!(assess_burnout(&[], &old).score, 50);
    }

    #[test]
    fn test_sustainability_score() {
        assert_eq!(sustainability_score(100, 0), 100);
        assert_eq!(sustainability_score(0, 100), 0);
        // 0.6 * 10 + 0.4 * 15 = 12
        assert_eq!(sustainability_score(10, 85), 12);
        // 0.6 * 7 + 0.4 * 50 = 24.2
        assert_eq!(sustainability_score(7, 50), 24);
    }
}
