//! Performance pattern detection over completion times.

use chrono::Timelike;
use milesync_core::{PatternInsights, TaskRecord, TaskStatus};

const MAX_BEST_DAYS: usize = 3;
const MAX_BEST_TIMES: usize = 2;
const MAX_FAILURE_PATTERNS: usize = 3;
/// Fewer active weekdays than this reads as an inconsistent routine.
const MIN_ACTIVE_WEEKDAYS: usize = 3;

pub const SKIPPED: &str = "Task skipped";
pub const INCONSISTENT_ROUTINE: &str = "Inconsistent daily routine";

/// Time-of-day bucket for an hour in 0-23.
pub fn time_bucket(hour: u32) -> &'static str {
    if hour < 12 {
        "Morning"
    } else if hour < 17 {
        "Afternoon"
    } else {
        "Evening"
    }
}

/// Counter that keeps first-appearance order for tie-breaking.
#[derive(Default)]
struct Tally(Vec<(String, usize)>);

impl Tally {
    fn add(&mut self, key: String) {
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, n)) => *n += 1,
            None => self.0.push((key, 1)),
        }
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    /// Keys by descending count; the sort is stable so ties keep insertion order.
    fn top(mut self, n: usize) -> Vec<String> {
        self.0.sort_by(|a, b| b.1.cmp(&a.1));
        self.0.into_iter().take(n).map(|(k, _)| k).collect()
    }
}

/// Best weekdays and times of day, plus failure signals.
pub fn detect_patterns(history: &[TaskRecord]) -> PatternInsights {
    if history.is_empty() {
        return PatternInsights::default();
    }

    let mut days = Tally::default();
    let mut times = Tally::default();
    let mut failure_patterns: Vec<String> = Vec::new();

    for task in history {
        if task.status == TaskStatus::Skipped && !failure_patterns.iter().any(|p| p == SKIPPED) {
            failure_patterns.push(SKIPPED.to_string());
        }
        if !task.is_completed() {
            continue;
        }
        if let Some(at) = task.completed_local() {
            days.add(at.format("%A").to_string());
            times.add(time_bucket(at.hour()).to_string());
        }
    }

    if days.len() < MIN_ACTIVE_WEEKDAYS {
        failure_patterns.push(INCONSISTENT_ROUTINE.to_string());
    }
    failure_patterns.truncate(MAX_FAILURE_PATTERNS);

    PatternInsights {
        best_days: days.top(MAX_BEST_DAYS),
        best_times: times.top(MAX_BEST_TIMES),
        failure_patterns,
    }
}
