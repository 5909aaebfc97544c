//! Completion streaks.

use chrono::NaiveDate;
use milesync_core::TaskRecord;
use std::collections::BTreeSet;

/// Distinct local calendar dates on which a task was completed. Records without a
/// parseable `completed_at` are skipped.
pub fn completion_dates(history: &[TaskRecord]) -> BTreeSet<NaiveDate> {
    history.iter().filter_map(TaskRecord::completed_on).collect()
}

/// Consecutive days, ending `today`, with at least one completion.
pub fn current_streak(history: &[TaskRecord], today: NaiveDate) -> u32 {
    let dates = completion_dates(history);
    let mut streak = 0;
    let mut day = today;
    while dates.contains(&day) {
        streak += 1;
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }
    streak
}
