//! Habit loop detection.

use milesync_core::{HabitAnalysis, HabitLoop, TaskRecord};

/// Completions a title needs before it counts as a habit.
pub const MIN_COMPLETIONS: usize = 7;
/// Days of consistency that earn a full habit score.
pub const FULL_SCORE_DAYS: u32 = 90;
const MAX_LOOPS: usize = 3;

/// Group records by title and turn recurring, well-practised tasks into
/// habit loops.
pub fn analyze_habits(history: &[TaskRecord]) -> HabitAnalysis {
    // Titles in first-appearance order with their completion counts
    let mut titles: Vec<(&str, usize)> = Vec::new();
    for task in history {
        let title = task.title.trim();
        if title.is_empty() {
            continue;
        }
        let completed = usize::from(task.is_completed());
        match titles.iter_mut().find(|(t, _)| *t == title) {
            Some((_, count)) => *count += completed,
            None => titles.push((title, completed)),
        }
    }

    let habits: Vec<(&str, usize)> = titles
        .into_iter()
        .filter(|(_, count)| *count >= MIN_COMPLETIONS)
        .collect();

    let days_consistent = habits.iter().map(|(_, c)| *c as u32).max().unwrap_or(0);
    let habit_score = ((100.0 * days_consistent as f64) / FULL_SCORE_DAYS as f64)
        .round()
        .min(100.0) as u8;

    let habit_loops = habits
        .iter()
        .take(MAX_LOOPS)
        .map(|(title, _)| HabitLoop {
            cue: format!("Scheduled time for {}", title),
            routine: title.to_string(),
            reward: "Mark complete and see streak grow".to_string(),
        })
        .collect();

    HabitAnalysis {
        habit_score,
        days_consistent,
        habit_loops,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use milesync_core::TaskStatus;

    fn repeat(title: &str, status: TaskStatus, n: usize) -> Vec<TaskRecord> {
        (0..n).map(|_| TaskRecord::new(title, status)).collect()
    }

    #[test]
    fn test_empty_history() {
        assert_eq!(analyze_habits(&[]), HabitAnalysis::default());
    }

    #[test]
    fn test_six_completions_is_not_a_habit() {
        let history = repeat("Run", TaskStatus::Completed, 6);
        let analysis = analyze_habits(&history);
        assert!(analysis.habit_loops.is_empty());
        assert_eq!(analysis.habit_score, 0);
    }

    #[test]
    fn test_habit_loop_and_score() {
        let mut history = repeat("Run", TaskStatus::Completed, 9);
        history.extend(repeat("Run", TaskStatus::Skipped, 4));
        let analysis = analyze_habits(&history);

        assert_eq!(analysis.days_consistent, 9);
        assert_eq!(analysis.habit_score, 10);
        assert_eq!(analysis.habit_loops.len(), 1);
        assert_eq!(analysis.habit_loops[0].cue, "Scheduled time for Run");
        assert_eq!(analysis.habit_loops[0].routine, "Run");
    }

    #[test]
    fn test_score_rounds_and_caps() {
        // 100 * 8 / 90 = 8.9
        let analysis = analyze_habits(&repeat("Read", TaskStatus::Completed, 8));
        assert_eq!(analysis.habit_score, 9);

        let analysis = analyze_habits(&repeat("Read", TaskStatus::Completed, 120));
        assert_eq!(analysis.habit_score, 100);
        assert_eq!(analysis.days_consistent, 120);
    }

    #[test]
    fn test_loops_capped_in_first_appearance_order() {
        let mut history = Vec::new();
        for title in ["A", "B", "C", "D"] {
            history.extend(repeat(title, TaskStatus::Completed, 7));
        }
        history.extend(repeat("  ", TaskStatus::Completed, 20));
        let analysis = analyze_habits(&history);

        let routines: Vec<&str> = analysis.habit_loops.iter().map(|l| l.routine.as_str()).collect();
        assert_eq!(routines, vec!["A", "B", "C"]);
        assert_eq!(analysis.days_consistent, 7);
    }
}
