//! Task management.

pub mod model;

use model::Task;
use std::cmp::Ordering;

pub use model::{AppDocument, Priority, Subtask, DEFAULT_BOARD, DEFAULT_BOARDS};

/// Board ordering: higher priority first, then earlier due date, with
/// undated tasks last.
pub fn board_order(a: &Task, b: &Task) -> Ordering {
    b.priority
        .cmp(&a.priority)
        .then_with(|| match (a.due_date, b.due_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}

/// Tasks on `board`, sorted with [`board_order`]. The sort is stable, so
/// ties keep their relative order from `tasks`.
pub fn tasks_on_board<'a>(tasks: &'a [Task], board: &str) -> Vec<&'a Task> {
    let mut filtered: Vec<&Task> = tasks.iter().filter(|t| t.board == board).collect();
    filtered.sort_by(|a, b| board_order(a, b));
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_priority_descending_then_due_ascending() {
        let now = Utc::now();
        let low = Task::new("low", "Work").with_priority(Priority::Low);
        let high_late = Task::new("high late", "Work")
            .with_priority(Priority::High)
            .with_due(now + Duration::days(2));
        let high_soon = Task::new("high soon", "Work")
            .with_priority(Priority::High)
            .with_due(now + Duration::hours(1));
        let high_undated = Task::new("high undated", "Work").with_priority(Priority::High);
        let other = Task::new("elsewhere", "Personal").with_priority(Priority::High);

        let tasks = vec![low, high_undated, other, high_late, high_soon];
        let titles: Vec<&str> = tasks_on_board(&tasks, "Work")
            .iter()
            .map(|t| t.title.as_str())
            .collect();

        assert_eq!(titles, vec!["high soon", "high late", "high undated", "low"]);
    }

    #[test]
    fn test_ties_keep_prior_order() {
        let tasks: Vec<Task> = ["a", "b", "c"]
            .iter()
            .map(|t| Task::new(t, "Ideas"))
            .collect();
        let titles: Vec<&str> = tasks_on_board(&tasks, "Ideas")
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_unknown_board_is_empty() {
        let tasks = vec![Task::new("a", "Work")];
        assert!(tasks_on_board(&tasks, "Nope").is_empty());
    }
}
