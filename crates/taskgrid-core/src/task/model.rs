//! Task domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Board that tasks fall back to when nothing else exists.
pub const DEFAULT_BOARD: &str = "Personal";

/// Board list of a fresh install.
pub const DEFAULT_BOARDS: &[&str] = &["Personal", "Work", "Ideas"];

/// Emoji given to tasks created without one.
pub const DEFAULT_EMOJI: &str = "📝";

/// Title used when a task is created with a blank title.
pub const UNTITLED: &str = "Untitled";

/// A checklist line item owned by a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub id: Uuid,
    pub title: String,
    pub is_done: bool,
}

impl Subtask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            is_done: false,
        }
    }
}

/// Task priority levels.
///
/// Ordering is `Low < Medium < High`; board views sort descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!(
                "invalid priority '{}' (expected low, medium or high)",
                other
            )),
        }
    }
}

/// A task on a board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Board name. Must appear in the store's board list.
    pub board: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub is_done: bool,
    pub priority: Priority,
    pub emoji: String,
    pub created_at: DateTime<Utc>,
    pub subtasks: Vec<Subtask>,
}

impl Task {
    /// Create a task with default attributes. A blank title becomes "Untitled"
    /// and a blank board becomes the default board.
    pub fn new(title: &str, board: &str) -> Self {
        let title = title.trim();
        let board = board.trim();
        Self {
            id: Uuid::new_v4(),
            title: if title.is_empty() {
                UNTITLED.to_string()
            } else {
                title.to_string()
            },
            notes: None,
            board: if board.is_empty() {
                DEFAULT_BOARD.to_string()
            } else {
                board.to_string()
            },
            due_date: None,
            is_done: false,
            priority: Priority::default(),
            emoji: DEFAULT_EMOJI.to_string(),
            created_at: Utc::now(),
            subtasks: Vec::new(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_due(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = emoji.into();
        self
    }

    pub fn with_subtasks<I, S>(mut self, titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for title in titles {
            self.add_subtask(title.as_ref());
        }
        self
    }

    /// Fraction of subtasks done. Without subtasks this is 1.0 or 0.0
    /// depending on the task itself.
    pub fn completed_subtask_ratio(&self) -> f64 {
        if self.subtasks.is_empty() {
            return if self.is_done { 1.0 } else { 0.0 };
        }
        let done = self.subtasks.iter().filter(|s| s.is_done).count();
        done as f64 / self.subtasks.len() as f64
    }

    /// Append a subtask. Blank titles are ignored.
    pub fn add_subtask(&mut self, title: &str) -> Option<Uuid> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        let subtask = Subtask::new(title);
        let id = subtask.id;
        self.subtasks.push(subtask);
        Some(id)
    }

    /// Flip a subtask's done flag. Returns false if no such subtask.
    pub fn toggle_subtask(&mut self, id: Uuid) -> bool {
        match self.subtasks.iter_mut().find(|s| s.id == id) {
            Some(subtask) => {
                subtask.is_done = !subtask.is_done;
                true
            }
            None => false,
        }
    }

    pub fn remove_subtask(&mut self, id: Uuid) -> bool {
        let before = self.subtasks.len();
        self.subtasks.retain(|s| s.id != id);
        self.subtasks.len() != before
    }
}

/// Root of the persisted file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppDocument {
    pub tasks: Vec<Task>,
    pub boards: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_blank_title_becomes_untitled() {
        let task = Task::new("   ", "Work");
        assert_eq!(task.title, "Untitled");
        assert_eq!(task.board, "Work");
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.emoji, "📝");
        assert!(!task.is_done);
    }

    #[test]
    fn test_blank_board_becomes_default() {
        assert_eq!(Task::new("A", "  ").board, DEFAULT_BOARD);
        assert_eq!(Task::new("A", " Work ").board, "Work");
    }

    #[test]
    fn test_ratio_without_subtasks_follows_done_flag() {
        let mut task = Task::new("A", "Personal");
        assert_eq!(task.completed_subtask_ratio(), 0.0);
        task.is_done = true;
        assert_eq!(task.completed_subtask_ratio(), 1.0);
    }

    #[test]
    fn test_ratio_with_subtasks() {
        let mut task = Task::new("A", "Personal").with_subtasks(["one", "two", "three", "four"]);
        let first = task.subtasks[0].id;
        task.toggle_subtask(first);
        task.is_done = true;
        assert_eq!(task.completed_subtask_ratio(), 0.25);
    }

    #[test]
    fn test_subtask_add_trims_and_skips_blank() {
        let mut task = Task::new("A", "Personal");
        assert!(task.add_subtask("  ").is_none());
        let id = task.add_subtask("  Buy milk ").unwrap();
        assert_eq!(task.subtasks.len(), 1);
        assert_eq!(task.subtasks[0].title, "Buy milk");

        assert!(task.remove_subtask(id));
        assert!(!task.remove_subtask(id));
        assert!(!task.toggle_subtask(id));
    }

    #[test]
    fn test_priority_order_and_parse() {
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert!("urgent".parse::<Priority>().is_err());
        assert_eq!(Priority::Low.to_string(), "low");
    }

    #[test]
    fn test_json_field_names() {
        let due = Utc.with_ymd_and_hms(2025, 11, 9, 10, 0, 0).unwrap();
        let task = Task::new("A", "Work")
            .with_due(due)
            .with_priority(Priority::High)
            .with_subtasks(["step"]);
        let value = serde_json::to_value(&task).unwrap();

        assert_eq!(value["dueDate"], "2025-11-09T10:00:00Z");
        assert_eq!(value["isDone"], false);
        assert_eq!(value["priority"], "high");
        assert!(value.get("notes").is_none());
        assert!(value.get("createdAt").is_some());
        assert_eq!(value["subtasks"][0]["isDone"], false);
    }

    #[test]
    fn test_decodes_uppercase_ids_and_absent_optionals() {
        let json = r#"{
            "id": "6F9619FF-8B86-D011-B42D-00C04FC964FF",
            "title": "Legacy",
            "board": "Personal",
            "isDone": true,
            "priority": "low",
            "emoji": "🔥",
            "createdAt": "2025-11-09T10:00:00Z",
            "subtasks": []
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.title, "Legacy");
        assert!(task.notes.is_none());
        assert!(task.due_date.is_none());
        assert!(task.is_done);
    }
}
