//! The task and board store.
//!
//! Owns the task list and the board list. Every mutation publishes a
//! [`StoreEvent`] and schedules a debounced save of the whole document.
//! Persistence failures are logged and never surface to callers.

pub mod debounce;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod persistence;

pub use debounce::DebouncedSaver;
#[cfg(any(test, feature = "test-util"))]
pub use memory::MemoryPersistence;
pub use persistence::Persistence;

use crate::config::Config;
use crate::error::{TaskGridError, TaskGridResult};
use crate::events::{create_event_channel, StoreEvent, StoreReceiver, StoreSender};
use crate::feedback::{Feedback, FeedbackSink, NoopFeedback};
use crate::focus::CompletionSink;
use crate::task::model::{AppDocument, Priority, Task, DEFAULT_BOARD, DEFAULT_BOARDS};
use crate::task::tasks_on_board;
use std::sync::Arc;
use std::time::Duration;
use taskgrid_storage::JsonDocument;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Which step of the startup fallback chain produced the store's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    /// A `{tasks, boards}` document.
    Current,
    /// A bare task list from an older version.
    Legacy,
    /// Nothing usable on disk; example tasks were created.
    Seeded,
}

pub struct TaskStore {
    tasks: Vec<Task>,
    boards: Vec<String>,
    origin: LoadOrigin,
    saver: DebouncedSaver,
    events: StoreSender,
    feedback: Arc<dyn FeedbackSink>,
}

impl TaskStore {
    /// Open the store backed by the configured data file.
    pub fn open(config: &Config) -> Self {
        let file = JsonDocument::new(config.data_file());
        info!(path = %file.path().display(), "Opening task store");
        Self::load(Arc::new(file), config.debounce())
    }

    /// Load state through the fallback chain. Never fails.
    pub fn load(persistence: Arc<dyn Persistence>, debounce: Duration) -> Self {
        let (tasks, boards, origin) = match persistence.load() {
            Ok(doc) => (doc.tasks, doc.boards, LoadOrigin::Current),
            Err(current_err) => match persistence.load_legacy() {
                Ok(tasks) => {
                    info!(tasks = tasks.len(), "Loaded legacy task list");
                    (tasks, default_boards(), LoadOrigin::Legacy)
                }
                Err(legacy_err) => {
                    if current_err.is_not_found() {
                        info!("No saved tasks, creating samples");
                    } else {
                        warn!(
                            error = %current_err,
                            legacy_error = %legacy_err,
                            "Saved tasks unreadable, creating samples"
                        );
                    }
                    (seed_tasks(), default_boards(), LoadOrigin::Seeded)
                }
            },
        };

        let mut store = Self {
            tasks,
            boards: Vec::new(),
            origin,
            saver: DebouncedSaver::new(persistence, debounce),
            events: create_event_channel(),
            feedback: Arc::new(NoopFeedback),
        };
        store.adopt_boards(boards);
        debug!(
            tasks = store.tasks.len(),
            boards = store.boards.len(),
            origin = ?store.origin,
            "Task store loaded"
        );
        store
    }

    pub fn with_feedback(mut self, feedback: Arc<dyn FeedbackSink>) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn origin(&self) -> LoadOrigin {
        self.origin
    }

    /// All tasks, most recently added first.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Board names in display order.
    pub fn boards(&self) -> &[String] {
        &self.boards
    }

    pub fn has_board(&self, name: &str) -> bool {
        self.boards.iter().any(|b| b == name)
    }

    /// Fail with `BoardNotFound` unless `name` is in the board list.
    pub fn require_board(&self, name: &str) -> TaskGridResult<()> {
        if self.has_board(name) {
            Ok(())
        } else {
            Err(TaskGridError::BoardNotFound(name.to_string()))
        }
    }

    pub fn get(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Look a task up by a (case-insensitive) prefix of its id.
    pub fn find(&self, prefix: &str) -> TaskGridResult<&Task> {
        let prefix = prefix.trim().to_lowercase();
        if prefix.is_empty() {
            return Err(TaskGridError::validation("task id must not be empty"));
        }
        let matches: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| t.id.to_string().starts_with(&prefix))
            .collect();
        match matches.len() {
            0 => Err(TaskGridError::TaskNotFound(prefix)),
            1 => Ok(matches[0]),
            n => Err(TaskGridError::AmbiguousTask { prefix, matches: n }),
        }
    }

    /// Tasks on `board`: high priority first, then soonest due, undated last.
    pub fn tasks_for(&self, board: &str) -> Vec<&Task> {
        tasks_on_board(&self.tasks, board)
    }

    pub fn snapshot(&self) -> AppDocument {
        AppDocument {
            tasks: self.tasks.clone(),
            boards: self.boards.clone(),
        }
    }

    pub fn subscribe(&self) -> StoreReceiver {
        self.events.subscribe()
    }

    /// Insert at the front. Creates the task's board if it is new; a blank
    /// board name files the task under the default board.
    pub fn add(&mut self, mut task: Task) {
        normalize_board(&mut task);
        let task_id = task.id;
        let board_created = self.ensure_board(&task.board);
        self.tasks.insert(0, task);

        debug!(task_id = %task_id, "Task added");
        if let Some(name) = board_created {
            self.publish(StoreEvent::BoardAdded { name });
        }
        self.changed(StoreEvent::TaskAdded { task_id });
    }

    /// Replace the task with the same id. Unknown ids are ignored.
    pub fn update(&mut self, mut task: Task) {
        normalize_board(&mut task);
        let Some(idx) = self.tasks.iter().position(|t| t.id == task.id) else {
            debug!(task_id = %task.id, "Update for unknown task ignored");
            return;
        };
        let task_id = task.id;
        let board_created = self.ensure_board(&task.board);
        self.tasks[idx] = task;

        if let Some(name) = board_created {
            self.publish(StoreEvent::BoardAdded { name });
        }
        self.changed(StoreEvent::TaskUpdated { task_id });
    }

    /// Delete the task with `id`. Unknown ids are ignored.
    pub fn remove(&mut self, id: Uuid) {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return;
        }
        self.feedback.notify(Feedback::Error);
        debug!(task_id = %id, "Task removed");
        self.changed(StoreEvent::TaskRemoved { task_id: id });
    }

    /// Flip a task's done flag. Returns the new value.
    pub fn toggle_done(&mut self, id: Uuid) -> Option<bool> {
        let mut task = self.get(id)?.clone();
        task.is_done = !task.is_done;
        let done = task.is_done;
        self.update(task);
        self.feedback.notify(if done {
            Feedback::Success
        } else {
            Feedback::Warning
        });
        Some(done)
    }

    /// Append a board. Blank or existing names are ignored.
    pub fn add_board(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.has_board(name) {
            return false;
        }
        self.boards.push(name.to_string());
        info!(board = %name, "Board created");
        self.changed(StoreEvent::BoardAdded {
            name: name.to_string(),
        });
        true
    }

    /// Delete a board and move its tasks to the first remaining board, or to
    /// the default board when none remain. Returns the board tasks moved to.
    pub fn remove_board(&mut self, name: &str) -> String {
        let before = self.boards.len();
        self.boards.retain(|b| b != name);
        let removed = self.boards.len() != before;

        if self.boards.is_empty() {
            self.boards.push(DEFAULT_BOARD.to_string());
        }
        let target = self.boards[0].clone();

        let mut moved = 0;
        for task in self.tasks.iter_mut().filter(|t| t.board == name) {
            task.board = target.clone();
            moved += 1;
        }

        if !removed && moved == 0 {
            return target;
        }

        info!(board = %name, reassigned_to = %target, moved, "Board removed");
        self.feedback.notify(Feedback::Success);
        self.changed(StoreEvent::BoardRemoved {
            name: name.to_string(),
            reassigned_to: target.clone(),
            moved,
        });
        target
    }

    /// Tasks with a due date, for reminder scheduling.
    pub fn due_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| t.due_date.is_some())
    }

    /// Number of open tasks per priority on `board`.
    pub fn open_counts(&self, board: &str) -> [(Priority, usize); 3] {
        Priority::ALL.map(|p| {
            let count = self
                .tasks
                .iter()
                .filter(|t| t.board == board && !t.is_done && t.priority == p)
                .count();
            (p, count)
        })
    }

    pub fn has_pending_save(&self) -> bool {
        self.saver.is_pending()
    }

    /// Write the current state now, dropping any pending debounced save.
    pub fn flush(&mut self) -> TaskGridResult<()> {
        let doc = self.snapshot();
        self.saver.flush(&doc)?;
        debug!("Task store flushed");
        Ok(())
    }

    fn changed(&mut self, event: StoreEvent) {
        let doc = self.snapshot();
        self.saver.schedule(doc);
        self.publish(event);
    }

    fn publish(&self, event: StoreEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    /// Add `name` to the board list if missing. Returns the name if added.
    fn ensure_board(&mut self, name: &str) -> Option<String> {
        if self.has_board(name) {
            return None;
        }
        self.boards.push(name.to_string());
        Some(name.to_string())
    }

    /// Install a loaded board list: drop duplicates, make sure every board a
    /// task points at exists, and never end up empty.
    fn adopt_boards(&mut self, boards: Vec<String>) {
        for board in boards {
            self.ensure_board(&board);
        }
        let referenced: Vec<String> = self.tasks.iter().map(|t| t.board.clone()).collect();
        for board in referenced {
            if self.ensure_board(&board).is_some() {
                warn!(board = %board, "Task referenced a missing board; board restored");
            }
        }
        if self.boards.is_empty() {
            self.boards.push(DEFAULT_BOARD.to_string());
        }
    }
}

impl CompletionSink for TaskStore {
    fn task_completed(&mut self, task: Task) {
        self.update(task);
    }
}

fn normalize_board(task: &mut Task) {
    let trimmed = task.board.trim();
    if trimmed.is_empty() {
        task.board = DEFAULT_BOARD.to_string();
    } else if trimmed.len() != task.board.len() {
        task.board = trimmed.to_string();
    }
}

fn default_boards() -> Vec<String> {
    DEFAULT_BOARDS.iter().map(|b| b.to_string()).collect()
}

/// Example tasks for a first run.
fn seed_tasks() -> Vec<Task> {
    vec![
        Task::new("Welcome to TaskGrid!", "Personal")
            .with_notes("Tap to expand, try Focus Mode, and add subtasks.")
            .with_priority(Priority::High)
            .with_emoji("🔥")
            .with_subtasks(["Tap card", "Try Focus Mode"]),
        Task::new("Plan portfolio site", "Work")
            .with_notes("Sketch Neo-Brutal design")
            .with_priority(Priority::Medium)
            .with_emoji("💻"),
    ]
}
