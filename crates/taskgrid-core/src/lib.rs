//! TaskGrid Core Library
//!
//! Domain models and logic for the TaskGrid task board: the task/board store
//! with debounced persistence, and the focus countdown timer.

pub mod config;
pub mod error;
pub mod events;
pub mod feedback;
pub mod focus;
pub mod reminder;
pub mod store;
pub mod task;

pub use config::Config;
pub use error::{TaskGridError, TaskGridResult};
pub use events::{StoreEvent, StoreReceiver};
pub use focus::{FocusSession, FocusTimer, TimerState};
pub use store::TaskStore;
pub use task::model::{AppDocument, Priority, Subtask, Task};
