//! Focus mode: a countdown bound to one task.

pub mod session;
pub mod timer;

pub use session::FocusSession;
pub use timer::{
    CompletionCause, CompletionSink, FocusCompletion, FocusTimer, TimerState, DEFAULT_MINUTES,
    MAX_MINUTES, MIN_MINUTES,
};
