//! Focus countdown state machine.
//!
//! The timer itself never sleeps: something else calls [`FocusTimer::tick`]
//! once per elapsed second while it is running (see `FocusSession`).

use crate::task::model::Task;

/// Shortest allowed session, in minutes.
pub const MIN_MINUTES: u32 = 5;
/// Longest allowed session, in minutes.
pub const MAX_MINUTES: u32 = 60;
/// Session length when none is chosen.
pub const DEFAULT_MINUTES: u32 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Finished,
}

impl TimerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Finished => "finished",
        }
    }
}

/// How a session reached `Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionCause {
    Elapsed,
    MarkedDone,
}

/// Emitted once when a session finishes.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusCompletion {
    /// The focused task, already marked done.
    pub task: Task,
    pub cause: CompletionCause,
}

/// Receives the completed task when a session finishes.
pub trait CompletionSink {
    fn task_completed(&mut self, task: Task);
}

/// Countdown for one task.
#[derive(Debug, Clone)]
pub struct FocusTimer {
    task: Task,
    duration_secs: u32,
    remaining_secs: u32,
    state: TimerState,
}

impl FocusTimer {
    pub fn new(task: Task) -> Self {
        Self::with_minutes(task, DEFAULT_MINUTES)
    }

    /// Create an idle timer; `minutes` is clamped to the allowed range.
    pub fn with_minutes(task: Task, minutes: u32) -> Self {
        let duration_secs = clamp_minutes(minutes) * 60;
        Self {
            task,
            duration_secs,
            remaining_secs: duration_secs,
            state: TimerState::Idle,
        }
    }

    pub fn task(&self) -> &Task {
        &self.task
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_secs / 60
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// Change the session length and rewind. Ignored while running.
    pub fn set_duration(&mut self, minutes: u32) -> bool {
        if self.is_running() {
            return false;
        }
        self.duration_secs = clamp_minutes(minutes) * 60;
        self.remaining_secs = self.duration_secs;
        self.state = TimerState::Idle;
        true
    }

    /// `Idle | Paused -> Running`.
    pub fn start(&mut self) -> bool {
        match self.state {
            TimerState::Idle | TimerState::Paused => {
                self.state = TimerState::Running;
                true
            }
            TimerState::Running | TimerState::Finished => false,
        }
    }

    /// `Running -> Paused`.
    pub fn pause(&mut self) -> bool {
        if self.is_running() {
            self.state = TimerState::Paused;
            true
        } else {
            false
        }
    }

    pub fn toggle(&mut self) -> TimerState {
        if self.is_running() {
            self.pause();
        } else {
            self.start();
        }
        self.state
    }

    /// Back to `Idle` with the full duration remaining.
    pub fn reset(&mut self) {
        self.remaining_secs = self.duration_secs;
        self.state = TimerState::Idle;
    }

    /// One elapsed second. Finishes the session when time runs out.
    pub fn tick<S>(&mut self, sink: &mut S) -> Option<FocusCompletion>
    where
        S: CompletionSink + ?Sized,
    {
        if !self.is_running() {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            Some(self.complete(CompletionCause::Elapsed, sink))
        } else {
            None
        }
    }

    /// Finish now, whatever time is left. No-op if already finished.
    pub fn mark_done<S>(&mut self, sink: &mut S) -> Option<FocusCompletion>
    where
        S: CompletionSink + ?Sized,
    {
        if self.state == TimerState::Finished {
            return None;
        }
        Some(self.complete(CompletionCause::MarkedDone, sink))
    }

    /// Elapsed fraction in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.duration_secs == 0 {
            return 0.0;
        }
        let elapsed = self.duration_secs - self.remaining_secs.min(self.duration_secs);
        elapsed as f64 / self.duration_secs as f64
    }

    /// Remaining time as `MM:SS`.
    pub fn remaining_label(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.remaining_secs / 60,
            self.remaining_secs % 60
        )
    }

    fn complete<S>(&mut self, cause: CompletionCause, sink: &mut S) -> FocusCompletion
    where
        S: CompletionSink + ?Sized,
    {
        self.state = TimerState::Finished;
        if cause == CompletionCause::MarkedDone {
            self.remaining_secs = 0;
        }
        self.task.is_done = true;
        sink.task_completed(self.task.clone());
        FocusCompletion {
            task: self.task.clone(),
            cause,
        }
    }
}

fn clamp_minutes(minutes: u32) -> u32 {
    minutes.clamp(MIN_MINUTES, MAX_MINUTES)
}
