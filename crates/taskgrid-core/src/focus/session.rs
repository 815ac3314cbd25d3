//! Async driver for a focus timer.
//!
//! A running session owns a one-second `Interval`. Pausing, resetting,
//! finishing or dropping the session drops the interval, so no tick can
//! arrive after the session is torn down.

use super::timer::{CompletionSink, FocusCompletion, FocusTimer};
use crate::feedback::{Feedback, FeedbackSink, NoopFeedback};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

/// Tick period of a running session.
pub const TICK: Duration = Duration::from_secs(1);

pub struct FocusSession {
    timer: FocusTimer,
    ticker: Option<Interval>,
    feedback: Arc<dyn FeedbackSink>,
}

impl FocusSession {
    pub fn new(timer: FocusTimer) -> Self {
        Self {
            timer,
            ticker: None,
            feedback: Arc::new(NoopFeedback),
        }
    }

    pub fn with_feedback(mut self, feedback: Arc<dyn FeedbackSink>) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn timer(&self) -> &FocusTimer {
        &self.timer
    }

    pub fn start(&mut self) -> bool {
        if !self.timer.start() {
            return false;
        }
        let mut ticker = tokio::time::interval_at(Instant::now() + TICK, TICK);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.ticker = Some(ticker);
        self.feedback.notify(Feedback::Selection);
        debug!(task_id = %self.timer.task().id, "Focus session started");
        true
    }

    pub fn pause(&mut self) -> bool {
        if !self.timer.pause() {
            return false;
        }
        self.ticker = None;
        self.feedback.notify(Feedback::Selection);
        debug!(task_id = %self.timer.task().id, "Focus session paused");
        true
    }

    pub fn toggle(&mut self) {
        if self.timer.is_running() {
            self.pause();
        } else {
            self.start();
        }
    }

    pub fn reset(&mut self) {
        self.ticker = None;
        self.timer.reset();
        self.feedback.notify(Feedback::Selection);
    }

    pub fn set_duration(&mut self, minutes: u32) -> bool {
        let changed = self.timer.set_duration(minutes);
        if changed {
            self.feedback.notify(Feedback::Selection);
        }
        changed
    }

    /// Stop ticking without finishing. Used when the front-end goes away.
    pub fn cancel(&mut self) {
        self.ticker = None;
        self.timer.pause();
    }

    pub fn mark_done<S>(&mut self, sink: &mut S) -> Option<FocusCompletion>
    where
        S: CompletionSink + ?Sized,
    {
        self.ticker = None;
        let completion = self.timer.mark_done(sink);
        if completion.is_some() {
            self.finished();
        }
        completion
    }

    /// Wait for the next second and apply it.
    ///
    /// Never resolves while the session is not running, which makes it safe
    /// to poll from `tokio::select!` alongside other input.
    pub async fn next_tick<S>(&mut self, sink: &mut S) -> Option<FocusCompletion>
    where
        S: CompletionSink + ?Sized,
    {
        let Some(ticker) = self.ticker.as_mut() else {
            return std::future::pending().await;
        };
        ticker.tick().await;

        let completion = self.timer.tick(sink);
        if completion.is_some() {
            self.ticker = None;
            self.finished();
        }
        completion
    }

    /// Start (or resume) and tick until the session finishes.
    pub async fn run<S>(&mut self, sink: &mut S) -> Option<FocusCompletion>
    where
        S: CompletionSink + ?Sized,
    {
        if !self.timer.is_running() && !self.start() {
            return None;
        }
        loop {
            if let Some(completion) = self.next_tick(sink).await {
                return Some(completion);
            }
        }
    }

    fn finished(&self) {
        self.feedback.notify(Feedback::Success);
        info!(
            task_id = %self.timer.task().id,
            title = %self.timer.task().title,
            "Focus session finished"
        );
    }
}
