//! User feedback sink (haptics, sounds).
//!
//! The core calls out when something noteworthy happens and never waits on
//! or inspects the outcome.

use tracing::debug;

/// Kinds of feedback a front-end may render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Selection,
    Success,
    Warning,
    Error,
}

/// Receives feedback notifications.
pub trait FeedbackSink: Send + Sync {
    fn notify(&self, feedback: Feedback);
}

/// Discards all feedback.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopFeedback;

impl FeedbackSink for NoopFeedback {
    fn notify(&self, _feedback: Feedback) {}
}

/// Logs feedback at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingFeedback;

impl FeedbackSink for TracingFeedback {
    fn notify(&self, feedback: Feedback) {
        debug!(?feedback, "Feedback");
    }
}
