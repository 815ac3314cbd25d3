//! Due-date reminders.
//!
//! The core only decides *what* to schedule and *when*. Delivery belongs to
//! whatever implements [`ReminderScheduler`] on the host platform.

use crate::task::model::Task;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// A reminder to deliver at `fire_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    /// Schedule key; the task id, so rescheduling replaces the old entry.
    pub key: Uuid,
    pub title: String,
    pub body: String,
    pub fire_at: DateTime<Utc>,
}

/// Platform hook that delivers reminders.
pub trait ReminderScheduler {
    fn schedule(&mut self, reminder: Reminder);
    fn cancel(&mut self, key: Uuid);
}

/// Plan a reminder `lead_minutes` before the task is due.
///
/// Returns `None` when the task has no due date or the reminder time has
/// already passed.
pub fn plan_reminder(task: &Task, lead_minutes: u32, now: DateTime<Utc>) -> Option<Reminder> {
    let due = task.due_date?;
    let fire_at = due - Duration::minutes(i64::from(lead_minutes));
    if fire_at < now {
        debug!(task_id = %task.id, %fire_at, "Reminder time already passed, skipping");
        return None;
    }
    Some(Reminder {
        key: task.id,
        title: format!("{} {}", task.emoji, task.title),
        body: format!("Due soon ({} min left)!", lead_minutes),
        fire_at,
    })
}

/// Cancel any reminder for `task` and schedule a fresh one if it applies.
pub fn reschedule<S>(scheduler: &mut S, task: &Task, lead_minutes: u32, now: DateTime<Utc>) -> bool
where
    S: ReminderScheduler + ?Sized,
{
    scheduler.cancel(task.id);
    match plan_reminder(task, lead_minutes, now) {
        Some(reminder) => {
            scheduler.schedule(reminder);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[derive(Default)]
    struct Planned {
        scheduled: Vec<Reminder>,
        cancelled: Vec<Uuid>,
    }

    impl ReminderScheduler for Planned {
        fn schedule(&mut self, reminder: Reminder) {
            self.scheduled.push(reminder);
        }

        fn cancel(&mut self, key: Uuid) {
            self.cancelled.push(key);
            self.scheduled.retain(|r| r.key != key);
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 9, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_plans_lead_time_before_due() {
        let due = Utc.with_ymd_and_hms(2025, 11, 9, 12, 0, 0).unwrap();
        let task = Task::new("Dentist", "Personal").with_due(due).with_emoji("🦷");

        let reminder = plan_reminder(&task, 10, now()).unwrap();
        assert_eq!(reminder.key, task.id);
        assert_eq!(reminder.fire_at, Utc.with_ymd_and_hms(2025, 11, 9, 11, 50, 0).unwrap());
        assert_eq!(reminder.title, "🦷 Dentist");
        assert_eq!(reminder.body, "Due soon (10 min left)!");
    }

    #[test]
    fn test_skips_undated_and_past() {
        let undated = Task::new("Someday", "Ideas");
        assert!(plan_reminder(&undated, 10, now()).is_none());

        let soon = Task::new("Soon", "Work").with_due(now() + Duration::minutes(5));
        assert!(plan_reminder(&soon, 10, now()).is_none());
        assert!(plan_reminder(&soon, 5, now()).is_some());
    }

    #[test]
    fn test_reschedule_replaces_previous() {
        let mut planned = Planned::default();
        let mut task = Task::new("Call", "Work").with_due(now() + Duration::hours(2));

        assert!(reschedule(&mut planned, &task, 10, now()));
        task.due_date = Some(now() + Duration::hours(3));
        assert!(reschedule(&mut planned, &task, 10, now()));

        assert_eq!(planned.scheduled.len(), 1);
        assert_eq!(planned.cancelled, vec![task.id, task.id]);
        assert_eq!(planned.scheduled[0].fire_at, now() + Duration::minutes(170));

        task.due_date = None;
        assert!(!reschedule(&mut planned, &task, 10, now()));
        assert!(planned.scheduled.is_empty());
    }
}
