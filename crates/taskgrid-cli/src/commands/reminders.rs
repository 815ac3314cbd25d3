//! Reminder preview command.

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use colored::Colorize;
use taskgrid_core::reminder::{reschedule, Reminder, ReminderScheduler};
use taskgrid_core::{Config, TaskStore};
use uuid::Uuid;

#[derive(Args)]
pub struct RemindersArgs {
    /// Minutes before the due date (defaults to the configured lead time)
    #[arg(long)]
    pub lead: Option<u32>,
}

/// Collects reminders instead of handing them to an OS scheduler.
#[derive(Default)]
struct Preview {
    planned: Vec<Reminder>,
}

impl ReminderScheduler for Preview {
    fn schedule(&mut self, reminder: Reminder) {
        self.planned.push(reminder);
    }

    fn cancel(&mut self, key: Uuid) {
        self.planned.retain(|r| r.key != key);
    }
}

pub fn execute(args: RemindersArgs, store: &TaskStore, config: &Config) -> Result<()> {
    let lead = args.lead.unwrap_or(config.reminder_lead_minutes);
    let now = Utc::now();

    let mut preview = Preview::default();
    let mut skipped = 0;
    for task in store.due_tasks().filter(|t| !t.is_done) {
        if !reschedule(&mut preview, task, lead, now) {
            skipped += 1;
        }
    }
    preview.planned.sort_by_key(|r| r.fire_at);

    if preview.planned.is_empty() {
        println!("{}", "No upcoming reminders.".dimmed());
    } else {
        for reminder in &preview.planned {
            println!(
                "{}  {}  {}",
                reminder.fire_at.format("%Y-%m-%d %H:%M").to_string().yellow(),
                reminder.title,
                reminder.body.dimmed()
            );
        }
    }
    if skipped > 0 {
        println!("{}", format!("{} past-due reminder(s) skipped", skipped).dimmed());
    }

    Ok(())
}
