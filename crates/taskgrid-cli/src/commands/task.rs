//! Task management commands.

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use colored::Colorize;
use taskgrid_core::reminder::plan_reminder;
use taskgrid_core::task::DEFAULT_BOARD;
use taskgrid_core::{Config, Priority, Task, TaskStore};

use crate::output;

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Create a new task
    New(NewTaskArgs),

    /// List tasks, optionally for one board
    List(ListArgs),

    /// Show a task with its subtasks
    Show(TaskRef),

    /// Edit a task's fields
    Edit(EditTaskArgs),

    /// Toggle a task's done flag
    Done(TaskRef),

    /// Delete a task
    Rm(TaskRef),

    /// Add a subtask
    Subtask(SubtaskArgs),

    /// Toggle a subtask's done flag
    Check(CheckArgs),
}

#[derive(Args)]
pub struct NewTaskArgs {
    /// Task title
    pub title: String,

    /// Board name (created if missing)
    #[arg(short, long, default_value = DEFAULT_BOARD)]
    pub board: String,

    /// Priority (low, medium, high)
    #[arg(short, long, default_value = "medium")]
    pub priority: Priority,

    /// Due date, RFC 3339 (e.g. 2025-11-09T17:00:00Z)
    #[arg(long)]
    pub due: Option<DateTime<Utc>>,

    /// Free-form notes
    #[arg(short, long)]
    pub notes: Option<String>,

    /// Emoji shown on the card
    #[arg(long)]
    pub emoji: Option<String>,

    /// Subtask title (repeatable)
    #[arg(long = "subtask")]
    pub subtasks: Vec<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Only tasks on this board, in board order
    #[arg(short, long)]
    pub board: Option<String>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct TaskRef {
    /// Task ID (a unique prefix is enough)
    pub id: String,
}

#[derive(Args)]
pub struct EditTaskArgs {
    /// Task ID (a unique prefix is enough)
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(short, long)]
    pub board: Option<String>,

    #[arg(short, long)]
    pub priority: Option<Priority>,

    /// New due date, RFC 3339
    #[arg(long, conflicts_with = "clear_due")]
    pub due: Option<DateTime<Utc>>,

    /// Remove the due date
    #[arg(long)]
    pub clear_due: bool,

    #[arg(short, long)]
    pub notes: Option<String>,

    #[arg(long)]
    pub emoji: Option<String>,
}

#[derive(Args)]
pub struct SubtaskArgs {
    /// Task ID (a unique prefix is enough)
    pub id: String,

    /// Subtask title
    pub title: String,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Task ID (a unique prefix is enough)
    pub id: String,

    /// Subtask ID prefix
    pub subtask: String,
}

pub fn execute(cmd: TaskCommands, store: &mut TaskStore, config: &Config) -> Result<()> {
    match cmd {
        TaskCommands::New(args) => {
            if args.board.trim().is_empty() {
                bail!("Board name must not be empty");
            }
            let mut task = Task::new(&args.title, &args.board)
                .with_priority(args.priority)
                .with_subtasks(&args.subtasks);
            if let Some(notes) = args.notes {
                task = task.with_notes(notes);
            }
            if let Some(due) = args.due {
                task = task.with_due(due);
            }
            if let Some(emoji) = args.emoji {
                task = task.with_emoji(emoji);
            }

            let reminder = plan_reminder(&task, config.reminder_lead_minutes, Utc::now());
            println!(
                "{} Created task: {} ({})",
                "✓".green().bold(),
                task.title.cyan(),
                task.id.to_string().dimmed()
            );
            if let Some(reminder) = reminder {
                println!(
                    "  {} {}",
                    "Reminder at".dimmed(),
                    reminder.fire_at.format("%Y-%m-%d %H:%M UTC")
                );
            }
            store.add(task);
        }

        TaskCommands::List(args) => {
            let tasks: Vec<&Task> = match &args.board {
                Some(board) => {
                    store.require_board(board)?;
                    store.tasks_for(board)
                }
                None => store.tasks().iter().collect(),
            };
            if args.json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else {
                output::print_tasks_table(&tasks);
            }
        }

        TaskCommands::Show(args) => {
            let task = store.find(&args.id)?;
            output::print_task(task);
        }

        TaskCommands::Edit(args) => {
            let mut task = store.find(&args.id)?.clone();
            if let Some(title) = args.title {
                let title = title.trim();
                if title.is_empty() {
                    bail!("Title must not be empty");
                }
                task.title = title.to_string();
            }
            if let Some(board) = args.board {
                let board = board.trim();
                if board.is_empty() {
                    bail!("Board name must not be empty");
                }
                task.board = board.to_string();
            }
            if let Some(priority) = args.priority {
                task.priority = priority;
            }
            if args.clear_due {
                task.due_date = None;
            } else if let Some(due) = args.due {
                task.due_date = Some(due);
            }
            if let Some(notes) = args.notes {
                task.notes = if notes.trim().is_empty() {
                    None
                } else {
                    Some(notes)
                };
            }
            if let Some(emoji) = args.emoji {
                task.emoji = emoji;
            }

            let title = task.title.clone();
            store.update(task);
            println!("{} Updated task: {}", "✓".green().bold(), title.cyan());
        }

        TaskCommands::Done(args) => {
            let id = store.find(&args.id)?.id;
            let done = store.toggle_done(id).unwrap_or(false);
            let state = if done { "done".green() } else { "open".yellow() };
            println!("{} Marked {} {}", "✓".green().bold(), id.to_string().dimmed(), state);
        }

        TaskCommands::Rm(args) => {
            let task = store.find(&args.id)?;
            let (id, title) = (task.id, task.title.clone());
            store.remove(id);
            println!("{} Deleted task: {}", "✓".green().bold(), title.cyan());
        }

        TaskCommands::Subtask(args) => {
            let mut task = store.find(&args.id)?.clone();
            let Some(sub_id) = task.add_subtask(&args.title) else {
                bail!("Subtask title must not be empty");
            };
            store.update(task);
            println!(
                "{} Added subtask {} ({})",
                "✓".green().bold(),
                args.title.trim().cyan(),
                sub_id.to_string().dimmed()
            );
        }

        TaskCommands::Check(args) => {
            let mut task = store.find(&args.id)?.clone();
            let prefix = args.subtask.trim().to_lowercase();
            let matches: Vec<_> = task
                .subtasks
                .iter()
                .filter(|s| s.id.to_string().starts_with(&prefix))
                .map(|s| s.id)
                .collect();
            let sub_id = match matches.as_slice() {
                [id] => *id,
                [] => bail!("No subtask matching '{}'", args.subtask),
                _ => bail!("Subtask prefix '{}' is ambiguous", args.subtask),
            };
            task.toggle_subtask(sub_id);
            let ratio = task.completed_subtask_ratio();
            store.update(task);
            println!(
                "{} Subtask toggled ({:.0}% complete)",
                "✓".green().bold(),
                ratio * 100.0
            );
        }
    }

    Ok(())
}
