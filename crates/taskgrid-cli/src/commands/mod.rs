//! CLI command definitions and handlers.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use taskgrid_core::feedback::TracingFeedback;
use taskgrid_core::{Config, TaskStore};
use tracing::debug;

pub mod board;
pub mod focus;
pub mod reminders;
pub mod task;

/// TaskGrid - boards, tasks and focus sessions
#[derive(Parser)]
#[command(name = "taskgrid")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding tasks.json
    #[arg(long, global = true, env = "TASKGRID_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Task management
    #[command(subcommand)]
    Task(task::TaskCommands),

    /// Board management
    #[command(subcommand)]
    Board(board::BoardCommands),

    /// Run a focus session on a task
    Focus(focus::FocusArgs),

    /// Show reminders that would be scheduled for due tasks
    Reminders(reminders::RemindersArgs),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let mut config = Config::resolve(self.config.as_deref())?;
        if let Some(dir) = self.data_dir {
            config.data_dir = Some(dir);
        }
        debug!(data_file = %config.data_file().display(), "Resolved configuration");

        let mut store = TaskStore::open(&config).with_feedback(Arc::new(TracingFeedback));

        let result = match self.command {
            Commands::Task(cmd) => task::execute(cmd, &mut store, &config),
            Commands::Board(cmd) => board::execute(cmd, &mut store),
            Commands::Focus(args) => focus::execute(args, &mut store, &config).await,
            Commands::Reminders(args) => reminders::execute(args, &store, &config),
        };

        // Write out anything still debounced before the runtime goes away.
        if store.has_pending_save() {
            store.flush()?;
        }

        result
    }
}
