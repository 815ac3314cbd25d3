//! Board management commands.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use taskgrid_core::TaskStore;

use crate::output;

#[derive(Subcommand)]
pub enum BoardCommands {
    /// List boards with open task counts
    List,

    /// Create a board
    New(BoardName),

    /// Delete a board; its tasks move to the first remaining board
    Rm(BoardName),

    /// Display a board's tasks in priority order
    Show(BoardName),
}

#[derive(Args)]
pub struct BoardName {
    /// Board name
    pub name: String,
}

pub fn execute(cmd: BoardCommands, store: &mut TaskStore) -> Result<()> {
    match cmd {
        BoardCommands::List => {
            output::print_boards(store);
        }

        BoardCommands::New(args) => {
            let name = args.name.trim();
            if name.is_empty() {
                bail!("Board name must not be empty");
            }
            if !store.add_board(name) {
                bail!("Board '{}' already exists", name);
            }
            println!("{} Created board: {}", "✓".green().bold(), name.cyan());
        }

        BoardCommands::Rm(args) => {
            store.require_board(&args.name)?;
            if store.boards().len() <= 1 {
                bail!("Cannot delete the only board");
            }
            let moved = store.tasks().iter().filter(|t| t.board == args.name).count();
            let target = store.remove_board(&args.name);
            println!(
                "{} Deleted board: {} ({} task(s) moved to {})",
                "✓".green().bold(),
                args.name.cyan(),
                moved,
                target.cyan()
            );
        }

        BoardCommands::Show(args) => {
            store.require_board(&args.name)?;
            output::print_board(store, &args.name);
        }
    }

    Ok(())
}
