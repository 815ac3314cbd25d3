//! Terminal output formatting.

use colored::{ColoredString, Colorize};
use taskgrid_core::{Priority, Task, TaskStore};

/// Print tasks as a table.
pub fn print_tasks_table(tasks: &[&Task]) {
    if tasks.is_empty() {
        println!("{}", "No tasks found.".dimmed());
        return;
    }

    println!(
        "{:<10} {:<3} {:<32} {:<12} {:<8} {:<17}",
        "ID", "", "Title", "Board", "Priority", "Due"
    );
    println!("{}", "-".repeat(86));

    for task in tasks {
        print_task_row(task);
    }
}

fn print_task_row(task: &Task) {
    let title = truncate(&task.title, 30);
    let title = if task.is_done {
        title.strikethrough().dimmed()
    } else {
        title.normal()
    };
    let due = task
        .due_date
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());

    println!(
        "{:<10} {:<3} {:<32} {:<12} {:<8} {:<17}",
        task.id.to_string()[..8].dimmed(),
        task.emoji,
        title,
        truncate(&task.board, 12),
        priority_colored(task.priority),
        due
    );
}

/// Print a single task with subtasks.
pub fn print_task(task: &Task) {
    println!(
        "{} {} {}",
        task.emoji,
        task.title.cyan().bold(),
        format!("({})", task.id).dimmed()
    );
    println!();

    if let Some(notes) = &task.notes {
        println!("{}", notes);
        println!();
    }

    println!("{}: {}", "Board".bold(), task.board);
    println!("{}: {}", "Priority".bold(), priority_colored(task.priority));
    println!(
        "{}: {}",
        "Status".bold(),
        if task.is_done { "done".green() } else { "open".yellow() }
    );
    if let Some(due) = task.due_date {
        println!("{}: {}", "Due".bold(), due.format("%Y-%m-%d %H:%M UTC"));
    }
    println!(
        "{}: {}",
        "Created".bold(),
        task.created_at.format("%Y-%m-%d %H:%M UTC")
    );

    if !task.subtasks.is_empty() {
        println!();
        println!(
            "{} {}",
            "Subtasks".bold(),
            format!("({:.0}% complete)", task.completed_subtask_ratio() * 100.0).dimmed()
        );
        for subtask in &task.subtasks {
            let mark = if subtask.is_done { "[x]".green() } else { "[ ]".normal() };
            println!(
                "  {} {} {}",
                mark,
                subtask.title,
                subtask.id.to_string()[..8].dimmed()
            );
        }
    }
}

/// Print the board list with open task counts.
pub fn print_boards(store: &TaskStore) {
    for board in store.boards() {
        let counts = store.open_counts(board);
        let open: usize = counts.iter().map(|(_, n)| n).sum();
        let breakdown: Vec<String> = counts
            .iter()
            .rev()
            .filter(|(_, n)| *n > 0)
            .map(|(p, n)| format!("{} {}", n, p))
            .collect();

        println!(
            "{:<20} {:>3} open  {}",
            board.cyan().bold(),
            open,
            breakdown.join(", ").dimmed()
        );
    }
}

/// Print one board's tasks in board order.
pub fn print_board(store: &TaskStore, board: &str) {
    let tasks = store.tasks_for(board);
    println!(
        "{} {}",
        board.cyan().bold(),
        format!("({} tasks)", tasks.len()).dimmed()
    );
    println!("{}", "═".repeat(40));

    if tasks.is_empty() {
        println!("  {}", "(empty)".dimmed());
        return;
    }

    for task in tasks {
        let check = if task.is_done { "✓".green() } else { "•".normal() };
        let due = task
            .due_date
            .map(|d| format!(" due {}", d.format("%m-%d %H:%M")))
            .unwrap_or_default();
        let progress = if task.subtasks.is_empty() {
            String::new()
        } else {
            format!(" {:.0}%", task.completed_subtask_ratio() * 100.0)
        };
        println!(
            "  {} {} {} [{}]{}{} {}",
            check,
            task.emoji,
            task.title,
            priority_colored(task.priority),
            due.yellow(),
            progress.dimmed(),
            task.id.to_string()[..8].dimmed()
        );
    }
}

fn priority_colored(priority: Priority) -> ColoredString {
    match priority {
        Priority::High => "high".red().bold(),
        Priority::Medium => "medium".yellow(),
        Priority::Low => "low".dimmed(),
    }
}

/// Truncate a string to a maximum length.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
