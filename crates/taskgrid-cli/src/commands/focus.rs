//! Focus session command.

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{BufRead, BufReader};
use std::sync::Arc;
use taskgrid_core::feedback::TracingFeedback;
use taskgrid_core::focus::{CompletionCause, FocusCompletion};
use taskgrid_core::{Config, FocusSession, FocusTimer, TaskStore, TimerState};
use tokio::sync::mpsc;

#[derive(Args)]
pub struct FocusArgs {
    /// Task ID (a unique prefix is enough)
    pub id: String,

    /// Session length in minutes (5-60)
    #[arg(short, long)]
    pub minutes: Option<u32>,
}

pub async fn execute(args: FocusArgs, store: &mut TaskStore, config: &Config) -> Result<()> {
    let task = store.find(&args.id)?.clone();
    if task.is_done {
        bail!("Task '{}' is already done", task.title);
    }

    let minutes = args.minutes.unwrap_or(config.focus_minutes);
    let timer = FocusTimer::with_minutes(task, minutes);
    let mut session = FocusSession::new(timer).with_feedback(Arc::new(TracingFeedback));

    println!();
    println!(
        "  {} {} {}",
        "Focus".cyan().bold(),
        session.timer().task().emoji,
        session.timer().task().title.bold()
    );
    println!(
        "  {}",
        "p = pause/resume, r = reset, d = mark done, q = quit".dimmed()
    );
    println!();

    let bar = ProgressBar::new(u64::from(session.timer().duration_secs()));
    bar.set_style(
        ProgressStyle::with_template("  {bar:40.cyan/blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    render(&bar, &session);

    let mut keys = key_lines(BufReader::new(std::io::stdin()));
    let mut stdin_open = true;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    session.start();
    render(&bar, &session);

    let completion: Option<FocusCompletion> = loop {
        tokio::select! {
            done = session.next_tick(store) => {
                render(&bar, &session);
                if done.is_some() {
                    break done;
                }
            }
            line = keys.recv(), if stdin_open => {
                match line {
                    Some(input) => match input.trim() {
                        "p" => session.toggle(),
                        "r" => session.reset(),
                        "d" => break session.mark_done(store),
                        "q" => {
                            session.cancel();
                            break None;
                        }
                        _ => {}
                    },
                    None => stdin_open = false,
                }
                render(&bar, &session);
            }
            _ = &mut ctrl_c => {
                session.cancel();
                break None;
            }
        }
    };

    match completion {
        Some(c) => {
            bar.finish_with_message("done");
            let how = match c.cause {
                CompletionCause::Elapsed => "time's up",
                CompletionCause::MarkedDone => "marked done",
            };
            println!(
                "{} {} ({})",
                "✓".green().bold(),
                c.task.title.cyan(),
                how
            );
        }
        None => {
            bar.abandon_with_message(format!("stopped at {}", session.timer().remaining_label()));
        }
    }

    Ok(())
}

fn render(bar: &ProgressBar, session: &FocusSession) {
    let timer = session.timer();
    bar.set_position(u64::from(timer.duration_secs() - timer.remaining_secs()));
    let state = match timer.state() {
        TimerState::Running => "in flow, keep going".green(),
        TimerState::Paused => "paused".yellow(),
        TimerState::Idle => "ready to focus".normal(),
        TimerState::Finished => "finished".green(),
    };
    bar.set_message(format!(
        "{} {:>3.0}%  {}",
        timer.remaining_label(),
        timer.progress() * 100.0,
        state
    ));
}

/// Forward input lines from a plain thread, which an idle terminal cannot
/// keep alive past runtime shutdown.
fn key_lines<R>(input: R) -> mpsc::UnboundedReceiver<String>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in input.lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};
    use std::time::{Duration, Instant};

    /// A reader that blocks until its sender is dropped, like an idle terminal.
    struct Idle(std::sync::mpsc::Receiver<()>);

    impl Read for Idle {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            let _ = self.0.recv();
            Ok(0)
        }
    }

    #[tokio::test]
    async fn test_key_lines_forwards_until_eof() {
        let mut keys = key_lines(Cursor::new("p\nd\n"));
        assert_eq!(keys.recv().await.as_deref(), Some("p"));
        assert_eq!(keys.recv().await.as_deref(), Some("d"));
        assert_eq!(keys.recv().await, None);
    }

    #[test]
    fn test_idle_input_does_not_hold_up_shutdown() {
        let (_hold, idle) = std::sync::mpsc::channel();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async {
            let mut keys = key_lines(BufReader::new(Idle(idle)));
            tokio::select! {
                _ = keys.recv() => panic!("no input was written"),
                _ = tokio::time::sleep(Duration::from_millis(20)) => {}
            }
        });

        let started = Instant::now();
        drop(runtime);
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
