//! Debounced document saves.
//!
//! Each scheduled save cancels the one still waiting and starts a fresh quiet
//! window, so a burst of mutations produces a single write of the final state.
//!
//! Writes run on the blocking pool. Every snapshot carries a generation number
//! and writes are serialized behind one lock, so a save that was already past
//! its window when a newer one arrived can never land on top of it.

use super::persistence::Persistence;
use crate::task::model::AppDocument;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use taskgrid_storage::StorageResult;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub struct DebouncedSaver {
    writer: Arc<Writer>,
    window: Duration,
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

/// Serializes writes and remembers the newest generation on disk.
struct Writer {
    persistence: Arc<dyn Persistence>,
    written: Mutex<u64>,
}

impl Writer {
    /// Save `doc` unless a newer generation was already written.
    /// Returns `Ok(false)` when the snapshot was stale and skipped.
    fn write(&self, generation: u64, doc: &AppDocument) -> StorageResult<bool> {
        let mut written = self.written.lock().unwrap_or_else(PoisonError::into_inner);
        if *written > generation {
            debug!(generation, newest = *written, "Skipping stale save");
            return Ok(false);
        }
        self.persistence.save(doc)?;
        *written = generation;
        Ok(true)
    }

    /// Save and log the outcome. Failures are not fatal: the in-memory state
    /// stays authoritative and the next mutation retries.
    fn write_logged(&self, generation: u64, doc: &AppDocument) {
        match self.write(generation, doc) {
            Ok(true) => debug!(
                generation,
                tasks = doc.tasks.len(),
                boards = doc.boards.len(),
                "Saved tasks"
            ),
            Ok(false) => {}
            Err(e) => warn!(error = %e, "Failed to save tasks"),
        }
    }
}

impl DebouncedSaver {
    pub fn new(persistence: Arc<dyn Persistence>, window: Duration) -> Self {
        Self {
            writer: Arc::new(Writer {
                persistence,
                written: Mutex::new(0),
            }),
            window,
            generation: 0,
            pending: None,
        }
    }

    /// Schedule `doc` to be saved once the quiet window elapses.
    ///
    /// Outside a tokio runtime there is nothing to defer onto, so the save
    /// happens immediately.
    pub fn schedule(&mut self, doc: AppDocument) {
        self.cancel();
        let generation = self.next_generation();

        match Handle::try_current() {
            Ok(handle) => {
                let writer = Arc::clone(&self.writer);
                let window = self.window;
                self.pending = Some(handle.spawn(async move {
                    tokio::time::sleep(window).await;
                    let result = tokio::task::spawn_blocking(move || {
                        writer.write_logged(generation, &doc);
                    })
                    .await;
                    if let Err(e) = result {
                        warn!(error = %e, "Save task failed");
                    }
                }));
            }
            Err(_) => {
                debug!("No async runtime, saving without debounce");
                self.writer.write_logged(generation, &doc);
            }
        }
    }

    /// Drop the pending save, if any. A save already writing still finishes,
    /// but nothing older than it can follow.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Cancel the pending save and write `doc` now. Waits for a save that is
    /// already writing, so `doc` is what ends up on disk.
    pub fn flush(&mut self, doc: &AppDocument) -> StorageResult<()> {
        self.cancel();
        let generation = self.next_generation();
        self.writer.write(generation, doc).map(|_| ())
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }
}
