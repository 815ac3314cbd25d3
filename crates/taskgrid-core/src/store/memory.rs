//! In-memory persistence for tests.

use super::persistence::Persistence;
use crate::task::model::{AppDocument, Task};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use taskgrid_storage::{StorageError, StorageResult};

/// In-memory persistence holding the raw JSON text. Counts saves.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    raw: Mutex<Option<String>>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `json` as the stored bytes.
    pub fn with_raw(json: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(json.into())),
            ..Self::default()
        }
    }

    /// Number of successful saves so far.
    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Decode whatever was saved last.
    pub fn last_saved(&self) -> Option<AppDocument> {
        self.raw_text()
            .and_then(|raw| serde_json::from_str(&raw).ok())
    }

    /// Make subsequent saves fail with an IO error.
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    fn raw_text(&self) -> Option<String> {
        self.raw.lock().ok().and_then(|guard| guard.clone())
    }

    fn decode<T: serde::de::DeserializeOwned>(&self) -> StorageResult<T> {
        let raw = self
            .raw_text()
            .ok_or_else(|| StorageError::NotFound(PathBuf::from("memory")))?;
        serde_json::from_str(&raw).map_err(|source| StorageError::Decode {
            path: PathBuf::from("memory"),
            source,
        })
    }
}

impl Persistence for MemoryPersistence {
    fn save(&self, doc: &AppDocument) -> StorageResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StorageError::Io {
                path: PathBuf::from("memory"),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            });
        }
        let raw = serde_json::to_string(doc).map_err(StorageError::Encode)?;
        if let Ok(mut guard) = self.raw.lock() {
            *guard = Some(raw);
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn load(&self) -> StorageResult<AppDocument> {
        self.decode()
    }

    fn load_legacy(&self) -> StorageResult<Vec<Task>> {
        self.decode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> AppDocument {
        AppDocument {
            tasks: vec![Task::new("Write report", "Work")],
            boards: vec!["Work".to_string()],
        }
    }

    #[test]
    fn test_memory_round_trip_and_count() {
        let memory = MemoryPersistence::new();
        assert!(memory.load().unwrap_err().is_not_found());

        let doc = document();
        memory.save(&doc).unwrap();
        assert_eq!(memory.saves(), 1);
        assert_eq!(memory.load().unwrap(), doc);
        assert_eq!(memory.last_saved(), Some(doc));
    }

    #[test]
    fn test_memory_failing_save() {
        let memory = MemoryPersistence::new();
        memory.fail_saves(true);
        assert!(matches!(memory.save(&document()), Err(StorageError::Io { .. })));
        assert_eq!(memory.saves(), 0);
    }
}
