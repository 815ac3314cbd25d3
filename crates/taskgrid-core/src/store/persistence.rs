//! Persistence seam between the store and the storage layer.

use crate::task::model::{AppDocument, Task};
use taskgrid_storage::{JsonDocument, StorageResult};

/// Where the store's document lives.
///
/// Implementations receive snapshots and keep no reference to store state.
pub trait Persistence: Send + Sync {
    /// Replace the stored document.
    fn save(&self, doc: &AppDocument) -> StorageResult<()>;

    /// Load a document in the current `{tasks, boards}` schema.
    fn load(&self) -> StorageResult<AppDocument>;

    /// Load a document in the legacy bare-task-list schema.
    fn load_legacy(&self) -> StorageResult<Vec<Task>>;
}

impl Persistence for JsonDocument {
    fn save(&self, doc: &AppDocument) -> StorageResult<()> {
        JsonDocument::save(self, doc)
    }

    fn load(&self) -> StorageResult<AppDocument> {
        JsonDocument::load(self)
    }

    fn load_legacy(&self) -> StorageResult<Vec<Task>> {
        JsonDocument::load(self)
    }
}
