//! Store change notifications.
//!
//! The store publishes one event per successful mutation on a broadcast
//! channel. Presentation layers subscribe and re-render from the store.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Change notifications emitted by the store.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum StoreEvent {
    TaskAdded { task_id: Uuid },
    TaskUpdated { task_id: Uuid },
    TaskRemoved { task_id: Uuid },
    BoardAdded { name: String },
    /// A board was deleted and `moved` tasks now live on `reassigned_to`.
    BoardRemoved {
        name: String,
        reassigned_to: String,
        moved: usize,
    },
}

/// Type alias for the broadcast sender.
pub type StoreSender = broadcast::Sender<StoreEvent>;

/// Type alias for the broadcast receiver.
pub type StoreReceiver = broadcast::Receiver<StoreEvent>;

/// Create a new broadcast channel with default capacity.
pub fn create_event_channel() -> StoreSender {
    let (tx, _rx) = broadcast::channel(100);
    tx
}
