//! TaskGrid storage layer.
//!
//! Persists a single JSON document to a fixed file. Writes go through a
//! temporary sibling file and a rename so a crash mid-write never leaves a
//! half-written document behind.

pub mod document;
pub mod error;

pub use document::JsonDocument;
pub use error::{StorageError, StorageResult};
