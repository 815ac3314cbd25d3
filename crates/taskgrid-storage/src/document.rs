//! A JSON document stored at a fixed path.

use crate::error::{StorageError, StorageResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// A JSON file holding one serialized value.
///
/// The handle holds no cached state: every `save` writes the whole value and
/// every `load` reads the whole file.
#[derive(Debug, Clone)]
pub struct JsonDocument {
    path: PathBuf,
}

impl JsonDocument {
    /// Create a handle for the document at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a handle for `filename` inside `dir`.
    pub fn in_dir(dir: &Path, filename: &str) -> Self {
        Self::new(dir.join(filename))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize `value` as pretty-printed JSON with sorted keys and replace
    /// the document atomically.
    pub fn save<T: Serialize>(&self, value: &T) -> StorageResult<()> {
        // Going through `Value` sorts object keys (serde_json maps are ordered).
        let tree = serde_json::to_value(value).map_err(StorageError::Encode)?;
        let mut bytes = serde_json::to_vec_pretty(&tree).map_err(StorageError::Encode)?;
        bytes.push(b'\n');

        write_atomic(&self.path, &bytes)?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "Document saved");
        Ok(())
    }

    /// Read and decode the document.
    pub fn load<T: DeserializeOwned>(&self) -> StorageResult<T> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(self.path.clone()));
            }
            Err(e) => return Err(StorageError::io(&self.path, e)),
        };

        serde_json::from_slice(&bytes).map_err(|source| StorageError::Decode {
            path: self.path.clone(),
            source,
        })
    }
}

/// Write `bytes` to `path` via a uniquely named sibling temp file, fsync and
/// rename. Concurrent writers never share a temp file.
fn write_atomic(path: &Path, bytes: &[u8]) -> StorageResult<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;

    let mut tmp = NamedTempFile::new_in(parent).map_err(|e| StorageError::io(parent, e))?;
    tmp.write_all(bytes)
        .map_err(|e| StorageError::io(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| StorageError::io(tmp.path(), e))?;

    // On failure the temp file is removed when the returned handle drops.
    tmp.persist(path)
        .map_err(|e| StorageError::io(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        zeta: u32,
        alpha: String,
        items: Vec<String>,
    }

    fn sample() -> Sample {
        Sample {
            zeta: 7,
            alpha: "first".to_string(),
            items: vec!["b".to_string(), "a".to_string()],
        }
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let doc = JsonDocument::in_dir(dir.path(), "tasks.json");

        doc.save(&sample()).unwrap();
        let loaded: Sample = doc.load().unwrap();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let doc = JsonDocument::in_dir(dir.path(), "tasks.json");

        let err = doc.load::<Sample>().unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_schema_mismatch_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let doc = JsonDocument::in_dir(dir.path(), "tasks.json");
        fs::write(doc.path(), "[1, 2, 3]").unwrap();

        let err = doc.load::<Sample>().unwrap_err();
        assert!(matches!(err, StorageError::Decode { .. }));
    }

    #[test]
    fn test_keys_sorted_and_pretty() {
        let dir = tempfile::tempdir().unwrap();
        let doc = JsonDocument::in_dir(dir.path(), "tasks.json");
        doc.save(&sample()).unwrap();

        let text = fs::read_to_string(doc.path()).unwrap();
        let alpha = text.find("\"alpha\"").unwrap();
        let items = text.find("\"items\"").unwrap();
        let zeta = text.find("\"zeta\"").unwrap();
        assert!(alpha < items && items < zeta);
        assert!(text.contains('\n'));
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let doc = JsonDocument::in_dir(dir.path(), "tasks.json");
        doc.save(&sample()).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["tasks.json".to_string()]);
    }

    #[test]
    fn test_creates_missing_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let doc = JsonDocument::new(dir.path().join("nested/deeper/tasks.json"));
        doc.save(&sample()).unwrap();
        assert!(doc.path().is_file());
    }

    #[test]
    fn test_concurrent_writers_never_tear_the_document() {
        let dir = tempfile::tempdir().unwrap();
        let doc = JsonDocument::in_dir(dir.path(), "tasks.json");

        let writers: Vec<_> = (0..8)
            .map(|n| {
                let doc = doc.clone();
                std::thread::spawn(move || {
                    for _ in 0..20 {
                        let value = Sample {
                            zeta: n,
                            alpha: "x".repeat(4096),
                            items: vec![n.to_string(); 64],
                        };
                        doc.save(&value).unwrap();
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let loaded: Sample = doc.load().unwrap();
        assert_eq!(loaded.items, vec![loaded.zeta.to_string(); 64]);
        let names: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn test_unwritable_target_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "x").unwrap();

        let doc = JsonDocument::new(blocker.join("tasks.json"));
        let err = doc.save(&sample()).unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
    }
}
