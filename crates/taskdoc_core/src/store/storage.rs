//! Byte-level document storage backends.
//!
//! # Responsibility
//! - Read and replace the whole persisted document.
//! - Keep file-system details out of the store's mutation logic.
//!
//! # Invariants
//! - `read` returns `Ok(None)` only when the document does not exist.
//! - `FileDocument::write` never leaves a partially written target: bytes go
//!   to a sibling temp file, are synced, then renamed over the target.

use super::{StoreError, StoreResult};
use parking_lot::Mutex;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// Whole-document persistence backend used by `TaskStore`.
pub trait DocumentStorage: Send + Sync {
    /// Human-readable location used in errors and logs.
    fn location(&self) -> &Path;
    /// Reads the full document, `None` when it does not exist.
    fn read(&self) -> StoreResult<Option<Vec<u8>>>;
    /// Replaces the full document.
    fn write(&self, bytes: &[u8]) -> StoreResult<()>;
}

/// Document stored as one file on disk.
#[derive(Debug, Clone)]
pub struct FileDocument {
    path: PathBuf,
}

impl FileDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "tasks.xml".to_string());
        self.path
            .with_file_name(format!(".{file_name}.tmp.{}", std::process::id()))
    }
}

impl DocumentStorage for FileDocument {
    fn location(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> StoreResult<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::io(&self.path, "read", err)),
        }
    }

    fn write(&self, bytes: &[u8]) -> StoreResult<()> {
        let temp_path = self.temp_path();

        let result = write_synced(&temp_path, bytes)
            .map_err(|err| StoreError::io(&temp_path, "write", err))
            .and_then(|()| {
                fs::rename(&temp_path, &self.path)
                    .map_err(|err| StoreError::io(&self.path, "replace", err))
            });

        if result.is_err() {
            let _ = fs::remove_file(&temp_path);
        }
        result
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// Document held in process memory.
///
/// Used by tests and embedders that do not want disk I/O. Writes can be
/// forced to fail to exercise rollback paths.
#[derive(Debug)]
pub struct MemoryDocument {
    location: PathBuf,
    content: Mutex<Option<Vec<u8>>>,
    fail_writes: AtomicBool,
}

impl MemoryDocument {
    /// Creates a storage with no document.
    pub fn new() -> Self {
        Self {
            location: PathBuf::from(":memory:"),
            content: Mutex::new(None),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Creates a storage pre-populated with `content`.
    pub fn with_content(content: impl Into<Vec<u8>>) -> Self {
        let storage = Self::new();
        *storage.content.lock() = Some(content.into());
        storage
    }

    /// Returns a copy of the current document bytes.
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.content.lock().clone()
    }

    /// Makes every following `write` fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStorage for MemoryDocument {
    fn location(&self) -> &Path {
        &self.location
    }

    fn read(&self) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.contents())
    }

    fn write(&self, bytes: &[u8]) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::io(
                &self.location,
                "write",
                io::Error::other("simulated write failure"),
            ));
        }
        *self.content.lock() = Some(bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{DocumentStorage, FileDocument};
    use crate::store::ErrorKind;

    #[test]
    fn file_read_of_missing_document_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileDocument::new(dir.path().join("tasks.xml"));
        assert!(storage.read().unwrap().is_none());
    }

    #[test]
    fn file_write_replaces_content_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.xml");
        let storage = FileDocument::new(&path);

        storage.write(b"first").unwrap();
        storage.write(b"second").unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"second");
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn file_write_into_missing_directory_is_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileDocument::new(dir.path().join("missing").join("tasks.xml"));

        let err = storage.write(b"data").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IoFailure);
    }
}
