//! `TaskStore` lifecycle and mutation operations.
//!
//! # Responsibility
//! - Load the document into memory once per `load` call.
//! - Apply add/update/toggle/delete and persist the full document each time.
//!
//! # Invariants
//! - Each mutation runs under one lock: clone state, mutate the clone, encode,
//!   write, then commit. A failed write leaves memory untouched.
//! - `NotFound` never triggers a write.
//! - Logs carry ids and counts only, never task text.

use super::storage::{DocumentStorage, FileDocument};
use super::table::TaskTable;
use super::{StoreError, StoreResult};
use crate::codec::{CodecError, DocumentFormat};
use crate::config::StoreConfig;
use crate::model::task::{Task, TaskId};
use log::{error, info, warn};
use parking_lot::Mutex;
use std::path::Path;
use std::time::Instant;

/// Outcome summary of one `load` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    /// Tasks now held in memory.
    pub loaded: usize,
    /// Entries dropped for lacking a usable id.
    pub skipped: usize,
    /// Entries whose creation time was replaced with the load time.
    pub timestamp_fallbacks: usize,
    /// `true` when no document existed; the store started empty.
    pub file_missing: bool,
}

/// File-backed task store.
///
/// Construction does not touch storage; call [`TaskStore::load`] first.
pub struct TaskStore<S: DocumentStorage = FileDocument> {
    storage: S,
    format: DocumentFormat,
    table: Mutex<TaskTable>,
}

impl TaskStore<FileDocument> {
    /// Creates a store over the configured document path and format.
    pub fn new(config: &StoreConfig) -> Self {
        Self::with_storage(FileDocument::new(config.document_path()))
            .with_format(config.document_format())
    }
}

impl<S: DocumentStorage> TaskStore<S> {
    /// Creates a store over a custom storage backend. The document format
    /// follows the storage location's extension.
    pub fn with_storage(storage: S) -> Self {
        let format = DocumentFormat::from_path(storage.location());
        Self {
            storage,
            format,
            table: Mutex::new(TaskTable::default()),
        }
    }

    /// Overrides the document format chosen at construction.
    pub fn with_format(mut self, format: DocumentFormat) -> Self {
        self.format = format;
        self
    }

    /// Document location backing this store.
    pub fn path(&self) -> &Path {
        self.storage.location()
    }

    /// Document format used for load and save.
    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    /// Storage backend, e.g. to inspect a `MemoryDocument` in tests.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Replaces in-memory state with the persisted document.
    ///
    /// A missing or blank document yields an empty store.
    ///
    /// # Errors
    /// - `Corrupt` when the document cannot be decoded.
    /// - `Io` when the document exists but cannot be read.
    pub fn load(&self) -> StoreResult<LoadReport> {
        let started_at = Instant::now();
        info!(
            "event=store_load module=store status=start path={} format={}",
            self.path().display(),
            self.format.as_str()
        );

        let mut table = self.table.lock();
        let result = self.read_document();
        match result {
            Ok((tasks, report)) => {
                *table = TaskTable::from_tasks(tasks);
                if report.file_missing {
                    warn!(
                        "event=store_load module=store status=ok path={} file_missing=true",
                        self.path().display()
                    );
                }
                info!(
                    "event=store_load module=store status=ok duration_ms={} loaded={} skipped={} timestamp_fallbacks={}",
                    started_at.elapsed().as_millis(),
                    report.loaded,
                    report.skipped,
                    report.timestamp_fallbacks
                );
                Ok(report)
            }
            Err(err) => {
                error!(
                    "event=store_load module=store status=error duration_ms={} error_code={} error={}",
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Creates, stores and persists a new task.
    pub fn add(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> StoreResult<Task> {
        let title = title.into();
        let description = description.into();
        self.mutate("task_add", move |table| {
            let mut task = Task::new(title.as_str(), description.as_str());
            // v4 collisions are not expected; regenerate rather than assume.
            while table.contains(task.id()) {
                task = Task::new(title.as_str(), description.as_str());
            }
            table.push(task.clone());
            Ok(task)
        })
    }

    /// Replaces the title of an existing task.
    pub fn update_title(&self, id: TaskId, title: impl Into<String>) -> StoreResult<()> {
        let title = title.into();
        self.mutate("task_update_title", move |table| {
            existing_mut(table, id)?.title = title;
            Ok(())
        })
    }

    /// Replaces the description of an existing task.
    pub fn update_description(
        &self,
        id: TaskId,
        description: impl Into<String>,
    ) -> StoreResult<()> {
        let description = description.into();
        self.mutate("task_update_description", move |table| {
            existing_mut(table, id)?.description = description;
            Ok(())
        })
    }

    /// Flips the completion flag and returns the new value.
    pub fn toggle_completed(&self, id: TaskId) -> StoreResult<bool> {
        self.mutate("task_toggle", move |table| {
            Ok(existing_mut(table, id)?.toggle())
        })
    }

    /// Removes a task and returns it.
    pub fn delete(&self, id: TaskId) -> StoreResult<Task> {
        self.mutate("task_delete", move |table| {
            table.remove(id).ok_or(StoreError::NotFound(id))
        })
    }

    /// Snapshot of all tasks in load/insertion order.
    pub fn list_all(&self) -> Vec<Task> {
        self.table.lock().tasks().to_vec()
    }

    /// Copy of one task, if present.
    pub fn find_by_id(&self, id: TaskId) -> Option<Task> {
        self.table.lock().get(id).cloned()
    }

    /// Number of tasks currently held in memory.
    pub fn len(&self) -> usize {
        self.table.lock().len()
    }

    /// `true` when no tasks are held in memory.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read_document(&self) -> StoreResult<(Vec<Task>, LoadReport)> {
        let Some(bytes) = self.storage.read()? else {
            return Ok((
                Vec::new(),
                LoadReport {
                    file_missing: true,
                    ..LoadReport::default()
                },
            ));
        };

        let text = std::str::from_utf8(&bytes).map_err(|err| StoreError::Corrupt {
            path: self.path().to_path_buf(),
            source: CodecError::Encoding(err.to_string()),
        })?;
        if text.trim().is_empty() {
            return Ok((Vec::new(), LoadReport::default()));
        }

        let decoded = self.format.decode(text).map_err(|source| StoreError::Corrupt {
            path: self.path().to_path_buf(),
            source,
        })?;
        let report = LoadReport {
            loaded: decoded.tasks.len(),
            skipped: decoded.skipped,
            timestamp_fallbacks: decoded.timestamp_fallbacks,
            file_missing: false,
        };
        Ok((decoded.tasks, report))
    }

    fn mutate<T>(
        &self,
        event: &'static str,
        apply: impl FnOnce(&mut TaskTable) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let started_at = Instant::now();
        let mut table = self.table.lock();
        let mut next = table.clone();

        let result = apply(&mut next).and_then(|outcome| {
            let document = self.format.encode(next.tasks())?;
            self.storage.write(document.as_bytes())?;
            Ok(outcome)
        });

        match result {
            Ok(outcome) => {
                *table = next;
                info!(
                    "event={event} module=store status=ok duration_ms={} total={}",
                    started_at.elapsed().as_millis(),
                    table.len()
                );
                Ok(outcome)
            }
            Err(StoreError::NotFound(id)) => {
                info!("event={event} module=store status=not_found task_id={id}");
                Err(StoreError::NotFound(id))
            }
            Err(err) => {
                error!(
                    "event={event} module=store status=error duration_ms={} error_code={} error={}",
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }
}

fn existing_mut(table: &mut TaskTable, id: TaskId) -> StoreResult<&mut Task> {
    table.get_mut(id).ok_or(StoreError::NotFound(id))
}
