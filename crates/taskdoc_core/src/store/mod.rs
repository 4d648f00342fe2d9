//! Task persistence engine.
//!
//! # Responsibility
//! - Own the in-memory task collection and the persisted document.
//! - Run every mutation as decode-mutate-encode with a full-document write.
//!
//! # Invariants
//! - Memory is only updated after the document write succeeds.
//! - Task ids are unique within one store.
//! - Callers only ever receive copies of tasks, never references into
//!   store state.

use crate::codec::CodecError;
use crate::model::task::TaskId;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;

mod global;
mod storage;
mod table;
mod task_store;

pub use global::{global_store, init_global_store};
pub use storage::{DocumentStorage, FileDocument, MemoryDocument};
pub use task_store::{LoadReport, TaskStore};

pub type StoreResult<T> = Result<T, StoreError>;

/// Coarse failure category callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Identifier absent; recoverable.
    NotFound,
    /// Document present but not decodable.
    Corrupt,
    /// Environmental read/write failure.
    IoFailure,
    /// The process-wide store is already bound to another document.
    Conflict,
}

/// Store operation failure.
#[derive(Debug)]
pub enum StoreError {
    NotFound(TaskId),
    Corrupt {
        path: PathBuf,
        source: CodecError,
    },
    Io {
        path: PathBuf,
        action: &'static str,
        source: io::Error,
    },
    /// In-memory state could not be rendered; nothing was written.
    Encode(CodecError),
    /// `init_global_store` was called with a different document path.
    AlreadyInitialized {
        current: PathBuf,
        requested: PathBuf,
    },
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Corrupt { .. } => ErrorKind::Corrupt,
            Self::Io { .. } | Self::Encode(_) => ErrorKind::IoFailure,
            Self::AlreadyInitialized { .. } => ErrorKind::Conflict,
        }
    }

    /// Stable code used in `error_code=` log fields.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "task_not_found",
            Self::Corrupt { .. } => "document_corrupt",
            Self::Io { .. } => "document_io_failed",
            Self::Encode(_) => "document_encode_failed",
            Self::AlreadyInitialized { .. } => "global_store_conflict",
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, action: &'static str, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            action,
            source,
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::Corrupt { path, source } => {
                write!(f, "task document `{}` is corrupt: {source}", path.display())
            }
            Self::Io {
                path,
                action,
                source,
            } => write!(
                f,
                "failed to {action} task document `{}`: {source}",
                path.display()
            ),
            Self::Encode(err) => write!(f, "{err}"),
            Self::AlreadyInitialized { current, requested } => write!(
                f,
                "global store already initialized at `{}`; refusing to switch to `{}`",
                current.display(),
                requested.display()
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) | Self::AlreadyInitialized { .. } => None,
            Self::Corrupt { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<CodecError> for StoreError {
    fn from(value: CodecError) -> Self {
        Self::Encode(value)
    }
}
