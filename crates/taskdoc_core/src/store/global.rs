//! Optional process-wide store instance.
//!
//! Prefer constructing a `TaskStore` at process start and passing it down.
//! This module exists for embedders that need an ambient handle.
//!
//! # Invariants
//! - At most one global store is ever constructed per process, even under
//!   concurrent first access.
//! - Re-initialization with a different document path is rejected.

use super::task_store::TaskStore;
use super::{StoreError, StoreResult};
use crate::config::StoreConfig;
use log::{info, warn};
use once_cell::sync::OnceCell;

static GLOBAL_STORE: OnceCell<TaskStore> = OnceCell::new();

/// Initializes (or returns) the process-wide store for `config`.
///
/// The store is constructed but not loaded; callers still call `load()`.
///
/// # Errors
/// `AlreadyInitialized` when a global store already exists for a different
/// document path.
pub fn init_global_store(config: &StoreConfig) -> StoreResult<&'static TaskStore> {
    let store = GLOBAL_STORE.get_or_init(|| {
        info!(
            "event=global_store_init module=store status=ok path={}",
            config.document_path().display()
        );
        TaskStore::new(config)
    });

    if store.path() != config.document_path() {
        let err = StoreError::AlreadyInitialized {
            current: store.path().to_path_buf(),
            requested: config.document_path().to_path_buf(),
        };
        warn!(
            "event=global_store_init module=store status=error error_code={} path={}",
            err.code(),
            config.document_path().display()
        );
        return Err(err);
    }

    Ok(store)
}

/// Returns the process-wide store, if initialized.
pub fn global_store() -> Option<&'static TaskStore> {
    GLOBAL_STORE.get()
}
