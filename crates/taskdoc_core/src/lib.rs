//! Core persistence engine for taskdoc.
//! This crate is the single source of truth for task storage invariants.

pub mod codec;
pub mod config;
pub mod logging;
pub mod model;
pub mod store;

pub use codec::{
    decode_document, decode_json_document, encode_document, encode_json_document, CodecError,
    CodecResult, DecodedDocument, DocumentFormat, JSON_DATE_FORMAT,
};
pub use config::{StoreConfig, DEFAULT_DOCUMENT_FILE_NAME, DOCUMENT_PATH_ENV};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{Task, TaskId, CREATED_AT_FORMAT};
pub use store::{
    global_store, init_global_store, DocumentStorage, ErrorKind, FileDocument, LoadReport,
    MemoryDocument, StoreError, StoreResult, TaskStore,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
