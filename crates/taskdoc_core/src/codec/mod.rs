//! Document codecs for the task collection.
//!
//! # Responsibility
//! - Decode the persisted document into ordered `Task` values.
//! - Encode the in-memory collection back into a stable, indented document.
//! - Pick XML or JSON from the document path.
//!
//! # Invariants
//! - Decoding ignores whitespace-only text between elements; field text is
//!   kept exactly as written.
//! - Encoding is deterministic: the same task slice yields the same bytes.
//! - A decoded collection never contains two tasks with the same id.
//!
//! # XML document shape
//! ```text
//! <?xml version="1.0" encoding="UTF-8" standalone="no"?>
//! <tasks>
//!     <task completed="false" id="8975d81b-d18c-4c17-a918-0aa22cfb27eb">
//!         <title>Buy milk</title>
//!         <description>2% milk</description>
//!         <CreatedAt>10-19-2026 09:15:02 AM</CreatedAt>
//!     </task>
//! </tasks>
//! ```

use crate::model::task::{Task, TaskId};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

mod decode;
mod encode;
mod entry;
mod json;

pub use decode::decode_document;
pub use encode::encode_document;
pub use json::{decode_json_document, encode_json_document, JSON_DATE_FORMAT};

pub(crate) const ROOT_ELEMENT: &str = "tasks";
pub(crate) const TASK_ELEMENT: &str = "task";
pub(crate) const TITLE_ELEMENT: &str = "title";
pub(crate) const DESCRIPTION_ELEMENT: &str = "description";
pub(crate) const CREATED_AT_ELEMENT: &str = "CreatedAt";
pub(crate) const ID_ATTRIBUTE: &str = "id";
pub(crate) const COMPLETED_ATTRIBUTE: &str = "completed";

pub type CodecResult<T> = Result<T, CodecError>;

/// Result of decoding one document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecodedDocument {
    /// Tasks in document order.
    pub tasks: Vec<Task>,
    /// Entries dropped because their id was empty or not a UUID.
    pub skipped: usize,
    /// Entries whose creation time was replaced with the load time.
    pub timestamp_fallbacks: usize,
}

/// On-disk representation of the task collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
    #[default]
    Xml,
    Json,
}

impl DocumentFormat {
    /// `.json` (any case) selects JSON; every other path is XML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Xml,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Xml => "xml",
            Self::Json => "json",
        }
    }

    pub fn decode(self, input: &str) -> CodecResult<DecodedDocument> {
        match self {
            Self::Xml => decode_document(input),
            Self::Json => decode_json_document(input),
        }
    }

    pub fn encode(self, tasks: &[Task]) -> CodecResult<String> {
        match self {
            Self::Xml => encode_document(tasks),
            Self::Json => encode_json_document(tasks),
        }
    }
}

/// Failure to translate between the document and the task collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Input is not well-formed XML.
    Syntax { position: u64, message: String },
    /// Input is not a well-formed JSON task array.
    Json {
        line: usize,
        column: usize,
        message: String,
    },
    /// Input bytes are not valid UTF-8.
    Encoding(String),
    /// Input contains no root element.
    MissingRoot,
    /// Input ends before every open element is closed.
    Truncated,
    /// A task entry lacks a required field.
    MissingField {
        entry_index: usize,
        field: &'static str,
    },
    /// Two task entries carry the same id.
    DuplicateId(TaskId),
    /// The writer rejected an event while encoding.
    Write(String),
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Syntax { position, message } => {
                write!(f, "malformed task document at byte {position}: {message}")
            }
            Self::Json {
                line,
                column,
                message,
            } => write!(
                f,
                "malformed task document at line {line}, column {column}: {message}"
            ),
            Self::Encoding(message) => write!(f, "task document is not valid UTF-8: {message}"),
            Self::MissingRoot => write!(f, "task document has no root element"),
            Self::Truncated => write!(f, "task document ends inside an open element"),
            Self::MissingField { entry_index, field } => write!(
                f,
                "task entry #{entry_index} is missing required field `{field}`"
            ),
            Self::DuplicateId(id) => write!(f, "task id {id} appears more than once"),
            Self::Write(message) => write!(f, "failed to encode task document: {message}"),
        }
    }
}

impl Error for CodecError {}
