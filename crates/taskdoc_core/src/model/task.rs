//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record held by the store and the document.
//! - Own the fixed timestamp text format shared by codec and display.
//!
//! # Invariants
//! - `id` is generated once and never reassigned.
//! - `created_at` is truncated to whole seconds so it survives the document
//!   format unchanged.
//! - `completed` starts as `false`.

use chrono::{Local, NaiveDateTime, Timelike};
use uuid::Uuid;

/// Stable identifier for a task.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TaskId = Uuid;

/// Timestamp pattern used by the `CreatedAt` document field,
/// e.g. `10-19-2026 09:15:02 AM`.
pub const CREATED_AT_FORMAT: &str = "%m-%d-%Y %I:%M:%S %p";

/// Canonical task record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    created_at: NaiveDateTime,
    /// Short label shown in menus. Callers keep it non-empty.
    pub title: String,
    /// Free text, may be empty.
    pub description: String,
    /// Completion flag, flipped by `toggle_completed`.
    pub completed: bool,
}

impl Task {
    /// Creates a new task with a generated ID and the current local time.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), now_seconds(), title, description, false)
    }

    /// Rebuilds a task whose identity already exists, e.g. when decoding
    /// the document.
    pub fn with_id(
        id: TaskId,
        created_at: NaiveDateTime,
        title: impl Into<String>,
        description: impl Into<String>,
        completed: bool,
    ) -> Self {
        Self {
            id,
            created_at: truncate_to_seconds(created_at),
            title: title.into(),
            description: description.into(),
            completed,
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Local wall-clock creation time.
    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    /// Renders `created_at` in the document timestamp format.
    pub fn display_created_at(&self) -> String {
        format_created_at(self.created_at)
    }

    /// Flips the completion flag and returns the new value.
    pub fn toggle(&mut self) -> bool {
        self.completed = !self.completed;
        self.completed
    }
}

/// Formats a timestamp using [`CREATED_AT_FORMAT`].
pub fn format_created_at(value: NaiveDateTime) -> String {
    value.format(CREATED_AT_FORMAT).to_string()
}

/// Parses a timestamp written with [`CREATED_AT_FORMAT`].
///
/// Returns `None` for any text the pattern does not accept.
pub fn parse_created_at(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), CREATED_AT_FORMAT).ok()
}

/// Current local time at second resolution.
pub fn now_seconds() -> NaiveDateTime {
    truncate_to_seconds(Local::now().naive_local())
}

fn truncate_to_seconds(value: NaiveDateTime) -> NaiveDateTime {
    value.with_nanosecond(0).unwrap_or(value)
}
