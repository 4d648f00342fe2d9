//! Entry validation shared by the XML and JSON decoders.
//!
//! # Invariants
//! - Entries without a usable id are skipped, never admitted.
//! - An unparseable or absent timestamp falls back to the current time.
//! - Missing `title` or `description` fails the whole document.

use super::{CodecError, CodecResult, DecodedDocument, DESCRIPTION_ELEMENT, TITLE_ELEMENT};
use crate::model::task::{now_seconds, Task, TaskId};
use chrono::NaiveDateTime;
use log::warn;
use std::collections::HashSet;
use uuid::Uuid;

/// Raw fields of one entry before validation.
#[derive(Debug, Default)]
pub(super) struct EntryDraft {
    pub(super) entry_index: usize,
    pub(super) raw_id: String,
    pub(super) completed: bool,
    pub(super) title: Option<String>,
    pub(super) description: Option<String>,
    pub(super) created_at: Option<String>,
}

/// Accumulates validated entries in document order.
#[derive(Debug, Default)]
pub(super) struct EntryCollector {
    document: DecodedDocument,
    seen_ids: HashSet<TaskId>,
}

impl EntryCollector {
    pub(super) fn admit(
        &mut self,
        draft: EntryDraft,
        parse_timestamp: fn(&str) -> Option<NaiveDateTime>,
    ) -> CodecResult<()> {
        let entry_index = draft.entry_index;
        let title = draft.title.ok_or(CodecError::MissingField {
            entry_index,
            field: TITLE_ELEMENT,
        })?;
        let description = draft.description.ok_or(CodecError::MissingField {
            entry_index,
            field: DESCRIPTION_ELEMENT,
        })?;

        let raw_id = draft.raw_id.trim();
        if raw_id.is_empty() {
            warn!(
                "event=task_decode module=codec status=skipped entry_index={entry_index} reason=missing_id"
            );
            self.document.skipped += 1;
            return Ok(());
        }
        let id = match Uuid::parse_str(raw_id) {
            Ok(id) if !id.is_nil() => id,
            _ => {
                warn!(
                    "event=task_decode module=codec status=skipped entry_index={entry_index} reason=invalid_id"
                );
                self.document.skipped += 1;
                return Ok(());
            }
        };
        if !self.seen_ids.insert(id) {
            return Err(CodecError::DuplicateId(id));
        }

        let created_at = match draft.created_at.as_deref().and_then(parse_timestamp) {
            Some(parsed) => parsed,
            None => {
                let reason = if draft.created_at.is_some() {
                    "invalid_created_at"
                } else {
                    "missing_created_at"
                };
                warn!(
                    "event=task_decode module=codec status=fallback task_id={id} reason={reason}"
                );
                self.document.timestamp_fallbacks += 1;
                now_seconds()
            }
        };

        self.document.tasks.push(Task::with_id(
            id,
            created_at,
            title,
            description,
            draft.completed,
        ));
        Ok(())
    }

    pub(super) fn into_document(self) -> DecodedDocument {
        self.document
    }
}
