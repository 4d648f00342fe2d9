//! JSON document format.
//!
//! The document is a pretty-printed array of task objects:
//! ```text
//! [
//!   {
//!     "title": "Buy milk",
//!     "description": "2% milk",
//!     "date": "2026-10-19 09:15:02",
//!     "completed": false,
//!     "id": "8975d81b-d18c-4c17-a918-0aa22cfb27eb"
//!   }
//! ]
//! ```
//!
//! Entries go through the same skip and fallback rules as the XML document.

use super::entry::{EntryCollector, EntryDraft};
use super::{CodecError, CodecResult, DecodedDocument};
use crate::model::task::{Task, TaskId};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamp pattern of the JSON `date` field, e.g. `2026-10-19 09:15:02`.
pub const JSON_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Serialized shape of one task. Field order is the on-disk key order.
#[derive(Debug, Serialize)]
struct TaskRecord<'a> {
    title: &'a str,
    description: &'a str,
    date: String,
    completed: bool,
    id: TaskId,
}

/// Lenient read shape; validation happens in `EntryCollector`.
#[derive(Debug, Deserialize)]
struct TaskRecordInput {
    title: Option<String>,
    description: Option<String>,
    date: Option<String>,
    completed: Option<bool>,
    id: Option<String>,
}

/// Decodes a JSON task array.
///
/// # Errors
/// - `Json` when the input is not an array of task objects.
/// - `MissingField` when an entry lacks `title` or `description`.
/// - `DuplicateId` when two entries share an id.
pub fn decode_json_document(input: &str) -> CodecResult<DecodedDocument> {
    let records: Vec<TaskRecordInput> =
        serde_json::from_str(input).map_err(|err| CodecError::Json {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        })?;

    let mut entries = EntryCollector::default();
    for (entry_index, record) in records.into_iter().enumerate() {
        let draft = EntryDraft {
            entry_index,
            raw_id: record.id.unwrap_or_default(),
            completed: record.completed.unwrap_or(false),
            title: record.title,
            description: record.description,
            created_at: record.date,
        };
        entries.admit(draft, parse_json_date)?;
    }
    Ok(entries.into_document())
}

/// Encodes the task collection as a pretty-printed JSON array ending with a
/// newline.
pub fn encode_json_document(tasks: &[Task]) -> CodecResult<String> {
    let records: Vec<TaskRecord<'_>> = tasks
        .iter()
        .map(|task| TaskRecord {
            title: &task.title,
            description: &task.description,
            date: task.created_at().format(JSON_DATE_FORMAT).to_string(),
            completed: task.completed,
            id: task.id(),
        })
        .collect();

    let mut document =
        serde_json::to_string_pretty(&records).map_err(|err| CodecError::Write(err.to_string()))?;
    document.push('\n');
    Ok(document)
}

fn parse_json_date(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), JSON_DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::{decode_json_document, encode_json_document};
    use crate::codec::CodecError;
    use crate::model::task::Task;
    use chrono::NaiveDate;
    use uuid::Uuid;

    const FIRST_ID: &str = "8975d81b-d18c-4c17-a918-0aa22cfb27eb";

    fn fixed_task(id: &str, title: &str, description: &str, completed: bool) -> Task {
        let created_at = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(21, 15, 2)
            .unwrap();
        Task::with_id(
            Uuid::parse_str(id).unwrap(),
            created_at,
            title,
            description,
            completed,
        )
    }

    #[test]
    fn encode_writes_pretty_array_in_field_order() {
        let task = fixed_task(FIRST_ID, "Buy milk", "2% milk", false);

        let json = encode_json_document(&[task]).unwrap();

        assert!(json.starts_with("[\n  {\n    \"title\": \"Buy milk\",\n"));
        assert!(json.contains("\"date\": \"2026-10-19 21:15:02\""));
        assert!(json.contains("\"completed\": false"));
        assert!(json.contains(&format!("\"id\": \"{FIRST_ID}\"")));
        assert!(json.ends_with("]\n"));
        assert_eq!(encode_json_document(&[]).unwrap(), "[]\n");
    }

    #[test]
    fn varied_tasks_survive_decode_unchanged() {
        let tasks = vec![
            fixed_task(
                "00000000-0000-4000-8000-00000000000a",
                "  padded ",
                "\n body\n",
                true,
            ),
            fixed_task("00000000-0000-4000-8000-00000000000b", "   ", "", false),
            fixed_task(
                "00000000-0000-4000-8000-00000000000c",
                "<b>&amp;</b>",
                "it's \"quoted\" \\ back",
                true,
            ),
            fixed_task("00000000-0000-4000-8000-00000000000d", "null", "null", false),
        ];

        let decoded = decode_json_document(&encode_json_document(&tasks).unwrap()).unwrap();

        assert_eq!(decoded.tasks, tasks);
        assert_eq!(decoded.skipped, 0);
        assert_eq!(decoded.timestamp_fallbacks, 0);
    }

    #[test]
    fn decode_applies_skip_and_fallback_rules() {
        let input = format!(
            r#"[
              {{ "title": "no id", "description": "x", "date": "2025-01-01 01:00:00" }},
              {{ "title": "null id", "description": "x", "id": null }},
              {{ "title": "bad id", "description": "x", "id": "not-a-uuid" }},
              {{ "title": "kept", "description": "x", "completed": true, "id": "{FIRST_ID}",
                 "date": "yesterday", "extra": 1 }}
            ]"#
        );

        let decoded = decode_json_document(&input).unwrap();

        assert_eq!(decoded.skipped, 3);
        assert_eq!(decoded.timestamp_fallbacks, 1);
        assert_eq!(decoded.tasks.len(), 1);
        assert_eq!(decoded.tasks[0].title, "kept");
        assert!(decoded.tasks[0].completed);
    }

    #[test]
    fn decode_rejects_missing_description_duplicates_and_malformed_input() {
        let missing = format!(r#"[{{ "title": "t", "id": "{FIRST_ID}" }}]"#);
        assert_eq!(
            decode_json_document(&missing).unwrap_err(),
            CodecError::MissingField {
                entry_index: 0,
                field: "description"
            }
        );

        let entry = format!(r#"{{ "title": "t", "description": "d", "id": "{FIRST_ID}" }}"#);
        let duplicated = format!("[{entry}, {entry}]");
        assert!(matches!(
            decode_json_document(&duplicated).unwrap_err(),
            CodecError::DuplicateId(id) if id.to_string() == FIRST_ID
        ));

        assert!(matches!(
            decode_json_document("[{\"title\": ").unwrap_err(),
            CodecError::Json { .. }
        ));
        assert!(matches!(
            decode_json_document("{\"tasks\": []}").unwrap_err(),
            CodecError::Json { .. }
        ));
    }
}
