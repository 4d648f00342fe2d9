//! XML document decoding.
//!
//! # Responsibility
//! - Stream the XML document once and build tasks in document order.
//! - Keep field text verbatim; only layout whitespace between elements is
//!   dropped.

use super::entry::{EntryCollector, EntryDraft};
use super::{
    CodecError, CodecResult, DecodedDocument, COMPLETED_ATTRIBUTE, CREATED_AT_ELEMENT,
    DESCRIPTION_ELEMENT, ID_ATTRIBUTE, TASK_ELEMENT, TITLE_ELEMENT,
};
use crate::model::task::parse_created_at;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Decodes a full XML task document.
///
/// The root element name is not enforced; every `<task>` element directly
/// under the root is an entry. Other elements are ignored.
///
/// # Errors
/// - `Syntax` for malformed XML.
/// - `MissingRoot` when the input has no element at all.
/// - `MissingField` when an entry lacks `title` or `description`.
/// - `DuplicateId` when two entries share an id.
pub fn decode_document(input: &str) -> CodecResult<DecodedDocument> {
    let mut reader = Reader::from_str(input);

    let mut entries = EntryCollector::default();
    let mut depth = 0usize;
    let mut root_seen = false;
    let mut entry_index = 0usize;
    let mut draft: Option<EntryDraft> = None;
    let mut field: Option<Field> = None;

    loop {
        let event = reader.read_event().map_err(|err| CodecError::Syntax {
            position: reader.buffer_position() as u64,
            message: err.to_string(),
        })?;

        match event {
            Event::Start(element) => {
                match depth {
                    0 => root_seen = true,
                    1 if is_task(&element) => {
                        draft = Some(draft_from_element(&element, entry_index, &reader)?);
                        entry_index += 1;
                    }
                    2 => {
                        if let Some(current) = draft.as_mut() {
                            field = Field::from_element(&element);
                            if let Some(opened) = field {
                                opened.slot(current).get_or_insert_with(String::new);
                            }
                        }
                    }
                    _ => {}
                }
                depth += 1;
            }
            Event::Empty(element) => match depth {
                0 => root_seen = true,
                1 if is_task(&element) => {
                    let empty = draft_from_element(&element, entry_index, &reader)?;
                    entry_index += 1;
                    entries.admit(empty, parse_created_at)?;
                }
                2 => {
                    if let (Some(current), Some(opened)) =
                        (draft.as_mut(), Field::from_element(&element))
                    {
                        opened.slot(current).get_or_insert_with(String::new);
                    }
                }
                _ => {}
            },
            // Text outside a field is layout between elements.
            Event::Text(text) => {
                if let (Some(current), Some(active)) = (draft.as_mut(), field) {
                    let value = text.unescape().map_err(|err| CodecError::Syntax {
                        position: reader.buffer_position() as u64,
                        message: err.to_string(),
                    })?;
                    active.append(current, &value);
                }
            }
            Event::CData(data) => {
                if let (Some(current), Some(active)) = (draft.as_mut(), field) {
                    let value = std::str::from_utf8(&data)
                        .map_err(|err| CodecError::Encoding(err.to_string()))?;
                    active.append(current, value);
                }
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                match depth {
                    2 => field = None,
                    1 => {
                        if let Some(finished) = draft.take() {
                            entries.admit(finished, parse_created_at)?;
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !root_seen {
        return Err(CodecError::MissingRoot);
    }
    if depth != 0 {
        return Err(CodecError::Truncated);
    }

    Ok(entries.into_document())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Description,
    CreatedAt,
}

impl Field {
    fn from_element(element: &BytesStart<'_>) -> Option<Self> {
        let name = element.local_name();
        if name.as_ref() == TITLE_ELEMENT.as_bytes() {
            Some(Self::Title)
        } else if name.as_ref() == DESCRIPTION_ELEMENT.as_bytes() {
            Some(Self::Description)
        } else if name.as_ref() == CREATED_AT_ELEMENT.as_bytes() {
            Some(Self::CreatedAt)
        } else {
            None
        }
    }

    fn slot(self, draft: &mut EntryDraft) -> &mut Option<String> {
        match self {
            Self::Title => &mut draft.title,
            Self::Description => &mut draft.description,
            Self::CreatedAt => &mut draft.created_at,
        }
    }

    fn append(self, draft: &mut EntryDraft, value: &str) {
        self.slot(draft)
            .get_or_insert_with(String::new)
            .push_str(value);
    }
}

fn draft_from_element(
    element: &BytesStart<'_>,
    entry_index: usize,
    reader: &Reader<&[u8]>,
) -> CodecResult<EntryDraft> {
    let mut draft = EntryDraft {
        entry_index,
        ..EntryDraft::default()
    };

    for attribute in element.attributes() {
        let attribute = attribute.map_err(|err| CodecError::Syntax {
            position: reader.buffer_position() as u64,
            message: err.to_string(),
        })?;
        let value = attribute
            .unescape_value()
            .map_err(|err| CodecError::Syntax {
                position: reader.buffer_position() as u64,
                message: err.to_string(),
            })?;

        let key = attribute.key.as_ref();
        if key == ID_ATTRIBUTE.as_bytes() {
            draft.raw_id = value.into_owned();
        } else if key == COMPLETED_ATTRIBUTE.as_bytes() {
            draft.completed = value.trim().eq_ignore_ascii_case("true");
        }
    }

    Ok(draft)
}

fn is_task(element: &BytesStart<'_>) -> bool {
    element.local_name().as_ref() == TASK_ELEMENT.as_bytes()
}
