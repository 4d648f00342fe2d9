//! XML document encoding.

use super::{
    CodecError, CodecResult, COMPLETED_ATTRIBUTE, CREATED_AT_ELEMENT, DESCRIPTION_ELEMENT,
    ID_ATTRIBUTE, ROOT_ELEMENT, TASK_ELEMENT, TITLE_ELEMENT,
};
use crate::model::task::Task;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

const INDENT_WIDTH: usize = 4;

/// Encodes the full task collection as an indented XML document.
///
/// Field text is written verbatim (escaped, never re-indented). Attributes are written as `completed` then `id`; children as `title`,
/// `description`, `CreatedAt`. Output ends with a single newline.
pub fn encode_document(tasks: &[Task]) -> CodecResult<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_WIDTH);

    write_event(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("no"))),
    )?;
    write_event(&mut writer, Event::Start(BytesStart::new(ROOT_ELEMENT)))?;

    for task in tasks {
        let id = task.id().to_string();
        let mut entry = BytesStart::new(TASK_ELEMENT);
        entry.push_attribute((COMPLETED_ATTRIBUTE, bool_text(task.completed)));
        entry.push_attribute((ID_ATTRIBUTE, id.as_str()));

        write_event(&mut writer, Event::Start(entry))?;
        write_text_element(&mut writer, TITLE_ELEMENT, &task.title)?;
        write_text_element(&mut writer, DESCRIPTION_ELEMENT, &task.description)?;
        write_text_element(&mut writer, CREATED_AT_ELEMENT, &task.display_created_at())?;
        write_event(&mut writer, Event::End(BytesEnd::new(TASK_ELEMENT)))?;
    }

    write_event(&mut writer, Event::End(BytesEnd::new(ROOT_ELEMENT)))?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes).map_err(|err| CodecError::Write(err.to_string()))
}

fn write_text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> CodecResult<()> {
    write_event(writer, Event::Start(BytesStart::new(name)))?;
    write_event(writer, Event::Text(BytesText::new(text)))?;
    write_event(writer, Event::End(BytesEnd::new(name)))
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> CodecResult<()> {
    writer
        .write_event(event)
        .map_err(|err| CodecError::Write(err.to_string()))
}

fn bool_text(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
