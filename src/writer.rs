use crate::config::{DOC_TAG, OUTPUT_INDENT, ROOT_TAG};
use crate::error::{ExtractError, Result};
use crate::models::Summary;
use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::writer::Writer;
use std::io::Write;

/// Append-only writer for the `<documents>` output.
///
/// [`begin`](Self::begin) emits the declaration and the root open tag,
/// [`write_doc`](Self::write_doc) appends one `<doc>` per summary as it
/// arrives, and [`finish`](Self::finish) closes the root exactly once.
pub struct AbstractWriter<W: Write> {
    writer: Writer<W>,
    docs_written: u64,
}

impl<W: Write> AbstractWriter<W> {
    pub fn begin(inner: W) -> Result<Self> {
        let mut writer = Writer::new_with_indent(inner, b' ', OUTPUT_INDENT);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(ExtractError::Write)?;
        writer
            .write_event(Event::Start(BytesStart::new(ROOT_TAG)))
            .map_err(ExtractError::Write)?;
        Ok(Self {
            writer,
            docs_written: 0,
        })
    }

    pub fn write_doc(&mut self, summary: &Summary) -> Result<()> {
        self.writer
            .create_element(DOC_TAG)
            .write_inner_content(|w| {
                w.create_element("title")
                    .write_text_content(field_text(&summary.title))?;
                w.create_element("url")
                    .write_text_content(field_text(&summary.url))?;
                w.create_element("abstract")
                    .write_text_content(field_text(&summary.abstract_text))?;
                Ok(())
            })
            .map_err(ExtractError::Write)?;
        self.docs_written += 1;
        Ok(())
    }

    pub fn docs_written(&self) -> u64 {
        self.docs_written
    }

    /// Closes the root element and flushes, returning the destination.
    pub fn finish(mut self) -> Result<W> {
        self.writer
            .write_event(Event::End(BytesEnd::new(ROOT_TAG)))
            .map_err(ExtractError::Write)?;
        let inner = self.writer.get_mut();
        inner.write_all(b"\n").map_err(ExtractError::write_io)?;
        inner.flush().map_err(ExtractError::write_io)?;
        Ok(self.writer.into_inner())
    }
}

/// Markup characters are escaped as usual; line breaks and tabs become
/// character references so every field stays on a single line.
fn field_text(text: &str) -> BytesText<'static> {
    let escaped = escape(text);
    let mut out = String::with_capacity(escaped.len());
    for c in escaped.chars() {
        match c {
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            '\t' => out.push_str("&#x9;"),
            _ => out.push(c),
        }
    }
    BytesText::from_escaped(out)
}
