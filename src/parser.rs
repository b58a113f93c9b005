//! Streaming `<page>` scanner over a bzip2-compressed MediaWiki dump.
//!
//! The reader alternates between two modes: scanning tokens until a start tag
//! whose local name is the record tag, then decoding that element's subtree
//! into a [`RawPage`]. Only one page is materialized at a time.

use crate::config::{READ_BUFFER_SIZE, RECORD_TAG};
use crate::error::{ExtractError, Result};
use crate::models::RawPage;
use bzip2::read::MultiBzDecoder;
use quick_xml::escape::unescape;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use std::borrow::Cow;
use std::io::{BufRead, BufReader, Read};
use tracing::trace;

pub struct PageReader<R> {
    reader: Reader<R>,
    buf: Vec<u8>,
    record_tag: Vec<u8>,
    finished: bool,
}

#[derive(Clone, Copy)]
enum Field {
    Title,
    Text,
}

impl<R: Read> PageReader<BufReader<MultiBzDecoder<R>>> {
    /// Decodes every concatenated bzip2 member, so multistream dumps read in full.
    pub fn from_compressed(source: R) -> Self {
        let decoder = MultiBzDecoder::new(source);
        Self::from_xml(BufReader::with_capacity(READ_BUFFER_SIZE, decoder))
    }
}

impl<R: BufRead> PageReader<R> {
    pub fn from_xml(source: R) -> Self {
        let mut reader = Reader::from_reader(source);
        reader.expand_empty_elements(true);
        Self {
            reader,
            buf: Vec::with_capacity(8192),
            record_tag: RECORD_TAG.as_bytes().to_vec(),
            finished: false,
        }
    }

    pub fn with_record_tag(mut self, tag: &str) -> Self {
        self.record_tag = tag.as_bytes().to_vec();
        self
    }

    /// Next decoded page, `Ok(None)` at end of stream. Fused after the first
    /// error or end of stream.
    pub fn next_page(&mut self) -> Result<Option<RawPage>> {
        if self.finished {
            return Ok(None);
        }
        let result = self.scan();
        if !matches!(result, Ok(Some(_))) {
            self.finished = true;
        }
        result
    }

    fn scan(&mut self) -> Result<Option<RawPage>> {
        loop {
            self.buf.clear();
            let event = match self.reader.read_event_into(&mut self.buf) {
                Ok(event) => event,
                Err(err) => {
                    return Err(stream_error(err, self.reader.buffer_position(), false));
                }
            };

            let is_record = matches!(
                &event,
                Event::Start(e) if e.local_name().as_ref() == self.record_tag.as_slice()
            );
            let is_eof = matches!(event, Event::Eof);

            if is_record {
                return self.decode_page().map(Some);
            }
            if is_eof {
                return Ok(None);
            }
        }
    }

    fn decode_page(&mut self) -> Result<RawPage> {
        let mut page = RawPage::default();
        // Element names open below the record element.
        let mut path: Vec<Vec<u8>> = Vec::new();

        loop {
            self.buf.clear();
            let event = match self.reader.read_event_into(&mut self.buf) {
                Ok(event) => event,
                Err(err) => {
                    return Err(stream_error(err, self.reader.buffer_position(), true));
                }
            };

            let appended = match event {
                Event::Start(e) => {
                    path.push(e.local_name().as_ref().to_vec());
                    match field_at(&path) {
                        Some(Field::Title) => page.title.clear(),
                        Some(Field::Text) => page.text.clear(),
                        None => {}
                    }
                    Ok(())
                }
                Event::End(_) => {
                    if path.pop().is_none() {
                        trace!(title = %page.title, bytes = page.text.len(), "Decoded page");
                        return Ok(page);
                    }
                    Ok(())
                }
                Event::Text(e) => match field_at(&path) {
                    Some(field) => append_text(page.field_mut(field), &e, true),
                    None => Ok(()),
                },
                Event::CData(e) => match field_at(&path) {
                    Some(field) => append_text(page.field_mut(field), &e, false),
                    None => Ok(()),
                },
                Event::Eof => {
                    return Err(ExtractError::UnexpectedEof { title: page.title });
                }
                _ => Ok(()),
            };

            if let Err(err) = appended {
                return Err(stream_error(err, self.reader.buffer_position(), true));
            }
        }
    }
}

impl<R: BufRead> Iterator for PageReader<R> {
    type Item = Result<RawPage>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_page().transpose()
    }
}

impl RawPage {
    fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Title => &mut self.title,
            Field::Text => &mut self.text,
        }
    }
}

/// `title` directly under the record, or `text` under its `revision`.
fn field_at(path: &[Vec<u8>]) -> Option<Field> {
    match path {
        [name] if name.as_slice() == b"title" => Some(Field::Title),
        [parent, name] if parent.as_slice() == b"revision" && name.as_slice() == b"text" => {
            Some(Field::Text)
        }
        _ => None,
    }
}

fn append_text(
    target: &mut String,
    raw: &[u8],
    escaped: bool,
) -> std::result::Result<(), quick_xml::Error> {
    let raw = std::str::from_utf8(raw)?;
    let raw = normalize_newlines(raw);
    if escaped {
        target.push_str(&unescape(&raw)?);
    } else {
        target.push_str(&raw);
    }
    Ok(())
}

/// XML end-of-line handling: `\r\n` and lone `\r` become `\n`.
fn normalize_newlines(s: &str) -> Cow<'_, str> {
    if s.contains('\r') {
        Cow::Owned(s.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(s)
    }
}

/// I/O failures underneath the tokenizer come from the decompressed stream.
fn stream_error(err: quick_xml::Error, position: usize, in_record: bool) -> ExtractError {
    match err {
        quick_xml::Error::Io(_) => ExtractError::Decompress(err),
        _ if in_record => ExtractError::Decode {
            position,
            source: err,
        },
        _ => ExtractError::Tokenize {
            position,
            source: err,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bzip2::write::BzEncoder;
    use bzip2::Compression;
    use std::io::Write;

    fn pages(xml: &str) -> Vec<RawPage> {
        PageReader::from_xml(xml.as_bytes())
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    fn first_error(xml: &str) -> ExtractError {
        PageReader::from_xml(xml.as_bytes())
            .find_map(|r| r.err())
            .expect("expected an error")
    }

    fn bz2(xml: &str) -> Vec<u8> {
        let mut encoder = BzEncoder::new(Vec::new(), Compression::fast());
        encoder.write_all(xml.as_bytes()).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn reads_title_and_revision_text() {
        let xml = r#"<mediawiki>
            <siteinfo><sitename>Wikipedia</sitename></siteinfo>
            <page>
                <title>Dog</title>
                <ns>0</ns>
                <id>1</id>
                <revision>
                    <id>10</id>
                    <text xml:space="preserve">A dog is an animal.

More text here.</text>
                </revision>
            </page>
        </mediawiki>"#;
        let pages = pages(xml);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].title, "Dog");
        assert_eq!(pages[0].text, "A dog is an animal.\n\nMore text here.");
    }

    #[test]
    fn reads_pages_in_order() {
        let xml = "<mediawiki>\
            <page><title>A</title></page>\
            <page><title>B</title></page>\
            <page><title>C</title></page>\
        </mediawiki>";
        let titles: Vec<_> = pages(xml).into_iter().map(|p| p.title).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
    }

    #[test]
    fn no_pages() {
        assert!(pages("<mediawiki><siteinfo/></mediawiki>").is_empty());
        assert!(pages("").is_empty());
    }

    #[test]
    fn missing_fields_are_empty() {
        let pages = pages("<page><id>7</id></page>");
        assert_eq!(pages, vec![RawPage::default()]);
    }

    #[test]
    fn self_closing_elements_decode_empty() {
        let xml = r#"<mediawiki>
            <page/>
            <page><title>Blank</title><revision><text bytes="0" /></revision></page>
        </mediawiki>"#;
        let pages = pages(xml);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0], RawPage::default());
        assert_eq!(pages[1].title, "Blank");
        assert_eq!(pages[1].text, "");
    }

    #[test]
    fn ignores_text_outside_known_fields() {
        let xml = "<page>\
            <title>Dog</title>\
            <text>not under revision</text>\
            <revision><comment>edit summary</comment><text>Body</text></revision>\
            <redirect title=\"Canine\"/>\
        </page>";
        let pages = pages(xml);
        assert_eq!(pages[0].title, "Dog");
        assert_eq!(pages[0].text, "Body");
    }

    #[test]
    fn nested_title_is_not_the_page_title() {
        let xml = "<page><revision><title>Inner</title><text>x</text></revision><title>Outer</title></page>";
        assert_eq!(pages(xml)[0].title, "Outer");
    }

    #[test]
    fn repeated_field_keeps_last() {
        let xml = "<page><title>T</title>\
            <revision><text>old</text></revision>\
            <revision><text>new</text></revision>\
        </page>";
        assert_eq!(pages(xml)[0].text, "new");
    }

    #[test]
    fn unescapes_entities_and_reads_cdata() {
        let xml = "<page><title>AT&amp;T &#169;</title>\
            <revision><text>a &lt;b&gt; <![CDATA[<raw & text>]]> c</text></revision></page>";
        let pages = pages(xml);
        assert_eq!(pages[0].title, "AT&T ©");
        assert_eq!(pages[0].text, "a <b> <raw & text> c");
    }

    #[test]
    fn normalizes_carriage_returns() {
        let xml = "<page><title>T</title><revision><text>Lead.\r\n\r\nBody.\rEnd.</text></revision></page>";
        assert_eq!(pages(xml)[0].text, "Lead.\n\nBody.\nEnd.");
    }

    #[test]
    fn matches_record_by_local_name() {
        let xml = r#"<mw:mediawiki xmlns:mw="http://www.mediawiki.org/xml/export-0.11/">
            <mw:page><mw:title>Prefixed</mw:title></mw:page>
        </mw:mediawiki>"#;
        assert_eq!(pages(xml)[0].title, "Prefixed");
    }

    #[test]
    fn custom_record_tag() {
        let xml = "<root><page><title>Skipped</title></page><entry><title>Kept</title></entry></root>";
        let pages: Vec<_> = PageReader::from_xml(xml.as_bytes())
            .with_record_tag("entry")
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].title, "Kept");
    }

    #[test]
    fn eof_inside_page_is_an_error() {
        let err = first_error("<mediawiki><page><title>Dog</title>");
        match err {
            ExtractError::UnexpectedEof { title } => assert_eq!(title, "Dog"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn mismatched_tag_inside_page_is_decode_error() {
        let err = first_error("<mediawiki><page><title>Dog</text></page></mediawiki>");
        assert!(matches!(err, ExtractError::Decode { .. }), "{err:?}");
    }

    #[test]
    fn bad_entity_inside_page_is_decode_error() {
        let err = first_error("<page><title>&bogus;</title></page>");
        assert!(matches!(err, ExtractError::Decode { .. }), "{err:?}");
    }

    #[test]
    fn mismatched_tag_outside_page_is_tokenize_error() {
        let err = first_error("<mediawiki><siteinfo></mediawiki>");
        assert!(matches!(err, ExtractError::Tokenize { .. }), "{err:?}");
    }

    #[test]
    fn iterator_is_fused_after_error() {
        let mut reader = PageReader::from_xml(
            "<page><title>A</title></page><page><title>B</text></page><page><title>C</title></page>"
                .as_bytes(),
        );
        assert!(matches!(reader.next(), Some(Ok(_))));
        assert!(matches!(reader.next(), Some(Err(_))));
        assert!(reader.next().is_none());
        assert!(reader.next().is_none());
    }

    #[test]
    fn reads_compressed_stream() {
        let data = bz2("<mediawiki><page><title>Dog</title></page></mediawiki>");
        let pages: Vec<_> = PageReader::from_compressed(data.as_slice())
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].title, "Dog");
    }

    #[test]
    fn reads_every_member_of_multistream_input() {
        let mut data = bz2("<mediawiki><page><title>First</title></page>");
        data.extend(bz2("<page><title>Second</title></page>"));
        data.extend(bz2("<page><title>Third</title></page></mediawiki>"));

        let titles: Vec<_> = PageReader::from_compressed(data.as_slice())
            .map(|p| p.unwrap().title)
            .collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn non_bzip2_input_is_decompress_error() {
        let data = b"<mediawiki><page><title>plain xml</title></page></mediawiki>";
        let err = PageReader::from_compressed(&data[..])
            .find_map(|r| r.err())
            .expect("expected an error");
        assert!(matches!(err, ExtractError::Decompress(_)), "{err:?}");
    }

    #[test]
    fn truncated_compressed_stream_is_decompress_error() {
        let data = bz2("<mediawiki><page><title>Dog</title></page></mediawiki>");
        let truncated = &data[..data.len() / 2];
        let err = PageReader::from_compressed(truncated)
            .find_map(|r| r.err())
            .expect("expected an error");
        assert!(matches!(err, ExtractError::Decompress(_)), "{err:?}");
    }
}
