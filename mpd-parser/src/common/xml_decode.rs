//! Streaming XML decoding for MPD documents.
//!
//! The decoder walks a [`quick_xml::Reader`] forward-only and hands each
//! element to a per-type [`DecodeElement`] implementation. Implementations
//! pick the attributes and children they know and leave the rest to
//! [`XmlDecoder::skip`], so vendor extensions never break a parse.
//!
//! The decoder keeps the chain of open elements so that every error can say
//! where in the document it happened.

use std::io::BufRead;

use quick_xml::events::{BytesStart, Event as XmlEvent};
use quick_xml::Reader;

use crate::common::attributes::Attributes;
use crate::error::{ElementPath, ParseError, ParseResult};

/// Default limit on element nesting.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// An element whose start tag has been read.
#[derive(Debug, Clone)]
pub struct Element {
    start: BytesStart<'static>,
    is_empty: bool,
}

impl Element {
    /// Local (unprefixed) tag name.
    pub fn name(&self) -> String {
        String::from_utf8_lossy(self.start.local_name().as_ref()).into_owned()
    }

    /// Whether the element was written as `<Tag/>`.
    pub fn is_empty(&self) -> bool {
        self.is_empty
    }

    pub(crate) fn start(&self) -> &BytesStart<'static> {
        &self.start
    }
}

/// A model type that knows how to build itself from an element.
pub trait DecodeElement: Sized {
    /// Decode `element`, consuming everything up to and including its end tag.
    fn decode<R: BufRead>(decoder: &mut XmlDecoder<R>, element: Element) -> ParseResult<Self>;
}

/// A model type that can be the root of a document.
pub trait RootElement: DecodeElement {
    /// Local name the root element must have.
    const TAG: &'static str;
}

enum Node {
    Child(Element),
    Text(String),
    End,
}

// Owned view of a reader event, detached from the read buffer.
enum Raw {
    Start(BytesStart<'static>),
    Empty(BytesStart<'static>),
    End,
    Text(String),
    Other,
    Eof,
}

/// Forward-only decoder over a buffered XML input.
pub struct XmlDecoder<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    path: ElementPath,
    max_depth: usize,
}

impl<R: BufRead> XmlDecoder<R> {
    pub fn new(input: R) -> Self {
        Self::with_max_depth(input, DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(input: R, max_depth: usize) -> Self {
        let mut reader = Reader::from_reader(input);
        reader.check_end_names(true);
        reader.expand_empty_elements(false);
        reader.trim_text(false);

        Self {
            reader,
            buf: Vec::new(),
            path: ElementPath::default(),
            max_depth,
        }
    }

    /// Path of the element currently being decoded.
    pub fn path(&self) -> &ElementPath {
        &self.path
    }

    /// Decode the document root as `T`.
    ///
    /// Prolog content (declaration, comments, doctype) is skipped. The root
    /// must be named `T::TAG`. After the root closes, the rest of the input
    /// is read to make sure the document is well-formed.
    pub fn decode_root<T: RootElement>(mut self) -> ParseResult<T> {
        let root = loop {
            match self.read_raw()? {
                Raw::Start(start) => break Element { start, is_empty: false },
                Raw::Empty(start) => break Element { start, is_empty: true },
                Raw::Text(text) if text.trim().is_empty() => {}
                Raw::Text(_) => return Err(self.malformed("text content before the root element")),
                Raw::End => return Err(self.malformed("closing tag before the root element")),
                Raw::Other => {}
                Raw::Eof => return Err(self.malformed("no root element")),
            }
        };

        let name = root.name();
        if name != T::TAG {
            return Err(self.malformed(format!(
                "unexpected root element <{}>, expected <{}>",
                name,
                T::TAG
            )));
        }

        self.path.push(name);
        let value = T::decode(&mut self, root)?;
        self.path.pop();

        self.finish()?;
        Ok(value)
    }

    // Only comments, processing instructions and whitespace may follow the root.
    fn finish(&mut self) -> ParseResult<()> {
        loop {
            match self.read_raw()? {
                Raw::Eof => return Ok(()),
                Raw::Text(text) if text.trim().is_empty() => {}
                Raw::Text(_) => return Err(self.malformed("text content after the root element")),
                Raw::Start(_) | Raw::Empty(_) => {
                    return Err(self.malformed("more than one root element"))
                }
                Raw::End => return Err(self.malformed("unexpected closing tag after the root element")),
                Raw::Other => {}
            }
        }
    }

    /// Read the attributes of `element`.
    pub fn attributes(&self, element: &Element) -> ParseResult<Attributes> {
        Attributes::read(element.start(), &self.path)
            .map_err(|reason| self.malformed(reason))
    }

    /// Visit each child element of `element` in document order.
    ///
    /// `visit` must consume the child it is given, either by decoding it or
    /// by passing it to [`XmlDecoder::skip`]. Text between children is
    /// discarded.
    pub fn children<F>(&mut self, element: &Element, visit: F) -> ParseResult<()>
    where
        F: FnMut(&mut Self, Element) -> ParseResult<()>,
    {
        self.walk(element, visit, None)
    }

    /// Like [`XmlDecoder::children`], also returning the element's own text
    /// and CDATA content verbatim.
    pub fn children_with_text<F>(&mut self, element: &Element, visit: F) -> ParseResult<String>
    where
        F: FnMut(&mut Self, Element) -> ParseResult<()>,
    {
        let mut text = String::new();
        self.walk(element, visit, Some(&mut text))?;
        Ok(text)
    }

    /// Decode a child element as `T`.
    pub fn decode<T: DecodeElement>(&mut self, element: Element) -> ParseResult<T> {
        T::decode(self, element)
    }

    /// Text content of `element`, ignoring any nested elements.
    pub fn text(&mut self, element: Element) -> ParseResult<String> {
        self.children_with_text(&element, |d, child| d.skip(child))
    }

    /// Consume `element` and its whole subtree without interpreting it.
    pub fn skip(&mut self, element: Element) -> ParseResult<()> {
        tracing::trace!(path = %self.path, "skipping element");
        if element.is_empty {
            return Ok(());
        }
        let end = element.start.to_end();
        let result = self.reader.read_to_end_into(end.name(), &mut self.buf);
        self.buf.clear();
        match result {
            Ok(_) => Ok(()),
            Err(e) => Err(to_parse_error(e, &self.path, self.reader.buffer_position() as u64)),
        }
    }

    fn walk<F>(&mut self, element: &Element, mut visit: F, mut text: Option<&mut String>) -> ParseResult<()>
    where
        F: FnMut(&mut Self, Element) -> ParseResult<()>,
    {
        if element.is_empty {
            return Ok(());
        }

        let mut seen: Vec<(String, usize)> = Vec::new();

        loop {
            match self.next_node()? {
                Node::End => return Ok(()),
                Node::Text(content) => {
                    if let Some(out) = text.as_deref_mut() {
                        out.push_str(&content);
                    }
                }
                Node::Child(child) => {
                    let name = child.name();
                    let index = match seen.iter_mut().find(|(n, _)| *n == name) {
                        Some((_, count)) => {
                            *count += 1;
                            *count
                        }
                        None => {
                            seen.push((name.clone(), 0));
                            0
                        }
                    };

                    self.path.push(format!("{}[{}]", name, index));
                    if self.path.depth() > self.max_depth {
                        return Err(self.malformed(format!(
                            "element nesting exceeds the limit of {}",
                            self.max_depth
                        )));
                    }
                    visit(self, child)?;
                    self.path.pop();
                }
            }
        }
    }

    fn next_node(&mut self) -> ParseResult<Node> {
        loop {
            match self.read_raw()? {
                Raw::Start(start) => return Ok(Node::Child(Element { start, is_empty: false })),
                Raw::Empty(start) => return Ok(Node::Child(Element { start, is_empty: true })),
                Raw::End => return Ok(Node::End),
                Raw::Text(text) => return Ok(Node::Text(text)),
                Raw::Other => {}
                Raw::Eof => return Err(self.malformed("unexpected end of document")),
            }
        }
    }

    fn read_raw(&mut self) -> ParseResult<Raw> {
        let event = match self.reader.read_event_into(&mut self.buf) {
            Ok(event) => event,
            Err(e) => {
                return Err(to_parse_error(e, &self.path, self.reader.buffer_position() as u64))
            }
        };

        let raw = match event {
            XmlEvent::Start(e) => Raw::Start(e.into_owned()),
            XmlEvent::Empty(e) => Raw::Empty(e.into_owned()),
            XmlEvent::End(_) => Raw::End,
            XmlEvent::Text(t) => match t.unescape() {
                Ok(text) => Raw::Text(text.into_owned()),
                Err(e) => {
                    return Err(to_parse_error(e, &self.path, self.reader.buffer_position() as u64))
                }
            },
            XmlEvent::CData(c) => match self.reader.decoder().decode(&c) {
                Ok(text) => Raw::Text(text.into_owned()),
                Err(e) => {
                    return Err(to_parse_error(e, &self.path, self.reader.buffer_position() as u64))
                }
            },
            XmlEvent::Eof => Raw::Eof,
            _ => Raw::Other,
        };
        self.buf.clear();
        Ok(raw)
    }

    pub(crate) fn malformed(&self, reason: impl Into<String>) -> ParseError {
        ParseError::MalformedDocument {
            path: self.path.clone(),
            position: self.reader.buffer_position() as u64,
            reason: reason.into(),
        }
    }
}

fn to_parse_error(error: quick_xml::Error, path: &ElementPath, position: u64) -> ParseError {
    match error {
        quick_xml::Error::Io(io) => {
            ParseError::Io(std::io::Error::new(io.kind(), io.to_string()))
        }
        other => ParseError::MalformedDocument {
            path: path.clone(),
            position,
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Note {
        lang: Option<String>,
        body: String,
        tags: Vec<String>,
    }

    impl RootElement for Note {
        const TAG: &'static str = "Note";
    }

    impl DecodeElement for Note {
        fn decode<R: BufRead>(decoder: &mut XmlDecoder<R>, element: Element) -> ParseResult<Self> {
            let attrs = decoder.attributes(&element)?;
            let lang = attrs.string("lang");
            let mut tags = Vec::new();
            let body = decoder.children_with_text(&element, |d, child| match child.name().as_str() {
                "Tag" => {
                    let attrs = d.attributes(&child)?;
                    tags.push(attrs.string("name").unwrap_or_default());
                    d.skip(child)
                }
                _ => d.skip(child),
            })?;
            Ok(Note { lang, body, tags })
        }
    }

    fn decode_note(xml: &str) -> ParseResult<Note> {
        XmlDecoder::new(xml.as_bytes()).decode_root()
    }

    #[test]
    fn test_decode_text_and_children() {
        let note = decode_note(
            r#"<?xml version="1.0"?><Note lang="en"> hello <Tag name="a"/><Unknown><Tag name="x"/></Unknown><Tag name="b"></Tag>world </Note>"#,
        )
        .unwrap();

        assert_eq!(note.lang.as_deref(), Some("en"));
        assert_eq!(note.body, " hello world ");
        assert_eq!(note.tags, vec!["a", "b"]);
    }

    #[test]
    fn test_decode_cdata_and_entities() {
        let note = decode_note(r#"<Note><![CDATA[<raw>]]>&amp;done</Note>"#).unwrap();
        assert_eq!(note.body, "<raw>&done");
    }

    #[test]
    fn test_decode_prefixed_root() {
        let note = decode_note(r#"<n:Note xmlns:n="urn:test" n:lang="fr"/>"#).unwrap();
        assert_eq!(note.lang.as_deref(), Some("fr"));
        assert!(note.body.is_empty());
    }

    #[test]
    fn test_wrong_root_is_malformed() {
        let err = decode_note("<Other/>").unwrap_err();
        assert!(matches!(err, ParseError::MalformedDocument { .. }));
        assert!(err.to_string().contains("unexpected root element <Other>"));
    }

    #[test]
    fn test_empty_input_is_malformed() {
        let err = decode_note("  ").unwrap_err();
        assert!(err.to_string().contains("no root element"));
    }

    #[test]
    fn test_truncated_input_is_malformed() {
        let err = decode_note(r#"<Note><Tag name="a">"#).unwrap_err();
        assert!(matches!(err, ParseError::MalformedDocument { .. }));
    }

    #[test]
    fn test_mismatched_end_tag_is_malformed() {
        let err = decode_note(r#"<Note><Tag></Note></Tag>"#).unwrap_err();
        assert!(matches!(err, ParseError::MalformedDocument { .. }));
    }

    #[test]
    fn test_second_root_is_malformed() {
        let err = decode_note("<Note/><Note/>").unwrap_err();
        assert!(err.to_string().contains("more than one root element"));
    }

    #[test]
    fn test_depth_limit() {
        let xml = r#"<Note><Tag name="a"/></Note>"#;

        let err = XmlDecoder::with_max_depth(xml.as_bytes(), 1)
            .decode_root::<Note>()
            .unwrap_err();
        assert!(err.to_string().contains("nesting exceeds the limit of 1"));

        let ok = XmlDecoder::with_max_depth(xml.as_bytes(), 2).decode_root::<Note>();
        assert!(ok.is_ok());
    }
}
