//! XML parser implementation on top of `quick-xml`

use std::borrow::Cow;

use indexmap::IndexMap;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, ErrorKind, Pos, Result};
use crate::xml::model::{Content, Document, Element};

/// Read limits
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Maximum element nesting depth (0 means unlimited)
    pub max_depth: u16,
    /// Maximum input size in bytes (0 means unlimited)
    pub max_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: 128,
            max_size: 10 * 1024 * 1024, // 10 MB default
        }
    }
}

impl Config {
    /// Create a new config with unlimited depth and size
    pub const fn unlimited() -> Self {
        Self {
            max_depth: 0,
            max_size: 0,
        }
    }

    /// Create a new config with specific limits
    pub const fn new(max_depth: u16, max_size: usize) -> Self {
        Self {
            max_depth,
            max_size,
        }
    }
}

/// XML parser
///
/// Builds a [`Document`] from bytes. Comments, processing instructions, the
/// XML declaration and DOCTYPE are skipped. Whitespace-only text between
/// elements is kept so callers decide what to trim. Line ends in text and
/// CDATA are normalized to `\n`; attribute values have tabs and line ends
/// replaced by spaces.
#[derive(Debug)]
pub struct Parser<'a> {
    input: &'a [u8],
    config: Config,
}

impl<'a> Parser<'a> {
    /// Create a new XML parser
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, Config::default())
    }

    pub const fn with_config(input: &'a [u8], config: Config) -> Self {
        Self { input, config }
    }

    /// Parse an XML document
    pub fn parse(&mut self) -> Result<Document> {
        if self.config.max_size > 0 && self.input.len() > self.config.max_size {
            let max = self.config.max_size;
            return Err(self.error_at(
                ErrorKind::MaxSizeExceeded { max },
                max,
                format!("input exceeds {max} bytes"),
            ));
        }

        let mut reader = Reader::from_reader(self.input);
        let reader_config = reader.config_mut();
        reader_config.check_end_names = true;
        reader_config.trim_text(false);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(err) => {
                    return Err(self.error_at(
                        ErrorKind::Malformed,
                        to_offset(reader.error_position()),
                        err.to_string(),
                    ));
                }
            };
            let offset = to_offset(reader.buffer_position());

            match event {
                Event::Start(start) => {
                    if root.is_some() {
                        return Err(self.malformed(offset, "content after root element"));
                    }
                    self.check_depth(stack.len(), offset)?;
                    stack.push(self.open_element(&start, offset)?);
                }
                Event::Empty(start) => {
                    if root.is_some() {
                        return Err(self.malformed(offset, "content after root element"));
                    }
                    self.check_depth(stack.len(), offset)?;
                    let element = self.open_element(&start, offset)?;
                    close_element(&mut stack, &mut root, element);
                }
                Event::End(_) => match stack.pop() {
                    Some(element) => close_element(&mut stack, &mut root, element),
                    None => return Err(self.malformed(offset, "unexpected closing tag")),
                },
                Event::Text(text) => {
                    let raw = self.utf8(&text, offset)?;
                    let decoded = unescape(&normalize_line_ends(&raw))
                        .map_err(|err| self.malformed(offset, err.to_string()))?
                        .into_owned();
                    let Some(parent) = stack.last_mut() else {
                        if decoded.trim().is_empty() {
                            continue;
                        }
                        return Err(self.malformed(offset, "text outside root element"));
                    };
                    // text split by a skipped comment or instruction
                    match parent.children.last_mut() {
                        Some(Content::Text(previous)) => previous.push_str(&decoded),
                        _ => parent.children.push(Content::Text(decoded)),
                    }
                }
                Event::CData(data) => {
                    let Some(parent) = stack.last_mut() else {
                        return Err(self.malformed(offset, "cdata outside root element"));
                    };
                    let data = String::from_utf8(data.into_inner().into_owned()).map_err(|_| {
                        self.error_at(ErrorKind::InvalidUtf8, offset, "invalid utf-8 in cdata")
                    })?;
                    let data = normalize_line_ends(&data).into_owned();
                    // the writer splits `]]>` across adjacent sections
                    match parent.children.last_mut() {
                        Some(Content::CData(previous)) => previous.push_str(&data),
                        _ => parent.children.push(Content::CData(data)),
                    }
                }
                Event::Eof => break,
                // comments, processing instructions, declaration, doctype
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(self.malformed(self.input.len(), "unterminated element"));
        }

        match root {
            Some(root) => Ok(Document { root }),
            None => Err(self.malformed(self.input.len(), "no root element")),
        }
    }

    /// `open` is the number of elements enclosing the one about to start
    fn check_depth(&self, open: usize, offset: usize) -> Result<()> {
        let max = self.config.max_depth;
        if max > 0 && open >= usize::from(max) {
            return Err(self.error_at(
                ErrorKind::MaxDepthExceeded { max },
                offset,
                format!("nesting deeper than {max} elements"),
            ));
        }
        Ok(())
    }

    fn open_element(&self, start: &BytesStart<'_>, offset: usize) -> Result<Element> {
        let name = self.utf8(start.name().as_ref(), offset)?;

        let mut attributes = IndexMap::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|err| self.malformed(offset, err.to_string()))?;
            let key = self.utf8(attr.key.as_ref(), offset)?;
            let raw = self.utf8(&attr.value, offset)?;
            let value = unescape(&normalize_attribute(&raw))
                .map_err(|err| self.malformed(offset, err.to_string()))?
                .into_owned();
            attributes.insert(key, value);
        }

        Ok(Element {
            name,
            attributes,
            children: Vec::new(),
        })
    }

    fn utf8(&self, bytes: &[u8], offset: usize) -> Result<String> {
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|_| self.error_at(ErrorKind::InvalidUtf8, offset, "invalid utf-8"))
    }

    fn malformed(&self, offset: usize, message: impl Into<String>) -> Error {
        self.error_at(ErrorKind::Malformed, offset, message)
    }

    fn error_at(&self, kind: ErrorKind, offset: usize, message: impl Into<String>) -> Error {
        Error::at(kind, Pos::from_offset(self.input, offset), message)
    }
}

/// Attach a finished element to its parent, or make it the root
fn close_element(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Content::Element(element)),
        None => *root = Some(element),
    }
}

/// `\r\n` and lone `\r` become `\n`
fn normalize_line_ends(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Literal tabs and line ends in an attribute value read as single spaces;
/// character references such as `&#10;` are resolved afterwards and survive
fn normalize_attribute(value: &str) -> String {
    normalize_line_ends(value).replace(['\t', '\n'], " ")
}

fn to_offset<P>(position: P) -> usize
where
    usize: TryFrom<P>,
{
    usize::try_from(position).unwrap_or(usize::MAX)
}
