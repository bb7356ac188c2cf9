//! XML writer on top of `quick-xml`

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::Result;
use crate::xml::model::{Content, Document, Element};

/// Spaces per nesting level in rendered output
const INDENT_SIZE: usize = 4;

const CDATA_END: &str = "]]>";

/// Output options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Leave out `<?xml version="1.0" encoding="UTF-8"?>`
    pub omit_declaration: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            omit_declaration: true,
        }
    }
}

impl Config {
    pub const fn with_declaration() -> Self {
        Self {
            omit_declaration: false,
        }
    }
}

/// Render a document as indented XML
///
/// Elements without content are written self-closing. Text and CDATA stay on
/// the line of their opening tag.
pub fn render(doc: &Document, config: &Config) -> Result<Vec<u8>> {
    render_element(&doc.root, config)
}

/// Render a single element as the top of a document
pub fn render_element(element: &Element, config: &Config) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_SIZE);

    if !config.omit_declaration {
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    }
    write_element(&mut writer, element)?;

    Ok(writer.into_inner())
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for child in &element.children {
        match child {
            Content::Element(child) => write_element(writer, child)?,
            Content::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
            Content::CData(data) => write_cdata(writer, data)?,
        }
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;

    Ok(())
}

/// A CDATA section cannot contain `]]>`, so that sequence is split across
/// two adjacent sections.
fn write_cdata(writer: &mut Writer<Vec<u8>>, data: &str) -> Result<()> {
    let mut rest = data;
    while let Some(index) = rest.find(CDATA_END) {
        let (head, tail) = rest.split_at(index + 2);
        writer.write_event(Event::CData(BytesCData::new(head)))?;
        rest = tail;
    }
    writer.write_event(Event::CData(BytesCData::new(rest)))?;
    Ok(())
}
