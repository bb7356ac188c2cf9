//! Conversion between XML text and the [`Node`] tree
//!
//! Reading copies tags and attributes verbatim, keeps trimmed text and raw
//! CDATA as node values, and drops whitespace-only text. Writing turns a
//! non-empty value into text (or CDATA when it spans lines) and ignores the
//! node's children in that case.

use std::io::{Read, Write};
use std::ops::{Deref, DerefMut};

use tracing::{debug, instrument};

use crate::error::{Error, ErrorKind, Result, Span};
use crate::node::Node;
use crate::xml::{self, Content, Element, ReadConfig, WriteConfig};

/// Top-level node plus a caller-side label
///
/// The `name` only identifies the document among others the caller holds; it
/// is never written to XML. All [`Node`] methods are available through
/// `Deref`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    name: Option<String>,
    root: Node,
}

impl Document {
    /// Empty document with an untagged root
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: Node) -> Self {
        Self { name: None, root }
    }

    pub fn with_tag(tag: impl Into<String>) -> Self {
        Self::with_root(Node::with_tag(tag))
    }

    /// Set the identification label, builder style
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    pub fn into_root(self) -> Node {
        self.root
    }

    /// Parse XML from bytes
    pub fn from_bytes(input: &[u8]) -> Result<Self> {
        Self::from_bytes_with_config(input, ReadConfig::default())
    }

    #[instrument(skip_all, fields(len = input.len()))]
    pub fn from_bytes_with_config(input: &[u8], config: ReadConfig) -> Result<Self> {
        let parsed = xml::Parser::with_config(input, config).parse()?;
        let doc = Self::from_xml(&parsed);
        debug!(root = doc.root.tag().unwrap_or_default(), "document read");
        Ok(doc)
    }

    pub fn from_str_with_config(input: &str, config: ReadConfig) -> Result<Self> {
        Self::from_bytes_with_config(input.as_bytes(), config)
    }

    /// Read the whole stream, then parse it
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        Self::from_bytes(&buffer)
    }

    /// Build from an already parsed generic tree
    pub fn from_xml(doc: &xml::Document) -> Self {
        let mut root = Node::with_tag(doc.root.name.as_str());
        root.read_element(&doc.root);
        Self::with_root(root)
    }

    /// Convert to the generic tree; fails if any written node lacks a tag
    pub fn to_xml(&self) -> Result<xml::Document> {
        let root = self.root.to_xml_element()?;
        Ok(xml::Document { root })
    }

    /// Write without a declaration
    pub fn write<W: Write>(&self, out: W) -> Result<()> {
        self.write_with_config(out, &WriteConfig::default())
    }

    /// Nothing reaches `out` unless the whole document rendered
    #[instrument(skip_all, fields(name = self.name.as_deref().unwrap_or_default()))]
    pub fn write_with_config<W: Write>(&self, mut out: W, config: &WriteConfig) -> Result<()> {
        let bytes = xml::render(&self.to_xml()?, config)?;
        out.write_all(&bytes)?;
        debug!(bytes = bytes.len(), "document written");
        Ok(())
    }

    pub fn to_xml_string(&self) -> Result<String> {
        self.to_xml_string_with_config(&WriteConfig::default())
    }

    pub fn to_xml_string_with_config(&self, config: &WriteConfig) -> Result<String> {
        self.root.to_xml_string_with_config(config)
    }
}

impl std::str::FromStr for Document {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_bytes(s.as_bytes())
    }
}

impl Deref for Document {
    type Target = Node;

    fn deref(&self) -> &Node {
        &self.root
    }
}

impl DerefMut for Document {
    fn deref_mut(&mut self) -> &mut Node {
        &mut self.root
    }
}

impl From<Node> for Document {
    fn from(root: Node) -> Self {
        Self::with_root(root)
    }
}

impl Node {
    /// Merge an element's attributes and content into this node
    ///
    /// The tag is left alone. Child elements are appended as new children;
    /// text and CDATA replace the value, the last one winning.
    pub fn read_element(&mut self, element: &Element) {
        for (key, value) in &element.attributes {
            self.set_attribute(key.as_str(), value.as_str());
        }

        for content in &element.children {
            match content {
                Content::Element(child) => {
                    self.add_child(child.name.as_str()).read_element(child);
                }
                Content::Text(text) => {
                    let text = text.trim();
                    if !text.is_empty() {
                        self.set_value(text);
                    }
                }
                Content::CData(data) => self.set_value(data.as_str()),
            }
        }
    }

    /// Convert this subtree to a generic element
    pub fn to_xml_element(&self) -> Result<Element> {
        let tag = written_tag(self).ok_or_else(|| Error::missing_tag("root"))?;
        write_element(self, tag)
    }

    /// Serialize this subtree without a declaration
    pub fn to_xml_string(&self) -> Result<String> {
        self.to_xml_string_with_config(&WriteConfig::default())
    }

    pub fn to_xml_string_with_config(&self, config: &WriteConfig) -> Result<String> {
        let bytes = xml::writer::render_element(&self.to_xml_element()?, config)?;
        String::from_utf8(bytes)
            .map_err(|e| Error::with_message(ErrorKind::InvalidUtf8, Span::empty(), e.to_string()))
    }
}

fn written_tag(node: &Node) -> Option<&str> {
    node.tag().filter(|tag| !tag.is_empty())
}

fn write_element(node: &Node, tag: &str) -> Result<Element> {
    let mut element = Element::new(tag);
    for (key, value) in node.attributes() {
        element.attributes.insert(key.clone(), value.to_string());
    }

    match node.value().filter(|value| !value.is_empty()) {
        Some(value) if value.contains('\n') => {
            element.children.push(Content::CData(format!("\n{value}\n")));
        }
        Some(value) => element.children.push(Content::Text(value.to_string())),
        None => {
            for (index, child) in node.children().iter().enumerate() {
                let child_tag = written_tag(child)
                    .ok_or_else(|| Error::missing_tag(&format!("child {index} of <{tag}>")))?;
                element
                    .children
                    .push(Content::Element(write_element(child, child_tag)?));
            }
        }
    }

    Ok(element)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_root_tag_and_name() -> Result<()> {
        let doc: Document = "<settings version=\"2\"/>".parse()?;
        let doc = doc.named("primary");
        assert_eq!(doc.tag(), Some("settings"));
        assert_eq!(doc.name(), Some("primary"));
        assert_eq!(doc.attribute_string("version"), "2");
        Ok(())
    }

    #[test]
    fn test_read_mixed_content_last_text_wins() -> Result<()> {
        let doc = Document::from_bytes(b"<a>first<b/>second</a>")?;
        assert_eq!(doc.value(), Some("second"));
        assert_eq!(doc.children().len(), 1);
        Ok(())
    }

    #[test]
    fn test_read_element_keeps_existing_tag() {
        let mut element = Element::new("ignored");
        element.attributes.insert("k".into(), "v".into());
        element.children.push(Content::Text("  padded  ".into()));

        let mut node = Node::with_tag("kept");
        node.read_element(&element);
        assert_eq!(node.tag(), Some("kept"));
        assert_eq!(node.value(), Some("padded"));
        assert_eq!(node.attribute_string("k"), "v");
    }

    #[test]
    fn test_value_wins_over_children() -> Result<()> {
        let mut root = Node::with_tag("root");
        root.set_value("text");
        root.add_child("ignored");
        assert_eq!(root.to_xml_string()?, "<root>text</root>");
        Ok(())
    }

    #[test]
    fn test_multiline_value_becomes_cdata() -> Result<()> {
        let mut root = Node::with_tag("root");
        root.set_value("line1\nline2");
        let element = root.to_xml_element()?;
        assert_eq!(
            element.children,
            vec![Content::CData("\nline1\nline2\n".into())]
        );
        Ok(())
    }

    #[test]
    fn test_empty_value_writes_children() -> Result<()> {
        let mut root = Node::with_tag("root");
        root.set_value("");
        root.add_child("child");
        assert_eq!(root.to_xml_string()?, "<root>\n    <child/>\n</root>");
        Ok(())
    }

    #[test]
    fn test_missing_root_tag() {
        let doc = Document::new();
        let mut out = Vec::new();
        let err = doc.write(&mut out).err();
        assert_eq!(err.map(|e| e.kind().clone()), Some(ErrorKind::MissingTag));
        assert!(out.is_empty());
    }

    #[test]
    fn test_missing_child_tag_names_parent() {
        let mut doc = Document::with_tag("root");
        doc.add_child("ok");
        doc.push_child(Node::new());
        let err = doc.to_xml_string().err();
        assert_eq!(
            err.map(|e| e.to_string()),
            Some("xml tag not set for child 1 of <root>".into())
        );
    }

    #[test]
    fn test_attributes_written_as_string_form() -> Result<()> {
        let mut root = Node::with_tag("root");
        root.set_attribute("count", 3);
        root.set_attribute("ratio", 0.5);
        root.set_attribute("on", true);
        assert_eq!(
            root.to_xml_string()?,
            "<root count=\"3\" ratio=\"0.5\" on=\"true\"/>"
        );
        Ok(())
    }

    #[test]
    fn test_from_reader() -> Result<()> {
        let input: &[u8] = b"<root><a>1</a></root>";
        let doc = Document::from_reader(input)?;
        assert_eq!(
            doc.first_child_by_tag_name("a").and_then(Node::value),
            Some("1")
        );
        Ok(())
    }
}
