//! simplexml - mutable XML node tree with path queries
//!
//! # Quick Start
//!
//! ```
//! use simplexml::{from_str, Node};
//! # fn main() -> Result<(), simplexml::Error> {
//! let mut doc = from_str("<library><book id=\"1\"><title>Dune</title></book></library>")?;
//!
//! let titles = doc.children_by_path("book/title");
//! assert_eq!(titles.first().and_then(|n| n.value()), Some("Dune"));
//!
//! doc.add_child("book").add_child_with_value("title", "Emma");
//! assert_eq!(doc.children_by_tag_name("book").len(), 2);
//!
//! let xml = doc.to_xml_string()?;
//! assert!(xml.contains("<title>Emma</title>"));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, ErrorKind, Pos, Result, Span};

pub mod attribute;
pub use attribute::{AttributeValue, ABSENT_ATTRIBUTE};

pub mod node;
pub use node::Node;

pub mod path;
pub use path::Path;

pub mod xml;
pub use xml::{
    Content as XmlContent, Document as XmlDocument, Element as XmlElement, ReadConfig,
    WriteConfig,
};

pub mod document;
pub use document::Document;

/// Parse a document from a string
pub fn from_str(s: &str) -> Result<Document> {
    Document::from_bytes(s.as_bytes())
}

/// Parse a document from bytes
pub fn from_bytes(bytes: &[u8]) -> Result<Document> {
    Document::from_bytes(bytes)
}

/// Parse with custom read limits
pub fn from_str_with_config(s: &str, config: ReadConfig) -> Result<Document> {
    Document::from_str_with_config(s, config)
}

/// Read a whole stream and parse it
pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Document> {
    Document::from_reader(reader)
}

/// Serialize a document without a declaration
pub fn to_string(doc: &Document) -> Result<String> {
    doc.to_xml_string()
}
