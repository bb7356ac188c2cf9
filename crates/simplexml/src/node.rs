//! Mutable XML tree node

use indexmap::IndexMap;

use crate::attribute::{AttributeValue, ABSENT_ATTRIBUTE};
use crate::path::Path;

/// A single element of the tree: tag, optional text value, attributes and
/// ordered children.
///
/// A node owns its children outright. There are no parent links, so every
/// traversal starts from a root the caller holds.
///
/// ```
/// use simplexml::Node;
///
/// let mut config = Node::with_tag("config");
/// config.add_child_with_value("host", "localhost");
/// config.add_child("port").set_attribute("value", 8080);
///
/// let host = config.first_child_by_tag_name("host");
/// assert_eq!(host.and_then(|n| n.value()), Some("localhost"));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    tag: Option<String>,
    value: Option<String>,
    attributes: IndexMap<String, AttributeValue>,
    children: Vec<Node>,
}

impl Node {
    /// Create an untagged, empty node
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tag(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            ..Self::default()
        }
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.tag = Some(tag.into());
    }

    /// Exact, case-sensitive tag comparison
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag.as_deref() == Some(tag)
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = Some(value.into());
    }

    pub fn clear_value(&mut self) {
        self.value = None;
    }

    /// Attribute stored under `key`, if any
    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// String form of the attribute under `key`
    ///
    /// A missing key yields [`ABSENT_ATTRIBUTE`] (`"null"`) instead of an
    /// error. Use [`Node::attribute`] to tell a missing key apart from a
    /// stored `"null"` string.
    pub fn attribute_string(&self, key: &str) -> String {
        self.attributes
            .get(key)
            .map_or_else(|| ABSENT_ATTRIBUTE.to_string(), ToString::to_string)
    }

    pub fn attributes(&self) -> &IndexMap<String, AttributeValue> {
        &self.attributes
    }

    /// Insert or overwrite an attribute
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        self.attributes.insert(key.into(), value.into());
    }

    pub fn remove_attribute(&mut self, key: &str) -> Option<AttributeValue> {
        self.attributes.shift_remove(key)
    }

    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Mutable access to the children; the list itself only changes through
    /// the `add`/`push`/`copy`/`remove` methods.
    pub fn children_mut(&mut self) -> &mut [Self] {
        &mut self.children
    }

    /// Append a new child with `tag` and return it for further building
    pub fn add_child(&mut self, tag: impl Into<String>) -> &mut Self {
        self.push_child(Self::with_tag(tag))
    }

    pub fn add_child_with_value(
        &mut self,
        tag: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        let child = self.add_child(tag);
        child.set_value(value);
        child
    }

    /// Append a pre-built node as the last child
    pub fn push_child(&mut self, node: Self) -> &mut Self {
        self.children.push(node);
        match self.children.last_mut() {
            Some(child) => child,
            None => unreachable!("children is non-empty after a push"),
        }
    }

    /// Immediate children tagged `tag`, in document order
    pub fn children_by_tag_name(&self, tag: &str) -> Vec<&Self> {
        self.children.iter().filter(|c| c.has_tag(tag)).collect()
    }

    /// All descendants tagged `tag`, pre-order
    pub fn children_recursive_by_tag_name(&self, tag: &str) -> Vec<&Self> {
        let mut out = Vec::new();
        collect_by_tag(self, tag, &mut out);
        out
    }

    pub fn first_child_by_tag_name(&self, tag: &str) -> Option<&Self> {
        self.children.iter().find(|c| c.has_tag(tag))
    }

    pub fn first_child_by_tag_name_mut(&mut self, tag: &str) -> Option<&mut Self> {
        self.children.iter_mut().find(|c| c.has_tag(tag))
    }

    /// First immediate child tagged `tag` whose attribute `key` equals `value`
    ///
    /// Children without the attribute never match.
    pub fn first_child_by_tag_and_attribute(
        &self,
        tag: &str,
        key: &str,
        value: impl Into<AttributeValue>,
    ) -> Option<&Self> {
        let value = value.into();
        self.children
            .iter()
            .find(|c| c.has_tag(tag) && c.attribute(key) == Some(&value))
    }

    pub fn first_child_by_tag_and_attribute_mut(
        &mut self,
        tag: &str,
        key: &str,
        value: impl Into<AttributeValue>,
    ) -> Option<&mut Self> {
        let value = value.into();
        self.children
            .iter_mut()
            .find(|c| c.has_tag(tag) && c.attribute(key) == Some(&value))
    }

    /// Remove the first child equal to `node`
    ///
    /// Returns `true` if a child was removed.
    pub fn remove(&mut self, node: &Self) -> bool {
        match self.children.iter().position(|c| c == node) {
            Some(index) => {
                self.children.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn remove_child(&mut self, index: usize) -> Option<Self> {
        (index < self.children.len()).then(|| self.children.remove(index))
    }

    /// Append a deep copy of `source` as the last child
    pub fn copy(&mut self, source: &Self) -> &mut Self {
        self.push_child(source.clone())
    }

    /// Nodes selected by a path expression, see [`Path`]
    pub fn children_by_path(&self, expr: &str) -> Vec<&Self> {
        Path::parse(expr).select(self)
    }
}

fn collect_by_tag<'a>(parent: &'a Node, tag: &str, out: &mut Vec<&'a Node>) {
    for child in &parent.children {
        if child.has_tag(tag) {
            out.push(child);
        }
        collect_by_tag(child, tag, out);
    }
}
