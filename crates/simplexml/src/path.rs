//! Path queries over a node tree
//!
//! A path expression is one or more alternatives separated by `|`. Each
//! alternative is a `/`-separated list of segments, where a segment is a tag
//! literal or the wildcard `*`.
//!
//! - `a/b` is relative: matching starts at the receiver's children.
//! - `/a/b` is absolute: matching starts at the receiver itself.
//!
//! Results from every alternative are concatenated in the order written.
//! The same node can appear twice when two alternatives select it.
//!
//! ```
//! use simplexml::{Node, Path};
//!
//! let mut root = Node::with_tag("root");
//! root.add_child("a").add_child_with_value("child", "1");
//! root.add_child("b").add_child_with_value("child", "2");
//!
//! let path = Path::parse("*/child");
//! let values: Vec<_> = path.select(&root).iter().filter_map(|n| n.value()).collect();
//! assert_eq!(values, vec!["1", "2"]);
//! ```

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use tracing::trace;

use crate::node::Node;

const WILDCARD: &str = "*";

/// Compiled path expression
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Path {
    alternatives: Vec<Alternative>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Alternative {
    absolute: bool,
    segments: Vec<Segment>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Any,
    Tag(String),
}

impl Segment {
    fn new(raw: &str) -> Self {
        if raw == WILDCARD {
            Self::Any
        } else {
            Self::Tag(raw.to_string())
        }
    }

    fn matches(&self, node: &Node) -> bool {
        match self {
            Self::Any => true,
            Self::Tag(tag) => node.has_tag(tag),
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, Self::Tag(tag) if tag.is_empty())
    }
}

impl Path {
    /// Compile an expression. Parsing never fails: alternatives that are
    /// blank are skipped, and an empty expression selects nothing.
    pub fn parse(expr: &str) -> Self {
        let alternatives = expr.split('|').filter_map(Alternative::parse).collect();
        Self { alternatives }
    }

    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }

    /// Evaluate against `node`, returning matches in recursive descent order
    pub fn select<'a>(&self, node: &'a Node) -> Vec<&'a Node> {
        let mut out = Vec::new();
        for alternative in &self.alternatives {
            let before = out.len();
            let start = if alternative.absolute {
                std::slice::from_ref(node)
            } else {
                node.children()
            };
            collect(start, &alternative.segments, &mut out);
            trace!(
                alternative = %alternative,
                matched = out.len() - before,
                "path alternative evaluated"
            );
        }
        out
    }
}

impl Alternative {
    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        let (absolute, body) = match raw.strip_prefix('/') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };

        let mut segments: Vec<Segment> = body.split('/').map(Segment::new).collect();
        while segments.last().is_some_and(Segment::is_empty) {
            segments.pop();
        }

        (!segments.is_empty()).then_some(Self { absolute, segments })
    }
}

/// Keep the candidates matching the first segment; recurse into their
/// children for the remaining segments.
fn collect<'a>(candidates: &'a [Node], segments: &[Segment], out: &mut Vec<&'a Node>) {
    let Some((segment, rest)) = segments.split_first() else {
        return;
    };

    for candidate in candidates.iter().filter(|c| segment.matches(c)) {
        if rest.is_empty() {
            out.push(candidate);
        } else {
            collect(candidate.children(), rest, out);
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str(WILDCARD),
            Self::Tag(tag) => f.write_str(tag),
        }
    }
}

impl fmt::Display for Alternative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.absolute {
            f.write_str("/")?;
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, alternative) in self.alternatives.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{alternative}")?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for Path {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}
