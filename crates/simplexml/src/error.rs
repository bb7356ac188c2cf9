//! Error types for simplexml

use std::fmt;
use thiserror::Error;

/// Position in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.offset, self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }

    /// Resolve a byte offset into line and column (both 1-based)
    pub fn from_offset(input: &[u8], offset: usize) -> Self {
        let end = offset.min(input.len());
        let mut line = 1u32;
        let mut col = 1u32;
        for &b in input.iter().take(end) {
            if b == b'\n' {
                line = line.saturating_add(1);
                col = 1;
            } else {
                col = col.saturating_add(1);
            }
        }
        Self::new(offset, line, col)
    }
}

/// Span representing a range in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn point(pos: Pos) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub const fn empty() -> Self {
        Self {
            start: Pos::new(0, 0, 0),
            end: Pos::new(0, 0, 0),
        }
    }
}

/// Error kind for detailed categorization
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The tokenizer rejected the input
    Malformed,
    /// Names, text and CDATA must be UTF-8
    InvalidUtf8,
    /// A node reached during a write has no tag
    MissingTag,
    MaxDepthExceeded { max: u16 },
    MaxSizeExceeded { max: usize },
    /// Reading from or writing to a caller stream failed
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed xml"),
            Self::InvalidUtf8 => write!(f, "invalid utf-8"),
            Self::MissingTag => write!(f, "xml tag not set"),
            Self::MaxDepthExceeded { max } => write!(f, "max depth exceeded: {max}"),
            Self::MaxSizeExceeded { max } => write!(f, "max size exceeded: {max}"),
            Self::Io => write!(f, "i/o error"),
        }
    }
}

/// Main error type for simplexml
#[derive(Error, Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    span: Span,
    message: String,
}

impl Error {
    pub fn with_message(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Create error at specific position
    pub fn at(kind: ErrorKind, pos: Pos, message: impl Into<String>) -> Self {
        Self::with_message(kind, Span::point(pos), message)
    }

    /// Write-time error for a node without a tag; `path` names its parent chain
    pub fn missing_tag(path: &str) -> Self {
        Self::with_message(
            ErrorKind::MissingTag,
            Span::empty(),
            format!("xml tag not set for {path}"),
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.span == Span::empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "error at {}: {}", self.span.start, self.message)
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::with_message(ErrorKind::Io, Span::empty(), err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Self::with_message(ErrorKind::Malformed, Span::empty(), err.to_string())
    }
}

/// Result type alias for simplexml
pub type Result<T> = std::result::Result<T, Error>;
