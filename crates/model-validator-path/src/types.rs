//! Address types.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::parser::parse_address;

/// One step of an address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Object field: `name`
    Field(String),
    /// Array element at a fixed position: `[3]`
    Index(usize),
    /// The array itself: `[]`
    Whole,
    /// Every array element: `[*]`
    Each,
}

impl Segment {
    fn is_bracket(&self) -> bool {
        !matches!(self, Segment::Field(_))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Field(name) => f.write_str(name),
            Segment::Index(index) => write!(f, "[{index}]"),
            Segment::Whole => f.write_str("[]"),
            Segment::Each => f.write_str("[*]"),
        }
    }
}

/// Render segments back into canonical address text.
///
/// Fields are joined with `.`, bracket groups attach to the preceding
/// segment.
pub fn render_segments(segments: &[Segment]) -> String {
    let mut out = String::new();
    for (idx, segment) in segments.iter().enumerate() {
        if idx > 0 && !segment.is_bracket() {
            out.push('.');
        }
        out.push_str(&segment.to_string());
    }
    out
}

/// Errors produced while parsing address text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("address is empty")]
    Empty,
    #[error("empty segment at position {position}")]
    EmptySegment { position: usize },
    #[error("unclosed bracket at position {position}")]
    UnclosedBracket { position: usize },
    #[error("invalid index {text:?} at position {position}")]
    InvalidIndex { position: usize, text: String },
    #[error("unexpected character {ch:?} at position {position}")]
    UnexpectedChar { position: usize, ch: char },
}

/// A compiled address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    source: String,
    segments: Vec<Segment>,
}

impl Address {
    /// Parse address text such as `a.b[0].c` or `items[*]`.
    pub fn parse(source: &str) -> Result<Self, AddressError> {
        let segments = parse_address(source)?;
        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// The text this address was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether resolving this address may yield more than one target.
    pub fn has_wildcard(&self) -> bool {
        self.segments.iter().any(|s| matches!(s, Segment::Each))
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::parse(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_segments(&self.segments))
    }
}
