//! Dotted/bracketed addresses into the content tree.
//!
//! `doctors[2].social.twitter` parses into
//! `[Key("doctors"), Index(2), Key("social"), Key("twitter")]`.

use std::{fmt, str::FromStr};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl Segment {
    /// Key used when the segment addresses a mapping.
    pub fn as_key(&self) -> String {
        match self {
            Segment::Key(key) => key.clone(),
            Segment::Index(index) => index.to_string(),
        }
    }

    /// Index used when the segment addresses a sequence. Plain keys made only
    /// of digits (`list.3`) address sequences too.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Segment::Index(index) => Some(*index),
            Segment::Key(key) => parse_digits(key),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("path is empty")]
    Empty,
    #[error("empty segment at position {position} in `{path}`")]
    EmptySegment { path: String, position: usize },
    #[error("malformed index `{segment}` in `{path}`")]
    MalformedIndex { path: String, segment: String },
    #[error("index {index} is out of range for `{at}` (length {len})")]
    OutOfRange {
        at: String,
        index: usize,
        len: usize,
    },
    #[error("`{segment}` is not a valid index into sequence `{at}`")]
    NotAnIndex { at: String, segment: String },
    #[error("`{at}` is a scalar and cannot hold `{segment}`")]
    NotContainer { at: String, segment: String },
}

/// A parsed content path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentPath {
    segments: Vec<Segment>,
}

impl ContentPath {
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        if raw.trim().is_empty() {
            return Err(PathError::Empty);
        }

        let mut segments = Vec::new();
        for (position, piece) in raw.split('.').enumerate() {
            parse_piece(raw, piece, position, &mut segments)?;
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Render the first `len` segments back into path syntax.
    pub fn prefix(&self, len: usize) -> String {
        render(&self.segments[..len.min(self.segments.len())])
    }
}

impl FromStr for ContentPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ContentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(&self.segments))
    }
}

fn parse_piece(
    raw: &str,
    piece: &str,
    position: usize,
    segments: &mut Vec<Segment>,
) -> Result<(), PathError> {
    let (key, mut rest) = match piece.find('[') {
        Some(at) => piece.split_at(at),
        None => (piece, ""),
    };

    if key.is_empty() {
        return Err(PathError::EmptySegment {
            path: raw.to_string(),
            position,
        });
    }
    if key.contains(']') {
        return Err(PathError::MalformedIndex {
            path: raw.to_string(),
            segment: piece.to_string(),
        });
    }
    segments.push(Segment::Key(key.to_string()));

    while !rest.is_empty() {
        let malformed = || PathError::MalformedIndex {
            path: raw.to_string(),
            segment: piece.to_string(),
        };
        let (digits, tail) = rest
            .strip_prefix('[')
            .and_then(|inner| inner.split_once(']'))
            .ok_or_else(malformed)?;
        let index = parse_digits(digits).ok_or_else(malformed)?;
        segments.push(Segment::Index(index));
        rest = tail;
    }

    Ok(())
}

fn parse_digits(value: &str) -> Option<usize> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

fn render(segments: &[Segment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Key(key) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(key);
            }
            Segment::Index(index) => {
                out.push('[');
                out.push_str(&index.to_string());
                out.push(']');
            }
        }
    }
    out
}
