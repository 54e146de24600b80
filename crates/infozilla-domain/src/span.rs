//! Span module - offsets of an artifact inside the text it was found in

use serde::{Deserialize, Serialize};
use std::fmt;

/// Half-open `[start, end)` range of byte offsets
///
/// Offsets always fall on UTF-8 character boundaries, so for ASCII input they
/// are plain character offsets. A span is only meaningful relative to the
/// exact text version the producing extractor consumed.
///
/// # Examples
///
/// ```
/// use infozilla_domain::Span;
///
/// let span = Span::new(4, 10);
/// assert_eq!(span.len(), 6);
/// assert!(span.contains(&Span::new(5, 10)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// First offset covered
    pub start: usize,

    /// One past the last offset covered
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of offsets covered (zero for inverted spans)
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span covers nothing
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `other` lies entirely within this span
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Whether the two spans share at least one offset
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Slice `text` by this span, if the span is valid for it
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.start..self.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
