//! Talkback module - Mozilla crash-reporter traces

use crate::span::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The five line kinds of a Talkback trace
///
/// Variant order is the priority in which lines are classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TalkbackKind {
    /// `Class::method [file, line N]`
    ClassMethod,

    /// `name()`
    MethodCall,

    /// `name [file, line N]`
    Method,

    /// `name + 0xOFFSET (0xADDR)`
    Library,

    /// `0xADDR`
    Address,
}

impl TalkbackKind {
    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            TalkbackKind::ClassMethod => "class_method",
            TalkbackKind::MethodCall => "method_call",
            TalkbackKind::Method => "method",
            TalkbackKind::Library => "library",
            TalkbackKind::Address => "address",
        }
    }
}

impl fmt::Display for TalkbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified line of a Talkback trace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TalkbackEntry {
    /// Function, method or library name (trimmed)
    pub name: String,

    /// Source location or address (trimmed, may be empty)
    pub location: String,

    /// Line kind
    pub kind: TalkbackKind,
}

impl TalkbackEntry {
    /// Create a new entry, trimming name and location
    pub fn new(name: &str, location: &str, kind: TalkbackKind) -> Self {
        Self {
            name: name.trim().to_string(),
            location: location.trim().to_string(),
            kind,
        }
    }
}

impl fmt::Display for TalkbackEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.location)
    }
}

/// A Talkback trace: two or more consecutive classified lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TalkbackTrace {
    /// Entries in order of appearance
    pub entries: Vec<TalkbackEntry>,

    /// Location in the text the Talkback filter consumed
    pub span: Span,
}

impl TalkbackTrace {
    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the trace has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
