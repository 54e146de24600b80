//! Enumeration module - lists and itemizations ("steps to reproduce")

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which list detector produced an enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnumerationKind {
    /// `a.`, `B)`, `(c)` ...
    Lettered,

    /// `1.`, `2)`, `(3)`, `4-` ...
    Numbered,

    /// `- item`
    Itemized,
}

impl EnumerationKind {
    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            EnumerationKind::Lettered => "lettered",
            EnumerationKind::Numbered => "numbered",
            EnumerationKind::Itemized => "itemized",
        }
    }
}

impl fmt::Display for EnumerationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A detected list block
///
/// Always contains at least two marker lines. `items` also holds the
/// paragraph continuation lines that follow the last marker, up to the next
/// blank line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enumeration {
    /// Detector that found this block
    pub kind: EnumerationKind,

    /// Raw lines of the block
    pub items: Vec<String>,

    /// 0-based index of the first line
    pub start_line: usize,

    /// 0-based index of the last line
    pub end_line: usize,

    /// Offset of the first character of the block
    pub enum_start: usize,

    /// Offset of the last character of the block (exclusive of its newline)
    pub enum_end: usize,
}

impl Enumeration {
    /// Number of lines in the block
    pub fn line_count(&self) -> usize {
        self.items.len()
    }
}
