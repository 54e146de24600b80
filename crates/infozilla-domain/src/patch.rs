//! Patch module - unified diffs found in bug report text

use crate::span::Span;
use serde::{Deserialize, Serialize};

/// One `@@ -a,b +c,d @@` block of a unified diff
///
/// `text` holds the hunk body without the `@@` header line and without a
/// trailing newline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hunk {
    /// Raw hunk body
    pub text: String,
}

impl Hunk {
    /// Create a new hunk from its body
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Lines of the hunk body, in order
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }

    /// Number of `+` lines
    pub fn additions(&self) -> usize {
        self.lines().filter(|l| l.starts_with('+')).count()
    }

    /// Number of `-` lines
    pub fn removals(&self) -> usize {
        self.lines().filter(|l| l.starts_with('-')).count()
    }
}

/// A unified diff patch
///
/// A patch always carries at least one hunk; candidate regions without a hunk
/// header never become a `Patch`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patch {
    /// Target path of the `Index:` line, without the `Index: ` prefix
    pub index: String,

    /// File name from the `---` line
    pub original_file: String,

    /// File name from the `+++` line
    pub modified_file: String,

    /// Raw header block (everything before the first hunk header)
    pub header: String,

    /// Hunks in order of appearance
    pub hunks: Vec<Hunk>,

    /// Location in the text the patch filter consumed
    pub span: Span,
}

impl Patch {
    /// Number of hunks
    pub fn hunk_count(&self) -> usize {
        self.hunks.len()
    }

    /// Total `+` lines over all hunks
    pub fn additions(&self) -> usize {
        self.hunks.iter().map(Hunk::additions).sum()
    }

    /// Total `-` lines over all hunks
    pub fn removals(&self) -> usize {
        self.hunks.iter().map(Hunk::removals).sum()
    }
}
