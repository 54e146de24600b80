//! CodeRegion module - source code fragments

use crate::span::Span;
use serde::{Deserialize, Serialize};

/// A region of source code matched by a code pattern database entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeRegion {
    /// Location in the text the source code filter consumed
    pub span: Span,

    /// Pattern database category that matched (e.g. `class`, `import`)
    pub keyword: String,

    /// Verbatim matched text, possibly extended to a balanced `}`
    pub text: String,
}

impl CodeRegion {
    /// Create a new region
    pub fn new(span: Span, keyword: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            span,
            keyword: keyword.into(),
            text: text.into(),
        }
    }
}
