//! Source code extraction driven by a [`CodePatternDatabase`]

use crate::code_db::CodePatternDatabase;
use crate::error::FilterError;
use crate::filter::{Filter, FilterOutput};
use crate::mask::TextMask;
use infozilla_domain::{CodeRegion, Span};
use std::sync::Arc;
use tracing::debug;

/// Finds source code fragments
///
/// Every pattern is matched against the whole text. The candidates are then
/// reduced to a minimal covering set: regions contained in an earlier region
/// are dropped and partially overlapping regions are merged.
#[derive(Debug, Clone)]
pub struct SourceCodeExtractor {
    database: Arc<CodePatternDatabase>,
}

impl SourceCodeExtractor {
    /// Create an extractor over the given database
    pub fn new(database: impl Into<Arc<CodePatternDatabase>>) -> Self {
        Self {
            database: database.into(),
        }
    }

    /// Create an extractor over the built-in Java database
    pub fn java() -> Result<Self, FilterError> {
        Ok(Self::new(CodePatternDatabase::java()?))
    }

    /// The patterns in use
    pub fn database(&self) -> &CodePatternDatabase {
        &self.database
    }

    /// Every match of every pattern, in database order, before reduction
    pub fn candidates(&self, text: &str) -> Vec<CodeRegion> {
        let mut regions = Vec::new();
        for pattern in self.database.patterns() {
            for m in pattern.regex().find_iter(text) {
                if m.is_empty() {
                    continue;
                }
                let end = if pattern.match_braces() {
                    m.end() + closing_brace_offset(&text[m.end()..])
                } else {
                    m.end()
                };
                regions.push(CodeRegion::new(
                    Span::new(m.start(), end),
                    pattern.keyword(),
                    &text[m.start()..end],
                ));
            }
        }
        regions
    }
}

impl Filter for SourceCodeExtractor {
    type Artifact = CodeRegion;

    fn name(&self) -> &'static str {
        "source_code"
    }

    fn run(&self, text: &str) -> FilterOutput<CodeRegion> {
        let candidates = self.candidates(text);
        let found = candidates.len();
        let regions = minimal_set(text, candidates);

        let mut mask = TextMask::new(text);
        for region in &regions {
            mask.claim_span(region.span);
        }

        debug!(candidates = found, count = regions.len(), "Source code filter finished");
        FilterOutput {
            artifacts: regions,
            residual: mask.materialize(),
        }
    }
}

/// Bytes up to and including the `}` that closes an already open block,
/// or 0 when the block never closes
fn closing_brace_offset(rest: &str) -> usize {
    let mut depth = 0usize;
    for (i, b) in rest.bytes().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' if depth == 0 => return i + 1,
            b'}' => depth -= 1,
            _ => {}
        }
    }
    0
}

/// Reduce candidate regions to a sorted, non-overlapping covering set
///
/// Regions are ordered by start, broader regions first on equal starts. A
/// region whose end does not pass the furthest end seen so far is dropped.
/// A region that starts inside the last kept region but ends after it is
/// merged into that region, which keeps its keyword.
pub fn minimal_set(text: &str, mut regions: Vec<CodeRegion>) -> Vec<CodeRegion> {
    regions.sort_by(|a, b| {
        a.span
            .start
            .cmp(&b.span.start)
            .then(b.span.end.cmp(&a.span.end))
    });

    let mut kept: Vec<CodeRegion> = Vec::new();
    let mut furthest_end: Option<usize> = None;

    for region in regions {
        if furthest_end.is_some_and(|end| end >= region.span.end) {
            continue;
        }
        furthest_end = Some(region.span.end);

        match kept.last_mut() {
            Some(last) if last.span.end > region.span.start => {
                last.span.end = region.span.end;
                last.text = text[last.span.start..last.span.end].to_string();
            }
            _ => kept.push(region),
        }
    }
    kept
}
