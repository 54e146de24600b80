//! Mozilla Talkback trace extraction

use crate::filter::{Filter, FilterOutput};
use crate::mask::TextMask;
use crate::text::{line_offsets, split_lines};
use infozilla_domain::{Span, TalkbackEntry, TalkbackKind, TalkbackTrace};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Fewest consecutive recognized lines that make a trace
pub const MIN_TRACE_LINES: usize = 2;

static CLASS_METHOD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^.*::.*\[.*?,?\s*line\s*[0-9]+\]$").unwrap());

static METHOD_CALL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^ ]*?\(\)$").unwrap());

static METHOD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^.*\[.*?,?\s*line\s*[0-9]+\]$").unwrap());

static LIBRARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^.*?\+\s*[0-9]x[0-9a-zA-Z]+\s*\([0-9]x[0-9a-zA-Z]+\)$").unwrap()
});

static ADDRESS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]x[0-9a-zA-Z]+$").unwrap());

/// Finds Talkback crash traces
#[derive(Debug, Clone, Copy, Default)]
pub struct TalkbackExtractor;

impl TalkbackExtractor {
    /// Create a talkback extractor
    pub fn new() -> Self {
        Self
    }
}

impl Filter for TalkbackExtractor {
    type Artifact = TalkbackTrace;

    fn name(&self) -> &'static str {
        "talkback"
    }

    fn run(&self, text: &str) -> FilterOutput<TalkbackTrace> {
        let lines = split_lines(text);
        let offsets = line_offsets(&lines);
        let mut mask = TextMask::new(text);
        let mut traces = Vec::new();

        let mut block: Vec<TalkbackEntry> = Vec::new();
        let mut block_start = 0;

        // one extra iteration flushes a block that runs to the end of the text
        for i in 0..=lines.len() {
            match lines.get(i).and_then(|line| classify(line)) {
                Some(entry) => {
                    if block.is_empty() {
                        block_start = i;
                    }
                    block.push(entry);
                }
                None => {
                    if block.len() >= MIN_TRACE_LINES {
                        let last = i - 1;
                        let span = Span::new(offsets[block_start], offsets[last] + lines[last].len());
                        mask.claim_span(span);
                        traces.push(TalkbackTrace {
                            entries: std::mem::take(&mut block),
                            span,
                        });
                    } else if !block.is_empty() {
                        debug!(line = block_start, "Discarding single talkback line");
                    }
                    block.clear();
                }
            }
        }

        debug!(count = traces.len(), "Talkback filter finished");
        FilterOutput {
            artifacts: traces,
            residual: mask.materialize(),
        }
    }
}

/// Recognize one line, trying each line kind in priority order
pub fn classify(line: &str) -> Option<TalkbackEntry> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if CLASS_METHOD.is_match(line) {
        let (name, location) = split_location(line, '[', ']');
        Some(TalkbackEntry::new(name, &location, TalkbackKind::ClassMethod))
    } else if METHOD_CALL.is_match(line) {
        Some(TalkbackEntry::new(line, "", TalkbackKind::MethodCall))
    } else if METHOD.is_match(line) {
        let (name, location) = split_location(line, '[', ']');
        Some(TalkbackEntry::new(name, &location, TalkbackKind::Method))
    } else if LIBRARY.is_match(line) {
        let (name, location) = split_location(line, '(', ')');
        Some(TalkbackEntry::new(name, &location, TalkbackKind::Library))
    } else if ADDRESS.is_match(line) {
        Some(TalkbackEntry::new(line, line, TalkbackKind::Address))
    } else {
        None
    }
}

/// Split `name [location]` at the first `open`, dropping every `close`
fn split_location(line: &str, open: char, close: char) -> (&str, String) {
    match line.split_once(open) {
        Some((name, rest)) => (name, rest.replace(close, "")),
        None => (line, String::new()),
    }
}
