//! Java stack trace extraction
//!
//! The text is first cut into regions at lines that look like the start of an
//! exception (`pkg.SomeException:` or `pkg.SomeError`). Anchors closer than
//! [`MIN_REGION_LINES`] lines to the previous region start are folded into it,
//! which keeps an exception mentioned in a reason from splitting its own
//! trace. Each region is then searched for complete traces and for
//! `Caused by:` sections.

use crate::filter::{Filter, FilterOutput};
use crate::mask::TextMask;
use crate::text::count_lines;
use infozilla_domain::{Span, StackTrace};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Minimum distance in lines between two region starts
pub const MIN_REGION_LINES: usize = 20;

static EXCEPTION_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(([\w<>$_]+\.)+[\w<>$_]+(Error|Exception)(\s|:))").unwrap()
});

static TRACE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?ms)^(([\w<>$_]+\.)+[\w<>$_]+(Error|Exception)(\s|:))",
        r"(:?.*?)(at\s+([\w<>$_]+\.)+[\w<>$_]+\s*\(.+?\.java(:)?(\d+)?\)",
        r"(\s*?at\s+([\w<>$_\s]+\.)+[\w<>$_\s]+\s*\(.+?\.java(:)?(\d+)?\))*)",
    ))
    .unwrap()
});

static CAUSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?ms)(Caused by:).*?(Exception|Error)(.*?)(\s+at.*?\(.*?:\d+\))+").unwrap()
});

/// Groups: 1 exception, 4 reason, 5 frames
static TRACE_PARTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?ms)(([\w<>$_]+\.)+[\w<>$_]+(Error|Exception))(.*?)",
        r"(at\s+([\w<>$_\n]+\.)+[\w<>$_\n]+\s*\(.+?\.java(:)?(\d+)?\)",
        r"(\s*?at\s+([\w<>$_\s]+\.)+[\w<>$_\s]+\s*\(.+?\.java(:)?(\d+)?\))*)",
    ))
    .unwrap()
});

/// Groups: 2 exception, 4 reason, 5 frames
static CAUSE_PARTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?ms)(Caused by:)(.*?(Error|Exception))(.*?)",
        r"(at\s+([\w<>$_\n]+\.)+[\w<>$_\n]+\s*\(.+?\.java(:)?(\d+)?\)",
        r"(\s*?at\s+([\w<>$_\s]+\.)+[\w<>$_\s]+\s*\(.+?\.java(:)?(\d+)?\))*)",
    ))
    .unwrap()
});

/// Exception name and reason ahead of the first frame, for matches whose
/// frames the `*_PARTS` patterns reject. Groups: 1 exception, 2 reason
static HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^\s*(?:Caused by:\s*)?([\w<>$.]+(?:Error|Exception))(.*?)\s+at\s").unwrap()
});

static FRAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?ms)(^\s*?at\s+(([\w<>$_\s]+\.)+[\w<>$_\s]+\s*\(.*?\)$))").unwrap()
});

/// Finds Java exception traces and their causes
#[derive(Debug, Clone, Copy, Default)]
pub struct StackTraceExtractor;

impl StackTraceExtractor {
    /// Create a stack trace extractor
    pub fn new() -> Self {
        Self
    }
}

impl Filter for StackTraceExtractor {
    type Artifact = StackTrace;

    fn name(&self) -> &'static str {
        "stack_traces"
    }

    fn run(&self, text: &str) -> FilterOutput<StackTrace> {
        let mut mask = TextMask::new(text);
        let mut traces = Vec::new();

        for region in regions(text) {
            let slice = &text[region.start..region.end];
            let before = traces.len();

            for m in TRACE.find_iter(slice).chain(CAUSE.find_iter(slice)) {
                let span = Span::new(region.start + m.start(), region.start + m.end());
                mask.claim_span(span);

                let trace = if m.as_str().trim_start().starts_with("Caused by:") {
                    build_cause(m.as_str(), span)
                } else {
                    build_trace(m.as_str(), span)
                };
                traces.push(trace);
            }

            if traces.len() == before {
                debug!(start = region.start, end = region.end, "No stack trace in region");
            }
        }

        debug!(count = traces.len(), "Stack trace filter finished");
        FilterOutput {
            artifacts: traces,
            residual: mask.materialize(),
        }
    }
}

/// Cut `text` at exception anchors at least [`MIN_REGION_LINES`] apart
fn regions(text: &str) -> Vec<Span> {
    let mut starts: Vec<usize> = Vec::new();
    for anchor in EXCEPTION_START.find_iter(text) {
        match starts.last() {
            Some(&last) if count_lines(&text[last..anchor.start()]) < MIN_REGION_LINES => {}
            _ => starts.push(anchor.start()),
        }
    }
    if starts.is_empty() {
        starts.push(0);
    }

    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| Span::new(start, starts.get(i + 1).copied().unwrap_or(text.len())))
        .collect()
}

fn build_trace(matched: &str, span: Span) -> StackTrace {
    match TRACE_PARTS.captures(matched) {
        Some(caps) => StackTrace::new(
            caps[1].trim(),
            caps[4].trim(),
            parse_frames(&caps[5]),
            false,
            span,
        ),
        None => build_from_header(matched, false, span),
    }
}

fn build_cause(matched: &str, span: Span) -> StackTrace {
    match CAUSE_PARTS.captures(matched) {
        Some(caps) => StackTrace::new(
            caps[2].trim(),
            caps[4].trim(),
            parse_frames(&caps[5]),
            true,
            span,
        ),
        // the cause pattern's frames may lack a `.java` file
        None => build_from_header(matched, true, span),
    }
}

/// Keep the exception and reason, and whatever frames parse
fn build_from_header(matched: &str, is_cause: bool, span: Span) -> StackTrace {
    let (exception, reason) = match HEADER.captures(matched) {
        Some(caps) => (caps[1].to_string(), caps[2].trim().to_string()),
        None => (String::new(), String::new()),
    };
    StackTrace::new(exception, reason, parse_frames(matched), is_cause, span)
}

/// Frames without their `at ` prefix, line breaks inside a frame removed
fn parse_frames(block: &str) -> Vec<String> {
    FRAME
        .captures_iter(block)
        .map(|caps| caps[2].replace(['\n', '\r'], ""))
        .collect()
}
