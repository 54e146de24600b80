//! Unified diff extraction
//!
//! Text is partitioned into candidate regions at `Index:` lines, each region
//! is split into a header block and hunks, and the patch is located again in
//! the input by searching for its header and last hunk text.

use crate::filter::{Filter, FilterOutput};
use crate::mask::TextMask;
use crate::text::split_lines;
use infozilla_domain::{Hunk, Patch, Span};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

static STRICT_HUNK_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@@\s-\d+,\d+\s\+\d+,\d+\s@@$").unwrap());

static RELAXED_HUNK_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@@\s+-\d+(,\d+)?\s+\+\d+(,\d+)?\s+@@.*$").unwrap());

/// Shared by `---` and `+++` lines: marker, one blank, name, one blank
static FILENAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(-{3}|\+{3})([ \t](.*?)[ \t])").unwrap());

/// How strictly diff headers are recognized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchMode {
    /// `Index:` + `====` separator, exact `@@ -a,b +c,d @@` headers
    #[default]
    Strict,

    /// Separator optional, bare `---`/`+++` pairs start a patch, hunk headers
    /// may omit counts and carry trailing section text
    Relaxed,
}

impl PatchMode {
    /// `Relaxed` when `relaxed` is set, `Strict` otherwise
    pub fn from_relaxed(relaxed: bool) -> Self {
        if relaxed {
            PatchMode::Relaxed
        } else {
            PatchMode::Strict
        }
    }

    fn hunk_header(&self) -> &'static Regex {
        match self {
            PatchMode::Strict => &STRICT_HUNK_HEADER,
            PatchMode::Relaxed => &RELAXED_HUNK_HEADER,
        }
    }
}

/// Finds unified diff patches
#[derive(Debug, Clone, Copy, Default)]
pub struct PatchExtractor {
    mode: PatchMode,
}

impl PatchExtractor {
    /// Create a patch extractor with the given strictness
    pub fn new(mode: PatchMode) -> Self {
        Self { mode }
    }

    /// The strictness this extractor was built with
    pub fn mode(&self) -> PatchMode {
        self.mode
    }

    /// Parse every patch in `text` without touching a mask
    pub fn parse(&self, text: &str) -> Vec<Patch> {
        let lines = split_lines(text);
        let starts = self.region_starts(&lines);

        let mut patches = Vec::new();
        for (n, &start) in starts.iter().enumerate() {
            let end = starts.get(n + 1).copied().unwrap_or(lines.len());
            match self.parse_region(&lines[start..end]) {
                Some((header, fields, hunks)) => {
                    let span = locate(text, &header, &hunks);
                    patches.push(Patch {
                        index: fields.index,
                        original_file: fields.original_file,
                        modified_file: fields.modified_file,
                        header,
                        hunks,
                        span,
                    });
                }
                None => debug!(line = start, "Candidate patch region without hunk header"),
            }
        }
        patches
    }

    fn region_starts(&self, lines: &[&str]) -> Vec<usize> {
        (0..lines.len())
            .filter(|&i| match self.mode {
                PatchMode::Strict => {
                    lines[i].starts_with("Index: ")
                        && lines.get(i + 1).is_some_and(|next| next.starts_with("===="))
                }
                PatchMode::Relaxed => {
                    lines[i].starts_with("Index: ")
                        || (lines[i].starts_with("--- ")
                            && lines.get(i + 1).is_some_and(|next| next.starts_with("+++ "))
                            && !header_has_index(lines, i))
                }
            })
            .collect()
    }

    /// Header block, header fields and hunks of one candidate region
    fn parse_region(&self, lines: &[&str]) -> Option<(String, HeaderFields, Vec<Hunk>)> {
        let fields = HeaderFields::from_lines(lines);

        let search_from = first_line_starting_with(lines, "+++ ").map_or(0, |i| i + 1);
        let first_hunk = self.next_hunk_header(lines, search_from)?;

        let header = lines[..first_hunk].join("\n");
        let hunks = self.collect_hunks(lines, first_hunk);

        Some((header, fields, hunks))
    }

    fn next_hunk_header(&self, lines: &[&str], from: usize) -> Option<usize> {
        let pattern = self.mode.hunk_header();
        (from..lines.len()).find(|&i| pattern.is_match(lines[i]))
    }

    fn collect_hunks(&self, lines: &[&str], first: usize) -> Vec<Hunk> {
        let mut hunks = Vec::new();
        let mut header = Some(first);

        while let Some(h) = header {
            let next = self.next_hunk_header(lines, h + 1);
            let window_end = next.unwrap_or(lines.len());

            let mut body: Vec<&str> = Vec::new();
            for i in h + 1..window_end {
                if is_hunk_line(lines[i]) {
                    body.push(lines[i]);
                } else if i + 1 < window_end && is_hunk_line(lines[i + 1]) {
                    // a stray line inside a hunk, e.g. an emptied context line
                    body.push(lines[i]);
                } else {
                    break;
                }
            }

            hunks.push(Hunk::new(body.join("\n")));
            header = next;
        }
        hunks
    }
}

impl Filter for PatchExtractor {
    type Artifact = Patch;

    fn name(&self) -> &'static str {
        "patches"
    }

    fn run(&self, text: &str) -> FilterOutput<Patch> {
        let mut mask = TextMask::new(text);
        let patches = self.parse(text);
        for patch in &patches {
            mask.claim_span(patch.span);
        }
        debug!(count = patches.len(), mode = ?self.mode, "Patch filter finished");
        FilterOutput {
            artifacts: patches,
            residual: mask.materialize(),
        }
    }
}

/// `Index:`, `---` and `+++` values of a region
#[derive(Debug, Default)]
struct HeaderFields {
    index: String,
    original_file: String,
    modified_file: String,
}

impl HeaderFields {
    fn from_lines(lines: &[&str]) -> Self {
        let find = |prefix: &str| {
            first_line_starting_with(lines, prefix)
                .map(|i| lines[i])
                .unwrap_or_default()
        };

        let index = find("Index: ");
        Self {
            index: index.strip_prefix("Index: ").unwrap_or(index).trim().to_string(),
            original_file: filename_from_marker_line(find("--- ")),
            modified_file: filename_from_marker_line(find("+++ ")),
        }
    }
}

/// File name of a `--- name<TAB>date` or `+++ name date` line
fn filename_from_marker_line(line: &str) -> String {
    if let Some(caps) = FILENAME.captures_iter(line).last() {
        return caps[2].trim().to_string();
    }
    line.strip_prefix("--- ")
        .or_else(|| line.strip_prefix("+++ "))
        .unwrap_or(line)
        .trim()
        .to_string()
}

fn first_line_starting_with(lines: &[&str], prefix: &str) -> Option<usize> {
    lines.iter().position(|l| l.starts_with(prefix))
}

fn is_hunk_line(line: &str) -> bool {
    line.starts_with('+') || line.starts_with('-') || line.starts_with(' ')
}

/// Whether the header block ending just before `at` already has an `Index:`
/// line, in which case a `---`/`+++` pair belongs to that patch
fn header_has_index(lines: &[&str], at: usize) -> bool {
    lines[..at]
        .iter()
        .rev()
        .take_while(|l| !l.is_empty() && !is_hunk_line(l) && !l.starts_with("@@"))
        .any(|l| l.starts_with("Index: "))
}

/// Find the patch again in the consumed text
///
/// The start is the first occurrence of the header and the end follows the
/// last occurrence of the final hunk. When hunk text recurs elsewhere in the
/// input this can select the wrong occurrence.
fn locate(text: &str, header: &str, hunks: &[Hunk]) -> Span {
    let start = text.find(header).unwrap_or(0);
    let end = match hunks.last() {
        Some(last) if !last.text.is_empty() => text
            .rfind(&last.text)
            .map(|pos| pos + last.text.len())
            .unwrap_or(start + header.len()),
        _ => start + header.len(),
    };
    Span::new(start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE: &str = "Index: src/Foo.java\n\
===================================================================\n\
--- src/Foo.java\t(revision 12)\n\
+++ src/Foo.java\t(working copy)\n\
@@ -1,3 +1,4 @@\n\
\x20ctx\n\
-old\n\
+new\n\
\x20ctx2\n";

    #[test]
    fn test_single_patch_single_hunk() {
        let patches = PatchExtractor::default().parse(SIMPLE);
        assert_eq!(patches.len(), 1);

        let patch = &patches[0];
        assert_eq!(patch.index, "src/Foo.java");
        assert_eq!(patch.original_file, "src/Foo.java");
        assert_eq!(patch.modified_file, "src/Foo.java");
        assert_eq!(patch.hunks.len(), 1);

        let lines: Vec<&str> = patch.hunks[0].lines().collect();
        assert_eq!(lines, vec![" ctx", "-old", "+new", " ctx2"]);
    }

    #[test]
    fn test_header_block_excludes_hunk_header() {
        let patch = &PatchExtractor::default().parse(SIMPLE)[0];
        assert!(patch.header.starts_with("Index: src/Foo.java"));
        assert!(patch.header.ends_with("+++ src/Foo.java\t(working copy)"));
        assert!(!patch.header.contains("@@"));
    }

    #[test]
    fn test_span_covers_header_to_last_hunk() {
        let text = format!("Please apply:\n{}thanks", SIMPLE);
        let patch = &PatchExtractor::default().parse(&text)[0];
        assert_eq!(patch.span.start, "Please apply:\n".len());
        assert!(patch.span.slice(&text).unwrap().ends_with(" ctx2"));
    }

    #[test]
    fn test_run_removes_patch_text() {
        let text = format!("Please apply:\n{}thanks", SIMPLE);
        let output = PatchExtractor::default().run(&text);
        assert_eq!(output.artifacts.len(), 1);
        assert_eq!(output.residual, "Please apply:\n\nthanks");
    }

    #[test]
    fn test_missing_separator_is_not_a_patch_in_strict_mode() {
        let text = "Index: a.c\n--- a.c\n+++ a.c\n@@ -1,1 +1,1 @@\n-x\n+y\n";
        assert!(PatchExtractor::new(PatchMode::Strict).parse(text).is_empty());
    }

    #[test]
    fn test_region_without_hunk_is_dropped() {
        let text = "Index: a.c\n====\n--- a.c\n+++ a.c\nno hunks here\n\
Index: b.c\n====\n--- b.c\n+++ b.c\n@@ -1,1 +1,1 @@\n-x\n+y\n";
        let patches = PatchExtractor::default().parse(text);
        assert_eq!(patches.len(), 1);
        assert_eq!(patches[0].index, "b.c");
    }

    #[test]
    fn test_multiple_hunks() {
        let text = "Index: a.c\n====\n--- a.c\n+++ a.c\n\
@@ -1,2 +1,2 @@\n-a\n+b\n c\n\
@@ -10,2 +10,3 @@\n d\n+e\n f\n";
        let patch = &PatchExtractor::default().parse(text)[0];
        assert_eq!(patch.hunks.len(), 2);
        assert_eq!(patch.hunks[0].text, "-a\n+b\n c");
        assert_eq!(patch.hunks[1].text, " d\n+e\n f");
    }

    #[test]
    fn test_blank_line_inside_hunk_is_tolerated() {
        let text = "Index: a.c\n====\n--- a.c\n+++ a.c\n@@ -1,3 +1,3 @@\n a\n\n-b\n+c\n\nTrailing prose\n";
        let patch = &PatchExtractor::default().parse(text)[0];
        assert_eq!(patch.hunks[0].text, " a\n\n-b\n+c");
    }

    #[test]
    fn test_hunk_stops_at_two_non_hunk_lines() {
        let text = "Index: a.c\n====\n--- a.c\n+++ a.c\n@@ -1,1 +1,1 @@\n-x\n+y\nprose\nmore prose\n+not part\n";
        let patch = &PatchExtractor::default().parse(text)[0];
        assert_eq!(patch.hunks[0].text, "-x\n+y");
    }

    #[test]
    fn test_two_patches() {
        let text = "Index: a.c\n====\n--- a.c\n+++ a.c\n@@ -1,1 +1,1 @@\n-x\n+y\n\
Index: b.c\n====\n--- b.c\n+++ b.c\n@@ -2,1 +2,1 @@\n-p\n+q\n";
        let output = PatchExtractor::default().run(text);
        assert_eq!(output.artifacts.len(), 2);
        assert_eq!(output.artifacts[1].modified_file, "b.c");
        assert!(!output.residual.contains("Index:"));
    }

    #[test]
    fn test_strict_rejects_hunk_header_with_section_text() {
        let text = "Index: a.c\n====\n--- a.c\n+++ a.c\n@@ -1,1 +1,1 @@ fn main()\n-x\n+y\n";
        assert!(PatchExtractor::new(PatchMode::Strict).parse(text).is_empty());
        assert_eq!(PatchExtractor::new(PatchMode::Relaxed).parse(text).len(), 1);
    }

    #[test]
    fn test_relaxed_accepts_plain_git_style_diff() {
        let text = "diff --git a/x.rs b/x.rs\n--- a/x.rs\n+++ b/x.rs\n@@ -3 +3 @@\n-old\n+new\n";
        let patches = PatchExtractor::new(PatchMode::Relaxed).parse(text);
        assert_eq!(patches.len(), 1);
        assert_eq!(patches[0].index, "");
        assert_eq!(patches[0].original_file, "a/x.rs");
        assert_eq!(patches[0].modified_file, "b/x.rs");
        assert_eq!(patches[0].hunks[0].text, "-old\n+new");
    }

    #[test]
    fn test_relaxed_index_without_separator() {
        let text = "Index: a.c\n--- a.c\n+++ a.c\n@@ -1,1 +1,1 @@\n-x\n+y\n";
        let patches = PatchExtractor::new(PatchMode::Relaxed).parse(text);
        assert_eq!(patches.len(), 1);
        assert_eq!(patches[0].index, "a.c");
    }

    #[test]
    fn test_relaxed_does_not_split_index_header() {
        let text = "Index: a.c\n====\n--- a.c\n+++ a.c\n@@ -1,1 +1,1 @@\n-x\n+y\n";
        let patches = PatchExtractor::new(PatchMode::Relaxed).parse(text);
        assert_eq!(patches.len(), 1);
        assert!(patches[0].header.starts_with("Index: a.c"));
    }

    #[test]
    fn test_filename_from_marker_line() {
        assert_eq!(filename_from_marker_line("--- foo.java\t(revision 1)"), "foo.java");
        assert_eq!(filename_from_marker_line("+++ bar.c 2008-01-01"), "bar.c");
        assert_eq!(filename_from_marker_line("--- baz.txt"), "baz.txt");
        assert_eq!(filename_from_marker_line(""), "");
    }

    #[test]
    fn test_mode_from_relaxed() {
        assert_eq!(PatchMode::from_relaxed(true), PatchMode::Relaxed);
        assert_eq!(PatchMode::from_relaxed(false), PatchMode::Strict);
    }
}
