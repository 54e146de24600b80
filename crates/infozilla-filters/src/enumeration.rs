//! Enumeration and itemization extraction
//!
//! Three detectors run over the same text: lettered lists (`a.`, `(b)`,
//! `c.)`), numbered lists (`1.`, `2)`, `3-`) and dash itemizations (`- `).
//! Lettered and numbered markers must ascend; a marker that does not ascend
//! closes the current list and opens a new one. A list also takes the
//! paragraph that follows its last marker, up to the next empty line.

use crate::filter::{Filter, FilterOutput};
use crate::mask::TextMask;
use crate::text::{line_offsets, split_lines};
use infozilla_domain::{Enumeration, EnumerationKind};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Fewest marker lines that make a list
pub const MIN_MARKERS: usize = 2;

static LETTER_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\(?([a-zA-Z])(\.|\.\)|\))[a-zA-Z \t].*").unwrap());

static NUMBER_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\(?([0-9]+)(\.|\.\)|\)|\-)[a-zA-Z \t].*").unwrap());

const ITEM_MARKER: &str = "- ";

/// Finds lettered, numbered and itemized lists
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumerationExtractor;

impl EnumerationExtractor {
    /// Create an enumeration extractor
    pub fn new() -> Self {
        Self
    }
}

impl Filter for EnumerationExtractor {
    type Artifact = Enumeration;

    fn name(&self) -> &'static str {
        "enumerations"
    }

    fn run(&self, text: &str) -> FilterOutput<Enumeration> {
        let lines = Lines::new(text);
        let mut mask = TextMask::new(text);

        let mut found = Vec::new();
        found.extend(lettered(&lines));
        found.extend(numbered(&lines));
        found.extend(itemized(&lines));

        for e in &found {
            mask.claim(e.enum_start, (e.enum_end + 1).min(text.len()));
        }

        debug!(count = found.len(), "Enumeration filter finished");
        FilterOutput {
            artifacts: found,
            residual: mask.materialize(),
        }
    }
}

/// Lines of the input with their start offsets
struct Lines<'a> {
    lines: Vec<&'a str>,
    offsets: Vec<usize>,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        let lines = split_lines(text);
        let offsets = line_offsets(&lines);
        Self { lines, offsets }
    }

    /// Build a list from its first line and its last ascending marker line
    fn enumeration(&self, kind: EnumerationKind, start: usize, last_marker: usize) -> Enumeration {
        let mut items: Vec<String> = self.lines[start..last_marker]
            .iter()
            .map(|l| l.to_string())
            .collect();

        let mut end_line = last_marker;
        for (i, line) in self.lines.iter().enumerate().skip(last_marker) {
            if line.is_empty() {
                break;
            }
            items.push(line.to_string());
            end_line = i;
        }

        Enumeration {
            kind,
            items,
            start_line: start,
            end_line,
            enum_start: self.offsets[start],
            enum_end: self.offsets[end_line] + self.lines[end_line].len(),
        }
    }
}

/// `(first line, last ascending marker line)` of every run of at least
/// [`MIN_MARKERS`] ascending markers
fn ascending_runs<K, F>(lines: &[&str], marker: F) -> Vec<(usize, usize)>
where
    K: PartialOrd,
    F: Fn(&str) -> Option<K>,
{
    let mut runs = Vec::new();
    let mut start: Option<usize> = None;
    let mut last_marker = 0;
    let mut count = 0;
    let mut previous: Option<K> = None;

    for (i, line) in lines.iter().enumerate() {
        let Some(symbol) = marker(line.trim()) else {
            continue;
        };

        let ascending = previous.as_ref().is_none_or(|p| symbol > *p);
        match start {
            Some(first) if !ascending => {
                if count >= MIN_MARKERS {
                    runs.push((first, last_marker));
                }
                start = Some(i);
                last_marker = i;
                count = 1;
            }
            Some(_) => {
                last_marker = i;
                count += 1;
            }
            None => {
                start = Some(i);
                last_marker = i;
                count = 1;
            }
        }
        previous = Some(symbol);
    }

    if let Some(first) = start {
        if count >= MIN_MARKERS {
            runs.push((first, last_marker));
        }
    }
    runs
}

fn letter_marker(line: &str) -> Option<char> {
    LETTER_MARKER
        .captures(line)
        .and_then(|caps| caps[1].chars().next())
}

/// Numbers too large to represent compare as larger than any other
fn number_marker(line: &str) -> Option<u64> {
    NUMBER_MARKER
        .captures(line)
        .map(|caps| caps[1].parse().unwrap_or(u64::MAX))
}

fn lettered(lines: &Lines<'_>) -> Vec<Enumeration> {
    ascending_runs(&lines.lines, letter_marker)
        .into_iter()
        .map(|(start, last)| lines.enumeration(EnumerationKind::Lettered, start, last))
        .collect()
}

fn numbered(lines: &Lines<'_>) -> Vec<Enumeration> {
    ascending_runs(&lines.lines, number_marker)
        .into_iter()
        .map(|(start, last)| lines.enumeration(EnumerationKind::Numbered, start, last))
        .collect()
}

/// Dash items; only an empty line ends an itemization
fn itemized(lines: &Lines<'_>) -> Vec<Enumeration> {
    let mut found = Vec::new();
    let mut start: Option<usize> = None;
    let mut last_item = 0;
    let mut count = 0;

    for (i, line) in lines.lines.iter().enumerate() {
        let line = line.trim();
        if line.starts_with(ITEM_MARKER) {
            start.get_or_insert(i);
            last_item = i;
            count += 1;
        } else if line.is_empty() {
            if let Some(first) = start.take() {
                if count >= MIN_MARKERS {
                    found.push(lines.enumeration(EnumerationKind::Itemized, first, last_item));
                }
            }
            count = 0;
        }
    }

    if let Some(first) = start {
        if count >= MIN_MARKERS {
            found.push(lines.enumeration(EnumerationKind::Itemized, first, last_item));
        }
    }
    found
}
