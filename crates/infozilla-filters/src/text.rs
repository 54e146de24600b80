//! Small text helpers shared by the filters

use once_cell::sync::Lazy;
use regex::Regex;

static LINE_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n?").unwrap());

/// Convert CRLF and lone CR line endings to LF
///
/// The filters assume a single `\n` newline convention; callers are expected
/// to run input through this before extraction.
///
/// # Examples
///
/// ```
/// use infozilla_filters::normalize_newlines;
///
/// assert_eq!(normalize_newlines("a\r\nb\rc\n"), "a\nb\nc\n");
/// ```
pub fn normalize_newlines(input: &str) -> String {
    LINE_BREAKS.replace_all(input, "\n").into_owned()
}

/// Split text into lines on `\n`, keeping empty lines (including a trailing
/// one after a final newline)
pub(crate) fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}

/// Byte offset at which each line starts
pub(crate) fn line_offsets(lines: &[&str]) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(lines.len());
    let mut offset = 0;
    for line in lines {
        offsets.push(offset);
        offset += line.len() + 1;
    }
    offsets
}

/// Number of lines in `text`, ignoring trailing empty lines
pub(crate) fn count_lines(text: &str) -> usize {
    text.trim_end_matches('\n').split('\n').count()
}
