//! Claim mask shared by every extractor
//!
//! A `TextMask` owns one version of the input text and remembers which
//! offsets have been claimed by an artifact. The residual text is rebuilt from
//! the claim set on every call, so claims can arrive in any order and may
//! overlap.

use infozilla_domain::Span;
use tracing::warn;

/// Per-offset claim record over an immutable text
///
/// One mask belongs to exactly one extractor invocation; offsets are only
/// valid for the text version that invocation received.
#[derive(Debug, Clone)]
pub struct TextMask {
    text: String,
    claimed: Vec<bool>,
    requests: Vec<Span>,
}

impl TextMask {
    /// Create a mask over `text` with nothing claimed
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let claimed = vec![false; text.len()];
        Self {
            text,
            claimed,
            requests: Vec::new(),
        }
    }

    /// The original text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the original text
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the original text is empty
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Mark `[start, end)` as removed
    ///
    /// Claiming is idempotent. A range reaching past the end of the text (or
    /// an inverted range) is logged and ignored as a whole.
    pub fn claim(&mut self, start: usize, end: usize) {
        self.requests.push(Span::new(start, end));
        if start > end || end > self.claimed.len() {
            warn!(
                start,
                end,
                len = self.claimed.len(),
                "Refusing to claim out of bounds range"
            );
            return;
        }
        self.claimed[start..end].fill(true);
    }

    /// Mark a span as removed (see [`TextMask::claim`])
    pub fn claim_span(&mut self, span: Span) {
        self.claim(span.start, span.end);
    }

    /// Whether the offset has been claimed
    pub fn is_claimed(&self, offset: usize) -> bool {
        self.claimed.get(offset).copied().unwrap_or(false)
    }

    /// Number of claimed offsets
    pub fn claimed_len(&self) -> usize {
        self.claimed.iter().filter(|c| **c).count()
    }

    /// Every claim request received, including rejected ones
    pub fn requests(&self) -> &[Span] {
        &self.requests
    }

    /// The text with every claimed character omitted, in original order
    pub fn materialize(&self) -> String {
        self.text
            .char_indices()
            .filter(|(i, _)| !self.claimed[*i])
            .map(|(_, c)| c)
            .collect()
    }
}
