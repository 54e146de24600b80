//! StackTrace module - Java exceptions and their cause chains

use crate::span::Span;
use serde::{Deserialize, Serialize};

/// A Java-style stack trace
///
/// A report with a cause chain produces one root trace (`is_cause == false`)
/// followed by one trace per `Caused by:` section. The links between them are
/// implied by text adjacency only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackTrace {
    /// Fully qualified exception or error name
    pub exception_type: String,

    /// Free text between the exception name and the first frame
    pub reason: String,

    /// Frames without the leading `at `, outermost call last
    pub frames: Vec<String>,

    /// Whether this trace was introduced by `Caused by:`
    pub is_cause: bool,

    /// Location in the text the stack trace filter consumed
    pub span: Span,
}

impl StackTrace {
    /// Create a new trace, normalizing the reason
    ///
    /// A leading `": "` (or `" :"`) left over from the exception header is
    /// stripped from `reason`.
    ///
    /// # Examples
    ///
    /// ```
    /// use infozilla_domain::{Span, StackTrace};
    ///
    /// let trace = StackTrace::new("java.io.IOException", ": disk", vec![], true, Span::default());
    /// assert_eq!(trace.reason, "disk");
    /// ```
    pub fn new(
        exception_type: impl Into<String>,
        reason: impl Into<String>,
        frames: Vec<String>,
        is_cause: bool,
        span: Span,
    ) -> Self {
        let reason = reason.into();
        let reason = reason
            .strip_prefix(": ")
            .or_else(|| reason.strip_prefix(" :"))
            .map(str::to_string)
            .unwrap_or(reason);
        Self {
            exception_type: exception_type.into(),
            reason,
            frames,
            is_cause,
            span,
        }
    }

    /// Number of parsed frames
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}
