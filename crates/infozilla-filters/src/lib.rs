//! infozilla Filters
//!
//! Finds structural elements in bug report text and removes them, leaving
//! the natural language discussion behind.
//!
//! # Overview
//!
//! Bug reports mix prose with patches, stack traces, source code and lists of
//! reproduction steps. Each kind of element has an extractor implementing
//! [`Filter`]: it returns the records it found and the input with their spans
//! removed. The [`FilterChain`] runs the extractors in a fixed order, every
//! stage working on the residual of the one before.
//!
//! # Architecture
//!
//! ```text
//! Text → PatchExtractor → StackTraceExtractor → TalkbackExtractor
//!      → SourceCodeExtractor → EnumerationExtractor → cleaned text
//! ```
//!
//! Every extractor builds a private [`TextMask`] over the text it was given,
//! so extractors never share state and spans in the result refer to the text
//! the producing stage saw.
//!
//! # Example Usage
//!
//! ```
//! use infozilla_filters::{ExtractOptions, FilterChain};
//!
//! # fn example() -> Result<(), infozilla_filters::FilterError> {
//! let chain = FilterChain::java()?;
//! let text = "Steps:\n1. open the editor\n2. press save\n\nIt hangs.";
//!
//! let result = chain.extract(text, &ExtractOptions::eclipse());
//!
//! assert_eq!(result.enumerations.len(), 1);
//! assert_eq!(result.cleaned_text, "Steps:\n\nIt hangs.");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod chain;
mod code_db;
mod config;
mod enumeration;
mod error;
mod filter;
mod mask;
mod patch;
mod sourcecode;
mod stacktrace;
mod talkback;
mod text;


pub use chain::{ExtractionResult, FilterChain};
pub use code_db::{CodePattern, CodePatternDatabase, JAVA_CODE_DB, OPTION_MATCH};
pub use config::{ExtractOptions, FilterConfig, MAX_CONCURRENCY_LIMIT};
pub use enumeration::{EnumerationExtractor, MIN_MARKERS};
pub use error::FilterError;
pub use filter::{Filter, FilterOutput};
pub use mask::TextMask;
pub use patch::{PatchExtractor, PatchMode};
pub use sourcecode::{minimal_set, SourceCodeExtractor};
pub use stacktrace::{StackTraceExtractor, MIN_REGION_LINES};
pub use talkback::{classify as classify_talkback_line, TalkbackExtractor, MIN_TRACE_LINES};
pub use text::normalize_newlines;

/// Run the chain with the built-in Java code patterns
///
/// Builds a fresh [`FilterChain`] per call; callers processing many texts
/// should build one chain and reuse it.
pub fn extract(text: &str, options: &ExtractOptions) -> Result<ExtractionResult, FilterError> {
    Ok(FilterChain::java()?.extract(text, options))
}
