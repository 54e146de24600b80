//! infozilla Domain Layer
//!
//! This crate contains the artifact records produced by the infozilla
//! filters. It defines no behaviour beyond small accessors: every record is
//! created once by an extractor and is immutable afterwards.
//!
//! ## Key Concepts
//!
//! - **Span**: half-open `[start, end)` offsets into the text version an
//!   extractor consumed
//! - **Patch**: a unified diff with its header and one or more hunks
//! - **StackTrace**: a Java exception (or one link of a cause chain)
//! - **TalkbackTrace**: a Mozilla Talkback crash trace
//! - **CodeRegion**: a source code fragment matched by the pattern database
//! - **Enumeration**: a lettered, numbered or itemized list
//!
//! ## Architecture
//!
//! - Only `serde` as an external dependency (export formats)
//! - Pure data only
//! - Extraction logic lives in `infozilla-filters`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod code_region;
pub mod enumeration;
pub mod patch;
pub mod span;
pub mod stacktrace;
pub mod talkback;

// Re-exports for convenience
pub use code_region::CodeRegion;
pub use enumeration::{Enumeration, EnumerationKind};
pub use patch::{Hunk, Patch};
pub use span::Span;
pub use stacktrace::StackTrace;
pub use talkback::{TalkbackEntry, TalkbackKind, TalkbackTrace};
