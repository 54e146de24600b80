//! The extraction pipeline
//!
//! ```text
//! text → patches → stack traces → talkback → source code → enumerations → cleaned text
//! ```
//!
//! Each stage receives the residual text of the previous enabled stage, so
//! spans in the result are relative to the text that stage consumed.

use crate::code_db::CodePatternDatabase;
use crate::config::{ExtractOptions, FilterConfig};
use crate::enumeration::EnumerationExtractor;
use crate::error::FilterError;
use crate::filter::Filter;
use crate::patch::PatchExtractor;
use crate::sourcecode::SourceCodeExtractor;
use crate::stacktrace::StackTraceExtractor;
use crate::talkback::TalkbackExtractor;
use infozilla_domain::{CodeRegion, Enumeration, Patch, StackTrace, TalkbackTrace};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Everything found in one text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Unified diff patches
    pub patches: Vec<Patch>,

    /// Java traces, each root followed by its causes
    pub stack_traces: Vec<StackTrace>,

    /// Talkback traces
    pub talkback_traces: Vec<TalkbackTrace>,

    /// Source code fragments, sorted and non-overlapping
    pub code_regions: Vec<CodeRegion>,

    /// Lettered, then numbered, then itemized lists
    pub enumerations: Vec<Enumeration>,

    /// Text left after every enabled extractor ran
    pub cleaned_text: String,
}

impl ExtractionResult {
    /// Hunks over all patches
    pub fn hunk_count(&self) -> usize {
        self.patches.iter().map(Patch::hunk_count).sum()
    }

    /// Stack traces introduced by `Caused by:`
    pub fn cause_count(&self) -> usize {
        self.stack_traces.iter().filter(|t| t.is_cause).count()
    }

    /// Whether no artifact of any kind was found
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
            && self.stack_traces.is_empty()
            && self.talkback_traces.is_empty()
            && self.code_regions.is_empty()
            && self.enumerations.is_empty()
    }
}

/// Runs the enabled extractors in order over shrinking text
///
/// The chain holds only immutable compiled patterns and can be shared between
/// threads behind an `Arc`.
#[derive(Debug, Clone)]
pub struct FilterChain {
    source_code: SourceCodeExtractor,
}

impl FilterChain {
    /// Create a chain whose source code stage uses `database`
    pub fn new(database: CodePatternDatabase) -> Self {
        Self {
            source_code: SourceCodeExtractor::new(database),
        }
    }

    /// Create a chain with the built-in Java code patterns
    pub fn java() -> Result<Self, FilterError> {
        Ok(Self::new(CodePatternDatabase::java()?))
    }

    /// Create a chain with the code patterns a config names
    pub fn from_config(config: &FilterConfig) -> Result<Self, FilterError> {
        config.validate()?;
        Ok(Self::new(config.load_patterns()?))
    }

    /// The source code stage
    pub fn source_code(&self) -> &SourceCodeExtractor {
        &self.source_code
    }

    /// Run every enabled extractor over `text`
    pub fn extract(&self, text: &str, options: &ExtractOptions) -> ExtractionResult {
        let mut result = ExtractionResult::default();
        let mut current = text.to_string();

        current = stage(
            &PatchExtractor::new(options.patch_mode()),
            options.run_patches,
            current,
            &mut result.patches,
        );
        current = stage(
            &StackTraceExtractor,
            options.run_stack_traces,
            current,
            &mut result.stack_traces,
        );
        current = stage(
            &TalkbackExtractor,
            options.run_talkback,
            current,
            &mut result.talkback_traces,
        );
        current = stage(
            &self.source_code,
            options.run_source_code,
            current,
            &mut result.code_regions,
        );
        current = stage(
            &EnumerationExtractor,
            options.run_enumerations,
            current,
            &mut result.enumerations,
        );

        result.cleaned_text = current;
        info!(
            patches = result.patches.len(),
            stack_traces = result.stack_traces.len(),
            talkback = result.talkback_traces.len(),
            code_regions = result.code_regions.len(),
            enumerations = result.enumerations.len(),
            input_len = text.len(),
            cleaned_len = result.cleaned_text.len(),
            "Extraction finished"
        );
        result
    }
}

/// Run one extractor if enabled, returning the text for the next stage
fn stage<F: Filter>(filter: &F, enabled: bool, text: String, found: &mut Vec<F::Artifact>) -> String {
    if !enabled {
        debug!(filter = filter.name(), "Skipping disabled filter");
        return text;
    }
    let output = filter.run(&text);
    found.extend(output.artifacts);
    output.residual
}
