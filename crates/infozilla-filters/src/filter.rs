//! The interface every extractor implements

/// Artifacts found by one filter run plus the text left over
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOutput<T> {
    /// Artifacts in the order the filter reports them
    pub artifacts: Vec<T>,

    /// Input text with every claimed span removed
    pub residual: String,
}

/// A structural element extractor
///
/// `run` is a pure function of its input: each call builds its own
/// [`TextMask`](crate::TextMask), so one filter value can serve many texts,
/// including from several threads at once.
pub trait Filter {
    /// Record type this filter produces
    type Artifact;

    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Extract artifacts from `text` and return them with the residual text
    fn run(&self, text: &str) -> FilterOutput<Self::Artifact>;
}
