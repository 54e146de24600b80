//! Error types for the filters

use thiserror::Error;

/// Errors that can occur while building or configuring filters
///
/// Extraction itself never fails: a candidate region that yields no artifact
/// is simply dropped. Errors only arise when a filter is constructed.
#[derive(Error, Debug)]
pub enum FilterError {
    /// Code pattern database could not be parsed
    #[error("Pattern database error: {0}")]
    PatternDatabase(String),

    /// A pattern database entry holds an invalid regular expression
    #[error("Invalid pattern for keyword '{keyword}': {source}")]
    InvalidPattern {
        /// Category whose pattern failed to compile
        keyword: String,
        /// Underlying regex error
        #[source]
        source: regex::Error,
    },

    /// A pattern database entry names an option we do not understand
    #[error("Unknown option '{option}' for keyword '{keyword}'")]
    UnknownOption {
        /// Category carrying the option
        keyword: String,
        /// The unrecognized option
        option: String,
    },

    /// Reading a pattern database or config file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for FilterError {
    fn from(e: toml::de::Error) -> Self {
        FilterError::PatternDatabase(e.to_string())
    }
}
