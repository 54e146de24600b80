//! Code pattern database
//!
//! A pattern database is an ordered table of named regular expressions that
//! decide what counts as source code. It is stored as TOML:
//!
//! ```toml
//! [[pattern]]
//! keyword = "ifstatement"
//! regex = '\bif\s*\([^\n]*\)\s*\{'
//! options = ["MATCH"]
//! ```
//!
//! Every entry is compiled when the database is loaded, so a broken database
//! is reported before any text is processed.

use crate::error::FilterError;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// The Java database shipped with the crate
pub const JAVA_CODE_DB: &str = include_str!("../resources/java_code_db.toml");

/// Option that extends a match to its balanced closing brace
pub const OPTION_MATCH: &str = "MATCH";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDatabase {
    #[serde(default, rename = "pattern")]
    patterns: Vec<RawPattern>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPattern {
    keyword: String,
    regex: String,
    #[serde(default)]
    options: Vec<String>,
}

/// One compiled database entry
#[derive(Debug, Clone)]
pub struct CodePattern {
    keyword: String,
    regex: Regex,
    match_braces: bool,
}

impl CodePattern {
    /// Compile a pattern, rejecting options other than `MATCH`
    pub fn new(keyword: impl Into<String>, regex: &str, options: &[String]) -> Result<Self, FilterError> {
        let keyword = keyword.into();

        let mut match_braces = false;
        for option in options {
            if option == OPTION_MATCH {
                match_braces = true;
            } else {
                return Err(FilterError::UnknownOption {
                    keyword,
                    option: option.clone(),
                });
            }
        }

        let regex = Regex::new(regex).map_err(|source| FilterError::InvalidPattern {
            keyword: keyword.clone(),
            source,
        })?;

        Ok(Self {
            keyword,
            regex,
            match_braces,
        })
    }

    /// Category name reported on every region this pattern finds
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// The compiled expression
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Whether matches extend to the balanced closing brace
    pub fn match_braces(&self) -> bool {
        self.match_braces
    }
}

/// Ordered collection of code patterns
#[derive(Debug, Clone, Default)]
pub struct CodePatternDatabase {
    patterns: Vec<CodePattern>,
}

impl CodePatternDatabase {
    /// Build a database from already compiled patterns
    pub fn new(patterns: Vec<CodePattern>) -> Self {
        Self { patterns }
    }

    /// The built-in Java database
    pub fn java() -> Result<Self, FilterError> {
        Self::from_toml(JAVA_CODE_DB)
    }

    /// Parse and compile a TOML database
    pub fn from_toml(source: &str) -> Result<Self, FilterError> {
        let raw: RawDatabase = toml::from_str(source)?;

        let patterns = raw
            .patterns
            .into_iter()
            .map(|p| CodePattern::new(p.keyword, &p.regex, &p.options))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = patterns.len(), "Loaded code pattern database");
        Ok(Self { patterns })
    }

    /// Read, parse and compile a TOML database file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FilterError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml(&source)
    }

    /// Patterns in declaration order
    pub fn patterns(&self) -> &[CodePattern] {
        &self.patterns
    }

    /// Number of patterns
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether the database has no patterns
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
