//! Configuration for the filter chain

use crate::code_db::CodePatternDatabase;
use crate::error::FilterError;
use crate::patch::PatchMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Upper bound for `max_concurrency`
pub const MAX_CONCURRENCY_LIMIT: usize = 256;

/// Which extractors run, and how
///
/// A disabled extractor produces nothing and leaves the text untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Find unified diff patches
    pub run_patches: bool,

    /// Find Java stack traces
    pub run_stack_traces: bool,

    /// Find Mozilla Talkback traces
    pub run_talkback: bool,

    /// Find source code fragments
    pub run_source_code: bool,

    /// Find enumerations and itemizations
    pub run_enumerations: bool,

    /// Accept loosely formatted diffs
    pub relaxed_patches: bool,
}

impl ExtractOptions {
    /// Eclipse-style reports: Java traces, strict patches
    pub fn eclipse() -> Self {
        Self {
            run_patches: true,
            run_stack_traces: true,
            run_talkback: false,
            run_source_code: true,
            run_enumerations: true,
            relaxed_patches: false,
        }
    }

    /// Mozilla-style reports: Talkback traces, relaxed patches
    pub fn mozilla() -> Self {
        Self {
            run_patches: true,
            run_stack_traces: false,
            run_talkback: true,
            run_source_code: true,
            run_enumerations: true,
            relaxed_patches: true,
        }
    }

    /// Nothing enabled
    pub fn none() -> Self {
        Self {
            run_patches: false,
            run_stack_traces: false,
            run_talkback: false,
            run_source_code: false,
            run_enumerations: false,
            relaxed_patches: false,
        }
    }

    /// Patch strictness selected by `relaxed_patches`
    pub fn patch_mode(&self) -> PatchMode {
        PatchMode::from_relaxed(self.relaxed_patches)
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::eclipse()
    }
}

/// Configuration for the filter chain and the batch runner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Custom code pattern database; the built-in Java one when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_patterns: Option<PathBuf>,

    /// Number of texts processed at once by batch callers
    pub max_concurrency: usize,

    /// Extractor selection
    pub options: ExtractOptions,
}

impl FilterConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.max_concurrency == 0 {
            return Err(FilterError::Config(
                "max_concurrency must be greater than 0".to_string(),
            ));
        }
        if self.max_concurrency > MAX_CONCURRENCY_LIMIT {
            return Err(FilterError::Config(format!(
                "max_concurrency cannot exceed {}",
                MAX_CONCURRENCY_LIMIT
            )));
        }
        if let Some(path) = &self.code_patterns {
            if path.as_os_str().is_empty() {
                return Err(FilterError::Config(
                    "code_patterns must not be an empty path".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Eclipse preset
    pub fn eclipse() -> Self {
        Self {
            options: ExtractOptions::eclipse(),
            ..Self::default()
        }
    }

    /// Mozilla preset
    pub fn mozilla() -> Self {
        Self {
            options: ExtractOptions::mozilla(),
            ..Self::default()
        }
    }

    /// Load the configured code pattern database
    pub fn load_patterns(&self) -> Result<CodePatternDatabase, FilterError> {
        match &self.code_patterns {
            Some(path) => CodePatternDatabase::from_file(path),
            None => CodePatternDatabase::java(),
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            code_patterns: None,
            max_concurrency: 4,
            options: ExtractOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(FilterConfig::default().validate().is_ok());
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(FilterConfig::eclipse().validate().is_ok());
        assert!(FilterConfig::mozilla().validate().is_ok());
    }

    #[test]
    fn test_default_options_are_eclipse() {
        assert_eq!(ExtractOptions::default(), ExtractOptions::eclipse());
        assert_eq!(ExtractOptions::eclipse().patch_mode(), PatchMode::Strict);
    }

    #[test]
    fn test_mozilla_uses_talkback() {
        let options = ExtractOptions::mozilla();
        assert!(options.run_talkback);
        assert!(!options.run_stack_traces);
        assert_eq!(options.patch_mode(), PatchMode::Relaxed);
    }

    #[test]
    fn test_invalid_concurrency() {
        let mut config = FilterConfig::default();
        config.max_concurrency = 0;
        assert!(config.validate().is_err());

        config.max_concurrency = MAX_CONCURRENCY_LIMIT + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_pattern_path_is_invalid() {
        let config = FilterConfig {
            code_patterns: Some(PathBuf::new()),
            ..FilterConfig::default()
        };
        assert!(matches!(config.validate(), Err(FilterError::Config(_))));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = FilterConfig {
            code_patterns: Some(PathBuf::from("/etc/infozilla/java.toml")),
            max_concurrency: 8,
            options: ExtractOptions::mozilla(),
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: FilterConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: FilterConfig =
            toml::from_str("[options]\nrun_enumerations = false\n").unwrap();
        assert_eq!(config.max_concurrency, 4);
        assert!(config.options.run_patches);
        assert!(!config.options.run_enumerations);
    }

    #[test]
    fn test_bad_toml() {
        assert!(toml::from_str::<FilterConfig>("max_concurrency = \"many\"").is_err());
    }

    #[test]
    fn test_builtin_patterns_load() {
        let db = FilterConfig::default().load_patterns().unwrap();
        assert!(!db.is_empty());
    }
}
