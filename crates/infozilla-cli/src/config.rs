//! Configuration management for the CLI.

use crate::cli::Cli;
use crate::error::{CliError, Result};
use infozilla_filters::FilterConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Filter chain settings
    #[serde(default)]
    pub filters: FilterConfig,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Character set of input files and `.cleaned` outputs (WHATWG label)
    #[serde(default = "default_charset")]
    pub charset: String,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".infozilla").join("config.toml"))
    }

    /// Load configuration from the default path, or defaults when it does not exist.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit file, which must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.filters.validate()?;
        Ok(config)
    }

    /// Apply command-line flags on top of the loaded configuration.
    pub fn with_overrides(self, cli: &Cli) -> Self {
        Self {
            filters: cli.filter_config(self.filters),
            settings: Settings {
                color: !cli.no_color && self.settings.color,
                format: cli.format.map(Into::into).unwrap_or(self.settings.format),
                charset: cli.charset.clone().unwrap_or(self.settings.charset),
            },
        }
    }

    /// Serialize configuration to a TOML document loadable with [`Config::load_from`].
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            charset: default_charset(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_charset() -> String {
    "utf-8".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use infozilla_filters::ExtractOptions;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.settings.color);
        assert_eq!(config.settings.format, OutputFormat::Table);
        assert_eq!(config.settings.charset, "utf-8");
        assert_eq!(config.filters.options, ExtractOptions::eclipse());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[settings]\nformat = \"json\"\n\n[filters.options]\nrun_talkback = true\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.settings.format, OutputFormat::Json);
        assert!(config.settings.color);
        assert!(config.filters.options.run_talkback);
        assert!(config.filters.options.run_patches);
        assert_eq!(config.filters.max_concurrency, 4);
    }

    #[test]
    fn test_toml_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.filters = FilterConfig::mozilla();
        config.settings.color = false;
        config.settings.charset = "windows-1252".to_string();
        fs::write(&path, config.to_toml().unwrap()).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.filters, FilterConfig::mozilla());
        assert!(!loaded.settings.color);
        assert_eq!(loaded.settings.charset, "windows-1252");
    }

    #[test]
    fn test_overrides_from_flags() {
        use clap::Parser;

        let cli = Cli::try_parse_from([
            "infozilla",
            "--no-color",
            "--format",
            "json",
            "--charset",
            "latin1",
            "--preset",
            "mozilla",
            "bug.txt",
        ])
        .unwrap();
        let config = Config::default().with_overrides(&cli);

        assert!(!config.settings.color);
        assert_eq!(config.settings.format, OutputFormat::Json);
        assert_eq!(config.settings.charset, "latin1");
        assert_eq!(config.filters, FilterConfig::mozilla());
    }

    #[test]
    fn test_no_flags_keep_loaded_settings() {
        use clap::Parser;

        let cli = Cli::try_parse_from(["infozilla", "bug.txt"]).unwrap();
        let mut loaded = Config::default();
        loaded.settings.format = OutputFormat::Quiet;
        loaded.settings.charset = "iso-8859-15".to_string();

        let config = loaded.with_overrides(&cli);
        assert_eq!(config.settings.format, OutputFormat::Quiet);
        assert_eq!(config.settings.charset, "iso-8859-15");
        assert!(config.settings.color);
    }

    #[test]
    fn test_invalid_filter_settings_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[filters]\nmax_concurrency = 0\n").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(CliError::Filter(_))
        ));
    }

    #[test]
    fn test_malformed_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[settings\ncolor = ").unwrap();

        assert!(matches!(Config::load_from(&path), Err(CliError::Toml(_))));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        assert!(matches!(
            Config::load_from(Path::new("/no/such/infozilla.toml")),
            Err(CliError::Io(_))
        ));
    }
}
