//! CLI argument definitions and parsing.

use crate::config::OutputFormat;
use clap::Parser;
use infozilla_filters::{ExtractOptions, FilterConfig};
use std::path::PathBuf;

/// infozilla - Mine patches, stack traces, source code and lists from bug reports.
#[derive(Debug, Parser)]
#[command(name = "infozilla")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Bug report text files to process
    #[arg(required_unless_present = "print_config", value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Start from a tracker preset instead of the configured extractors
    #[arg(long, value_enum)]
    pub preset: Option<Preset>,

    /// Do not extract patches
    #[arg(long)]
    pub no_patches: bool,

    /// Do not extract Java stack traces
    #[arg(long)]
    pub no_stacktraces: bool,

    /// Do not extract source code regions
    #[arg(long)]
    pub no_source_code: bool,

    /// Do not extract enumerations and itemizations
    #[arg(long)]
    pub no_lists: bool,

    /// Extract Mozilla Talkback traces
    #[arg(long)]
    pub talkback: bool,

    /// Accept loosely formatted patches
    #[arg(long)]
    pub relaxed: bool,

    /// Code pattern database (TOML) replacing the built-in Java patterns
    #[arg(long, value_name = "FILE")]
    pub patterns: Option<PathBuf>,

    /// Character set of the input files, e.g. utf-8, latin1, windows-1252
    #[arg(long, value_name = "LABEL")]
    pub charset: Option<String>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Write <FILE>.cleaned and <FILE>.result.json next to each input
    #[arg(short, long)]
    pub write: bool,

    /// Print one `;`-separated count record per file
    #[arg(short, long)]
    pub summary: bool,

    /// Number of files processed at once
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Log more (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, env = "INFOZILLA_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (paths of files with findings only)
    Quiet,
}

/// Bug tracker presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Preset {
    /// Java traces and strict patches
    Eclipse,
    /// Talkback traces and relaxed patches
    Mozilla,
}

impl Cli {
    /// Apply the command-line overrides on top of a loaded filter configuration.
    pub fn filter_config(&self, mut config: FilterConfig) -> FilterConfig {
        if let Some(preset) = self.preset {
            config.options = preset.into();
        }

        let options = &mut config.options;
        options.run_patches &= !self.no_patches;
        options.run_stack_traces &= !self.no_stacktraces;
        options.run_source_code &= !self.no_source_code;
        options.run_enumerations &= !self.no_lists;
        options.run_talkback |= self.talkback;
        options.relaxed_patches |= self.relaxed;

        if let Some(patterns) = &self.patterns {
            config.code_patterns = Some(patterns.clone());
        }
        if let Some(jobs) = self.jobs {
            config.max_concurrency = jobs;
        }
        config
    }

    /// Default log directive for the verbosity level.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}

impl From<CliFormat> for OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => OutputFormat::Table,
            CliFormat::Json => OutputFormat::Json,
            CliFormat::Quiet => OutputFormat::Quiet,
        }
    }
}

impl From<Preset> for ExtractOptions {
    fn from(preset: Preset) -> Self {
        match preset {
            Preset::Eclipse => ExtractOptions::eclipse(),
            Preset::Mozilla => ExtractOptions::mozilla(),
        }
    }
}
