//! infozilla CLI library.
//!
//! This library provides the pieces of the `infozilla` command-line tool:
//! argument parsing, configuration loading, the batch extract command and
//! output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, CliFormat, Preset};
pub use config::{Config, OutputFormat};
pub use error::{CliError, Result};
pub use output::Formatter;
