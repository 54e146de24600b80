//! infozilla - Extract structural elements from bug report text.

use anyhow::Context;
use clap::Parser;
use infozilla_cli::commands;
use infozilla_cli::{Cli, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();
    init_logging(&cli);

    // An explicit config file must exist; the default one is optional
    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::load().context("failed to load config")?,
    };

    // Flags win over the config file
    let config = config.with_overrides(&cli);

    if cli.print_config {
        config.filters.validate()?;
        commands::resolve_charset(&config.settings.charset)?;
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let formatter = Formatter::new(config.settings.format, config.settings.color);
    commands::execute_extract(&cli, &config, &formatter).await
}

/// Log to stderr; `-v` wins over `RUST_LOG`, which wins over the `warn` default.
fn init_logging(cli: &Cli) {
    let filter = if cli.verbose > 0 {
        EnvFilter::new(cli.log_level())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()))
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}
