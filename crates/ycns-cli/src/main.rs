//! YCNS CLI - Command-line interface for curve node PnL attribution.
//!
//! # Usage
//!
//! ```bash
//! # Attribute a position's curve PnL to nodes
//! ycns attribute --config run.toml --data ./data
//!
//! # Same, as CSV
//! ycns --format csv attribute --config run.toml --data ./data
//!
//! # Validate a configuration
//! ycns check --config run.toml
//! ```
//!
//! Logging goes to stderr and honours `RUST_LOG`.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.quiet);

    let format = cli.format;

    match cli.command {
        Commands::Attribute(args) => commands::attribute::execute(args, format)?,
        Commands::Check(args) => commands::check::execute(args, format)?,
    }

    Ok(())
}

fn init_tracing(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
