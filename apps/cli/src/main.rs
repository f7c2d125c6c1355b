//! chm2docset CLI — compiled-help-container to docset converter.
//!
//! Wraps the core pipeline with argument parsing, tracing setup, progress
//! reporting, and the fatal-error exit contract (one diagnostic line,
//! nonzero exit code).

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
