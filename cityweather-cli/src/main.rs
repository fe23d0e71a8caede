//! Binary crate for the `cityweather` terminal app.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - The interactive screen flow (home → detail → settings)
//! - Human-friendly output formatting

use clap::Parser;

mod cli;
mod flow;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
