use clap::{Parser, Subcommand};

use crate::flow;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cityweather", version, about = "City weather in your terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store API credentials and the location consent flag.
    Configure,

    /// Show current weather for a place name, skipping the interactive flow.
    Show {
        /// City or place name.
        place: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            None => flow::run_interactive().await,
            Some(Command::Configure) => flow::run_configure(),
            Some(Command::Show { place }) => flow::run_show(&place).await,
        }
    }
}
