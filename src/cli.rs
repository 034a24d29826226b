//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// Repository Import - Import repositories from a git provider into a new project
#[derive(Parser, Debug)]
#[command(name = "repo-import")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the interactive import wizard
    Run(commands::run::RunArgs),
    /// List the configured source-control providers
    Providers(commands::providers::ProvidersArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        env_logger::Builder::new()
            .parse_filters(&self.log_level)
            .init();

        match self.command {
            Commands::Run(args) => commands::run::execute(args),
            Commands::Providers(args) => commands::providers::execute(args),
        }
    }
}
