//! # Repository Import CLI
//!
//! Binary entry point for the `repo-import` command-line tool.
//!
//! Its responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Initializing logging from the global `--log-level` flag.
//! - Executing the appropriate command based on the parsed arguments.
//!
//! The wizard engine, cache and filtering live in the `repo_import` library
//! crate; the binary is a thin terminal surface over it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
