//! # Commit Sync CLI
//!
//! This is the binary entry point for the `commit-sync` command-line tool.
//!
//! It parses the two repository paths and options with `clap`, sets up
//! logging, and hands over to the library. A missing or extra repository
//! argument is a usage error: clap prints the usage line and the process
//! exits with code 2 without touching either repository.

mod cli;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.init_logging();
    cli.execute()
}
