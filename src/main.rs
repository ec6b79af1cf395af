//! # Contributor Harvest CLI
//!
//! This is the binary entry point for the `contrib-harvest` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Installing the logger.
//! - Executing the appropriate command and reporting top-level errors.
//!
//! The resolution logic lives in the `contrib_harvest` library crate; the
//! binary is a thin wrapper around it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
