//! # CLI Command Implementations
//!
//! Each subcommand of `contrib-harvest` lives in its own file with:
//! - An `Args` struct derived with `clap`.
//! - An `execute` function that calls into the `contrib_harvest` library.
//!
//! Results are printed to stdout as pretty JSON; status lines and logs go
//! to stderr so the output can be piped.

pub mod completions;
pub mod git;
pub mod metadata;
pub mod resolve;

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use contrib_harvest::config::{self, HarvestConfig};
use contrib_harvest::output::OutputConfig;

/// Options shared by every command.
#[derive(Debug)]
pub struct Globals {
    /// Explicit configuration file, if given.
    pub config: Option<PathBuf>,
    /// Status output decoration.
    pub output: OutputConfig,
}

impl Globals {
    /// Load the configuration that applies to a run in `working_dir`.
    pub fn load_config(&self, working_dir: &Path) -> Result<HarvestConfig> {
        config::load(self.config.as_deref(), working_dir).with_context(|| match &self.config {
            Some(path) => format!("Failed to load config from {}", path.display()),
            None => format!("Failed to load config for {}", working_dir.display()),
        })
    }
}

/// Print `value` to stdout as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
