//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use contrib_harvest::output::OutputConfig;

use crate::commands::{self, Globals};

/// Contributor Harvest - Resolve contributor identities from project history
#[derive(Parser, Debug)]
#[command(name = "contrib-harvest")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize status output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,

    /// Path to a .contrib-harvest.yaml configuration file
    #[arg(long, global = true, value_name = "FILE", env = "CONTRIB_HARVEST_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve contributors from git history
    Git(commands::git::GitArgs),

    /// Map project metadata (pyproject.toml) to CodeMeta
    Metadata(commands::metadata::MetadataArgs),

    /// Resolve contributors from a JSON-lines event stream
    Resolve(commands::resolve::ResolveArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        let globals = Globals {
            config: self.config,
            output: OutputConfig::from_env_and_flag(&self.color),
        };

        match self.command {
            Commands::Git(args) => commands::git::execute(args, &globals),
            Commands::Metadata(args) => commands::metadata::execute(args, &globals),
            Commands::Resolve(args) => commands::resolve::execute(args, &globals),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    // A logger may already be installed when running under a test harness
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}
