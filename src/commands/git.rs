//! # Git Command Implementation
//!
//! Implements the `git` subcommand: reads the history of one branch,
//! resolves every author and committer into contributors, and prints them
//! as a JSON array of schema.org `Person` objects.
//!
//! Commits are replayed oldest first, so a contributor's most recent name
//! becomes their primary name.

use anyhow::{Context, Result};
use clap::Args;
use log::info;
use std::path::PathBuf;

use contrib_harvest::{git, harvest, output};

use super::{print_json, Globals};

/// Resolve contributors from git history
#[derive(Args, Debug)]
pub struct GitArgs {
    /// Repository to read (any directory inside the work tree).
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub path: PathBuf,

    /// Branch or revision to read. Overrides `git.branch` from the configuration.
    #[arg(short, long, value_name = "REF")]
    pub branch: Option<String>,
}

/// Execute the `git` command.
pub fn execute(args: GitArgs, globals: &Globals) -> Result<()> {
    let config = globals.load_config(&args.path)?;
    let branch = args.branch.unwrap_or(config.git.branch.clone());

    info!("harvesting {} in {}", branch, args.path.display());
    let events = git::log_events(&args.path, &branch).with_context(|| {
        format!(
            "Failed to read git history of '{}' in {}",
            branch,
            args.path.display()
        )
    })?;

    let mut registry = config.registry();
    let summary = harvest::feed(&mut registry, events);

    print_json(&harvest::export(&registry))?;
    eprintln!("{}", output::summary_line(&globals.output, &summary));
    Ok(())
}
