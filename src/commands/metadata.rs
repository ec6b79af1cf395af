//! # Metadata Command Implementation
//!
//! Implements the `metadata` subcommand. By default it prints the CodeMeta
//! properties mapped from the project's `pyproject.toml`. With `--persons`
//! the listed authors and maintainers are run through the identity registry
//! instead and printed as resolved `Person` objects.

use anyhow::{Context, Result};
use clap::Args;
use log::warn;
use std::path::PathBuf;

use contrib_harvest::{harvest, metadata, output};

use super::{print_json, Globals};

/// Map project metadata (pyproject.toml) to CodeMeta
#[derive(Args, Debug)]
pub struct MetadataArgs {
    /// Project directory containing the metadata file.
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub path: PathBuf,

    /// Metadata file name. Overrides `metadata.filename` from the configuration.
    #[arg(short, long, value_name = "NAME")]
    pub file: Option<String>,

    /// Print resolved authors and maintainers instead of the mapped properties.
    #[arg(long)]
    pub persons: bool,
}

/// Execute the `metadata` command.
pub fn execute(args: MetadataArgs, globals: &Globals) -> Result<()> {
    let config = globals.load_config(&args.path)?;
    let filename = args.file.unwrap_or(config.metadata.filename.clone());
    let file = args.path.join(&filename);

    let project = metadata::read_file(&file)
        .with_context(|| format!("Failed to read metadata from {}", file.display()))?;
    if project.is_empty() {
        warn!("no [project] or [tool.poetry] metadata in {}", file.display());
    }

    if !args.persons {
        return print_json(&project.to_json());
    }

    let mut registry = config.registry();
    let summary = harvest::feed(&mut registry, project.person_events());
    print_json(&harvest::export(&registry))?;
    eprintln!("{}", output::summary_line(&globals.output, &summary));
    Ok(())
}
