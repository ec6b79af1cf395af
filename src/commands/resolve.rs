//! # Resolve Command Implementation
//!
//! Implements the `resolve` subcommand: reads a JSON-lines stream of
//! contributor events (one object per line with any of `name`, `email`,
//! `timestamp`, `role`) and prints the resolved contributors.
//!
//! Events are applied in input order. A malformed line aborts the run
//! unless `--skip-invalid` is given, in which case it is logged and skipped.

use anyhow::{Context, Result};
use clap::Args;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use contrib_harvest::attrs::Field;
use contrib_harvest::config;
use contrib_harvest::harvest::{self, OnInvalid};
use contrib_harvest::output;

use super::{print_json, Globals};

/// Resolve contributors from a JSON-lines event stream
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Event file to read; `-` or no value reads stdin.
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Skip malformed events instead of aborting.
    #[arg(long)]
    pub skip_invalid: bool,

    /// Identity keys in priority order (e.g. `email,name`). Overrides the configuration.
    #[arg(long, value_name = "FIELDS", value_delimiter = ',')]
    pub key_order: Option<Vec<Field>>,
}

/// Execute the `resolve` command.
pub fn execute(args: ResolveArgs, globals: &Globals) -> Result<()> {
    let mut config = globals.load_config(Path::new("."))?;
    if let Some(key_order) = args.key_order {
        config::validate_key_order(&key_order)?;
        config.key_order = key_order;
    }

    let on_invalid = if args.skip_invalid {
        OnInvalid::Skip
    } else {
        OnInvalid::Abort
    };

    let mut registry = config.registry();
    let summary = match args.input.as_deref() {
        None => harvest::feed_json_lines(&mut registry, io::stdin().lock(), on_invalid)?,
        Some(path) if path == Path::new("-") => {
            harvest::feed_json_lines(&mut registry, io::stdin().lock(), on_invalid)?
        }
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open event file {}", path.display()))?;
            harvest::feed_json_lines(&mut registry, BufReader::new(file), on_invalid)
                .with_context(|| format!("Failed to resolve events from {}", path.display()))?
        }
    };

    print_json(&harvest::export(&registry))?;
    eprintln!("{}", output::summary_line(&globals.output, &summary));
    Ok(())
}
