//! Development automation tasks for contrib-harvest.
//!
//! This crate provides `cargo xtask` commands for release chores.
//!
//! # Usage
//!
//! ```bash
//! cargo xtask bump-version            # 0.1.9 -> 0.1.10, 1.2.99 -> 1.3.0
//! cargo xtask bump-version --dry-run  # Print the new version only
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use regex::Regex;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::process::Command;

/// Highest value of the patch and minor components before they roll over.
const COMPONENT_MAX: u32 = 99;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development automation tasks for contrib-harvest")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Increment the package version in Cargo.toml
    BumpVersion {
        /// Print the new version without writing Cargo.toml
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Find workspace root
    let workspace_root = workspace_root()?;
    env::set_current_dir(&workspace_root).with_context(|| {
        format!(
            "Failed to change to workspace root: {}",
            workspace_root.display()
        )
    })?;

    match cli.command {
        Commands::BumpVersion { dry_run } => run_bump_version(dry_run),
    }
}

/// Find the workspace root directory.
fn workspace_root() -> Result<PathBuf> {
    let output = Command::new("cargo")
        .args(["locate-project", "--workspace", "--message-format=plain"])
        .output()
        .context("Failed to run 'cargo locate-project'")?;

    if !output.status.success() {
        bail!("Failed to locate workspace root");
    }

    let path = String::from_utf8(output.stdout).context("Invalid UTF-8 in cargo output")?;
    let path = PathBuf::from(path.trim());

    // The output is Cargo.toml path, we need the directory
    path.parent()
        .map(|p| p.to_path_buf())
        .context("Failed to get parent directory of Cargo.toml")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Version {
    major: u32,
    minor: u32,
    patch: u32,
}

impl Version {
    fn parse(text: &str) -> Result<Self> {
        let parts: Vec<&str> = text.split('.').collect();
        let [major, minor, patch] = parts.as_slice() else {
            bail!("Invalid version format '{}', expected MAJOR.MINOR.PATCH", text);
        };
        Ok(Self {
            major: major.parse().context("Invalid major version")?,
            minor: minor.parse().context("Invalid minor version")?,
            patch: patch.parse().context("Invalid patch version")?,
        })
    }

    /// Next version, rolling patch into minor and minor into major at 99.
    fn bump(self) -> Self {
        if self.patch < COMPONENT_MAX {
            Self {
                patch: self.patch + 1,
                ..self
            }
        } else if self.minor < COMPONENT_MAX {
            Self {
                minor: self.minor + 1,
                patch: 0,
                ..self
            }
        } else {
            Self {
                major: self.major + 1,
                minor: 0,
                patch: 0,
            }
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Replace the `[package]` version of a Cargo manifest.
///
/// Returns the old version and the updated manifest.
fn bump_manifest(manifest: &str) -> Result<(Version, Version, String)> {
    let pattern = Regex::new(r#"(?ms)^\[package\].*?^version\s*=\s*"(?P<version>[^"]+)""#)?;
    let caps = pattern
        .captures(manifest)
        .context("Failed to find [package] version in Cargo.toml")?;
    let found = caps
        .name("version")
        .context("Failed to find [package] version in Cargo.toml")?;

    let current = Version::parse(found.as_str())?;
    let next = current.bump();

    let mut updated = String::with_capacity(manifest.len());
    updated.push_str(&manifest[..found.start()]);
    updated.push_str(&next.to_string());
    updated.push_str(&manifest[found.end()..]);
    Ok((current, next, updated))
}

/// Increment the package version in the root Cargo.toml.
fn run_bump_version(dry_run: bool) -> Result<()> {
    let cargo_toml = std::fs::read_to_string("Cargo.toml").context("Failed to read Cargo.toml")?;
    let (current, next, updated) = bump_manifest(&cargo_toml)?;

    println!("Current version: {}", current);
    println!("New version: {}", next);

    if dry_run {
        println!();
        println!("Dry run - Cargo.toml was not changed.");
        return Ok(());
    }

    std::fs::write("Cargo.toml", updated).context("Failed to write Cargo.toml")?;

    println!();
    println!("Next steps:");
    println!("  1. Review changes: git diff");
    println!("  2. Commit: git commit -am \"chore(main): release {}\"", next);
    println!("  3. Tag: git tag v{}", next);

    Ok(())
}
