//! # Configuration
//!
//! This module defines `.contrib-harvest.yaml`, the file that tunes how
//! contributors are resolved and where their events come from. Every field
//! is optional:
//!
//! ```yaml
//! key_order: [email, name]   # identity keys, highest priority first
//! fold_email_case: true      # compare emails case-insensitively
//! git:
//!   branch: main
//! metadata:
//!   filename: pyproject.toml
//! ```
//!
//! ## Key order
//!
//! The first key in `key_order` with an existing match decides which record
//! survives when an event links two contributors, so changing the order can
//! change merge results. `timestamp` cannot be a key, and no key may appear
//! twice.
//!
//! ## Lookup
//!
//! [`load`] uses the first file found among: an explicit path, the file in
//! the working directory, the user configuration directory. Without any file
//! the defaults apply.

use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::attrs::Field;
use crate::contributor::ContributorRecord;
use crate::defaults;
use crate::error::{Error, Result};
use crate::registry::{Normalizer, Registry};

/// Top-level harvest configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarvestConfig {
    /// Identity keys in priority order.
    pub key_order: Vec<Field>,
    /// Compare emails case-insensitively.
    pub fold_email_case: bool,
    /// Git history source.
    pub git: GitSettings,
    /// Project metadata source.
    pub metadata: MetadataSettings,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            key_order: defaults::default_key_order(),
            fold_email_case: true,
            git: GitSettings::default(),
            metadata: MetadataSettings::default(),
        }
    }
}

/// Settings for reading git history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitSettings {
    /// Branch (or any revision) whose history is read.
    pub branch: String,
}

impl Default for GitSettings {
    fn default() -> Self {
        Self {
            branch: defaults::DEFAULT_BRANCH.to_string(),
        }
    }
}

/// Settings for reading project metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetadataSettings {
    /// Metadata file name, relative to the project directory.
    pub filename: String,
}

impl Default for MetadataSettings {
    fn default() -> Self {
        Self {
            filename: defaults::METADATA_FILENAME.to_string(),
        }
    }
}

impl HarvestConfig {
    /// Check that the key order can drive a registry.
    pub fn validate(&self) -> Result<()> {
        validate_key_order(&self.key_order)
    }

    /// Build an empty contributor registry with this configuration's keys
    /// and normalizers.
    pub fn registry(&self) -> Registry<ContributorRecord> {
        let normalizers = self
            .fold_email_case
            .then(|| (Field::Email, Normalizer::case_fold()));
        Registry::with_normalizers(self.key_order.iter().copied(), normalizers)
    }
}

/// Validate a key order given on its own (e.g. from the command line).
pub fn validate_key_order(key_order: &[Field]) -> Result<()> {
    if key_order.is_empty() {
        return Err(Error::ConfigParse {
            message: "key_order must name at least one field".to_string(),
            hint: Some("Use e.g. 'key_order: [email, name]'".to_string()),
        });
    }

    if key_order.contains(&Field::Timestamp) {
        return Err(Error::ConfigParse {
            message: "Field 'timestamp' cannot be an identity key".to_string(),
            hint: Some("Use only 'email', 'name' or 'role' in key_order".to_string()),
        });
    }

    for (position, field) in key_order.iter().enumerate() {
        if key_order[..position].contains(field) {
            return Err(Error::ConfigParse {
                message: format!("Field '{}' appears more than once in key_order", field),
                hint: Some("Remove the repeated entry".to_string()),
            });
        }
    }

    Ok(())
}

/// Parse and validate configuration YAML. Empty content yields the defaults.
pub fn parse(yaml_content: &str) -> Result<HarvestConfig> {
    if yaml_content.trim().is_empty() {
        return Ok(HarvestConfig::default());
    }

    let config: HarvestConfig = serde_yaml::from_str(yaml_content).map_err(|e| {
        Error::ConfigParse {
            message: e.to_string(),
            hint: Some(
                "Known keys are key_order, fold_email_case, git.branch and metadata.filename"
                    .to_string(),
            ),
        }
    })?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from a file.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<HarvestConfig> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content)
}

/// Resolve and load the configuration for a run in `working_dir`.
///
/// An explicit path must exist. Otherwise the working directory file and
/// then the user configuration file are tried.
pub fn load(explicit: Option<&Path>, working_dir: &Path) -> Result<HarvestConfig> {
    load_with_user_config(
        explicit,
        working_dir,
        defaults::user_config_path().as_deref(),
    )
}

fn load_with_user_config(
    explicit: Option<&Path>,
    working_dir: &Path,
    user_config: Option<&Path>,
) -> Result<HarvestConfig> {
    if let Some(path) = explicit {
        debug!("loading configuration from {}", path.display());
        return from_file(path);
    }

    let candidates: Vec<PathBuf> = std::iter::once(working_dir.join(defaults::CONFIG_FILENAME))
        .chain(user_config.map(Path::to_path_buf))
        .collect();

    for candidate in candidates {
        if candidate.is_file() {
            debug!("loading configuration from {}", candidate.display());
            return from_file(&candidate);
        }
    }

    debug!("no configuration file found, using defaults");
    Ok(HarvestConfig::default())
}
