//! Default values for contrib-harvest configuration.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

use std::path::PathBuf;

use crate::attrs::Field;

/// Project-level configuration file name.
pub const CONFIG_FILENAME: &str = ".contrib-harvest.yaml";

/// Metadata file read by the `metadata` command.
pub const METADATA_FILENAME: &str = "pyproject.toml";

/// Branch whose history is harvested.
pub const DEFAULT_BRANCH: &str = "main";

/// Identity keys used when nothing else is configured: email first, then name.
pub fn default_key_order() -> Vec<Field> {
    vec![Field::Email, Field::Name]
}

/// Returns the user-level configuration file.
///
/// Uses the platform-appropriate configuration directory:
/// - Linux: `~/.config/contrib-harvest/config.yaml` (XDG Base Directory)
/// - macOS: `~/Library/Application Support/contrib-harvest/config.yaml`
/// - Windows: `{FOLDERID_RoamingAppData}\contrib-harvest\config.yaml`
///
/// Returns `None` if the platform configuration directory cannot be
/// determined.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("contrib-harvest").join("config.yaml"))
}
