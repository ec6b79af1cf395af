//! # Output Configuration
//!
//! Controls how the CLI decorates the human-readable status it writes to
//! stderr. Machine-readable results (JSON on stdout) are never decorated.
//!
//! ## Respecting User Preferences
//!
//! The module respects the following environment variables and flags:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals

use std::env;

use console::style;

use crate::harvest::HarvestSummary;

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// `color_flag` is the value of `--color`: "always", "never", or "auto".
    /// In auto mode colors are disabled by `NO_COLOR`, `CLICOLOR=0`,
    /// `TERM=dumb`, or a stderr that is not a TTY (unless `CLICOLOR_FORCE=1`).
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // The presence of the variable (even if empty) disables colors
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        // Status goes to stderr, so that is the stream to probe
        console::Term::stderr().features().colors_supported()
    }

    /// Create a configuration with colors always enabled.
    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Create a configuration with colors always disabled.
    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Returns the emoji when colors are enabled, the plain text otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

/// One-line status for a finished harvest, e.g. `3 contributors from 10 events`.
pub fn summary_line(config: &OutputConfig, summary: &HarvestSummary) -> String {
    let contributors = format!("{} contributors", summary.contributors);
    let contributors = if config.use_color {
        style(contributors).force_styling(true).bold().to_string()
    } else {
        contributors
    };

    let mut line = format!(
        "{} {} from {} events",
        emoji(config, "👥", "[OK]"),
        contributors,
        summary.events
    );
    if summary.skipped > 0 {
        line.push_str(&format!(" ({} skipped)", summary.skipped));
    }
    line
}
