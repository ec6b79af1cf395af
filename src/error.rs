//! # Error Handling
//!
//! This module defines the centralized error type for `contrib-harvest`. It
//! uses `thiserror` to describe every failure the library can report, with
//! enough context (offending field, line, command) to locate the problem.
//!
//! The identity-resolution engine itself cannot fail once it is handed
//! well-typed [`Attributes`](crate::attrs::Attributes). Failures come from
//! the boundaries around it:
//!
//! - Untyped input that does not describe an attribute tuple
//!   ([`Error::InvalidAttribute`]).
//! - Configuration files that do not parse or describe an unusable key order.
//! - The `git` executable and the shape of its log output.
//! - Project metadata files with unexpected person values or conflicting tables.
//! - Event streams with lines that are not JSON.

use thiserror::Error;

/// Main error type for contrib-harvest operations
#[derive(Error, Debug)]
pub enum Error {
    /// A value handed to the engine is not a string or a list of strings.
    ///
    /// Raised at the boundary, before the value reaches any record, so the
    /// offending event can be reported and skipped by the driver.
    #[error("Invalid attribute value for '{field}': {message}")]
    InvalidAttribute { field: String, message: String },

    /// An error occurred while parsing the `.contrib-harvest.yaml` configuration file.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// The `git` executable could not be run or exited with a failure.
    #[error("Git command failed in {path}: {command} - {stderr}")]
    GitCommand {
        command: String,
        path: String,
        stderr: String,
    },

    /// A line of `git log` output did not have the expected shape.
    #[error("Git log parse error on line {line}: {message}")]
    GitLogParse { line: usize, message: String },

    /// The project metadata file contains data that cannot be mapped.
    #[error("Metadata error: {message}")]
    Metadata { message: String },

    /// A line of an event stream could not be read as an attribute tuple.
    #[error("Event parse error on line {line}: {message}")]
    EventParse { line: usize, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A TOML parsing error, wrapped from `toml::de::Error`.
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A JSON (de)serialization error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
