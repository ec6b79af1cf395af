//! Shared test utilities for integration and E2E tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_file("events.jsonl", events::LINKED);
//!     fixture.command().arg("resolve").arg("events.jsonl").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::Path;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::{events, parse_persons, pyprojects, TestFixture};
}

/// JSON-lines event streams.
#[allow(dead_code)]
pub mod events {
    /// Two identities that a third event reveals to be one contributor.
    pub const LINKED: &str = r#"{"email": "ann@x", "name": "Ann", "role": "author", "timestamp": "2024-01-01"}
{"email": "lee@x", "name": "A. Lee", "role": "committer", "timestamp": "2024-02-01"}
{"email": "ann@x", "name": "A. Lee", "timestamp": "2024-03-01"}
"#;

    /// Two unrelated contributors.
    pub const SEPARATE: &str = r#"{"email": "ann@x", "name": "Ann"}
{"email": "ben@x", "name": "Ben"}
"#;

    /// A valid event followed by one with a numeric name.
    pub const WITH_INVALID: &str = r#"{"email": "ann@x", "name": "Ann"}
{"email": "ben@x", "name": 42}

{"email": "cat@x"}
"#;
}

/// `pyproject.toml` documents.
#[allow(dead_code)]
pub mod pyprojects {
    /// PEP 621 project table.
    pub const PROJECT: &str = r#"
[project]
name = "demo"
version = "1.2.0"
description = "A demo package"
requires-python = ">=3.10"
keywords = ["research", "software"]
authors = [
    { name = "Ann Lee", email = "ann@example.org" },
    { name = "Ben Park" },
]
maintainers = ["Ann Lee <Ann@Example.org>"]
"#;

    /// Poetry table.
    pub const POETRY: &str = r#"
[tool.poetry]
name = "demo"
version = "0.3.0"
description = "A poetry package"
authors = ["Ann Lee <ann@example.org>"]
homepage = "https://example.org/demo"
repository = "https://example.org/demo.git"
"#;

    /// Both tables at once.
    pub const BOTH: &str = r#"
[project]
name = "demo"

[tool.poetry]
name = "demo"
"#;
}

/// Parse the JSON array printed by a harvest command.
#[allow(dead_code)]
pub fn parse_persons(stdout: &[u8]) -> Vec<serde_json::Value> {
    match serde_json::from_slice(stdout).expect("stdout should be JSON") {
        serde_json::Value::Array(items) => items,
        other => panic!("expected a JSON array, got {other}"),
    }
}

/// A temporary project directory.
///
/// ```rust,ignore
/// let fixture = TestFixture::new()
///     .with_config("key_order: [name]")
///     .with_file("pyproject.toml", pyprojects::PROJECT);
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a `.contrib-harvest.yaml` configuration file with the given content.
    #[allow(dead_code)]
    pub fn with_config(self, content: &str) -> Self {
        self.with_file(".contrib-harvest.yaml", content)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a command running in this fixture's directory.
    ///
    /// The user configuration directory is redirected into the fixture so
    /// a developer's own settings cannot leak into the run.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("contrib-harvest");
        cmd.current_dir(self.path())
            .env("XDG_CONFIG_HOME", self.path().join(".user-config"))
            .env_remove("CONTRIB_HARVEST_CONFIG")
            .env_remove("RUST_LOG")
            .arg("--color")
            .arg("never");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_with_file() {
        let fixture = TestFixture::new().with_file("events.jsonl", events::SEPARATE);
        assert!(fixture.path().join("events.jsonl").exists());
    }

    #[test]
    fn test_event_streams_are_json_lines() {
        for stream in [events::LINKED, events::SEPARATE] {
            for line in stream.lines() {
                serde_json::from_str::<serde_json::Value>(line).expect("line should be JSON");
            }
        }
    }

    #[test]
    fn test_pyprojects_are_valid_toml() {
        for document in [pyprojects::PROJECT, pyprojects::POETRY, pyprojects::BOTH] {
            toml::from_str::<toml::Table>(document).expect("document should be TOML");
        }
    }
}
