//! Contributor events from git history.
//!
//! Runs the system `git` binary (so `.mailmap`, `safe.directory` and any
//! other user configuration apply) and turns every commit into two events:
//! one for its author and one for its committer.

use std::path::Path;
use std::process::Command;

use log::debug;

use crate::attrs::{Attributes, Field};
use crate::error::{Error, Result};

/// Separator between fields of one log line (ASCII unit separator).
const FIELD_SEPARATOR: char = '\x1f';

/// `--pretty` format: author name, email, date, then committer name, email, date.
///
/// The capitalized placeholders apply `.mailmap`; dates are strict ISO-8601.
pub const LOG_FORMAT: &str = "format:%aN%x1f%aE%x1f%aI%x1f%cN%x1f%cE%x1f%cI";

/// Role assigned to commit authors.
pub const AUTHOR_ROLE: &str = "author";

/// Role assigned to commit committers.
pub const COMMITTER_ROLE: &str = "committer";

/// Read the history of `branch` in the repository at `repo` as contributor
/// events, oldest commit first.
pub fn log_events(repo: &Path, branch: &str) -> Result<Vec<Attributes>> {
    let pretty = format!("--pretty={}", LOG_FORMAT);
    let output = Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(["log", "--reverse", pretty.as_str(), branch, "--"])
        .output()
        .map_err(|e| Error::GitCommand {
            command: format!("log {}", branch),
            path: repo.display().to_string(),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::GitCommand {
            command: format!("log {}", branch),
            path: repo.display().to_string(),
            stderr: stderr.trim().to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let events = parse_log(&stdout)?;
    debug!(
        "read {} contributor events from {} ({})",
        events.len(),
        repo.display(),
        branch
    );
    Ok(events)
}

/// Parse output produced with [`LOG_FORMAT`].
///
/// Blank lines are ignored. Empty fields are left out of the event.
pub fn parse_log(output: &str) -> Result<Vec<Attributes>> {
    let mut events = Vec::new();

    for (index, line) in output.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        let &[author_name, author_email, author_date, committer_name, committer_email, committer_date] =
            fields.as_slice()
        else {
            return Err(Error::GitLogParse {
                line: index + 1,
                message: format!("expected 6 fields, found {}", fields.len()),
            });
        };

        events.push(commit_event(author_name, author_email, author_date, AUTHOR_ROLE));
        events.push(commit_event(
            committer_name,
            committer_email,
            committer_date,
            COMMITTER_ROLE,
        ));
    }

    Ok(events)
}

fn commit_event(name: &str, email: &str, timestamp: &str, role: &str) -> Attributes {
    let mut event = Attributes::new().with(Field::Role, role);
    for (field, value) in [
        (Field::Name, name),
        (Field::Email, email),
        (Field::Timestamp, timestamp),
    ] {
        let value = value.trim();
        if !value.is_empty() {
            event = event.with(field, value);
        }
    }
    event
}
