//! # Harvest Driver
//!
//! Feeds a stream of [`Attributes`] events into a [`Registry`] strictly in
//! stream order, then exports the resolved records as [`Person`]s.
//!
//! Event order is part of the result: when keys cross-link records, the
//! order decides which record survives a merge.

use std::io::BufRead;

use log::{info, warn};
use serde_json::Value;

use crate::attrs::Attributes;
use crate::contributor::{ContributorRecord, Person};
use crate::error::{Error, Result};
use crate::registry::{Registry, RegistryNode};

/// What to do with an event that fails boundary validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnInvalid {
    /// Stop and return the error.
    #[default]
    Abort,
    /// Log a warning and continue with the next event.
    Skip,
}

/// Counts collected while feeding a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HarvestSummary {
    /// Events applied to the registry.
    pub events: usize,
    /// Events rejected at the boundary and skipped.
    pub skipped: usize,
    /// Live records after the last event.
    pub contributors: usize,
}

/// Apply `events` to `registry` in order.
pub fn feed<N, I>(registry: &mut Registry<N>, events: I) -> HarvestSummary
where
    N: RegistryNode,
    I: IntoIterator<Item = Attributes>,
{
    let mut summary = HarvestSummary::default();
    for event in events {
        registry.upsert(&event);
        summary.events += 1;
    }
    summary.contributors = registry.len();
    info!(
        "resolved {} events into {} contributors",
        summary.events, summary.contributors
    );
    summary
}

/// Canonical form of every live record, in first-creation order.
pub fn export(registry: &Registry<ContributorRecord>) -> Vec<Person> {
    registry
        .all_records()
        .map(ContributorRecord::to_canonical_record)
        .collect()
}

/// Resolve `events` with the default contributor registry and export them.
pub fn resolve<I>(events: I) -> Vec<Person>
where
    I: IntoIterator<Item = Attributes>,
{
    let mut registry = Registry::contributors();
    feed(&mut registry, events);
    registry
        .into_records()
        .iter()
        .map(ContributorRecord::to_canonical_record)
        .collect()
}

/// Read a JSON-lines event stream into `registry`.
///
/// Each non-blank line must be one JSON object accepted by
/// [`Attributes::from_json`]. Line numbers in errors are 1-based.
pub fn feed_json_lines<N, R>(
    registry: &mut Registry<N>,
    reader: R,
    on_invalid: OnInvalid,
) -> Result<HarvestSummary>
where
    N: RegistryNode,
    R: BufRead,
{
    let mut summary = HarvestSummary::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let number = index + 1;

        match parse_event(&line, number) {
            Ok(event) => {
                registry.upsert(&event);
                summary.events += 1;
            }
            Err(err) if on_invalid == OnInvalid::Skip => {
                warn!("skipping event: {}", err);
                summary.skipped += 1;
            }
            Err(err) => return Err(err),
        }
    }

    summary.contributors = registry.len();
    info!(
        "resolved {} events into {} contributors ({} skipped)",
        summary.events, summary.contributors, summary.skipped
    );
    Ok(summary)
}

fn parse_event(line: &str, number: usize) -> Result<Attributes> {
    let value: Value = serde_json::from_str(line).map_err(|e| Error::EventParse {
        line: number,
        message: e.to_string(),
    })?;
    Attributes::from_json(&value).map_err(|e| Error::EventParse {
        line: number,
        message: e.to_string(),
    })
}
