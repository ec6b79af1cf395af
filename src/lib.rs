//! # Contributor Harvest Library
//!
//! This library resolves the people behind a project's history. It reads
//! contributor events (commit authors and committers, persons listed in
//! project metadata), merges the events that belong to the same person, and
//! publishes one schema.org `Person` per resolved contributor.
//!
//! ## Quick Example
//!
//! ```
//! use contrib_harvest::attrs::{Attributes, Field};
//! use contrib_harvest::harvest;
//!
//! let events = vec![
//!     Attributes::new()
//!         .with(Field::Email, "a@x")
//!         .with(Field::Name, "Alice")
//!         .with(Field::Role, "author")
//!         .with(Field::Timestamp, "2020-01-01"),
//!     Attributes::new()
//!         .with(Field::Email, "a@x")
//!         .with(Field::Name, "Bob")
//!         .with(Field::Role, "committer")
//!         .with(Field::Timestamp, "2021-01-01"),
//! ];
//!
//! let people = harvest::resolve(events);
//! assert_eq!(people.len(), 1);
//! assert_eq!(people[0].name.as_deref(), Some("Bob"));
//! assert_eq!(people[0].alternate_name, ["Alice"]);
//! ```
//!
//! ## Core Concepts
//!
//! - **Attributes (`attrs`)**: One flat event tuple of names, emails,
//!   timestamps and roles, validated at the boundary.
//! - **Contributor records (`contributor`)**: The accumulated, ordered
//!   attribute history of one identity and its published `Person` form.
//! - **Registry (`registry`)**: Indexes records by several identity keys and
//!   merges records as soon as an event links them.
//! - **Harvest (`harvest`)**: Drives an event stream through a registry.
//! - **Sources (`git`, `metadata`)**: Turn git history and `pyproject.toml`
//!   into events.
//! - **Configuration (`config`, `defaults`)**: Key order, normalization and
//!   source settings from `.contrib-harvest.yaml`.

pub mod attrs;
pub mod config;
pub mod contributor;
pub mod defaults;
pub mod error;
pub mod git;
pub mod harvest;
pub mod metadata;
pub mod output;
pub mod registry;

#[cfg(test)]
mod registry_proptest;
