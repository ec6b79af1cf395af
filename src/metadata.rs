//! # Project Metadata
//!
//! Reads the package table of a `pyproject.toml` file and maps it onto
//! CodeMeta property names. Exactly one of two tables is used:
//!
//! - `[project]` (PEP 621)
//! - `[tool.poetry]`
//!
//! Declaring both is an error, because their contents could disagree.
//!
//! ## Persons
//!
//! `authors` and `maintainers` entries come in two shapes:
//!
//! - A table. Only the keys in [`PERSON_KEYS`] are kept.
//! - A string such as `"Jane Doe <jane@example.org>"`, parsed into `name`
//!   and `email`.
//!
//! Every surviving person is tagged `"@type": "Person"`; persons left empty
//! are dropped. A single person is emitted as an object, several as a list,
//! none at all omits the property.
//!
//! The same persons can be replayed into the identity registry through
//! [`ProjectMetadata::person_events`].

use std::path::Path;

use regex::Regex;
use serde_json::{Map, Value};

use crate::attrs::{Attributes, Field};
use crate::error::{Error, Result};

/// Keys kept on a person table.
pub const PERSON_KEYS: [&str; 6] = ["givenName", "lastName", "email", "@id", "@type", "name"];

/// `Name <email>`, with the name optionally quoted.
const ADDRESS_PATTERN: &str = r#"^\s*"?(?P<name>[^"<]*?)"?\s*<(?P<email>[^>]*)>\s*$"#;

/// CodeMeta properties that hold persons, with the role their members play.
const PERSON_PROPERTIES: [(&str, &str); 2] = [("author", "author"), ("maintainer", "maintainer")];

/// The table the metadata was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataTable {
    /// `[project]`
    Project,
    /// `[tool.poetry]`
    Poetry,
}

impl MetadataTable {
    /// (CodeMeta property, TOML key) pairs mapped from this table.
    fn mapping(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            MetadataTable::Project => &[
                ("name", "name"),
                ("version", "version"),
                ("description", "description"),
                ("runtimePlatform", "requires-python"),
                ("author", "authors"),
                ("maintainer", "maintainers"),
                ("keywords", "keywords"),
            ],
            MetadataTable::Poetry => &[
                ("name", "name"),
                ("version", "version"),
                ("description", "description"),
                ("author", "authors"),
                ("maintainer", "maintainers"),
                ("url", "homepage"),
                ("codeRepository", "repository"),
                ("keywords", "keywords"),
            ],
        }
    }
}

/// Metadata mapped from one `pyproject.toml`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectMetadata {
    /// Table the data came from; `None` when neither table exists.
    pub table: Option<MetadataTable>,
    /// CodeMeta properties, keyed by property name.
    pub properties: Map<String, Value>,
}

impl ProjectMetadata {
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// The properties as one JSON object.
    pub fn to_json(&self) -> Value {
        Value::Object(self.properties.clone())
    }

    /// Authors and maintainers as registry events.
    ///
    /// `name` falls back to `givenName lastName`. Persons with neither a
    /// name nor an email produce no event.
    pub fn person_events(&self) -> Vec<Attributes> {
        let mut events = Vec::new();
        for (property, role) in PERSON_PROPERTIES {
            let persons: Vec<&Map<String, Value>> = match self.properties.get(property) {
                Some(Value::Object(person)) => vec![person],
                Some(Value::Array(items)) => items.iter().filter_map(Value::as_object).collect(),
                _ => continue,
            };

            for person in persons {
                let mut event = Attributes::new();
                if let Some(name) = person_name(person) {
                    event = event.with(Field::Name, name);
                }
                if let Some(email) = person.get("email").and_then(Value::as_str) {
                    event = event.with(Field::Email, email);
                }
                if event.is_empty() {
                    continue;
                }
                events.push(event.with(Field::Role, role));
            }
        }
        events
    }
}

fn person_name(person: &Map<String, Value>) -> Option<String> {
    if let Some(name) = person.get("name").and_then(Value::as_str) {
        if !name.is_empty() {
            return Some(name.to_string());
        }
    }
    let parts: Vec<&str> = ["givenName", "lastName"]
        .iter()
        .filter_map(|key| person.get(*key).and_then(Value::as_str))
        .filter(|part| !part.is_empty())
        .collect();
    (!parts.is_empty()).then(|| parts.join(" "))
}

/// Read and map the metadata file at `path`.
pub fn read_file(path: &Path) -> Result<ProjectMetadata> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

/// Parse and map `pyproject.toml` content.
pub fn parse(content: &str) -> Result<ProjectMetadata> {
    let document: toml::Table = toml::from_str(content)?;
    from_document(&document)
}

/// Map an already parsed document.
pub fn from_document(document: &toml::Table) -> Result<ProjectMetadata> {
    let project = match document.get("project") {
        Some(toml::Value::Table(table)) => Some(table),
        Some(_) => {
            return Err(Error::Metadata {
                message: "'project' must be a table.".to_string(),
            })
        }
        None => None,
    };
    let poetry = document
        .get("tool")
        .and_then(toml::Value::as_table)
        .and_then(|tool| tool.get("poetry"))
        .and_then(toml::Value::as_table);

    let (table, source) = match (project, poetry) {
        (Some(_), Some(_)) => {
            return Err(Error::Metadata {
                message: "Both project and tool.poetry table exist.".to_string(),
            })
        }
        (Some(project), None) => (MetadataTable::Project, project),
        (None, Some(poetry)) => (MetadataTable::Poetry, poetry),
        (None, None) => return Ok(ProjectMetadata::default()),
    };

    let mut properties = Map::new();
    for (property, key) in table.mapping() {
        let Some(value) = source.get(*key) else {
            continue;
        };

        match *key {
            "requires-python" => {
                let requirement = value.as_str().ok_or_else(|| Error::Metadata {
                    message: "'requires-python' must be a string.".to_string(),
                })?;
                properties.insert(
                    property.to_string(),
                    Value::String(format!("Python {}", requirement)),
                );
            }
            "authors" | "maintainers" => {
                if let Some(persons) = collapse_persons(normalize_persons(value)?) {
                    properties.insert(property.to_string(), persons);
                }
            }
            _ => {
                properties.insert(property.to_string(), toml_to_json(value));
            }
        }
    }

    Ok(ProjectMetadata {
        table: Some(table),
        properties,
    })
}

/// Bring a person value of unknown shape into a list of filtered person maps.
///
/// A lone table is returned even when filtering left it empty; empty persons
/// inside a list are dropped.
pub fn normalize_persons(value: &toml::Value) -> Result<Vec<Map<String, Value>>> {
    match value {
        toml::Value::Table(table) => Ok(vec![filter_person(table)]),
        toml::Value::String(text) => Ok(vec![parse_person(text)?]),
        toml::Value::Array(items) => {
            let mut persons = Vec::new();
            for item in items {
                let person = match item {
                    toml::Value::Table(table) => filter_person(table),
                    toml::Value::String(text) => parse_person(text)?,
                    _ => return Err(invalid_person()),
                };
                if !person.is_empty() {
                    persons.push(person);
                }
            }
            Ok(persons)
        }
        _ => Err(invalid_person()),
    }
}

fn invalid_person() -> Error {
    Error::Metadata {
        message: "A person must be a table or a string.".to_string(),
    }
}

/// Tag persons with `@type` and collapse the list to its published shape.
pub fn collapse_persons(persons: Vec<Map<String, Value>>) -> Option<Value> {
    let mut persons: Vec<Value> = persons
        .into_iter()
        .filter(|person| !person.is_empty())
        .map(|mut person| {
            person.insert("@type".to_string(), Value::String("Person".to_string()));
            Value::Object(person)
        })
        .collect();

    match persons.len() {
        0 => None,
        1 => persons.pop(),
        _ => Some(Value::Array(persons)),
    }
}

/// Keep only the [`PERSON_KEYS`] of a person table.
pub fn filter_person(table: &toml::Table) -> Map<String, Value> {
    table
        .iter()
        .filter(|(key, _)| PERSON_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), toml_to_json(value)))
        .collect()
}

/// Parse `"Name <email>"`, `"<email>"` or a bare token.
///
/// A bare token containing `@` is an email, anything else is a name.
/// This departs from RFC 5322 address-list parsing, which reads every bare
/// token as an address, so `"Jane"` stays a name. Empty parts are left out.
pub fn parse_person(text: &str) -> Result<Map<String, Value>> {
    let address = Regex::new(ADDRESS_PATTERN)?;

    let (name, email) = match address.captures(text) {
        Some(caps) => (
            caps.name("name").map_or("", |m| m.as_str()),
            caps.name("email").map_or("", |m| m.as_str()),
        ),
        None if text.contains('@') => ("", text),
        None => (text, ""),
    };

    let mut person = Map::new();
    for (key, value) in [("name", name.trim()), ("email", email.trim())] {
        if !value.is_empty() {
            person.insert(key.to_string(), Value::String(value.to_string()));
        }
    }
    Ok(person)
}

fn toml_to_json(value: &toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s.clone()),
        toml::Value::Integer(i) => Value::from(*i),
        toml::Value::Float(f) => Value::from(*f),
        toml::Value::Boolean(b) => Value::Bool(*b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .iter()
                .map(|(key, value)| (key.clone(), toml_to_json(value)))
                .collect(),
        ),
    }
}
