//! # Attribute Tuples
//!
//! Every observed event (a commit author, a commit committer, a person listed
//! in project metadata) reaches the identity engine as one flat [`Attributes`]
//! tuple. Each of the four [`Field`]s holds zero or more string values.
//!
//! Callers may supply a field as a single string or as a sequence; both are
//! normalized once, here, into [`Values`], so nothing downstream branches on
//! the shape of its input.
//!
//! Untyped input (an event stream read from JSON) is validated by
//! [`Attributes::from_json`], which rejects anything that is not a string or
//! a list of strings with [`Error::InvalidAttribute`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// An attribute of a contributor identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Timestamp,
    Role,
}

impl Field {
    /// All fields, in storage order.
    pub const ALL: [Field; 4] = [Field::Name, Field::Email, Field::Timestamp, Field::Role];

    /// The lowercase name used in event streams and configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Timestamp => "timestamp",
            Field::Role => "role",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.as_str() == s.trim())
            .ok_or_else(|| {
                format!(
                    "unknown field '{}' (expected one of: name, email, timestamp, role)",
                    s
                )
            })
    }
}

/// An ordered sequence of values for one field.
///
/// Built from either a single string or a sequence of strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Values(Vec<String>);

impl Values {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn push(&mut self, value: impl Into<String>) {
        self.0.push(value.into());
    }
}

impl From<&str> for Values {
    fn from(value: &str) -> Self {
        Self(vec![value.to_string()])
    }
}

impl From<String> for Values {
    fn from(value: String) -> Self {
        Self(vec![value])
    }
}

impl From<&String> for Values {
    fn from(value: &String) -> Self {
        Self(vec![value.clone()])
    }
}

impl From<Vec<String>> for Values {
    fn from(values: Vec<String>) -> Self {
        Self(values)
    }
}

impl From<Vec<&str>> for Values {
    fn from(values: Vec<&str>) -> Self {
        Self(values.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Values {
    fn from(values: [&str; N]) -> Self {
        Self(values.iter().map(|v| v.to_string()).collect())
    }
}

impl<'a> IntoIterator for &'a Values {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Values {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// One flat event tuple: zero or more values for each [`Field`].
///
/// ```
/// use contrib_harvest::attrs::{Attributes, Field};
///
/// let event = Attributes::new()
///     .with(Field::Email, "alice@example.org")
///     .with(Field::Name, "Alice")
///     .with(Field::Role, "author");
///
/// assert_eq!(event.get(Field::Name).as_slice(), ["Alice"]);
/// assert!(event.get(Field::Timestamp).is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    name: Values,
    email: Values,
    timestamp: Values,
    role: Values,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the values of `field`, builder style.
    pub fn with(mut self, field: Field, values: impl Into<Values>) -> Self {
        *self.get_mut(field) = values.into();
        self
    }

    pub fn get(&self, field: Field) -> &Values {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Timestamp => &self.timestamp,
            Field::Role => &self.role,
        }
    }

    pub fn get_mut(&mut self, field: Field) -> &mut Values {
        match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Timestamp => &mut self.timestamp,
            Field::Role => &mut self.role,
        }
    }

    /// True when no field carries a value.
    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|field| self.get(*field).is_empty())
    }

    /// Validate one untyped event.
    ///
    /// The event must be a JSON object. Each of `name`, `email`, `timestamp`
    /// and `role` may be absent, `null`, a string, or an array of strings.
    /// Other keys are ignored.
    pub fn from_json(value: &Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| Error::InvalidAttribute {
            field: "<event>".to_string(),
            message: format!("expected an object, found {}", json_kind(value)),
        })?;

        let mut attrs = Self::new();
        for field in Field::ALL {
            let Some(raw) = object.get(field.as_str()) else {
                continue;
            };
            *attrs.get_mut(field) = values_from_json(field, raw)?;
        }
        Ok(attrs)
    }
}

fn values_from_json(field: Field, raw: &Value) -> Result<Values> {
    let invalid = |found: &Value| Error::InvalidAttribute {
        field: field.to_string(),
        message: format!(
            "expected a string or a list of strings, found {}",
            json_kind(found)
        ),
    };

    match raw {
        Value::Null => Ok(Values::new()),
        Value::String(s) => Ok(Values::from(s.as_str())),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(|| invalid(item)))
            .collect::<Result<Vec<_>>>()
            .map(Values::from),
        other => Err(invalid(other)),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
