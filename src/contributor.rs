//! # Contributor Records
//!
//! A [`ContributorRecord`] is one resolved identity: every name, email,
//! timestamp and role observed for it, in the order they were first seen.
//!
//! - `name`, `email` and `role` are unique by exact value. Case differences
//!   are kept apart here even when the registry treats them as one key.
//! - `timestamp` is append-only history; duplicates are retained because
//!   each entry is one observed event.
//!
//! Lists only ever grow. A record disappears only when the registry merges
//! it into another record.
//!
//! [`ContributorRecord::to_canonical_record`] turns the accumulated history
//! into the published [`Person`] shape (schema.org / CodeMeta).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::attrs::{Attributes, Field};

/// Key under which contribution roles are published.
pub const CONTRIBUTION_ROLE_KEY: &str = "hermes:contributionRole";

/// Accumulated attribute history for one resolved contributor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContributorRecord {
    name: Vec<String>,
    email: Vec<String>,
    timestamp: Vec<String>,
    role: Vec<String>,
}

impl ContributorRecord {
    /// Create a record holding the values of one event.
    pub fn new(attrs: &Attributes) -> Self {
        let mut record = Self::default();
        record.update(attrs);
        record
    }

    /// Fold one more event into this record.
    ///
    /// Names, emails and roles already present are skipped; timestamps are
    /// always appended.
    pub fn update(&mut self, attrs: &Attributes) {
        extend_unique(&mut self.name, attrs.get(Field::Name));
        extend_unique(&mut self.email, attrs.get(Field::Email));
        self.timestamp
            .extend(attrs.get(Field::Timestamp).iter().cloned());
        extend_unique(&mut self.role, attrs.get(Field::Role));
    }

    /// Absorb `other` into this record.
    ///
    /// Values of `self` stay first, followed by values of `other` not yet
    /// present. Timestamps are concatenated. `other` is consumed; the caller
    /// must drop every index entry that referred to it.
    pub fn merge(&mut self, other: ContributorRecord) {
        extend_unique(&mut self.name, other.name);
        extend_unique(&mut self.email, other.email);
        self.timestamp.extend(other.timestamp);
        extend_unique(&mut self.role, other.role);
    }

    pub fn values(&self, field: Field) -> &[String] {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Timestamp => &self.timestamp,
            Field::Role => &self.role,
        }
    }

    pub fn names(&self) -> &[String] {
        &self.name
    }

    pub fn emails(&self) -> &[String] {
        &self.email
    }

    pub fn timestamps(&self) -> &[String] {
        &self.timestamp
    }

    pub fn roles(&self) -> &[String] {
        &self.role
    }

    /// Earliest and latest timestamp ever recorded, compared as strings.
    pub fn time_window(&self) -> Option<(&str, &str)> {
        let start = self.timestamp.iter().min()?;
        let end = self.timestamp.iter().max()?;
        Some((start.as_str(), end.as_str()))
    }

    /// Export the record as a [`Person`].
    ///
    /// The most recently added name is primary, the first email is primary.
    /// Every role shares the record-wide time window.
    pub fn to_canonical_record(&self) -> Person {
        let (name, alternate_name) = match self.name.split_last() {
            Some((last, earlier)) => (Some(last.clone()), earlier.to_vec()),
            None => (None, Vec::new()),
        };

        let (email, contact_point) = match self.email.split_first() {
            Some((first, rest)) => (
                Some(first.clone()),
                rest.iter().cloned().map(ContactPoint::new).collect(),
            ),
            None => (None, Vec::new()),
        };

        let window = self.time_window();
        let contribution_role = self
            .role
            .iter()
            .map(|role| Role {
                kind: Role::TYPE.to_string(),
                role_name: role.clone(),
                start_time: window.map(|(start, _)| start.to_string()),
                end_time: window.map(|(_, end)| end.to_string()),
            })
            .collect();

        Person {
            kind: Person::TYPE.to_string(),
            name,
            alternate_name,
            email,
            contact_point,
            contribution_role,
        }
    }
}

impl fmt::Display for ContributorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(name) = self.name.first() {
            parts.push(name.clone());
        }
        if let Some(email) = self.email.first() {
            parts.push(format!("<{}>", email));
        }
        write!(f, "\"{}\"", parts.join(" "))
    }
}

fn extend_unique<I, S>(target: &mut Vec<String>, values: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for value in values {
        let value = value.as_ref();
        if !target.iter().any(|existing| existing == value) {
            target.push(value.to_string());
        }
    }
}

/// A resolved contributor in schema.org `Person` form.
///
/// Empty lists and missing values are omitted when serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    #[serde(rename = "@type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        rename = "alternateName",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub alternate_name: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "contactPoint", default, skip_serializing_if = "Vec::is_empty")]
    pub contact_point: Vec<ContactPoint>,
    #[serde(
        rename = "hermes:contributionRole",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub contribution_role: Vec<Role>,
}

impl Person {
    pub const TYPE: &'static str = "Person";
}

/// A secondary email address of a [`Person`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPoint {
    #[serde(rename = "@type")]
    pub kind: String,
    pub email: String,
}

impl ContactPoint {
    pub const TYPE: &'static str = "ContactPoint";

    pub fn new(email: impl Into<String>) -> Self {
        Self {
            kind: Self::TYPE.to_string(),
            email: email.into(),
        }
    }
}

/// A contribution role with the time window of the whole record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    #[serde(rename = "@type")]
    pub kind: String,
    #[serde(rename = "roleName")]
    pub role_name: String,
    #[serde(rename = "startTime", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(rename = "endTime", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

impl Role {
    pub const TYPE: &'static str = "Role";
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(name: &str, email: &str, timestamp: &str, role: &str) -> Attributes {
        Attributes::new()
            .with(Field::Name, name)
            .with(Field::Email, email)
            .with(Field::Timestamp, timestamp)
            .with(Field::Role, role)
    }

    #[test]
    fn test_new_deduplicates_sequences() {
        let record = ContributorRecord::new(
            &Attributes::new()
                .with(Field::Name, vec!["A", "B", "A"])
                .with(Field::Timestamp, vec!["t1", "t1"]),
        );
        assert_eq!(record.names(), ["A", "B"]);
        assert_eq!(record.timestamps(), ["t1", "t1"]);
    }

    #[test]
    fn test_update_is_idempotent_for_unique_fields() {
        let attrs = event("Alice", "a@x", "t1", "author");
        let mut record = ContributorRecord::new(&attrs);
        record.update(&attrs);

        assert_eq!(record.names(), ["Alice"]);
        assert_eq!(record.emails(), ["a@x"]);
        assert_eq!(record.roles(), ["author"]);
        assert_eq!(record.timestamps(), ["t1", "t1"]);
    }

    #[test]
    fn test_update_keeps_case_variants_apart() {
        let mut record = ContributorRecord::new(&Attributes::new().with(Field::Email, "A@X"));
        record.update(&Attributes::new().with(Field::Email, "a@x"));
        assert_eq!(record.emails(), ["A@X", "a@x"]);
    }

    #[test]
    fn test_merge_keeps_own_values_first() {
        let mut record = ContributorRecord::new(&event("Alice", "a@x", "t2", "author"));
        let other = ContributorRecord::new(
            &Attributes::new()
                .with(Field::Name, vec!["Al", "Alice"])
                .with(Field::Email, "al@y")
                .with(Field::Timestamp, vec!["t1", "t2"])
                .with(Field::Role, vec!["committer", "author"]),
        );

        record.merge(other);

        assert_eq!(record.names(), ["Alice", "Al"]);
        assert_eq!(record.emails(), ["a@x", "al@y"]);
        assert_eq!(record.timestamps(), ["t2", "t1", "t2"]);
        assert_eq!(record.roles(), ["author", "committer"]);
    }

    #[test]
    fn test_primary_name_is_most_recent() {
        let mut record = ContributorRecord::new(&Attributes::new().with(Field::Name, "X"));
        record.update(&Attributes::new().with(Field::Name, "Y"));

        let person = record.to_canonical_record();
        assert_eq!(person.name.as_deref(), Some("Y"));
        assert_eq!(person.alternate_name, ["X"]);
    }

    #[test]
    fn test_primary_email_is_first() {
        let record = ContributorRecord::new(
            &Attributes::new().with(Field::Email, vec!["first@x", "second@x", "third@x"]),
        );

        let person = record.to_canonical_record();
        assert_eq!(person.email.as_deref(), Some("first@x"));
        assert_eq!(
            person.contact_point,
            [ContactPoint::new("second@x"), ContactPoint::new("third@x")]
        );
    }

    #[test]
    fn test_roles_share_record_time_window() {
        let mut record = ContributorRecord::new(&event("A", "a@x", "2020-01-01", "author"));
        record.update(&event("A", "a@x", "2021-06-01", "committer"));
        record.update(&Attributes::new().with(Field::Timestamp, "2019-12-31"));

        let person = record.to_canonical_record();
        assert_eq!(person.contribution_role.len(), 2);
        for role in &person.contribution_role {
            assert_eq!(role.start_time.as_deref(), Some("2019-12-31"));
            assert_eq!(role.end_time.as_deref(), Some("2021-06-01"));
        }
        assert_eq!(person.contribution_role[0].role_name, "author");
        assert_eq!(person.contribution_role[1].role_name, "committer");
    }

    #[test]
    fn test_single_timestamp_window() {
        let record = ContributorRecord::new(&event("A", "a@x", "t1", "author"));
        assert_eq!(record.time_window(), Some(("t1", "t1")));
    }

    #[test]
    fn test_roles_without_timestamps_have_no_window() {
        let record = ContributorRecord::new(&Attributes::new().with(Field::Role, "maintainer"));
        let value = serde_json::to_value(record.to_canonical_record()).unwrap();
        assert_eq!(
            value,
            json!({
                "@type": "Person",
                "hermes:contributionRole": [{"@type": "Role", "roleName": "maintainer"}]
            })
        );
    }

    #[test]
    fn test_empty_fields_are_omitted() {
        let record = ContributorRecord::new(
            &Attributes::new()
                .with(Field::Name, "Solo")
                .with(Field::Timestamp, "t1"),
        );
        let value = serde_json::to_value(record.to_canonical_record()).unwrap();
        assert_eq!(value, json!({"@type": "Person", "name": "Solo"}));
    }

    #[test]
    fn test_canonical_record_does_not_consume_lists() {
        let record = ContributorRecord::new(&event("A", "a@x", "t1", "author"));
        let first = record.to_canonical_record();
        let second = record.to_canonical_record();
        assert_eq!(first, second);
        assert_eq!(record.names(), ["A"]);
    }

    #[test]
    fn test_full_shape() {
        let mut record = ContributorRecord::new(&event("Alice", "a@x", "t1", "author"));
        record.update(&event("Bob", "b@x", "t2", "committer"));

        let value = serde_json::to_value(record.to_canonical_record()).unwrap();
        assert_eq!(
            value,
            json!({
                "@type": "Person",
                "name": "Bob",
                "alternateName": ["Alice"],
                "email": "a@x",
                "contactPoint": [{"@type": "ContactPoint", "email": "b@x"}],
                "hermes:contributionRole": [
                    {"@type": "Role", "roleName": "author", "startTime": "t1", "endTime": "t2"},
                    {"@type": "Role", "roleName": "committer", "startTime": "t1", "endTime": "t2"}
                ]
            })
        );
    }

    #[test]
    fn test_roles_are_published_under_contribution_role_key() {
        let record = ContributorRecord::new(&event("A", "a@x", "t1", "author"));
        let value = serde_json::to_value(record.to_canonical_record()).unwrap();
        let roles = value.get(CONTRIBUTION_ROLE_KEY).and_then(|v| v.as_array());
        assert_eq!(roles.map(Vec::len), Some(1));
    }

    #[test]
    fn test_display() {
        let record = ContributorRecord::new(&event("Alice", "a@x", "t1", "author"));
        assert_eq!(record.to_string(), "\"Alice <a@x>\"");

        let email_only = ContributorRecord::new(&Attributes::new().with(Field::Email, "a@x"));
        assert_eq!(email_only.to_string(), "\"<a@x>\"");

        assert_eq!(ContributorRecord::default().to_string(), "\"\"");
    }
}
