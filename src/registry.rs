//! # Multi-Key Identity Registry
//!
//! The [`Registry`] owns every live record and, for each identity key, an
//! index from normalized value to the record that currently represents it.
//! [`Registry::upsert`] is the identity-resolution step: it folds one event
//! into the record it belongs to and merges records that the event reveals
//! to be the same contributor.
//!
//! ## Resolution
//!
//! For an event, the (key, value) pairs are scanned in key-order priority:
//!
//! 1. The first pair with an index entry selects the **anchor** record.
//!    Pairs scanned before it have no entry and become pending.
//! 2. Without any hit, a new record is created from the event and becomes
//!    the anchor. All pairs are pending.
//! 3. An existing anchor is updated with the event.
//! 4. The remaining pairs are scanned: an entry pointing at a different
//!    record merges that record into the anchor; a missing entry is pending.
//! 5. Pending pairs are indexed to the anchor.
//!
//! ## Tie-break
//!
//! When one event links two existing records, the first key in the key
//! order with a match decides which record survives. Reordering the keys
//! (or the events) can therefore change which record absorbs the other:
//!
//! ```
//! use contrib_harvest::attrs::{Attributes, Field};
//! use contrib_harvest::registry::Registry;
//! use contrib_harvest::contributor::ContributorRecord;
//!
//! let events = [
//!     Attributes::new().with(Field::Email, "e@x").with(Field::Name, "Alice"),
//!     Attributes::new().with(Field::Email, "f@x").with(Field::Name, "Bob"),
//!     Attributes::new().with(Field::Email, "e@x").with(Field::Name, "Bob"),
//! ];
//!
//! let mut by_email: Registry<ContributorRecord> = Registry::new([Field::Email, Field::Name]);
//! let mut by_name: Registry<ContributorRecord> = Registry::new([Field::Name, Field::Email]);
//! for event in &events {
//!     by_email.upsert(event);
//!     by_name.upsert(event);
//! }
//!
//! let email_first = by_email.all_records().next().unwrap();
//! let name_first = by_name.all_records().next().unwrap();
//! assert_eq!(email_first.emails(), ["e@x", "f@x"]);
//! assert_eq!(name_first.emails(), ["f@x", "e@x"]);
//! ```
//!
//! Records never point back at the registry; the indexes hold [`RecordId`]s,
//! and the registry is the only owner of the records.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::attrs::{Attributes, Field};
use crate::contributor::ContributorRecord;

/// A record type the [`Registry`] can create, update and merge.
pub trait RegistryNode: fmt::Display {
    /// Build a new record from the event that introduced it.
    fn create(attrs: &Attributes) -> Self;

    /// Fold another event into the record.
    fn update(&mut self, attrs: &Attributes);

    /// Absorb a record found to describe the same identity.
    fn merge(&mut self, other: Self);

    /// All raw values the record holds for `field`.
    fn values(&self, field: Field) -> &[String];
}

impl RegistryNode for ContributorRecord {
    fn create(attrs: &Attributes) -> Self {
        ContributorRecord::new(attrs)
    }

    fn update(&mut self, attrs: &Attributes) {
        ContributorRecord::update(self, attrs);
    }

    fn merge(&mut self, other: Self) {
        ContributorRecord::merge(self, other);
    }

    fn values(&self, field: Field) -> &[String] {
        ContributorRecord::values(self, field)
    }
}

/// Maps a raw attribute value to the form used for identity comparison.
#[derive(Clone)]
pub struct Normalizer(Arc<dyn Fn(&str) -> String + Send + Sync>);

impl Normalizer {
    pub fn new(f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Compare values exactly as given.
    pub fn identity() -> Self {
        Self::new(str::to_string)
    }

    /// Compare values case-insensitively (Unicode lowercase).
    pub fn case_fold() -> Self {
        Self::new(str::to_lowercase)
    }

    pub fn apply(&self, value: &str) -> String {
        (self.0)(value)
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Normalizer(..)")
    }
}

/// Stable handle of a record inside one [`Registry`].
///
/// Ids grow with creation order; a merged-away id is never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug)]
struct KeyIndex {
    field: Field,
    normalizer: Normalizer,
    entries: HashMap<String, RecordId>,
}

/// Incremental identity resolver over a fixed, prioritized set of keys.
#[derive(Debug)]
pub struct Registry<N = ContributorRecord> {
    keys: Vec<KeyIndex>,
    records: BTreeMap<RecordId, N>,
    next_id: u64,
}

impl Registry<ContributorRecord> {
    /// Contributor registry keyed by email, then name, with emails compared
    /// case-insensitively.
    pub fn contributors() -> Self {
        Self::with_normalizers(
            [Field::Email, Field::Name],
            [(Field::Email, Normalizer::case_fold())],
        )
    }
}

impl<N: RegistryNode> Registry<N> {
    /// Create a registry comparing every key exactly.
    pub fn new(key_order: impl IntoIterator<Item = Field>) -> Self {
        Self::with_normalizers(key_order, [])
    }

    /// Create a registry with per-key normalizers.
    ///
    /// Keys without a normalizer compare exactly. Normalizers for fields
    /// outside `key_order` are ignored.
    pub fn with_normalizers(
        key_order: impl IntoIterator<Item = Field>,
        normalizers: impl IntoIterator<Item = (Field, Normalizer)>,
    ) -> Self {
        let mut normalizers: HashMap<Field, Normalizer> = normalizers.into_iter().collect();
        let keys = key_order
            .into_iter()
            .map(|field| KeyIndex {
                field,
                normalizer: normalizers.remove(&field).unwrap_or_default(),
                entries: HashMap::new(),
            })
            .collect();

        Self {
            keys,
            records: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// The identity keys, highest priority first.
    pub fn key_order(&self) -> Vec<Field> {
        self.keys.iter().map(|key| key.field).collect()
    }

    /// Fold one event into the registry and return the id of the record it
    /// now belongs to.
    pub fn upsert(&mut self, attrs: &Attributes) -> RecordId {
        let mut pairs = Vec::new();
        for (slot, key) in self.keys.iter().enumerate() {
            for value in attrs.get(key.field) {
                pairs.push((slot, key.normalizer.apply(value)));
            }
        }

        let mut pending = Vec::new();
        let mut pairs = pairs.into_iter();
        let mut hit = None;
        for (slot, value) in pairs.by_ref() {
            match self.keys[slot].entries.get(&value).copied() {
                Some(id) => {
                    hit = Some(id);
                    break;
                }
                None => pending.push((slot, value)),
            }
        }

        let anchor = match hit {
            Some(id) => {
                if let Some(record) = self.records.get_mut(&id) {
                    record.update(attrs);
                }
                id
            }
            None => self.insert(N::create(attrs)),
        };

        for (slot, value) in pairs {
            match self.keys[slot].entries.get(&value).copied() {
                Some(id) if id != anchor => self.absorb(anchor, id),
                Some(_) => {}
                None => pending.push((slot, value)),
            }
        }

        for (slot, value) in pending {
            self.keys[slot].entries.insert(value, anchor);
        }

        anchor
    }

    /// Live records in first-creation order.
    pub fn all_records(&self) -> impl Iterator<Item = &N> + '_ {
        self.records.values()
    }

    /// Consume the registry, returning live records in first-creation order.
    pub fn into_records(self) -> Vec<N> {
        self.records.into_values().collect()
    }

    pub fn get(&self, id: RecordId) -> Option<&N> {
        self.records.get(&id)
    }

    /// Find the record currently representing `value` under `field`.
    ///
    /// Returns `None` when `field` is not an identity key of this registry.
    pub fn lookup(&self, field: Field, value: &str) -> Option<&N> {
        let key = self.keys.iter().find(|key| key.field == field)?;
        let id = key.entries.get(&key.normalizer.apply(value))?;
        self.records.get(id)
    }

    /// Every index entry as (key, normalized value, record id).
    pub fn index_entries(&self) -> impl Iterator<Item = (Field, &str, RecordId)> + '_ {
        self.keys.iter().flat_map(|key| {
            key.entries
                .iter()
                .map(move |(value, id)| (key.field, value.as_str(), *id))
        })
    }

    /// Ids of live records in first-creation order.
    pub fn record_ids(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.records.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn insert(&mut self, record: N) -> RecordId {
        let id = RecordId(self.next_id);
        self.next_id += 1;
        debug!("created record {} for {}", id, record);
        self.records.insert(id, record);
        id
    }

    /// Merge `other` into `anchor` and repoint every index entry of `other`.
    fn absorb(&mut self, anchor: RecordId, other: RecordId) {
        let Some(absorbed) = self.records.remove(&other) else {
            return;
        };

        for key in &mut self.keys {
            for value in absorbed.values(key.field) {
                let normalized = key.normalizer.apply(value);
                if let Some(target) = key.entries.get_mut(&normalized) {
                    if *target == other {
                        *target = anchor;
                    }
                }
            }
        }

        if let Some(record) = self.records.get_mut(&anchor) {
            debug!(
                "merging record {} {} into {} {}",
                other, absorbed, anchor, record
            );
            record.merge(absorbed);
        }
    }
}
