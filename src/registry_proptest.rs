//! Property-based tests for the identity registry.
//!
//! Events are drawn from small value pools so that emails and names collide
//! often and cross-link records in many different shapes.

#[cfg(test)]
mod proptest_tests {
    use crate::attrs::{Attributes, Field};
    use crate::contributor::ContributorRecord;
    use crate::registry::{Normalizer, Registry};
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn event_strategy() -> impl Strategy<Value = Attributes> {
        (
            proptest::option::of("[a-d]@x"),
            proptest::option::of("[A-D]"),
            proptest::option::of("2024-0[1-9]"),
            proptest::option::of(prop_oneof![Just("author"), Just("committer")]),
        )
            .prop_map(|(email, name, timestamp, role)| {
                let mut attrs = Attributes::new();
                if let Some(email) = email {
                    attrs = attrs.with(Field::Email, email);
                }
                if let Some(name) = name {
                    attrs = attrs.with(Field::Name, name);
                }
                if let Some(timestamp) = timestamp {
                    attrs = attrs.with(Field::Timestamp, timestamp);
                }
                if let Some(role) = role {
                    attrs = attrs.with(Field::Role, role);
                }
                attrs
            })
    }

    fn events_strategy() -> impl Strategy<Value = Vec<Attributes>> {
        proptest::collection::vec(event_strategy(), 0..40)
    }

    fn key_order_strategy() -> impl Strategy<Value = Vec<Field>> {
        prop_oneof![
            Just(vec![Field::Email, Field::Name]),
            Just(vec![Field::Name, Field::Email]),
            Just(vec![Field::Email]),
            Just(vec![Field::Name]),
        ]
    }

    fn feed(key_order: &[Field], events: &[Attributes]) -> Registry<ContributorRecord> {
        let mut registry = Registry::new(key_order.iter().copied());
        for event in events {
            registry.upsert(event);
        }
        registry
    }

    proptest! {
        /// Property: every index entry points at a live record
        #[test]
        fn index_entries_never_dangle(
            key_order in key_order_strategy(),
            events in events_strategy(),
        ) {
            let registry = feed(&key_order, &events);
            for (field, value, id) in registry.index_entries() {
                prop_assert!(
                    registry.get(id).is_some(),
                    "{} '{}' points at merged-away record {}",
                    field,
                    value,
                    id
                );
            }
        }

        /// Property: each indexed value resolves to a record that holds it
        #[test]
        fn index_entries_point_at_owning_record(
            key_order in key_order_strategy(),
            events in events_strategy(),
        ) {
            let registry = feed(&key_order, &events);
            for (field, value, id) in registry.index_entries() {
                let record = registry.get(id).unwrap();
                prop_assert!(record.values(field).iter().any(|v| v == value));
            }
        }

        /// Property: every key value of every record is indexed to that record
        #[test]
        fn record_values_are_indexed(
            key_order in key_order_strategy(),
            events in events_strategy(),
        ) {
            let registry = feed(&key_order, &events);
            for id in registry.record_ids() {
                let record = registry.get(id).unwrap();
                for field in &key_order {
                    for value in record.values(*field) {
                        let found = registry.lookup(*field, value);
                        prop_assert_eq!(found, Some(record));
                    }
                }
            }
        }

        /// Property: no two live records share a key value
        #[test]
        fn key_values_are_partitioned(
            key_order in key_order_strategy(),
            events in events_strategy(),
        ) {
            let registry = feed(&key_order, &events);
            for field in &key_order {
                let mut seen = HashSet::new();
                for record in registry.all_records() {
                    let distinct: HashSet<_> = record.values(*field).iter().collect();
                    for value in distinct {
                        prop_assert!(seen.insert(value.clone()), "{} '{}' owned twice", field, value);
                    }
                }
            }
        }

        /// Property: live record ids are strictly increasing (creation order)
        #[test]
        fn record_ids_keep_creation_order(
            key_order in key_order_strategy(),
            events in events_strategy(),
        ) {
            let registry = feed(&key_order, &events);
            let ids: Vec<_> = registry.record_ids().collect();
            prop_assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
        }

        /// Property: no event value is ever lost across merges
        #[test]
        fn merges_preserve_every_value(
            key_order in key_order_strategy(),
            events in events_strategy(),
        ) {
            let registry = feed(&key_order, &events);
            for field in Field::ALL {
                let expected: usize = events.iter().map(|event| event.get(field).len()).sum();
                let held: usize = registry
                    .all_records()
                    .map(|record| record.values(field).len())
                    .sum();
                if field == Field::Timestamp {
                    prop_assert_eq!(held, expected);
                } else {
                    prop_assert!(held <= expected);
                    let event_values: HashSet<_> = events
                        .iter()
                        .flat_map(|event| event.get(field).iter().cloned())
                        .collect();
                    let record_values: HashSet<_> = registry
                        .all_records()
                        .flat_map(|record| record.values(field).iter().cloned())
                        .collect();
                    prop_assert_eq!(record_values, event_values);
                }
            }
        }

        /// Property: replaying an event never changes the record count
        #[test]
        fn repeated_event_is_idempotent_for_identity(
            events in events_strategy(),
            index in any::<prop::sample::Index>(),
        ) {
            prop_assume!(!events.is_empty());
            let mut registry = Registry::contributors();
            for event in &events {
                registry.upsert(event);
            }
            let event = &events[index.index(events.len())];
            prop_assume!(!event.get(Field::Email).is_empty() || !event.get(Field::Name).is_empty());

            let before = registry.len();
            registry.upsert(event);
            prop_assert_eq!(registry.len(), before);
        }

        /// Property: case folding never yields more records than exact comparison
        #[test]
        fn case_folding_only_merges_more(events in events_strategy()) {
            let exact = feed(&[Field::Email, Field::Name], &events);
            let mut folded: Registry<ContributorRecord> = Registry::with_normalizers(
                [Field::Email, Field::Name],
                [(Field::Email, Normalizer::case_fold())],
            );
            for event in &events {
                folded.upsert(event);
            }
            prop_assert!(folded.len() <= exact.len());
        }
    }
}
