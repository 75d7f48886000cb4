//! The dedup core: splits an incoming batch into rows to append and rows to
//! discard, against the set of natural keys already persisted.
//!
//! This is pure so it can be exercised without a database; the repository
//! feeds it the key projection it read from the target table.

use crate::store::error::{StoreError, StoreResult};
use crate::types::dataset::DatasetKind;
use crate::types::observation::{NaturalKey, ObservationRow};
use std::collections::HashSet;

/// Outcome of partitioning one batch: the rows to append, in input order, and
/// how many were discarded as duplicates. Every input row lands in exactly one
/// of the two.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    pub new_rows: Vec<ObservationRow>,
    pub duplicates: usize,
}

/// Left-anti-join of `rows` against `existing` on the natural key.
///
/// Keys are compared in their UTC-normalized form (see [`NaturalKey::new`]),
/// so differently-represented instants of the same moment count as the same
/// key. Within one batch the first row for a key wins; later rows with the
/// same key are discarded like any other duplicate.
///
/// Rows are validated before anything else: an empty place name or a value
/// count that does not match `kind`'s measure list is a data-shape error and
/// fails the whole partition, so no store mutation is ever attempted for a
/// malformed batch.
pub fn partition_new(
    kind: DatasetKind,
    rows: Vec<ObservationRow>,
    existing: &HashSet<NaturalKey>,
) -> StoreResult<Partition> {
    let expected_values = kind.measures().len();
    for row in &rows {
        if row.place_name.trim().is_empty() {
            return Err(StoreError::MalformedBatch {
                table: kind.table_name().to_string(),
                reason: format!("row at {} has an empty place_name", row.timestamp),
            });
        }
        if row.values.len() != expected_values {
            return Err(StoreError::MalformedBatch {
                table: kind.table_name().to_string(),
                reason: format!(
                    "row ({}, {}) carries {} values, expected {}",
                    row.place_name,
                    row.timestamp,
                    row.values.len(),
                    expected_values
                ),
            });
        }
    }

    let mut seen: HashSet<NaturalKey> = HashSet::with_capacity(rows.len());
    let mut new_rows = Vec::with_capacity(rows.len());
    let mut duplicates = 0;
    for row in rows {
        let key = row.key();
        if existing.contains(&key) || !seen.insert(key) {
            duplicates += 1;
        } else {
            new_rows.push(row);
        }
    }

    Ok(Partition {
        new_rows,
        duplicates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset, TimeZone, Utc};

    const KIND: DatasetKind = DatasetKind::DailyHistory;

    fn ts(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, hour, 0, 0).unwrap()
    }

    fn row(place: &str, timestamp: DateTime<Utc>, temp: f64) -> ObservationRow {
        ObservationRow {
            place_name: place.to_string(),
            timestamp,
            values: vec![Some(temp), Some(0.0), Some(10.0), None],
        }
    }

    #[test]
    fn empty_table_appends_every_distinct_row() {
        let rows = vec![
            row("Budapest", ts(0), 15.0),
            row("Budapest", ts(1), 15.5),
            row("Vienna", ts(0), 14.0),
        ];
        let partition = partition_new(KIND, rows.clone(), &HashSet::new()).unwrap();
        assert_eq!(partition.new_rows, rows);
        assert_eq!(partition.duplicates, 0);
    }

    #[test]
    fn existing_key_is_discarded_even_with_different_values() {
        // The store inserts-if-absent, never updates: the incoming 99.0 for an
        // already-stored key must be dropped.
        let existing: HashSet<_> = [NaturalKey::new("Budapest", ts(0))].into();
        let partition =
            partition_new(KIND, vec![row("Budapest", ts(0), 99.0)], &existing).unwrap();
        assert!(partition.new_rows.is_empty());
        assert_eq!(partition.duplicates, 1);
    }

    #[test]
    fn second_run_appends_nothing() {
        let rows = vec![row("Budapest", ts(0), 15.0), row("Budapest", ts(1), 15.5)];
        let mut table: HashSet<NaturalKey> = HashSet::new();

        let first = partition_new(KIND, rows.clone(), &table).unwrap();
        table.extend(first.new_rows.iter().map(ObservationRow::key));
        assert_eq!(first.new_rows.len(), 2);

        let second = partition_new(KIND, rows, &table).unwrap();
        assert!(second.new_rows.is_empty());
        assert_eq!(second.duplicates, 2);
    }

    #[test]
    fn every_row_lands_in_exactly_one_side() {
        let existing: HashSet<_> = [
            NaturalKey::new("Budapest", ts(0)),
            NaturalKey::new("Vienna", ts(2)),
        ]
        .into();
        let rows = vec![
            row("Budapest", ts(0), 1.0),
            row("Budapest", ts(1), 2.0),
            row("Vienna", ts(2), 3.0),
            row("Vienna", ts(3), 4.0),
        ];
        let total = rows.len();
        let partition = partition_new(KIND, rows, &existing).unwrap();
        assert_eq!(partition.new_rows.len() + partition.duplicates, total);
        assert_eq!(partition.new_rows.len(), 2);
    }

    #[test]
    fn same_instant_different_offset_counts_as_duplicate() {
        let existing: HashSet<_> = [NaturalKey::new("Budapest", ts(0))].into();
        // 02:00 at +02:00 is the same instant as 00:00Z.
        let local = FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 6, 3, 2, 0, 0)
            .unwrap();
        let incoming = row("Budapest", local.with_timezone(&Utc), 20.0);
        let partition = partition_new(KIND, vec![incoming], &existing).unwrap();
        assert!(partition.new_rows.is_empty());
        assert_eq!(partition.duplicates, 1);
    }

    #[test]
    fn repeated_key_within_one_batch_keeps_the_first_row() {
        let rows = vec![row("Budapest", ts(0), 15.0), row("Budapest", ts(0), 99.0)];
        let partition = partition_new(KIND, rows, &HashSet::new()).unwrap();
        assert_eq!(partition.new_rows.len(), 1);
        assert_eq!(partition.new_rows[0].values[0], Some(15.0));
        assert_eq!(partition.duplicates, 1);
    }

    #[test]
    fn empty_place_name_is_rejected_before_any_partitioning() {
        let err = partition_new(KIND, vec![row("  ", ts(0), 1.0)], &HashSet::new()).unwrap_err();
        assert!(matches!(err, StoreError::MalformedBatch { .. }));
    }

    #[test]
    fn wrong_value_count_is_rejected() {
        let malformed = ObservationRow {
            place_name: "Budapest".to_string(),
            timestamp: ts(0),
            values: vec![Some(1.0)],
        };
        let err = partition_new(KIND, vec![malformed], &HashSet::new()).unwrap_err();
        assert!(matches!(err, StoreError::MalformedBatch { .. }));
    }
}
