//! Row-oriented observation data as it flows between fetch and store.

use crate::types::dataset::DatasetKind;
use chrono::{DateTime, TimeZone, Utc};

/// The deduplication key: one row per `(place_name, timestamp)` within a table.
///
/// Construction always normalizes the timestamp to UTC, so keys built from
/// differently-represented instants of the same moment compare equal.
///
/// # Examples
///
/// ```
/// use meteo_ingest::NaturalKey;
/// use chrono::{FixedOffset, TimeZone, Utc};
///
/// let utc = Utc.with_ymd_and_hms(2024, 6, 3, 0, 0, 0).unwrap();
/// let offset = FixedOffset::east_opt(2 * 3600)
///     .unwrap()
///     .with_ymd_and_hms(2024, 6, 3, 2, 0, 0)
///     .unwrap();
///
/// assert_eq!(
///     NaturalKey::new("Budapest", utc),
///     NaturalKey::new("Budapest", offset),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NaturalKey {
    pub place_name: String,
    pub timestamp: DateTime<Utc>,
}

impl NaturalKey {
    /// Builds a key, converting `timestamp` to UTC regardless of its original
    /// timezone representation.
    pub fn new<Tz: TimeZone>(place_name: impl Into<String>, timestamp: DateTime<Tz>) -> Self {
        Self {
            place_name: place_name.into(),
            timestamp: timestamp.with_timezone(&Utc),
        }
    }
}

/// One normalized observation: a place, an instant, and the measure values in
/// the positional order of the owning dataset's [`DatasetKind::measures`].
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationRow {
    pub place_name: String,
    pub timestamp: DateTime<Utc>,
    /// One entry per measure; `None` where the upstream source omitted the value.
    pub values: Vec<Option<f64>>,
}

impl ObservationRow {
    pub fn key(&self) -> NaturalKey {
        NaturalKey::new(self.place_name.clone(), self.timestamp)
    }
}

/// The transient result of normalizing one upstream fetch: an ordered batch of
/// rows for a single dataset kind, consumed exactly once by the store step.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationBatch {
    pub kind: DatasetKind,
    pub rows: Vec<ObservationRow>,
}

impl ObservationBatch {
    pub fn new(kind: DatasetKind, rows: Vec<ObservationRow>) -> Self {
        Self { kind, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn key_normalizes_offset_representations_to_the_same_instant() {
        let utc = Utc.with_ymd_and_hms(2024, 6, 3, 0, 0, 0).unwrap();
        let plus_two = FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 6, 3, 2, 0, 0)
            .unwrap();

        let a = NaturalKey::new("Budapest", utc);
        let b = NaturalKey::new("Budapest", plus_two);
        assert_eq!(a, b);

        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn keys_differ_by_place_and_instant() {
        let instant = Utc.with_ymd_and_hms(2024, 6, 3, 0, 0, 0).unwrap();
        let a = NaturalKey::new("Budapest", instant);
        let b = NaturalKey::new("Vienna", instant);
        let c = NaturalKey::new("Budapest", instant + chrono::Duration::hours(1));
        assert_ne!(a, b);
        assert_ne!(a, c);
    }
}
