//! Reshapes an upstream series response into an [`ObservationBatch`].
//!
//! The upstream interval descriptors are open on the left: the first reported
//! timestamp (`time`) is the start of the first interval, and each value
//! belongs to the END of its interval. The emitted timeline therefore runs
//! `time + interval, time + 2*interval, ..., time_end` inclusive, never
//! `time` itself. Downstream tables were built against this convention, so it
//! is preserved exactly.

use crate::fetch::error::NormalizeError;
use crate::fetch::response::SeriesResponse;
use crate::types::dataset::DatasetKind;
use crate::types::observation::{ObservationBatch, ObservationRow};
use chrono::{DateTime, Utc};

/// Expands the three interval descriptors into the inclusive-right timestamp
/// sequence `(first, last]` stepped by `interval` seconds.
pub fn expand_timeline(
    first: i64,
    last: i64,
    interval: i64,
) -> Result<Vec<DateTime<Utc>>, NormalizeError> {
    if interval <= 0 || last < first || (last - first) % interval != 0 {
        return Err(NormalizeError::BadTimeline {
            first,
            last,
            interval,
        });
    }
    let steps = (last - first) / interval;
    let mut timeline = Vec::with_capacity(steps as usize);
    for step in 1..=steps {
        let epoch = first + step * interval;
        let timestamp = DateTime::<Utc>::from_timestamp(epoch, 0)
            .ok_or(NormalizeError::TimestampOutOfRange(epoch))?;
        timeline.push(timestamp);
    }
    Ok(timeline)
}

/// Turns one upstream response into a batch of rows tagged with `place_name`.
///
/// Variables are read back in the exact order of [`DatasetKind::measures`],
/// the same order they were requested in; the mapping between measures and
/// value arrays is positional, not name-keyed, end to end.
pub fn normalize(
    kind: DatasetKind,
    place_name: &str,
    response: &SeriesResponse,
) -> Result<ObservationBatch, NormalizeError> {
    let block = response.block(kind)?;
    let timeline = expand_timeline(block.time, block.time_end, block.interval)?;

    let mut columns = Vec::with_capacity(kind.measures().len());
    for name in kind.measures().iter().copied() {
        let values = block.values(kind, name)?;
        if values.len() != timeline.len() {
            return Err(NormalizeError::LengthMismatch {
                name: name.to_string(),
                expected: timeline.len(),
                found: values.len(),
            });
        }
        columns.push(values);
    }

    let rows = timeline
        .into_iter()
        .enumerate()
        .map(|(i, timestamp)| ObservationRow {
            place_name: place_name.to_string(),
            timestamp,
            values: columns.iter().map(|column| column[i]).collect(),
        })
        .collect();

    Ok(ObservationBatch::new(kind, rows))
}
