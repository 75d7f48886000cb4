//! Wire model for the upstream series responses.
//!
//! With `timeformat=unixtime` the endpoints report each series block as three
//! scalar interval descriptors (`time` = first interval start, `time_end` =
//! last interval start, `interval` = step in seconds) plus one numeric array
//! per requested variable. Array entries are nullable.

use crate::fetch::error::NormalizeError;
use crate::types::dataset::{BlockGranularity, DatasetKind};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Top-level upstream response. Exactly one of `daily`/`hourly` is present for
/// the datasets this service requests.
#[derive(Debug, Clone, Deserialize)]
pub struct SeriesResponse {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub utc_offset_seconds: i64,
    #[serde(default)]
    pub daily: Option<SeriesBlock>,
    #[serde(default)]
    pub hourly: Option<SeriesBlock>,
}

/// One time block: interval descriptors plus the variable arrays, captured
/// as raw JSON so they can be pulled out in requested order.
#[derive(Debug, Clone, Deserialize)]
pub struct SeriesBlock {
    /// Epoch seconds of the first interval start.
    pub time: i64,
    /// Epoch seconds of the last interval start.
    pub time_end: i64,
    /// Interval length in seconds.
    pub interval: i64,
    #[serde(flatten)]
    pub variables: Map<String, Value>,
}

impl SeriesResponse {
    /// Returns the block that carries `kind`'s series, or an error when the
    /// upstream response does not have it.
    pub fn block(&self, kind: DatasetKind) -> Result<&SeriesBlock, NormalizeError> {
        let (block, expected) = match kind.granularity() {
            BlockGranularity::Daily => (self.daily.as_ref(), "daily"),
            BlockGranularity::Hourly => (self.hourly.as_ref(), "hourly"),
        };
        block.ok_or(NormalizeError::MissingBlock { kind, expected })
    }
}

impl SeriesBlock {
    /// Extracts the value array for one requested variable.
    ///
    /// A variable absent from the response fails the whole normalization; the
    /// upstream returning fewer variables than requested is never papered over.
    pub fn values(&self, kind: DatasetKind, name: &str) -> Result<Vec<Option<f64>>, NormalizeError> {
        let raw = self
            .variables
            .get(name)
            .ok_or_else(|| NormalizeError::MissingVariable {
                kind,
                name: name.to_string(),
            })?;
        serde_json::from_value(raw.clone()).map_err(|source| NormalizeError::InvalidVariable {
            name: name.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn air_quality_fixture() -> SeriesResponse {
        serde_json::from_value(json!({
            "latitude": 47.5,
            "longitude": 19.05,
            "utc_offset_seconds": 0,
            "hourly": {
                "time": 1_690_000_000_i64,
                "time_end": 1_690_010_800_i64,
                "interval": 3600,
                "pm10": [12.0, null, 9.5],
                "pm2_5": [5.1, 4.8, 4.4],
                "carbon_dioxide": [417.0, 418.0, 419.0],
                "nitrogen_dioxide": [8.0, 7.5, 7.0],
                "sulphur_dioxide": [1.1, 1.0, 0.9],
                "ozone": [60.0, 61.0, 62.0]
            }
        }))
        .expect("fixture must deserialize")
    }

    #[test]
    fn decodes_interval_descriptors_and_arrays() {
        let response = air_quality_fixture();
        let block = response.block(DatasetKind::HourlyAirQuality).unwrap();
        assert_eq!(block.time, 1_690_000_000);
        assert_eq!(block.time_end, 1_690_010_800);
        assert_eq!(block.interval, 3600);

        let pm10 = block.values(DatasetKind::HourlyAirQuality, "pm10").unwrap();
        assert_eq!(pm10, vec![Some(12.0), None, Some(9.5)]);
    }

    #[test]
    fn missing_block_is_an_error() {
        let response = air_quality_fixture();
        // Daily history expects a `daily` block; this response only has `hourly`.
        let err = response.block(DatasetKind::DailyHistory).unwrap_err();
        assert!(matches!(err, NormalizeError::MissingBlock { .. }));
    }

    #[test]
    fn missing_variable_is_an_error() {
        let response = air_quality_fixture();
        let block = response.block(DatasetKind::HourlyAirQuality).unwrap();
        let err = block
            .values(DatasetKind::HourlyAirQuality, "temperature_2m")
            .unwrap_err();
        assert!(matches!(err, NormalizeError::MissingVariable { .. }));
    }

    #[test]
    fn non_numeric_array_is_an_error() {
        let response: SeriesResponse = serde_json::from_value(json!({
            "latitude": 0.0,
            "longitude": 0.0,
            "hourly": {
                "time": 0,
                "time_end": 3600,
                "interval": 3600,
                "pm10": "not-an-array"
            }
        }))
        .unwrap();
        let block = response.block(DatasetKind::HourlyAirQuality).unwrap();
        let err = block
            .values(DatasetKind::HourlyAirQuality, "pm10")
            .unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidVariable { .. }));
    }
}
