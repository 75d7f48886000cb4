//! The place registry row and the long-form series point served to dashboards.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// One entry of the `places_data` registry, read-only for the ingest pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Place {
    pub place_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// One unpivoted observation value, as the dashboard read surface returns it:
/// `(place, instant, measure name, value)`.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct SeriesPoint {
    pub place_name: String,
    pub timestamp: DateTime<Utc>,
    pub measure: String,
    pub value: Option<f64>,
}
