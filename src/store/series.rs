//! Dashboard-facing reads: the place registry and long-form series.

use crate::store::error::StoreResult;
use crate::store::repository::WeatherRepository;
use crate::types::dataset::DatasetKind;
use crate::types::place::{Place, SeriesPoint};
use tracing::debug;

impl WeatherRepository {
    /// The `places_data` registry, read-only from the pipeline's perspective.
    pub async fn list_places(&self) -> StoreResult<Vec<Place>> {
        let places = sqlx::query_as::<_, Place>(
            "SELECT place_name, latitude, longitude FROM places_data ORDER BY place_name",
        )
        .fetch_all(self.pool())
        .await?;
        Ok(places)
    }

    /// Distinct place names that actually have rows in `kind`'s table.
    pub async fn place_names_with_data(&self, kind: DatasetKind) -> StoreResult<Vec<String>> {
        let query = format!(
            "SELECT DISTINCT place_name FROM {} ORDER BY place_name",
            kind.table_name()
        );
        let names = sqlx::query_scalar(&query).fetch_all(self.pool()).await?;
        Ok(names)
    }

    /// Loads one place's series in long form, one point per (instant, measure),
    /// ordered by time. This is the shape the dashboard charts consume.
    pub async fn load_series(
        &self,
        kind: DatasetKind,
        place_name: &str,
    ) -> StoreResult<Vec<SeriesPoint>> {
        let query = series_statement(kind);
        let points = sqlx::query_as::<_, SeriesPoint>(&query)
            .bind(place_name)
            .fetch_all(self.pool())
            .await?;
        debug!(%kind, place_name, points = points.len(), "loaded series");
        Ok(points)
    }
}

/// Unpivots the measure columns with a lateral VALUES list, so one stored row
/// becomes one point per measure.
fn series_statement(kind: DatasetKind) -> String {
    let values = kind
        .measures()
        .iter()
        .map(|measure| format!("(a.{measure}, '{measure}')"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "SELECT a.place_name, a.date_id AS timestamp, t.measure, t.value \
         FROM {} AS a \
         CROSS JOIN LATERAL (VALUES {}) AS t (value, measure) \
         WHERE a.place_name = $1 \
         ORDER BY a.date_id, t.measure",
        kind.table_name(),
        values
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_statement_unpivots_every_measure() {
        let statement = series_statement(DatasetKind::HourlyForecast);
        assert!(statement.contains("FROM forecast_weather_data AS a"));
        for measure in DatasetKind::HourlyForecast.measures() {
            assert!(
                statement.contains(&format!("(a.{measure}, '{measure}')")),
                "missing measure {measure}"
            );
        }
        assert!(statement.ends_with("ORDER BY a.date_id, t.measure"));
    }
}
