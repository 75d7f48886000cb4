//! One ingest cycle: fetch, normalize, and incrementally store each dataset.

use crate::config::IngestSettings;
use crate::error::IngestError;
use crate::fetch::client::OpenMeteoClient;
use crate::fetch::normalize::normalize;
use crate::store::repository::{StoreOutcome, WeatherRepository};
use crate::types::dataset::DatasetKind;
use chrono::{Duration, NaiveDate, Utc};
use tracing::{info, warn};

/// Parameters of one trigger: where to fetch for, over which window.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub place_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// IANA zone name sent upstream; the configured default when `None`.
    pub timezone: Option<String>,
}

/// What one cycle did for one dataset kind.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetOutcome {
    pub kind: DatasetKind,
    pub outcome: StoreOutcome,
}

/// Runs fetch-then-store cycles, one dataset kind at a time.
///
/// Each invocation is self-contained and sequential: no state is shared across
/// requests beyond the connection pool, and a failure in any stage aborts the
/// whole cycle and surfaces to the caller.
#[derive(Debug, Clone)]
pub struct Ingestor {
    client: OpenMeteoClient,
    repository: WeatherRepository,
    settings: IngestSettings,
}

impl Ingestor {
    pub fn new(
        client: OpenMeteoClient,
        repository: WeatherRepository,
        settings: IngestSettings,
    ) -> Self {
        Self {
            client,
            repository,
            settings,
        }
    }

    /// Read access for the HTTP surface.
    pub fn repository(&self) -> &WeatherRepository {
        &self.repository
    }

    /// Window policy settings, for callers that need to derive defaults.
    pub fn settings(&self) -> &IngestSettings {
        &self.settings
    }

    /// Runs one full cycle: every dataset kind in order, each with its own
    /// effective window derived from the requested one.
    ///
    /// A kind whose effective window is empty (e.g. daily history when the
    /// request starts today) is skipped with a log line rather than sent
    /// upstream as an inverted range.
    pub async fn run(&self, request: &IngestRequest) -> Result<Vec<DatasetOutcome>, IngestError> {
        let today = Utc::now().date_naive();
        let mut outcomes = Vec::with_capacity(DatasetKind::ALL.len());

        for kind in DatasetKind::ALL {
            let Some((start, end)) =
                effective_window(kind, request.start_date, request.end_date, today, &self.settings)
            else {
                warn!(%kind, "effective window is empty, skipping");
                continue;
            };

            info!(
                %kind,
                place_name = %request.place_name,
                %start,
                %end,
                "running fetch-then-store"
            );

            let response = self
                .client
                .fetch_series()
                .kind(kind)
                .latitude(request.latitude)
                .longitude(request.longitude)
                .start_date(start)
                .end_date(end)
                .maybe_timezone(request.timezone.clone())
                .call()
                .await?;

            let batch = normalize(kind, &request.place_name, &response)?;
            let outcome = self.repository.save_batch(batch).await?;
            outcomes.push(DatasetOutcome { kind, outcome });
        }

        Ok(outcomes)
    }
}

/// Clamps the requested window to what each endpoint can actually serve:
/// the archive trails today by the configured lag, air quality stops at today,
/// and the forecast only reaches back a few days. Returns `None` when the
/// clamped window is empty.
pub(crate) fn effective_window(
    kind: DatasetKind,
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
    settings: &IngestSettings,
) -> Option<(NaiveDate, NaiveDate)> {
    let (start, end) = match kind {
        DatasetKind::DailyHistory => (start, end.min(today - Duration::days(settings.history_lag_days))),
        DatasetKind::HourlyAirQuality => (start, end.min(today)),
        DatasetKind::HourlyForecast => (start.max(today - Duration::days(settings.history_lag_days)), end),
    };
    (start <= end).then_some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn history_window_trails_today_by_the_configured_lag() {
        let settings = IngestSettings::default();
        let today = date(2024, 11, 20);
        let window = effective_window(
            DatasetKind::DailyHistory,
            date(2024, 6, 3),
            date(2024, 11, 27),
            today,
            &settings,
        )
        .unwrap();
        assert_eq!(window, (date(2024, 6, 3), date(2024, 11, 17)));
    }

    #[test]
    fn air_quality_window_stops_at_today() {
        let settings = IngestSettings::default();
        let today = date(2024, 11, 20);
        let window = effective_window(
            DatasetKind::HourlyAirQuality,
            date(2024, 6, 3),
            date(2024, 11, 27),
            today,
            &settings,
        )
        .unwrap();
        assert_eq!(window, (date(2024, 6, 3), date(2024, 11, 20)));
    }

    #[test]
    fn forecast_window_reaches_back_only_a_few_days() {
        let settings = IngestSettings::default();
        let today = date(2024, 11, 20);
        let window = effective_window(
            DatasetKind::HourlyForecast,
            date(2024, 6, 3),
            date(2024, 11, 27),
            today,
            &settings,
        )
        .unwrap();
        assert_eq!(window, (date(2024, 11, 17), date(2024, 11, 27)));
    }

    #[test]
    fn empty_effective_window_is_none() {
        let settings = IngestSettings::default();
        let today = date(2024, 11, 20);
        // History request entirely inside the archive lag.
        assert_eq!(
            effective_window(
                DatasetKind::DailyHistory,
                date(2024, 11, 19),
                date(2024, 11, 20),
                today,
                &settings,
            ),
            None
        );
        // Forecast request entirely in the past.
        assert_eq!(
            effective_window(
                DatasetKind::HourlyForecast,
                date(2024, 6, 1),
                date(2024, 6, 10),
                today,
                &settings,
            ),
            None
        );
    }

    #[test]
    fn window_is_kept_when_narrower_than_the_clamp() {
        let settings = IngestSettings::default();
        let today = date(2024, 11, 20);
        let window = effective_window(
            DatasetKind::DailyHistory,
            date(2024, 7, 1),
            date(2024, 8, 1),
            today,
            &settings,
        )
        .unwrap();
        assert_eq!(window, (date(2024, 7, 1), date(2024, 8, 1)));
    }
}
