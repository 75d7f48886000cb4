//! HTTP client for the Open-Meteo endpoints.

use crate::config::ApiSettings;
use crate::fetch::error::FetchError;
use crate::fetch::response::SeriesResponse;
use crate::types::dataset::{BlockGranularity, DatasetKind};
use bon::bon;
use chrono::NaiveDate;
use tracing::debug;

/// Client for the three upstream series endpoints.
///
/// One instance is shared across requests; it holds a connection-pooling
/// [`reqwest::Client`] and the configured endpoint URLs. Retry and response
/// caching are left to the network layer, not implemented here.
///
/// # Examples
///
/// ```no_run
/// # use meteo_ingest::{ApiSettings, DatasetKind, OpenMeteoClient};
/// # use chrono::NaiveDate;
/// # async fn run() -> Result<(), meteo_ingest::IngestError> {
/// let client = OpenMeteoClient::new(ApiSettings::default());
/// let response = client
///     .fetch_series()
///     .kind(DatasetKind::HourlyForecast)
///     .latitude(47.5024)
///     .longitude(19.0487)
///     .start_date(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap())
///     .end_date(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap())
///     .call()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    http: reqwest::Client,
    api: ApiSettings,
}

#[bon]
impl OpenMeteoClient {
    /// Creates a client from endpoint settings with a default HTTP client.
    pub fn new(api: ApiSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            api,
        }
    }

    /// Creates a client reusing an existing `reqwest::Client`.
    pub fn with_http_client(http: reqwest::Client, api: ApiSettings) -> Self {
        Self { http, api }
    }

    /// Fetches one raw series response for `kind` over a date range.
    ///
    /// The variable list is sent in the exact order of
    /// [`DatasetKind::measures`]; `timeformat=unixtime` requests the scalar
    /// interval descriptors the normalizer expects. When `timezone` is not
    /// given, the configured default zone is sent.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Network`] when the request cannot be sent,
    /// [`FetchError::HttpStatus`] on a non-success status, and
    /// [`FetchError::Decode`] when the body is not the expected JSON shape.
    #[builder]
    pub async fn fetch_series(
        &self,
        kind: DatasetKind,
        latitude: f64,
        longitude: f64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        timezone: Option<String>,
    ) -> Result<SeriesResponse, FetchError> {
        let url = kind.base_url(&self.api).to_string();
        let variables = kind.measures().join(",");
        let block_key = match kind.granularity() {
            BlockGranularity::Daily => "daily",
            BlockGranularity::Hourly => "hourly",
        };
        let timezone = timezone.unwrap_or_else(|| self.api.default_timezone.clone());

        let mut params = vec![
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("start_date", start_date.format("%Y-%m-%d").to_string()),
            ("end_date", end_date.format("%Y-%m-%d").to_string()),
            ("timezone", timezone),
            ("timeformat", "unixtime".to_string()),
            (block_key, variables),
        ];
        if let Some(resolution) = kind.temporal_resolution() {
            params.push(("temporal_resolution", resolution.to_string()));
        }

        debug!(%kind, %url, %start_date, %end_date, "fetching upstream series");

        let response = self
            .http
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|source| FetchError::Network {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus { url, status });
        }

        response
            .json::<SeriesResponse>()
            .await
            .map_err(|source| FetchError::Decode { url, source })
    }
}
