//! HTTP trigger surface: one endpoint that runs a full ingest cycle, plus the
//! read endpoints the dashboard uses.

use crate::pipeline::{IngestRequest, Ingestor};
use crate::types::dataset::DatasetKind;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub ingestor: Arc<Ingestor>,
}

/// Builds the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/weather", get(trigger_ingest))
        .route("/places", get(list_places))
        .route("/series", get(load_series))
        .route("/health", get(health))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct WeatherParams {
    lat: f64,
    lon: f64,
    place_name: String,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    timezone: Option<String>,
}

#[derive(Debug, Serialize)]
struct IngestSummary {
    message: String,
    appended: u64,
    skipped: usize,
}

/// `GET /weather?lat&lon&place_name[&start_date][&end_date][&timezone]`
///
/// Triggers one fetch-then-store cycle per dataset kind. Defaults: start at
/// the configured origin date, end at today plus the forecast horizon. Any
/// failure anywhere in the cycle surfaces as a 500 with its description.
async fn trigger_ingest(
    State(state): State<AppState>,
    Query(params): Query<WeatherParams>,
) -> Result<Json<IngestSummary>, (StatusCode, String)> {
    let settings = state.ingestor.settings();
    let today = Utc::now().date_naive();
    let request = IngestRequest {
        latitude: params.lat,
        longitude: params.lon,
        place_name: params.place_name,
        start_date: params.start_date.unwrap_or(settings.origin_date),
        end_date: params
            .end_date
            .unwrap_or_else(|| today + Duration::days(settings.forecast_horizon_days)),
        timezone: params.timezone,
    };

    let outcomes = state.ingestor.run(&request).await.map_err(|err| {
        error!(error = %err, "ingest cycle failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("An error occurred: {err}"),
        )
    })?;

    let appended = outcomes.iter().map(|o| o.outcome.appended).sum();
    let skipped = outcomes.iter().map(|o| o.outcome.skipped).sum();
    Ok(Json(IngestSummary {
        message: "Weather data successfully saved to the database.".to_string(),
        appended,
        skipped,
    }))
}

async fn list_places(
    State(state): State<AppState>,
) -> Result<Json<Vec<crate::types::place::Place>>, (StatusCode, String)> {
    state
        .ingestor
        .repository()
        .list_places()
        .await
        .map(Json)
        .map_err(internal_error)
}

#[derive(Debug, Deserialize)]
struct SeriesParams {
    place_name: String,
    #[serde(default = "default_series_kind")]
    dataset: String,
}

fn default_series_kind() -> String {
    "daily-history".to_string()
}

async fn load_series(
    State(state): State<AppState>,
    Query(params): Query<SeriesParams>,
) -> Result<Json<Vec<crate::types::place::SeriesPoint>>, (StatusCode, String)> {
    let kind = match params.dataset.as_str() {
        "daily-history" => DatasetKind::DailyHistory,
        "hourly-forecast" => DatasetKind::HourlyForecast,
        "hourly-air-quality" => DatasetKind::HourlyAirQuality,
        other => {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("unknown dataset '{other}'"),
            ))
        }
    };
    state
        .ingestor
        .repository()
        .load_series(kind, &params.place_name)
        .await
        .map(Json)
        .map_err(internal_error)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

fn internal_error(err: crate::store::error::StoreError) -> (StatusCode, String) {
    error!(error = %err, "request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("An error occurred: {err}"),
    )
}
