//! Service configuration.
//!
//! Everything the components need is loaded here once and passed in by value;
//! no component reads the process environment on its own.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Main application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Database configuration
    pub database: DatabaseSettings,
    /// Upstream Open-Meteo endpoints
    #[serde(default)]
    pub api: ApiSettings,
    /// HTTP trigger surface
    #[serde(default)]
    pub server: ServerSettings,
    /// Ingest window policy
    #[serde(default)]
    pub ingest: IngestSettings,
}

impl Settings {
    /// Loads settings from an optional config file merged with environment
    /// variables prefixed `METEO_INGEST` (e.g. `METEO_INGEST__DATABASE__URL`).
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = config_file {
            builder = builder.add_source(File::with_name(path));
        } else {
            builder = builder.add_source(File::with_name("meteo-ingest").required(false));
        }
        builder
            .add_source(
                Environment::with_prefix("METEO_INGEST")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}

/// Database connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// PostgreSQL connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    2
}

/// Upstream endpoint settings. Defaults point at the production Open-Meteo
/// endpoints; tests and mirrors override them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_archive_url")]
    pub archive_url: String,
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,
    #[serde(default = "default_air_quality_url")]
    pub air_quality_url: String,
    /// IANA zone name sent upstream when a request does not carry one.
    #[serde(default = "default_timezone")]
    pub default_timezone: String,
}

fn default_archive_url() -> String {
    "https://archive-api.open-meteo.com/v1/archive".to_string()
}

fn default_forecast_url() -> String {
    "https://api.open-meteo.com/v1/forecast".to_string()
}

fn default_air_quality_url() -> String {
    "https://air-quality-api.open-meteo.com/v1/air-quality".to_string()
}

fn default_timezone() -> String {
    "Europe/Berlin".to_string()
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            archive_url: default_archive_url(),
            forecast_url: default_forecast_url(),
            air_quality_url: default_air_quality_url(),
            default_timezone: default_timezone(),
        }
    }
}

/// Bind address for the HTTP trigger surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Window policy for one ingest cycle.
///
/// Archive data lags behind real time by a few days, forecasts extend past it;
/// these settings drive the per-dataset clamping in the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestSettings {
    /// Earliest date requested when a trigger does not carry a start date.
    #[serde(default = "default_origin_date")]
    pub origin_date: chrono::NaiveDate,
    /// How far the archive endpoint trails today.
    #[serde(default = "default_history_lag_days")]
    pub history_lag_days: i64,
    /// How far past today the forecast endpoint is asked for.
    #[serde(default = "default_forecast_horizon_days")]
    pub forecast_horizon_days: i64,
}

fn default_origin_date() -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(2024, 6, 3).unwrap_or_default()
}

fn default_history_lag_days() -> i64 {
    3
}

fn default_forecast_horizon_days() -> i64 {
    7
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            origin_date: default_origin_date(),
            history_lag_days: default_history_lag_days(),
            forecast_horizon_days: default_forecast_horizon_days(),
        }
    }
}
