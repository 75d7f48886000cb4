//! Defines the closed set of datasets this service ingests, together with the
//! per-dataset facts everything else keys off: the upstream endpoint, the
//! ordered measure list, the response block granularity, and the target table.

use crate::config::ApiSettings;
use std::fmt;

/// One of the three Open-Meteo series this service knows how to ingest.
///
/// Each variant fixes its own endpoint, measure set, and storage table, so
/// dispatch is a plain `match` everywhere.
///
/// # Examples
///
/// ```
/// use meteo_ingest::DatasetKind;
///
/// assert_eq!(DatasetKind::DailyHistory.table_name(), "daily_weather_data");
/// assert_eq!(DatasetKind::HourlyAirQuality.measures().len(), 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    /// Archived daily aggregates (mean temperature, rain sum, max wind, radiation sum).
    DailyHistory,
    /// Hourly forecast values around the current date.
    HourlyForecast,
    /// Hourly air-quality concentrations (particulates and trace gases).
    HourlyAirQuality,
}

/// Which time block of the upstream response carries the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockGranularity {
    Daily,
    Hourly,
}

impl DatasetKind {
    /// All kinds, in the order one ingest cycle processes them.
    pub const ALL: [DatasetKind; 3] = [
        DatasetKind::DailyHistory,
        DatasetKind::HourlyAirQuality,
        DatasetKind::HourlyForecast,
    ];

    /// The table this dataset is persisted to.
    pub fn table_name(&self) -> &'static str {
        match self {
            DatasetKind::DailyHistory => "daily_weather_data",
            DatasetKind::HourlyForecast => "forecast_weather_data",
            DatasetKind::HourlyAirQuality => "air_quality_data",
        }
    }

    /// The ordered measure list for this dataset.
    ///
    /// Order matters twice: it is the order variables are requested upstream,
    /// and the order value arrays are read back out of the response. Column
    /// names in the storage tables use the same names in the same order.
    pub fn measures(&self) -> &'static [&'static str] {
        match self {
            DatasetKind::DailyHistory => &[
                "temperature_2m_mean",
                "rain_sum",
                "wind_speed_10m_max",
                "shortwave_radiation_sum",
            ],
            DatasetKind::HourlyForecast => &[
                "temperature_2m",
                "rain",
                "wind_speed_10m",
                "shortwave_radiation",
            ],
            DatasetKind::HourlyAirQuality => &[
                "pm10",
                "pm2_5",
                "carbon_dioxide",
                "nitrogen_dioxide",
                "sulphur_dioxide",
                "ozone",
            ],
        }
    }

    /// Whether the series arrives in the `daily` or the `hourly` block.
    pub fn granularity(&self) -> BlockGranularity {
        match self {
            DatasetKind::DailyHistory => BlockGranularity::Daily,
            DatasetKind::HourlyForecast | DatasetKind::HourlyAirQuality => BlockGranularity::Hourly,
        }
    }

    /// Base URL for this dataset's endpoint.
    pub fn base_url<'a>(&self, api: &'a ApiSettings) -> &'a str {
        match self {
            DatasetKind::DailyHistory => &api.archive_url,
            DatasetKind::HourlyForecast => &api.forecast_url,
            DatasetKind::HourlyAirQuality => &api.air_quality_url,
        }
    }

    /// Upstream `temporal_resolution` parameter, where the endpoint takes one.
    pub(crate) fn temporal_resolution(&self) -> Option<&'static str> {
        match self {
            DatasetKind::DailyHistory => None,
            DatasetKind::HourlyForecast | DatasetKind::HourlyAirQuality => Some("hourly_6"),
        }
    }

    pub(crate) fn slug(&self) -> &'static str {
        match self {
            DatasetKind::DailyHistory => "daily-history",
            DatasetKind::HourlyForecast => "hourly-forecast",
            DatasetKind::HourlyAirQuality => "hourly-air-quality",
        }
    }
}

/// Formats a `DatasetKind` as its stable slug.
///
/// # Examples
///
/// ```
/// use meteo_ingest::DatasetKind;
///
/// assert_eq!(DatasetKind::HourlyForecast.to_string(), "hourly-forecast");
/// ```
impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}
