//! `ingest` command: one fetch-then-store cycle without the HTTP surface.

use crate::config::Settings;
use crate::fetch::client::OpenMeteoClient;
use crate::pipeline::{IngestRequest, Ingestor};
use crate::store::repository::WeatherRepository;
use anyhow::Result;
use chrono::{Duration, NaiveDate, Utc};
use clap::Args;
use tracing::info;

/// Arguments for the ingest command
#[derive(Args)]
pub struct IngestArgs {
    /// Latitude of the place, in degrees
    #[arg(long)]
    pub lat: f64,

    /// Longitude of the place, in degrees
    #[arg(long)]
    pub lon: f64,

    /// Place identifier stored with every row
    #[arg(long)]
    pub place_name: String,

    /// First date to request (defaults to the configured origin date)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Last date to request (defaults to today plus the forecast horizon)
    #[arg(long)]
    pub end_date: Option<NaiveDate>,

    /// IANA timezone sent upstream (defaults to the configured zone)
    #[arg(long)]
    pub timezone: Option<String>,
}

pub async fn execute(settings: Settings, args: IngestArgs) -> Result<()> {
    let repository = WeatherRepository::from_settings(&settings.database).await?;
    let client = OpenMeteoClient::new(settings.api.clone());
    let ingestor = Ingestor::new(client, repository, settings.ingest.clone());

    let today = Utc::now().date_naive();
    let request = IngestRequest {
        latitude: args.lat,
        longitude: args.lon,
        place_name: args.place_name,
        start_date: args.start_date.unwrap_or(settings.ingest.origin_date),
        end_date: args
            .end_date
            .unwrap_or_else(|| today + Duration::days(settings.ingest.forecast_horizon_days)),
        timezone: args.timezone,
    };

    let outcomes = ingestor.run(&request).await?;
    for result in &outcomes {
        info!(
            kind = %result.kind,
            appended = result.outcome.appended,
            skipped = result.outcome.skipped,
            "dataset ingested"
        );
    }
    Ok(())
}
